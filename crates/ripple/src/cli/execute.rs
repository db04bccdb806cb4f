//! Command execution logic.

use anyhow::{Context as _, Result, anyhow, bail};
use chrono::Utc;
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::args::{CheckArgs, ComputeArgs, InitArgs};
use crate::config::{self, RippleConfig};
use crate::domain::NodeId;
use crate::output::color::{bold, info, warning};
use crate::output::{
    self, ImpactDocument, OutputConfig, OutputMode, StatsDocument, count_of, impact_rows,
    write_impact_text,
};
use crate::start::resolve_start;
use crate::storage::{InMemoryGraph, LoadWarning, load_from_jsonl};
use crate::traversal::Traversal;

/// Configuration in effect for one command.
#[derive(Debug, Default)]
pub struct Context {
    config: RippleConfig,
    /// Directory relative graph paths in the config resolve against
    config_dir: Option<PathBuf>,
}

impl Context {
    /// Load the explicit config file, or the nearest `ripple.yaml`, or
    /// nothing.
    pub async fn load(working_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(working_dir.join(path)),
            None => config::find_config(working_dir),
        };
        let Some(path) = path else {
            tracing::debug!("No configuration file, using defaults");
            return Ok(Self::default());
        };

        let config = RippleConfig::load(&path)
            .await
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;
        Ok(Self {
            config,
            config_dir: path.parent().map(Path::to_path_buf),
        })
    }

    /// The graph file to use: the flag, or the config entry.
    fn graph_path(&self, flag: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = flag {
            return Ok(path.to_path_buf());
        }
        let configured = self.config.graph.as_deref().ok_or_else(|| {
            anyhow!("no graph file given: pass --graph or set `graph` in ripple.yaml")
        })?;
        Ok(match &self.config_dir {
            Some(dir) => dir.join(configured),
            None => configured.to_path_buf(),
        })
    }
}

async fn load_graph(path: &Path) -> Result<(InMemoryGraph, Vec<LoadWarning>)> {
    load_from_jsonl(path)
        .await
        .with_context(|| format!("failed to load graph from {}", path.display()))
}

/// Execute the compute command
pub async fn execute_compute(
    context: &Context,
    args: &ComputeArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let filter = match &args.filter {
        Some(filter) => filter.clone(),
        None => context.config.filter()?,
    };
    let limits = match args.limits {
        Some(limits) => limits,
        None => context.config.limits()?,
    };

    let graph_path = context.graph_path(args.graph.as_deref())?;
    let (graph, warnings) = load_graph(&graph_path).await?;
    if !warnings.is_empty() {
        tracing::warn!(
            path = %graph_path.display(),
            skipped = warnings.len(),
            "Graph loaded with skipped records; run `ripple check` for details"
        );
    }

    let seeds = if args.names.is_empty() {
        resolve_start(&graph, args.start.as_ref().unwrap_or(&Value::Null))?
    } else {
        seeds_by_name(&graph, &args.names)?
    };

    let report = Traversal::new(&graph, seeds.iter().copied())
        .with_filter(filter.clone())
        .with_limits(limits)
        .run()?;
    let rows = impact_rows(&graph, &report.results);

    match output_mode {
        OutputMode::Json => {
            output::print_json(&ImpactDocument {
                computed_at: Utc::now(),
                seeds: &seeds,
                filter: filter.to_string(),
                limits: limits.to_string(),
                results: rows,
                stats: args.stats.then(|| StatsDocument::from(&report.stats)),
            })?;
        }
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let seed_list: Vec<String> = seeds.iter().map(NodeId::to_string).collect();
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(
                handle,
                "Impact of {} along {} ({}):",
                info(&format!("[{}]", seed_list.join(", ")), &config),
                bold(&filter.to_string(), &config),
                limits
            )?;
            writeln!(handle)?;
            write_impact_text(&mut handle, &rows, &report, args.stats, &config)?;
        }
    }

    Ok(())
}

/// Resolve `--name` arguments, keeping the first occurrence of each node.
fn seeds_by_name(graph: &InMemoryGraph, names: &[String]) -> Result<Vec<NodeId>> {
    let mut seeds = Vec::with_capacity(names.len());
    for name in names {
        let Some(node) = graph.node_by_name(name) else {
            bail!("no node named '{name}' in the graph");
        };
        if !seeds.contains(&node.id) {
            seeds.push(node.id);
        }
    }
    Ok(seeds)
}

/// Execute the check command
pub async fn execute_check(
    context: &Context,
    args: &CheckArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let graph_path = context.graph_path(args.graph.as_deref())?;
    let (graph, warnings) = load_graph(&graph_path).await?;

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "graph": graph_path.display().to_string(),
                "nodes": graph.node_count(),
                "edges": graph.edge_count(),
                "warnings": warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }))?;
        }
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            println!("Graph: {}", graph_path.display());
            println!(
                "  {}, {}",
                count_of(graph.node_count(), "node"),
                count_of(graph.edge_count(), "edge")
            );
            if warnings.is_empty() {
                println!("  No problems found.");
            } else {
                println!("  {}:", count_of(warnings.len(), "skipped record"));
                for w in &warnings {
                    println!("    {} {w}", warning("warning:", &config));
                }
            }
        }
    }

    Ok(())
}

/// Execute the init command
pub async fn execute_init(
    working_dir: &Path,
    args: &InitArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let path = config::init(working_dir).await?;

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "config_file": path.display().to_string(),
            }))?;
        }
        OutputMode::Text if !args.quiet => {
            println!("Initialized ripple in {}", working_dir.display());
            println!("  Config: {}", path.display());
        }
        OutputMode::Text => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use crate::domain::Node;
    use tempfile::TempDir;

    #[tokio::test]
    async fn context_defaults_without_config() {
        let temp_dir = TempDir::new().unwrap();
        let context = Context::load(temp_dir.path(), Some(Path::new("missing.yaml"))).await;
        assert!(context.is_err());

        let context = Context::default();
        let err = context.graph_path(None).unwrap_err();
        assert!(err.to_string().contains("no graph file given"));
        assert_eq!(
            context.graph_path(Some(Path::new("g.jsonl"))).unwrap(),
            PathBuf::from("g.jsonl")
        );
    }

    #[tokio::test]
    async fn configured_graph_is_relative_to_config() {
        let temp_dir = TempDir::new().unwrap();
        tokio::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "graph: data/net.jsonl\n",
        )
        .await
        .unwrap();
        let nested = temp_dir.path().join("sub");
        tokio::fs::create_dir(&nested).await.unwrap();

        let context = Context::load(&nested, None).await.unwrap();

        assert_eq!(
            context.graph_path(None).unwrap(),
            temp_dir.path().join("data/net.jsonl")
        );
    }

    #[test]
    fn names_resolve_in_order_without_repeats() {
        let mut graph = InMemoryGraph::new();
        graph.add_node(Node::new(1).with_name("a")).unwrap();
        graph.add_node(Node::new(2).with_name("b")).unwrap();

        let names = ["b", "a", "b"].map(String::from);
        assert_eq!(
            seeds_by_name(&graph, &names).unwrap(),
            vec![NodeId(2), NodeId(1)]
        );

        let err = seeds_by_name(&graph, &["zzz".to_string()]).unwrap_err();
        assert!(err.to_string().contains("no node named 'zzz'"));
    }
}
