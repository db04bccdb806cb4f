//! Output formatting for CLI commands.
//!
//! Impact reports render either as an aligned text table or as JSON for
//! programmatic use. Both list nodes sorted by id.

pub mod color;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

use crate::domain::{ImpactResult, NodeId};
use crate::state::State;
use crate::storage::GraphStore;
use crate::traversal::{ImpactReport, TraversalStats};

use color::{bold, colorize_state, dimmed, info};

/// Output mode for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for programmatic use
    Json,
}

/// Settings that control text rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `RIPPLE_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        // Respect NO_COLOR standard (https://no-color.org/)
        let ripple_color = match env::var("RIPPLE_COLOR") {
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") => false,
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") || v.is_empty() => true,
            Ok(v) => {
                tracing::warn!(
                    env_var = "RIPPLE_COLOR",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                true
            }
            Err(_) => true,
        };

        Self {
            use_colors: env::var_os("NO_COLOR").is_none() && ripple_color,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

/// One display row of an impact report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactRow {
    /// Node id
    pub node: NodeId,
    /// Node name, when the graph has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Derived state
    pub state: State,
}

/// Attach node names to `results` and sort them by node id.
pub fn impact_rows<G: GraphStore + ?Sized>(store: &G, results: &[ImpactResult]) -> Vec<ImpactRow> {
    let mut rows: Vec<ImpactRow> = results
        .iter()
        .map(|result| ImpactRow {
            node: result.node,
            name: store.node(result.node).and_then(|n| n.name.clone()),
            state: result.state,
        })
        .collect();
    rows.sort_by_key(|row| row.node);
    rows
}

/// JSON document printed by `ripple --json compute`.
#[derive(Debug, Serialize)]
pub struct ImpactDocument<'a> {
    /// When the computation finished
    pub computed_at: DateTime<Utc>,
    /// Resolved seed nodes
    pub seeds: &'a [NodeId],
    /// Relationship filter used, in mini-language form
    pub filter: String,
    /// Limits used, in mini-language form
    pub limits: String,
    /// Impacted nodes, sorted by id
    pub results: Vec<ImpactRow>,
    /// Traversal statistics, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsDocument>,
}

/// JSON form of [`TraversalStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsDocument {
    /// Path arrivals evaluated
    pub paths_evaluated: usize,
    /// Path arrivals pruned
    pub paths_pruned: usize,
    /// Deepest hop depth evaluated
    pub max_depth_reached: usize,
    /// Wall-clock time in milliseconds
    pub elapsed_ms: u128,
}

impl From<&TraversalStats> for StatsDocument {
    fn from(stats: &TraversalStats) -> Self {
        Self {
            paths_evaluated: stats.paths_evaluated,
            paths_pruned: stats.paths_pruned,
            max_depth_reached: stats.max_depth_reached,
            elapsed_ms: stats.elapsed.as_millis(),
        }
    }
}

/// Print a value as pretty JSON to stdout.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

/// Write an impact report as an aligned table, worst states first in the
/// summary line.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn write_impact_text<W: Write>(
    w: &mut W,
    rows: &[ImpactRow],
    report: &ImpactReport,
    show_stats: bool,
    config: &OutputConfig,
) -> io::Result<()> {
    if rows.is_empty() {
        writeln!(w, "{}", dimmed("No impacted nodes.", config))?;
    } else {
        let id_width = rows
            .iter()
            .map(|row| row.node.to_string().len())
            .max()
            .unwrap_or(1);
        let state_width = State::ALL.iter().map(|s| s.as_str().len()).max().unwrap_or(0);

        for row in rows {
            let id = format!("{:>id_width$}", row.node);
            write!(
                w,
                "  {}  {}",
                info(&id, config),
                colorize_state(row.state, state_width, config)
            )?;
            match &row.name {
                Some(name) => writeln!(w, "  {name}")?,
                None => writeln!(w)?,
            }
        }
    }

    writeln!(w)?;
    writeln!(w, "{}", summary_line(rows, config))?;

    if show_stats {
        let stats = &report.stats;
        writeln!(
            w,
            "{} {} paths evaluated, {} pruned, depth {}, {} ms",
            dimmed("Stats:", config),
            stats.paths_evaluated,
            stats.paths_pruned,
            stats.max_depth_reached,
            stats.elapsed.as_millis()
        )?;
    }
    Ok(())
}

/// `1 node`, `0 edges`, `2 skipped records`
#[must_use]
pub fn count_of(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// `12 nodes: 5 FAILED, 1 AT_RISK, 6 WORKING`
fn summary_line(rows: &[ImpactRow], config: &OutputConfig) -> String {
    let counts: Vec<String> = State::ALL
        .iter()
        .rev()
        .filter_map(|&state| {
            let count = rows.iter().filter(|row| row.state == state).count();
            (count > 0).then(|| format!("{count} {state}"))
        })
        .collect();

    let total = count_of(rows.len(), "node");
    if counts.is_empty() {
        bold(&total, config)
    } else {
        format!("{}: {}", bold(&total, config), counts.join(", "))
    }
}
