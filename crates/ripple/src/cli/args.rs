//! CLI argument structs for all commands.

use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;

use super::validators::{validate_filter, validate_limits, validate_name, validate_start};
use crate::domain::{Limits, RelationshipFilter};

/// Arguments for the `compute` command
#[derive(Parser, Debug, Clone)]
pub struct ComputeArgs {
    /// Failed node(s), as JSON: `3`, `[1,2]` or `{"id": 3}`
    #[arg(
        value_parser = validate_start,
        required_unless_present = "names",
        conflicts_with = "names"
    )]
    pub start: Option<Value>,

    /// Seed by node name instead of id (repeatable)
    #[arg(short = 'n', long = "name", value_parser = validate_name)]
    pub names: Vec<String>,

    /// JSONL graph file (overrides `graph` in ripple.yaml)
    #[arg(short, long)]
    pub graph: Option<PathBuf>,

    /// Relationships to follow, e.g. `IMPACTS>|<FEEDS`
    ///
    /// `<TYPE` follows incoming edges, `TYPE>` or bare `TYPE` outgoing
    /// edges and `<TYPE>` both.
    #[arg(short, long, value_parser = validate_filter)]
    pub filter: Option<RelationshipFilter>,

    /// Resource limits, e.g. `5hops,30s,500results`
    ///
    /// Limits not mentioned are disabled.
    #[arg(short, long, value_parser = validate_limits)]
    pub limits: Option<Limits>,

    /// Print traversal statistics
    #[arg(long)]
    pub stats: bool,
}

/// Arguments for the `check` command
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// JSONL graph file (overrides `graph` in ripple.yaml)
    #[arg(short, long)]
    pub graph: Option<PathBuf>,
}

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}
