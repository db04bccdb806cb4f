//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `compute`: Compute the impact of failed nodes
//! - `check`: Load a graph file and report problems
//! - `init`: Write a starter `ripple.yaml`
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format
//! - `-v`: Raise log verbosity (repeatable)
//! - `--config`: Use this configuration file instead of searching for one
//!
//! # Example
//!
//! ```bash
//! ripple compute 3 --graph network.jsonl
//! ripple compute '[1, 2]' --filter 'IMPACTS>|<FEEDS' --limits 5hops
//! ripple --json compute --name loc1 --stats
//! ```

mod args;
mod execute;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{CheckArgs, ComputeArgs, InitArgs};
pub use validators::{validate_filter, validate_limits, validate_name, validate_start};

/// Ripple - cascading impact analysis
///
/// Marks seed nodes as failed and derives the state of everything they
/// impact, following typed relationships in a JSONL graph file.
#[derive(Parser, Debug)]
#[command(name = "ripple")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to the nearest ripple.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compute the impact of one or more failed nodes
    ///
    /// Every seed is reported as FAILED; every other node reached along the
    /// relationship filter gets a state derived from its predecessors.
    Compute(ComputeArgs),

    /// Load a graph file and report its size and any skipped records
    Check(CheckArgs),

    /// Write a starter ripple.yaml in the current directory
    Init(InitArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn execute(&self) -> Result<()> {
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        let working_dir = std::env::current_dir()?;

        match &self.command {
            Commands::Compute(args) => {
                let context =
                    execute::Context::load(&working_dir, self.config.as_deref()).await?;
                execute::execute_compute(&context, args, output_mode).await
            }
            Commands::Check(args) => {
                let context =
                    execute::Context::load(&working_dir, self.config.as_deref()).await?;
                execute::execute_check(&context, args, output_mode).await
            }
            Commands::Init(args) => execute::execute_init(&working_dir, args, output_mode).await,
        }
    }
}
