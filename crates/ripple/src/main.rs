//! Ripple CLI binary.

use std::process::ExitCode;

use colored::Colorize;
use ripple::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the ripple CLI.
///
/// Uses tokio's `current_thread` runtime: the only I/O is reading the graph
/// and configuration files.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // RUST_LOG wins over -v when set
    let filter = match cli.verbose {
        0 => "ripple=warn",
        1 => "ripple=info",
        2 => "ripple=debug",
        _ => "ripple=trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            for cause in e.chain().skip(1) {
                eprintln!("  {}: {cause}", "caused by".dimmed());
            }
            ExitCode::FAILURE
        }
    }
}
