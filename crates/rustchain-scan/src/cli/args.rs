use crate::cli::{commands::Commands, handlers};
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// RustChain weekly node and miner payout scan
#[derive(Parser, Debug)]
#[command(
    name = "rustchain-scan",
    version,
    about = "Weekly RustChain node/miner payout + upgrade scan",
    long_about = "Discovers RustChain nodes from a seed node, probes their health, epoch and
miner endpoints, and classifies node hosts and miners for the weekly payout.

EXAMPLES:
  rustchain-scan scan                                  # Markdown report to stdout
  rustchain-scan scan --expected-miners-file miners.txt --out-md weekly.md
  rustchain-scan --json scan --out-json weekly.json    # JSON to stdout and file
  rustchain-scan check https://node.example.org        # Single node, no discovery
  rustchain-scan gen-config -o rustchain-scan.toml     # Example configuration"
)]
pub struct Args {
    /// Configuration file path (default: ./rustchain-scan.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Args {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        // Logs go to stderr; stdout carries only the report
        let filter = if self.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();

        match self.command {
            Commands::GenConfig { output } => handlers::config::handle_gen_config(output).await,
            Commands::Scan { discovery, options } => {
                handlers::scan::handle_scan(self.config.as_deref(), discovery, options, self.json)
                    .await
            }
            Commands::Check { node_url, options } => {
                handlers::scan::handle_check(self.config.as_deref(), node_url, options, self.json)
                    .await
            }
        }
    }
}
