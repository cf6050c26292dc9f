//! Main entry point for the RustChain weekly scan

use clap::Parser;
use rustchain_scan::cli::Args;
use rustchain_scan::output::{print_error, print_info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = args.run().await {
        print_error(&format!("Error: {e}"));
        if e.is_configuration() {
            print_info("Run `rustchain-scan gen-config` to see every configuration key");
        }
        std::process::exit(1);
    }
}
