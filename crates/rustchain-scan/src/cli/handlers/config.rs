//! Configuration command handlers

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::output::print_success;
use std::path::PathBuf;
use tracing::debug;

/// Print an example configuration, or write it to `output`
pub async fn handle_gen_config(output: Option<PathBuf>) -> Result<()> {
    let example = ScanConfig::generate_example()?;

    match output {
        Some(path) => {
            debug!("Writing example configuration to {}", path.display());
            tokio::fs::write(&path, example).await.map_err(|e| {
                ScanError::from(e).with_context(format!("writing {}", path.display()))
            })?;
            print_success(&format!("Example configuration written to {}", path.display()));
        }
        None => print!("{example}"),
    }

    Ok(())
}
