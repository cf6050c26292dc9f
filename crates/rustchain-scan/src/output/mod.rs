//! Output formatting utilities
//!
//! Stdout carries the report only; status lines go to stderr.

use crate::cli::OutputOptions;
use crate::error::{Result, ScanError};
use crate::report::{render_markdown, ScanReport};
use console::style;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Output data as JSON
pub fn json_output<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{json}");
    Ok(())
}

/// Print a success message with green checkmark
pub fn print_success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message with red X
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
}

/// Print an informational message with blue info icon
pub fn print_info(message: &str) {
    eprintln!("{} {}", style("ℹ").blue(), message);
}

async fn write_file(path: &Path, contents: String) -> Result<()> {
    debug!("Writing {}", path.display());
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| ScanError::from(e).with_context(format!("writing {}", path.display())))
}

/// Write the report to the requested files and stdout
///
/// Markdown goes to stdout unless `--out-md` is given; with `--json` the
/// JSON form is printed instead.
pub async fn emit_report(report: &ScanReport, outputs: &OutputOptions, json: bool) -> Result<()> {
    let markdown = render_markdown(report);

    if let Some(path) = &outputs.out_json {
        write_file(path, report.to_json()? + "\n").await?;
        print_success(&format!("JSON report written to {}", path.display()));
    }
    if let Some(path) = &outputs.out_md {
        write_file(path, format!("{markdown}\n")).await?;
        print_success(&format!("Markdown report written to {}", path.display()));
    }

    if outputs.out_md.is_none() {
        if json {
            json_output(report)?;
        } else {
            println!("{markdown}");
        }
    }

    Ok(())
}
