//! Scan and single-node check handlers

use crate::cli::commands::{DiscoveryOptions, ScanOptions};
use crate::config::ScanConfig;
use crate::error::Result;
use crate::expected::resolve_expected_miners;
use crate::output::{emit_report, print_info};
use crate::progress::{complete_spinner_and_clear, complete_spinner_error, create_spinner};
use crate::report::ScanReport;
use crate::scan::Scanner;
use chrono::Utc;
use std::future::Future;
use std::path::Path;
use tracing::debug;

fn load_config(
    config_path: Option<&Path>,
    discovery: Option<&DiscoveryOptions>,
    options: &ScanOptions,
) -> Result<ScanConfig> {
    let mut config = ScanConfig::load(config_path)?;
    if let Some(discovery) = discovery {
        discovery.apply_to(&mut config);
    }
    options.apply_to(&mut config);
    config.validate()?;

    debug!(
        "Seed {} timeout {}s verify_tls={} windows {}h/{}h",
        config.seed_node,
        config.http.timeout_secs,
        config.http.verify_tls,
        config.eligibility.active_window_hours,
        config.eligibility.weekly_window_hours
    );
    Ok(config)
}

async fn with_spinner<F>(message: &str, work: F) -> Result<ScanReport>
where
    F: Future<Output = Result<ScanReport>>,
{
    let spinner = create_spinner(message);
    match work.await {
        Ok(report) => {
            complete_spinner_and_clear(spinner);
            Ok(report)
        }
        Err(e) => {
            complete_spinner_error(spinner, "Scan failed");
            Err(e)
        }
    }
}

/// Handle `scan`: discover, probe and classify every node
pub async fn handle_scan(
    config_path: Option<&Path>,
    discovery: DiscoveryOptions,
    options: ScanOptions,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, Some(&discovery), &options)?;
    let expected = resolve_expected_miners(&config).await?;
    let scanner = Scanner::new(config)?;

    let report = with_spinner(
        "Scanning RustChain nodes...",
        scanner.run(&expected, Utc::now()),
    )
    .await?;

    if report.summary.active_nodes_offline > 0 {
        print_info(&format!(
            "{} active node(s) offline; see Node Hosts",
            report.summary.active_nodes_offline
        ));
    }
    emit_report(&report, &options.output, json).await
}

/// Handle `check`: probe one node without discovery
pub async fn handle_check(
    config_path: Option<&Path>,
    node_url: String,
    options: ScanOptions,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, None, &options)?;
    let expected = resolve_expected_miners(&config).await?;
    let scanner = Scanner::new(config)?;

    let report = with_spinner(
        &format!("Checking {node_url}..."),
        scanner.check_node(&node_url, &expected, Utc::now()),
    )
    .await?;

    emit_report(&report, &options.output, json).await
}
