use crate::config::ScanConfig;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Main CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan every node listed by the seed and classify payouts
    Scan {
        #[command(flatten)]
        discovery: DiscoveryOptions,

        #[command(flatten)]
        options: ScanOptions,
    },

    /// Check a single node against the network version (no discovery)
    Check {
        /// Node base URL, e.g. https://50.28.86.131 or node.example.org:8099
        node_url: String,

        #[command(flatten)]
        options: ScanOptions,
    },

    /// Print or write an example configuration file
    GenConfig {
        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Options that only make sense for a full network scan
#[derive(Args, Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Additional node URL to scan (repeatable)
    #[arg(long = "node-url", value_name = "URL")]
    pub node_urls: Vec<String>,

    /// Maximum number of nodes probed at the same time
    #[arg(long)]
    pub max_concurrent_probes: Option<usize>,
}

impl DiscoveryOptions {
    pub fn apply_to(&self, config: &mut ScanConfig) {
        config.node_urls.extend(self.node_urls.iter().cloned());
        if let Some(limit) = self.max_concurrent_probes {
            config.max_concurrent_probes = limit;
        }
    }
}

/// Options shared by `scan` and `check`
#[derive(Args, Debug, Clone, Default)]
pub struct ScanOptions {
    /// Seed node URL (default: https://50.28.86.131)
    #[arg(long)]
    pub seed_node: Option<String>,

    /// Path to newline-delimited expected miner ids
    #[arg(long)]
    pub expected_miners_file: Option<PathBuf>,

    /// Expected miner id (repeatable); missing ids are flagged for outreach
    #[arg(long = "expected-miner", value_name = "MINER")]
    pub expected_miners: Vec<String>,

    /// Hours considered actively attesting
    #[arg(long)]
    pub active_window_hours: Option<f64>,

    /// Hours considered weekly payout eligible
    #[arg(long)]
    pub weekly_window_hours: Option<f64>,

    /// HTTP timeout per request in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Verify TLS certificates (off by default, public nodes use self-signed certs)
    #[arg(long)]
    pub verify_tls: bool,

    /// Admin key sent as X-Admin-Key / X-API-Key
    #[arg(long, env = "RUSTCHAIN_ADMIN_KEY", hide_env_values = true)]
    pub admin_key: Option<String>,

    #[command(flatten)]
    pub output: OutputOptions,
}

impl ScanOptions {
    /// Overlay command-line values on the loaded configuration
    pub fn apply_to(&self, config: &mut ScanConfig) {
        if let Some(seed) = &self.seed_node {
            config.seed_node = seed.clone();
        }
        if let Some(path) = &self.expected_miners_file {
            config.expected_miners_file = Some(path.clone());
        }
        config
            .expected_miners
            .extend(self.expected_miners.iter().cloned());
        if let Some(hours) = self.active_window_hours {
            config.eligibility.active_window_hours = hours;
        }
        if let Some(hours) = self.weekly_window_hours {
            config.eligibility.weekly_window_hours = hours;
        }
        if let Some(secs) = self.timeout {
            config.http.timeout_secs = secs;
        }
        if self.verify_tls {
            config.http.verify_tls = true;
        }
        if let Some(key) = &self.admin_key {
            config.http.admin_key = Some(key.clone());
        }
    }
}

/// Where the report goes
#[derive(Args, Debug, Clone, Default)]
pub struct OutputOptions {
    /// Write the JSON report to this path
    #[arg(long, value_name = "PATH")]
    pub out_json: Option<PathBuf>,

    /// Write the markdown report to this path (suppresses stdout)
    #[arg(long, value_name = "PATH")]
    pub out_md: Option<PathBuf>,
}
