//! Configuration for a scan invocation
//!
//! Values are layered: built-in defaults, an optional TOML file, then
//! `RUSTCHAIN_SCAN_*` environment variables (nested keys split on `__`).
//! Command-line flags are applied last by the CLI handlers.

use crate::error::{Result, ScanError};
use crate::node_url::normalize_base_url;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_SEED_NODE: &str = "https://50.28.86.131";
pub const DEFAULT_CONFIG_FILE: &str = "rustchain-scan.toml";
pub const ENV_PREFIX: &str = "RUSTCHAIN_SCAN_";

/// HTTP behaviour shared by every request of a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Verify TLS certificates (the public nodes use self-signed certs)
    pub verify_tls: bool,

    /// Optional admin key sent as X-Admin-Key / X-API-Key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_key: Option<String>,

    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            verify_tls: false,
            admin_key: None,
            user_agent: crate::client::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Attestation freshness windows used to classify miners
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityConfig {
    /// Hours since last attestation considered actively attesting
    pub active_window_hours: f64,

    /// Hours since last attestation still eligible for the weekly payout
    pub weekly_window_hours: f64,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            active_window_hours: 2.0,
            weekly_window_hours: 168.0,
        }
    }
}

/// Main configuration structure for a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Seed node queried for the registry and the network version
    pub seed_node: String,

    /// Additional node URLs to scan besides the registry
    pub node_urls: Vec<String>,

    /// Miner ids that should be visible on some node
    pub expected_miners: Vec<String>,

    /// Newline-delimited expected miner ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_miners_file: Option<PathBuf>,

    /// Upper bound on nodes probed at the same time
    pub max_concurrent_probes: usize,

    pub http: HttpConfig,

    pub eligibility: EligibilityConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            seed_node: DEFAULT_SEED_NODE.to_string(),
            node_urls: Vec::new(),
            expected_miners: Vec::new(),
            expected_miners_file: None,
            max_concurrent_probes: 4,
            http: HttpConfig::default(),
            eligibility: EligibilityConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from file and environment
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load(path_override: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(ScanConfig::default()));

        match path_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ScanError::config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                debug!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    debug!("Loading configuration from: {}", default_path.display());
                    figment = figment.merge(Toml::file(default_path));
                }
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment
            .extract()
            .map_err(|e| ScanError::config(format!("failed to parse configuration: {e}")))
    }

    /// Reject values a scan cannot run with
    pub fn validate(&self) -> Result<()> {
        if normalize_base_url(&self.seed_node).is_none() {
            return Err(ScanError::config(format!(
                "seed node is not a valid URL: '{}'",
                self.seed_node
            )));
        }
        if self.http.timeout_secs == 0 {
            return Err(ScanError::config("http.timeout_secs must be greater than 0"));
        }
        if self.max_concurrent_probes == 0 {
            return Err(ScanError::config(
                "max_concurrent_probes must be greater than 0",
            ));
        }

        let windows = &self.eligibility;
        if !positive_hours(windows.active_window_hours) || !positive_hours(windows.weekly_window_hours) {
            return Err(ScanError::config(
                "eligibility windows must be positive numbers of hours",
            ));
        }
        if windows.active_window_hours > windows.weekly_window_hours {
            return Err(ScanError::config(format!(
                "active window ({}h) cannot exceed weekly window ({}h)",
                windows.active_window_hours, windows.weekly_window_hours
            )));
        }

        Ok(())
    }

    /// Generate example configuration file
    pub fn generate_example() -> Result<String> {
        let config = Self::default();
        toml::to_string_pretty(&config)
            .map_err(|e| ScanError::internal(format!("Failed to serialize config: {e}")))
    }
}

fn positive_hours(hours: f64) -> bool {
    hours.is_finite() && hours > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScanConfig::default();
        assert_eq!(config.seed_node, DEFAULT_SEED_NODE);
        assert!(!config.http.verify_tls);
        assert_eq!(config.http.timeout(), Duration::from_secs(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
seed_node = "https://seed.example.org"
node_urls = ["https://extra.example.org"]
expected_miners = ["alpha-miner"]

[http]
timeout_secs = 5
verify_tls = true

[eligibility]
weekly_window_hours = 72.0
"#
        )
        .unwrap();

        let config = ScanConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.seed_node, "https://seed.example.org");
        assert_eq!(config.node_urls, vec!["https://extra.example.org"]);
        assert_eq!(config.expected_miners, vec!["alpha-miner"]);
        assert_eq!(config.http.timeout_secs, 5);
        assert!(config.http.verify_tls);
        assert_eq!(config.eligibility.weekly_window_hours, 72.0);
        // untouched keys keep their defaults
        assert_eq!(config.eligibility.active_window_hours, 2.0);
        assert_eq!(config.max_concurrent_probes, 4);
    }

    #[test]
    fn test_explicit_missing_file_is_config_error() {
        let result = ScanConfig::load(Some(Path::new("/nonexistent/rustchain-scan.toml")));
        assert!(matches!(result, Err(ScanError::Config { .. })));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "http = \"not a table\"").unwrap();

        let result = ScanConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ScanError::Config { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_windows() {
        let mut config = ScanConfig::default();
        config.eligibility.active_window_hours = 200.0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.eligibility.weekly_window_hours = 0.0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.eligibility.active_window_hours = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout_and_concurrency() {
        let mut config = ScanConfig::default();
        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.max_concurrent_probes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_seed() {
        let config = ScanConfig {
            seed_node: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_generate_example_round_trips() {
        let example = ScanConfig::generate_example().unwrap();
        assert!(example.contains("seed_node"));
        assert!(example.contains("[eligibility]"));

        let parsed: ScanConfig = toml::from_str(&example).unwrap();
        assert_eq!(parsed.seed_node, DEFAULT_SEED_NODE);
    }
}
