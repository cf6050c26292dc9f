//! # Scan Pipeline
//!
//! Discovery, probing, evaluation and cross-referencing of one scan. A
//! [`Scanner`] holds one validated configuration and one HTTP client; each
//! run produces a complete [`ScanReport`] even when every node is down.

pub mod cross_reference;
pub mod discovery;
pub mod eligibility;
pub mod miners;
pub mod probe;

use crate::client::NodeClient;
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::node_url::normalize_base_url;
use crate::report::{NetworkInfo, QueryErrors, ScanReport};
use crate::types::RegistryEntry;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use tracing::{info, warn};

pub use cross_reference::missing_expected_miners;
pub use discovery::{Discovery, NodeDiscovery};
pub use miners::aggregate_miners;
pub use probe::{missing_url_record, probe_node, NodeProbe};

/// A node selected for probing
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTarget {
    /// Normalized base URL
    pub url: String,
    /// Registry metadata, when the seed lists this node
    pub registry: Option<RegistryEntry>,
}

pub struct Scanner {
    config: ScanConfig,
    client: NodeClient,
}

impl Scanner {
    /// Create a scanner with an HTTP client built from `config.http`
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;

        let client = NodeClient::builder()
            .timeout(config.http.timeout())
            .verify_tls(config.http.verify_tls)
            .admin_key(config.http.admin_key.clone())
            .user_agent(config.http.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    fn seed(&self) -> Result<String> {
        normalize_base_url(&self.config.seed_node).ok_or_else(|| {
            ScanError::config(format!(
                "seed node is not a valid URL: '{}'",
                self.config.seed_node
            ))
        })
    }

    /// Query the seed for network version and epoch
    async fn network_info(&self, seed: &str) -> (NetworkInfo, QueryErrors) {
        let (health, epoch) = tokio::join!(self.client.health(seed), self.client.epoch(seed));

        let mut errors = QueryErrors::default();
        let health = match health {
            Ok(h) => Some(h),
            Err(e) => {
                warn!("Seed {} health unavailable: {}", seed, e.code());
                errors.seed_health = Some(e.code());
                None
            }
        };
        let epoch = match epoch {
            Ok(e) => Some(e),
            Err(e) => {
                warn!("Seed {} epoch unavailable: {}", seed, e.code());
                errors.seed_epoch = Some(e.code());
                None
            }
        };

        let version = health
            .as_ref()
            .map(|h| h.version.clone())
            .filter(|v| !v.is_empty());

        (
            NetworkInfo {
                version,
                epoch,
                health,
            },
            errors,
        )
    }

    /// Probe targets with bounded concurrency; output keeps target order
    async fn probe_all(
        &self,
        targets: &[NodeTarget],
        network_version: Option<&str>,
    ) -> Vec<NodeProbe> {
        stream::iter(targets)
            .map(|target| probe_node(&self.client, target, network_version))
            .buffered(self.config.max_concurrent_probes.max(1))
            .collect()
            .await
    }

    /// Full network scan: discovery, probes, evaluation and cross-reference
    pub async fn run(
        &self,
        expected: &BTreeSet<String>,
        now: DateTime<Utc>,
    ) -> Result<ScanReport> {
        let seed = self.seed()?;
        info!("Scanning network from seed {}", seed);

        let discovery = NodeDiscovery::new(self.client.clone());
        let ((network, mut query_errors), found) = tokio::join!(
            self.network_info(&seed),
            discovery.discover(&seed, &self.config.node_urls)
        );
        query_errors.seed_nodes = found.registry_error.as_ref().map(|e| e.code());

        let report = self
            .evaluate(seed, found, network, query_errors, expected, now)
            .await;

        info!(
            "Scan complete: {} nodes, {} miners, {} expected missing",
            report.summary.nodes_scanned,
            report.summary.miners_observed,
            report.summary.expected_miners_missing
        );
        Ok(report)
    }

    /// Check a single node against the seed's version, without discovery
    pub async fn check_node(
        &self,
        node_url: &str,
        expected: &BTreeSet<String>,
        now: DateTime<Utc>,
    ) -> Result<ScanReport> {
        let seed = self.seed()?;
        let url = normalize_base_url(node_url).ok_or_else(|| {
            ScanError::invalid_argument(format!("node URL is not valid: '{node_url}'"))
        })?;
        info!("Checking node {} against seed {}", url, seed);

        let (network, query_errors) = self.network_info(&seed).await;
        let single = Discovery {
            targets: vec![NodeTarget {
                url,
                registry: None,
            }],
            ..Default::default()
        };

        Ok(self
            .evaluate(seed, single, network, query_errors, expected, now)
            .await)
    }

    async fn evaluate(
        &self,
        seed: String,
        found: Discovery,
        network: NetworkInfo,
        query_errors: QueryErrors,
        expected: &BTreeSet<String>,
        now: DateTime<Utc>,
    ) -> ScanReport {
        let probes = self
            .probe_all(&found.targets, network.version.as_deref())
            .await;

        let miners = aggregate_miners(
            probes
                .iter()
                .map(|p| (p.record.url.as_str(), p.miners.as_slice())),
            now.timestamp(),
            &self.config.eligibility,
        );
        let missing = missing_expected_miners(expected, &miners);
        // rows without a URL were never probed; they trail the probed nodes
        let nodes = probes
            .into_iter()
            .map(|p| p.record)
            .chain(found.unlisted.iter().map(missing_url_record))
            .collect();

        ScanReport::assemble(now, seed, query_errors, network, nodes, miners, missing)
    }
}
