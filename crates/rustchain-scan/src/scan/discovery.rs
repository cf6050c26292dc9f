//! # Node Discovery
//!
//! Builds the ordered candidate list for a scan from the seed node, the
//! seed's `/api/nodes` registry and operator supplied URLs. Discovery never
//! fails: when the registry is unavailable the seed alone is scanned.

use super::NodeTarget;
use crate::client::{EndpointError, NodeClient};
use crate::node_url::{node_identity, normalize_base_url};
use crate::types::RegistryEntry;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Outcome of node discovery
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Probe targets in discovery order, deduplicated by `host:port`
    pub targets: Vec<NodeTarget>,
    /// Registry rows that carry no usable URL
    pub unlisted: Vec<RegistryEntry>,
    /// Why the registry could not be read, if it could not
    pub registry_error: Option<EndpointError>,
}

#[derive(Clone)]
pub struct NodeDiscovery {
    client: NodeClient,
}

impl NodeDiscovery {
    pub fn new(client: NodeClient) -> Self {
        Self { client }
    }

    /// Discover the nodes to scan, seed first
    pub async fn discover(&self, seed: &str, extra_urls: &[String]) -> Discovery {
        let (registry, registry_error) = match self.client.nodes(seed).await {
            Ok(payload) => (payload.into_entries(), None),
            Err(e) => {
                warn!("Node registry unavailable on {}: {}", seed, e.code());
                (Vec::new(), Some(e))
            }
        };

        let mut discovery = build_targets(seed, registry, extra_urls);
        discovery.registry_error = registry_error;

        info!(
            "Discovered {} nodes ({} registry rows without URL)",
            discovery.targets.len(),
            discovery.unlisted.len()
        );
        discovery
    }
}

/// Merge seed, registry rows and extra URLs into a deduplicated target list
pub fn build_targets(seed: &str, registry: Vec<RegistryEntry>, extra_urls: &[String]) -> Discovery {
    let mut targets: Vec<NodeTarget> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut unlisted = Vec::new();

    let mut push = |url: String, registry: Option<RegistryEntry>| {
        let identity = node_identity(&url);
        match seen.get(&identity) {
            Some(&index) => {
                // first occurrence wins, but keep registry metadata for it
                let existing = &mut targets[index];
                if existing.registry.is_none() && registry.is_some() {
                    existing.registry = registry;
                }
                debug!("Skipping duplicate node {}", url);
            }
            None => {
                seen.insert(identity, targets.len());
                targets.push(NodeTarget { url, registry });
            }
        }
    };

    push(seed.to_string(), None);

    for entry in registry {
        match entry.url.as_deref().and_then(normalize_base_url) {
            Some(url) => push(url, Some(entry)),
            None => unlisted.push(entry),
        }
    }

    for raw in extra_urls {
        match normalize_base_url(raw) {
            Some(url) => push(url, None),
            None => warn!("Ignoring invalid node URL '{}'", raw),
        }
    }

    Discovery {
        targets,
        unlisted,
        registry_error: None,
    }
}
