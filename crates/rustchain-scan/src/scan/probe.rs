//! Per-node probe
//!
//! Queries `/health`, `/epoch` and `/api/miners` on one node and turns the
//! answers into a [`NodeRecord`]. Endpoint failures are recorded as error
//! codes on the record.

use super::eligibility::{classify_node, NodeState};
use super::NodeTarget;
use crate::client::{EndpointResult, NodeClient};
use crate::node_url::node_identity;
use crate::report::{NodeRecord, ProbeStatus};
use crate::types::{EpochResponse, MinerEntry, RegistryEntry};
use serde_json::Value;
use tracing::{debug, warn};

const UNKNOWN_NODE: &str = "unknown_node";
const MISSING_URL: &str = "missing_url";
const HEALTH_UNAVAILABLE: &str = "health_unavailable";

/// Everything learned from one node
#[derive(Debug, Clone)]
pub struct NodeProbe {
    pub record: NodeRecord,
    pub miners: Vec<MinerEntry>,
}

/// Probe one node; never fails
pub async fn probe_node(
    client: &NodeClient,
    target: &NodeTarget,
    network_version: Option<&str>,
) -> NodeProbe {
    let base = target.url.as_str();
    debug!("Probing node {}", base);

    let (health, epoch, miners) =
        tokio::join!(client.health(base), client.epoch(base), client.miners(base));

    // Miners are only trusted from a node that answered /health
    let (miners, miners_error) = match (&health, miners) {
        (_, Err(e)) => (Vec::new(), Some(e.code())),
        (Err(_), Ok(rows)) => {
            debug!("Discarding {} miner rows from unhealthy node {}", rows.len(), base);
            (Vec::new(), Some(HEALTH_UNAVAILABLE.to_string()))
        }
        (Ok(_), Ok(rows)) => (parse_miner_rows(base, rows), None),
    };

    let identity = node_identity(base);
    let registry = target.registry.clone().unwrap_or_default();
    let is_active = registry.is_active.unwrap_or(true);

    let state = if !is_active {
        NodeState::Inactive
    } else {
        match &health {
            Err(_) => NodeState::Unreachable,
            Ok(h) if !h.ok => NodeState::Unhealthy,
            Ok(h) => NodeState::Healthy {
                version: h.version.as_str(),
            },
        }
    };
    let action = classify_node(state, network_version);

    let probe_status = match (&health, &epoch, &miners_error) {
        (Err(_), _, _) => ProbeStatus::Offline,
        (Ok(_), Ok(_), None) => ProbeStatus::Online,
        _ => ProbeStatus::Partial,
    };

    if let Err(e) = &health {
        warn!("Node {} health check failed: {}", base, e.code());
    }

    let node_id = registry.node_id.unwrap_or_else(|| identity.clone());
    let name = registry.name.unwrap_or_else(|| node_id.clone());
    let (epoch_num, slot, epoch_error) = flatten_epoch(epoch);

    let record = NodeRecord {
        node_id,
        name,
        wallet: registry.wallet,
        url: target.url.clone(),
        is_active,
        online: health.is_ok(),
        probe_status,
        health_ok: health.as_ref().map(|h| h.ok).unwrap_or(false),
        version: health.as_ref().ok().map(|h| h.version.clone()),
        uptime_s: health.as_ref().ok().map(|h| h.uptime_s),
        db_rw: health.as_ref().ok().and_then(|h| h.db_rw()),
        tip_age_slots: health.as_ref().ok().and_then(|h| h.tip_age_slots()),
        epoch: epoch_num,
        slot,
        miners_reported: miners.len(),
        payout_eligible: action.verdict().is_payout_eligible(),
        verdict: action.verdict(),
        suggested_action: action,
        health_error: health.as_ref().err().map(|e| e.code()),
        epoch_error,
        miners_error,
    };

    NodeProbe { record, miners }
}

fn flatten_epoch(
    epoch: EndpointResult<EpochResponse>,
) -> (Option<u64>, Option<u64>, Option<String>) {
    match epoch {
        Ok(e) => (Some(e.epoch), Some(e.slot), None),
        Err(e) => (None, None, Some(e.code())),
    }
}

/// Decode miner rows one by one, skipping rows without the required keys
/// or with a blank miner id
pub fn parse_miner_rows(node_url: &str, rows: Vec<Value>) -> Vec<MinerEntry> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<MinerEntry>(row) {
            Ok(mut entry) => {
                let id = entry.miner.trim();
                if id.is_empty() {
                    warn!("Skipping miner row {} from {}: empty miner id", index, node_url);
                    return None;
                }
                if id.len() != entry.miner.len() {
                    entry.miner = id.to_string();
                }
                Some(entry)
            }
            Err(e) => {
                warn!("Skipping malformed miner row {} from {}: {}", index, node_url, e);
                None
            }
        })
        .collect()
}

/// Record for a registry row that has no public URL
pub fn missing_url_record(entry: &RegistryEntry) -> NodeRecord {
    let action = classify_node(NodeState::MissingUrl, None);
    let node_id = entry
        .node_id
        .clone()
        .unwrap_or_else(|| UNKNOWN_NODE.to_string());

    NodeRecord {
        name: entry.name.clone().unwrap_or_else(|| node_id.clone()),
        node_id,
        wallet: entry.wallet.clone(),
        url: "-".to_string(),
        is_active: entry.is_active.unwrap_or(true),
        online: false,
        probe_status: ProbeStatus::Offline,
        health_ok: false,
        version: None,
        uptime_s: None,
        db_rw: None,
        tip_age_slots: None,
        epoch: None,
        slot: None,
        miners_reported: 0,
        payout_eligible: action.verdict().is_payout_eligible(),
        verdict: action.verdict(),
        suggested_action: action,
        health_error: Some(MISSING_URL.to_string()),
        epoch_error: Some(MISSING_URL.to_string()),
        miners_error: Some(MISSING_URL.to_string()),
    }
}
