//! Scan report model and serializations
//!
//! The report is assembled once from already-evaluated records; rendering it
//! as JSON or markdown never re-evaluates anything.

pub mod markdown;

use crate::error::Result;
use crate::scan::eligibility::{MinerAction, MinerState, NodeAction, NodeVerdict};
use crate::types::{EpochResponse, HealthResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use markdown::render_markdown;

pub const MISSING_MINER_STATE: &str = "not_visible_in_public_api";
pub const MISSING_MINER_ACTION: &str = "check_node_url_then_upgrade_miner";

/// How much of a node's surface answered during the probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Online,
    Partial,
    Offline,
}

/// One node host as seen by this scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub node_id: String,
    pub name: String,
    pub wallet: Option<String>,
    pub url: String,
    pub is_active: bool,
    pub online: bool,
    pub probe_status: ProbeStatus,
    pub health_ok: bool,
    pub version: Option<String>,
    pub uptime_s: Option<f64>,
    pub db_rw: Option<Value>,
    pub tip_age_slots: Option<Value>,
    pub epoch: Option<u64>,
    pub slot: Option<u64>,
    pub miners_reported: usize,
    pub payout_eligible: bool,
    pub verdict: NodeVerdict,
    pub suggested_action: NodeAction,
    pub health_error: Option<String>,
    pub epoch_error: Option<String>,
    pub miners_error: Option<String>,
}

/// One miner, deduplicated across every node that lists it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinerRecord {
    pub miner: String,
    pub last_attest: Option<i64>,
    pub last_attest_utc: String,
    pub age_h: Option<f64>,
    pub state: MinerState,
    pub weekly_eligible: bool,
    pub suggested_action: MinerAction,
    pub device_family: String,
    pub device_arch: Option<String>,
    pub antiquity_multiplier: f64,
    pub nodes_seen: Vec<String>,
    pub node_count: usize,
}

/// An expected miner that no node reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingMinerRecord {
    pub miner: String,
    pub state: String,
    pub weekly_eligible: bool,
    pub suggested_action: String,
}

impl MissingMinerRecord {
    pub fn new(miner: impl Into<String>) -> Self {
        Self {
            miner: miner.into(),
            state: MISSING_MINER_STATE.to_string(),
            weekly_eligible: false,
            suggested_action: MISSING_MINER_ACTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMismatchRecord {
    pub node_url: String,
    pub node_id: String,
    pub node_version: String,
    pub network_version: String,
}

/// Aggregate counters posted by CI as the status comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub nodes_scanned: usize,
    pub active_nodes_online: usize,
    pub active_nodes_offline: usize,
    pub node_hosts_weekly_payout_eligible: usize,
    pub miners_observed: usize,
    pub miners_weekly_payout_eligible: usize,
    pub expected_miners_missing: usize,
    pub version_mismatch_nodes: usize,
}

impl ScanSummary {
    pub fn from_records(
        nodes: &[NodeRecord],
        miners: &[MinerRecord],
        missing: &[MissingMinerRecord],
        mismatches: &[VersionMismatchRecord],
    ) -> Self {
        Self {
            nodes_scanned: nodes.len(),
            active_nodes_online: nodes.iter().filter(|n| n.is_active && n.online).count(),
            active_nodes_offline: nodes.iter().filter(|n| n.is_active && !n.online).count(),
            node_hosts_weekly_payout_eligible: nodes.iter().filter(|n| n.payout_eligible).count(),
            miners_observed: miners.len(),
            miners_weekly_payout_eligible: miners.iter().filter(|m| m.weekly_eligible).count(),
            expected_miners_missing: missing.len(),
            version_mismatch_nodes: mismatches.len(),
        }
    }
}

/// Error codes of the seed-level queries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryErrors {
    pub seed_health: Option<String>,
    pub seed_epoch: Option<String>,
    pub seed_nodes: Option<String>,
}

/// Network-wide state as reported by the seed node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub version: Option<String>,
    pub epoch: Option<EpochResponse>,
    pub health: Option<HealthResponse>,
}

/// Complete output of one scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub generated_at: String,
    pub seed_node: String,
    pub query_errors: QueryErrors,
    pub network: NetworkInfo,
    pub summary: ScanSummary,
    pub nodes: Vec<NodeRecord>,
    pub miners: Vec<MinerRecord>,
    pub expected_miners_missing_rows: Vec<MissingMinerRecord>,
    pub version_mismatch_nodes: Vec<VersionMismatchRecord>,
}

impl ScanReport {
    /// Assemble a report and compute its summary
    pub fn assemble(
        generated_at: DateTime<Utc>,
        seed_node: String,
        query_errors: QueryErrors,
        network: NetworkInfo,
        nodes: Vec<NodeRecord>,
        miners: Vec<MinerRecord>,
        expected_miners_missing_rows: Vec<MissingMinerRecord>,
    ) -> Self {
        let version_mismatch_nodes = version_mismatches(&nodes, network.version.as_deref());
        let summary = ScanSummary::from_records(
            &nodes,
            &miners,
            &expected_miners_missing_rows,
            &version_mismatch_nodes,
        );

        Self {
            generated_at: format_utc(&generated_at),
            seed_node,
            query_errors,
            network,
            summary,
            nodes,
            miners,
            expected_miners_missing_rows,
            version_mismatch_nodes,
        }
    }

    /// Pretty-printed JSON form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn version_mismatches(
    nodes: &[NodeRecord],
    network_version: Option<&str>,
) -> Vec<VersionMismatchRecord> {
    nodes
        .iter()
        .filter(|n| n.verdict == NodeVerdict::PayWeeklyAndUpgradeNode)
        .map(|n| VersionMismatchRecord {
            node_url: n.url.clone(),
            node_id: n.node_id.clone(),
            node_version: n.version.clone().unwrap_or_default(),
            network_version: network_version.unwrap_or_default().to_string(),
        })
        .collect()
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS UTC`
pub fn format_utc(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format unix seconds for display, `-` when absent
pub fn ts_to_utc(ts: Option<i64>) -> String {
    ts.filter(|t| *t > 0)
        .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
        .map(|dt| format_utc(&dt))
        .unwrap_or_else(|| "-".to_string())
}
