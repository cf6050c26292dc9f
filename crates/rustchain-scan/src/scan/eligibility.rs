//! # Payout Eligibility
//!
//! Pure classification rules for node hosts and miners. Nothing here does
//! I/O and nothing here can fail: missing data always resolves to the most
//! conservative verdict.

use crate::config::EligibilityConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weekly payout verdict for a node host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeVerdict {
    PayWeekly,
    PayWeeklyAndUpgradeNode,
    Hold,
}

impl NodeVerdict {
    pub fn is_payout_eligible(self) -> bool {
        !matches!(self, NodeVerdict::Hold)
    }
}

impl fmt::Display for NodeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NodeVerdict::PayWeekly => "pay_weekly",
            NodeVerdict::PayWeeklyAndUpgradeNode => "pay_weekly_and_upgrade_node",
            NodeVerdict::Hold => "hold",
        };
        f.write_str(text)
    }
}

/// Operator follow-up for a node host; refines the verdict with a reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeAction {
    PayWeekly,
    PayWeeklyAndUpgradeNode,
    InvestigateOffline,
    InactiveNoPayout,
    MissingUrlOrRedacted,
}

impl NodeAction {
    pub fn verdict(self) -> NodeVerdict {
        match self {
            NodeAction::PayWeekly => NodeVerdict::PayWeekly,
            NodeAction::PayWeeklyAndUpgradeNode => NodeVerdict::PayWeeklyAndUpgradeNode,
            NodeAction::InvestigateOffline
            | NodeAction::InactiveNoPayout
            | NodeAction::MissingUrlOrRedacted => NodeVerdict::Hold,
        }
    }
}

impl fmt::Display for NodeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NodeAction::PayWeekly => "pay_weekly",
            NodeAction::PayWeeklyAndUpgradeNode => "pay_weekly_and_upgrade_node",
            NodeAction::InvestigateOffline => "investigate_offline",
            NodeAction::InactiveNoPayout => "inactive_no_payout",
            NodeAction::MissingUrlOrRedacted => "missing_url_or_redacted",
        };
        f.write_str(text)
    }
}

/// What the probe learned about a node host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState<'a> {
    /// Registry row without a public URL; never probed
    MissingUrl,
    /// Registry explicitly marks the node inactive
    Inactive,
    /// `/health` failed or did not carry the required keys
    Unreachable,
    /// `/health` answered with `ok != true`
    Unhealthy,
    /// `/health` answered `ok: true` with this version
    Healthy { version: &'a str },
}

/// Classify a node host; rules are checked in order and the first match wins
pub fn classify_node(state: NodeState<'_>, network_version: Option<&str>) -> NodeAction {
    match state {
        NodeState::MissingUrl => NodeAction::MissingUrlOrRedacted,
        NodeState::Inactive => NodeAction::InactiveNoPayout,
        NodeState::Unreachable | NodeState::Unhealthy => NodeAction::InvestigateOffline,
        NodeState::Healthy { version } => match network_version {
            Some(network) if !network.is_empty() && !version.is_empty() && version != network => {
                NodeAction::PayWeeklyAndUpgradeNode
            }
            _ => NodeAction::PayWeekly,
        },
    }
}

/// Attestation freshness of a miner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinerState {
    Active,
    StaleButWeeklyEligible,
    Inactive,
    Unknown,
}

impl fmt::Display for MinerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MinerState::Active => "active",
            MinerState::StaleButWeeklyEligible => "stale_but_weekly_eligible",
            MinerState::Inactive => "inactive",
            MinerState::Unknown => "unknown",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinerAction {
    PayWeekly,
    PayWeeklyAndPingHealthCheck,
    RestartOrUpgradeMiner,
    RequestStatusOrUpgrade,
}

impl fmt::Display for MinerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MinerAction::PayWeekly => "pay_weekly",
            MinerAction::PayWeeklyAndPingHealthCheck => "pay_weekly_and_ping_health_check",
            MinerAction::RestartOrUpgradeMiner => "restart_or_upgrade_miner",
            MinerAction::RequestStatusOrUpgrade => "request_status_or_upgrade",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinerClassification {
    pub age_hours: Option<f64>,
    pub state: MinerState,
    pub weekly_eligible: bool,
    pub action: MinerAction,
}

/// Classify a miner by the age of its last attestation relative to `now_ts`
///
/// Attestations stamped in the future count as age zero.
pub fn classify_miner(
    last_attest: Option<i64>,
    now_ts: i64,
    windows: &EligibilityConfig,
) -> MinerClassification {
    let Some(last_attest) = last_attest.filter(|ts| *ts > 0) else {
        return MinerClassification {
            age_hours: None,
            state: MinerState::Unknown,
            weekly_eligible: false,
            action: MinerAction::RequestStatusOrUpgrade,
        };
    };

    let age_hours = ((now_ts - last_attest) as f64 / 3600.0).max(0.0);

    let (state, weekly_eligible, action) = if age_hours <= windows.active_window_hours {
        (MinerState::Active, true, MinerAction::PayWeekly)
    } else if age_hours <= windows.weekly_window_hours {
        (
            MinerState::StaleButWeeklyEligible,
            true,
            MinerAction::PayWeeklyAndPingHealthCheck,
        )
    } else {
        (MinerState::Inactive, false, MinerAction::RestartOrUpgradeMiner)
    };

    MinerClassification {
        age_hours: Some(age_hours),
        state,
        weekly_eligible,
        action,
    }
}
