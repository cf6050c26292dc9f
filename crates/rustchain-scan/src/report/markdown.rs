//! Markdown rendering of a scan report, suitable for a status comment

use super::ScanReport;
use tabled::{settings::Style, Table, Tabled};

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Keep free text from closing a table cell early
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn markdown_table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    table.to_string()
}

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Online")]
    online: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Payout")]
    payout: String,
    #[tabled(rename = "Verdict")]
    verdict: String,
    #[tabled(rename = "Action")]
    action: String,
}

#[derive(Tabled)]
struct MinerRow {
    #[tabled(rename = "Miner")]
    miner: String,
    #[tabled(rename = "Last Attest (UTC)")]
    last_attest: String,
    #[tabled(rename = "Age(h)")]
    age: String,
    #[tabled(rename = "Mult")]
    multiplier: String,
    #[tabled(rename = "Nodes")]
    nodes: String,
    #[tabled(rename = "Weekly Eligible")]
    eligible: String,
    #[tabled(rename = "Action")]
    action: String,
}

#[derive(Tabled)]
struct MissingRow {
    #[tabled(rename = "Miner")]
    miner: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Action")]
    action: String,
}

#[derive(Tabled)]
struct MismatchRow {
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Node Version")]
    node_version: String,
    #[tabled(rename = "Network Version")]
    network_version: String,
}

/// Render the report as markdown
pub fn render_markdown(report: &ScanReport) -> String {
    let mut lines: Vec<String> = Vec::new();
    let summary = &report.summary;

    lines.push("# RustChain Weekly Node + Miner Scan".to_string());
    lines.push(String::new());
    lines.push(format!("- Generated: {}", report.generated_at));
    lines.push(format!("- Seed node: {}", report.seed_node));
    lines.push(format!(
        "- Network version: {}",
        or_dash(report.network.version.as_deref())
    ));
    if let Some(epoch) = &report.network.epoch {
        lines.push(format!(
            "- Epoch: {} (slot {}, {} enrolled miners)",
            epoch.epoch, epoch.slot, epoch.enrolled_miners
        ));
    }
    lines.push(String::new());

    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push(format!("- Nodes scanned: {}", summary.nodes_scanned));
    lines.push(format!(
        "- Node hosts weekly payout eligible: {}",
        summary.node_hosts_weekly_payout_eligible
    ));
    lines.push(format!(
        "- Active nodes offline: {}",
        summary.active_nodes_offline
    ));
    lines.push(format!("- Miners observed: {}", summary.miners_observed));
    lines.push(format!(
        "- Miners weekly payout eligible: {}",
        summary.miners_weekly_payout_eligible
    ));
    lines.push(format!(
        "- Expected miners missing: {}",
        summary.expected_miners_missing
    ));
    lines.push(format!(
        "- Version mismatch nodes: {}",
        summary.version_mismatch_nodes
    ));
    lines.push(String::new());

    lines.push("## Node Hosts".to_string());
    lines.push(String::new());
    let node_rows: Vec<NodeRow> = report
        .nodes
        .iter()
        .map(|n| NodeRow {
            node: escape_cell(if n.name.is_empty() {
                &n.node_id
            } else {
                &n.name
            }),
            active: yes_no(n.is_active),
            online: yes_no(n.online),
            version: or_dash(n.version.as_deref()),
            payout: yes_no(n.payout_eligible),
            verdict: n.verdict.to_string(),
            action: n.suggested_action.to_string(),
        })
        .collect();
    lines.push(markdown_table(node_rows));
    lines.push(String::new());

    lines.push("## Miners (Observed)".to_string());
    lines.push(String::new());
    let miner_rows: Vec<MinerRow> = report
        .miners
        .iter()
        .map(|m| MinerRow {
            miner: escape_cell(&m.miner),
            last_attest: m.last_attest_utc.clone(),
            age: m
                .age_h
                .map(|age| format!("{age:.2}"))
                .unwrap_or_else(|| "-".to_string()),
            multiplier: m.antiquity_multiplier.to_string(),
            nodes: m.node_count.to_string(),
            eligible: yes_no(m.weekly_eligible),
            action: m.suggested_action.to_string(),
        })
        .collect();
    lines.push(markdown_table(miner_rows));
    lines.push(String::new());

    if !report.expected_miners_missing_rows.is_empty() {
        lines.push("## Expected Miners Missing".to_string());
        lines.push(String::new());
        let rows: Vec<MissingRow> = report
            .expected_miners_missing_rows
            .iter()
            .map(|row| MissingRow {
                miner: escape_cell(&row.miner),
                state: row.state.clone(),
                action: row.suggested_action.clone(),
            })
            .collect();
        lines.push(markdown_table(rows));
        lines.push(String::new());
    }

    if !report.version_mismatch_nodes.is_empty() {
        lines.push("## Version Mismatch Nodes".to_string());
        lines.push(String::new());
        let rows: Vec<MismatchRow> = report
            .version_mismatch_nodes
            .iter()
            .map(|row| MismatchRow {
                node: escape_cell(if row.node_id.is_empty() {
                    &row.node_url
                } else {
                    &row.node_id
                }),
                node_version: or_dash(Some(row.node_version.as_str())),
                network_version: or_dash(Some(row.network_version.as_str())),
            })
            .collect();
        lines.push(markdown_table(rows));
        lines.push(String::new());
    }

    lines.push("## Recommended Next Steps".to_string());
    lines.push(String::new());
    lines.push(
        "1. Queue weekly payouts for all rows marked `pay_weekly` or `pay_weekly_and_upgrade_node`."
            .to_string(),
    );
    lines.push("2. DM missing miners with a restart + latest miner update check.".to_string());
    lines.push("3. Ask version-mismatch node hosts to upgrade, then re-run this scan.".to_string());
    lines.push(String::new());

    lines.join("\n")
}
