//! Miner aggregation across nodes

use super::eligibility::classify_miner;
use crate::config::EligibilityConfig;
use crate::report::{ts_to_utc, MinerRecord};
use crate::types::MinerEntry;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

struct Aggregate {
    entry: MinerEntry,
    nodes_seen: BTreeSet<String>,
}

/// Deduplicate miners reported by several nodes and classify each one
///
/// Descriptive fields come from the first node that listed the miner, the
/// newest attestation across all nodes wins. Output is sorted freshest
/// first, miners without an attestation last, then by id.
pub fn aggregate_miners<'a, I>(
    per_node: I,
    now_ts: i64,
    windows: &EligibilityConfig,
) -> Vec<MinerRecord>
where
    I: IntoIterator<Item = (&'a str, &'a [MinerEntry])>,
{
    let mut aggregate: BTreeMap<String, Aggregate> = BTreeMap::new();

    for (node_url, entries) in per_node {
        for entry in entries {
            match aggregate.get_mut(&entry.miner) {
                Some(existing) => {
                    if entry.last_attest > existing.entry.last_attest {
                        existing.entry.last_attest = entry.last_attest;
                    }
                    existing.nodes_seen.insert(node_url.to_string());
                }
                None => {
                    aggregate.insert(
                        entry.miner.clone(),
                        Aggregate {
                            entry: entry.clone(),
                            nodes_seen: BTreeSet::from([node_url.to_string()]),
                        },
                    );
                }
            }
        }
    }

    let mut records: Vec<MinerRecord> = aggregate
        .into_values()
        .map(|Aggregate { entry, nodes_seen }| {
            let classification = classify_miner(entry.last_attest, now_ts, windows);
            let nodes_seen: Vec<String> = nodes_seen.into_iter().collect();
            MinerRecord {
                last_attest_utc: ts_to_utc(entry.last_attest),
                last_attest: entry.last_attest,
                age_h: classification.age_hours,
                state: classification.state,
                weekly_eligible: classification.weekly_eligible,
                suggested_action: classification.action,
                device_family: entry.device_family,
                device_arch: entry.device_arch,
                antiquity_multiplier: entry.antiquity_multiplier,
                node_count: nodes_seen.len(),
                nodes_seen,
                miner: entry.miner,
            }
        })
        .collect();

    records.sort_by(compare_freshness);
    records
}

fn compare_freshness(a: &MinerRecord, b: &MinerRecord) -> Ordering {
    match (a.age_h, b.age_h) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.miner.cmp(&b.miner))
}
