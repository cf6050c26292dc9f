//! Expected versus observed miners

use crate::report::{MinerRecord, MissingMinerRecord};
use std::collections::{BTreeSet, HashSet};

/// Expected miners that no node reported, sorted by id
pub fn missing_expected_miners(
    expected: &BTreeSet<String>,
    observed: &[MinerRecord],
) -> Vec<MissingMinerRecord> {
    let observed: HashSet<&str> = observed.iter().map(|m| m.miner.as_str()).collect();

    expected
        .iter()
        .filter(|miner| !observed.contains(miner.as_str()))
        .map(MissingMinerRecord::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::miner;
    use crate::report::MISSING_MINER_ACTION;
    use crate::scan::eligibility::MinerState;

    fn expected(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_is_set_difference() {
        let observed = vec![miner("minerA", MinerState::Active, true)];
        let missing = missing_expected_miners(&expected(&["minerB", "minerA"]), &observed);

        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].miner, "minerB");
        assert_eq!(missing[0].suggested_action, MISSING_MINER_ACTION);
        assert!(!missing[0].weekly_eligible);
    }

    #[test]
    fn test_empty_expected_yields_nothing() {
        let observed = vec![miner("minerA", MinerState::Active, true)];
        assert!(missing_expected_miners(&BTreeSet::new(), &observed).is_empty());
    }

    #[test]
    fn test_inactive_miner_counts_as_observed() {
        let observed = vec![miner("minerA", MinerState::Inactive, false)];
        assert!(missing_expected_miners(&expected(&["minerA"]), &observed).is_empty());
    }

    #[test]
    fn test_sorted_by_id() {
        let missing = missing_expected_miners(&expected(&["zulu", "alpha", "mike"]), &[]);
        let ids: Vec<&str> = missing.iter().map(|m| m.miner.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mike", "zulu"]);
    }
}
