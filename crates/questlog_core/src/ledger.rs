//! Bounded most-recent-first reward history.
//!
//! # Invariants
//! - New entries go to the front.
//! - Length never exceeds the limit after `record`; dropped entries are gone.

use crate::model::history::HistoryEntry;

/// Prepends `entry` and drops the oldest entries beyond `limit`.
pub fn record(log: &mut Vec<HistoryEntry>, entry: HistoryEntry, limit: usize) {
    log.insert(0, entry);
    log.truncate(limit);
}

/// Drops the oldest entries beyond `limit` without adding anything.
///
/// Used when a whole aggregate is replaced and its log may be oversized.
pub fn enforce_limit(log: &mut Vec<HistoryEntry>, limit: usize) {
    log.truncate(limit);
}

#[cfg(test)]
mod tests {
    use super::{enforce_limit, record};
    use crate::model::catalog::{IntensityKey, IntensityTier};
    use crate::model::history::HistoryEntry;
    use chrono::Utc;

    fn entry(id: &str) -> HistoryEntry {
        let tier = IntensityTier {
            label: "Light".to_string(),
            base_xp: 80,
            gems: 1,
        };
        HistoryEntry::for_reward(id, id, IntensityKey::Light, &tier, Utc::now())
    }

    #[test]
    fn record_at_capacity_evicts_oldest() {
        let mut log = vec![entry("c"), entry("b"), entry("a")];
        record(&mut log, entry("d"), 3);

        let ids = log.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["d", "c", "b"]);
    }

    #[test]
    fn record_with_zero_limit_keeps_nothing() {
        let mut log = Vec::new();
        record(&mut log, entry("a"), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn enforce_limit_trims_tail() {
        let mut log = vec![entry("c"), entry("b"), entry("a")];
        enforce_limit(&mut log, 1);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].id, "c");
    }
}
