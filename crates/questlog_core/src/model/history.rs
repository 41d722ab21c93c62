//! Reward history entries.

use crate::model::catalog::{IntensityKey, IntensityTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One granted reward.
///
/// `xp` and `gems` are the amounts granted by the action itself; level-up
/// bonuses are not folded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Id of the task or routine that produced the reward.
    pub id: String,
    pub title: String,
    pub intensity: IntensityKey,
    pub xp: u64,
    pub gems: u64,
    #[serde(rename = "dateISO")]
    pub date_iso: DateTime<Utc>,
}

impl HistoryEntry {
    /// Builds the entry for one completion rewarded at `tier`.
    pub fn for_reward(
        source_id: impl Into<String>,
        title: impl Into<String>,
        intensity: IntensityKey,
        tier: &IntensityTier,
        date_iso: DateTime<Utc>,
    ) -> Self {
        Self {
            id: source_id.into(),
            title: title.into(),
            intensity,
            xp: tier.base_xp,
            gems: tier.gems,
            date_iso,
        }
    }
}
