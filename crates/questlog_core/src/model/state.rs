//! Persisted root aggregate.
//!
//! # Responsibility
//! - Hold profile, catalogs, tasks and history as one serializable root.
//! - Build fresh defaults and validate decoded aggregates.
//!
//! # Invariants
//! - `Default::default()` builds every collection anew; no default template
//!   is shared between aggregates.
//! - A validated aggregate has `xp_curve_base > 0`, `profile.level >= 1` and
//!   every tier with `base_xp > 0`, which guarantees `award` terminates.

use crate::model::catalog::{
    default_routines, default_shop, IntensityCatalog, IntensityKey, Routine, ShopItem,
};
use crate::model::history::HistoryEntry;
use crate::model::profile::Profile;
use crate::model::task::Task;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Schema version string carried in every stored aggregate.
pub const STATE_VERSION: &str = "1.0";
/// XP curve base used by fresh aggregates.
pub const DEFAULT_XP_CURVE_BASE: u64 = 500;
/// History capacity used by fresh aggregates.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Configuration-seeded part of the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Systems {
    pub xp_curve_base: u64,
    pub intensity: IntensityCatalog,
    pub routines: Vec<Routine>,
    pub shop: Vec<ShopItem>,
    pub history_limit: usize,
}

impl Default for Systems {
    fn default() -> Self {
        Self {
            xp_curve_base: DEFAULT_XP_CURVE_BASE,
            intensity: IntensityCatalog::default(),
            routines: default_routines(),
            shop: default_shop(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Single persisted root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateAggregate {
    /// Carried but never branched on.
    pub version: String,
    pub profile: Profile,
    pub systems: Systems,
    /// Most recently added first.
    pub tasks: Vec<Task>,
    /// Most recent reward first.
    pub log: Vec<HistoryEntry>,
}

impl Default for StateAggregate {
    fn default() -> Self {
        Self {
            version: STATE_VERSION.to_string(),
            profile: Profile::default(),
            systems: Systems::default(),
            tasks: Vec::new(),
            log: Vec::new(),
        }
    }
}

/// Reason a decoded aggregate cannot become live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValidationError {
    ZeroXpCurveBase,
    ZeroLevel,
    ZeroTierXp(IntensityKey),
}

impl Display for StateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroXpCurveBase => write!(f, "systems.xpCurveBase must be greater than 0"),
            Self::ZeroLevel => write!(f, "profile.level must be at least 1"),
            Self::ZeroTierXp(key) => {
                write!(f, "systems.intensity.{key}.baseXP must be greater than 0")
            }
        }
    }
}

impl Error for StateValidationError {}

impl StateAggregate {
    /// Checks the invariants the progression rules rely on.
    pub fn validate(&self) -> Result<(), StateValidationError> {
        if self.systems.xp_curve_base == 0 {
            return Err(StateValidationError::ZeroXpCurveBase);
        }
        if self.profile.level == 0 {
            return Err(StateValidationError::ZeroLevel);
        }
        if let Some((key, _)) = self
            .systems
            .intensity
            .iter()
            .find(|(_, tier)| tier.base_xp == 0)
        {
            return Err(StateValidationError::ZeroTierXp(key));
        }
        Ok(())
    }

    /// Finds a task by id.
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Finds a routine by id.
    pub fn routine(&self, routine_id: &str) -> Option<&Routine> {
        self.systems
            .routines
            .iter()
            .find(|routine| routine.id == routine_id)
    }

    /// Finds a shop item by id.
    pub fn shop_item(&self, item_id: &str) -> Option<&ShopItem> {
        self.systems.shop.iter().find(|item| item.id == item_id)
    }
}
