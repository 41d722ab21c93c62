//! Intensity, routine and shop catalogs.
//!
//! # Responsibility
//! - Map an intensity key to its reward tier (`lookup`).
//! - Describe the configuration-seeded routine and shop entries.
//!
//! # Invariants
//! - The key set is closed; `IntensityCatalog::lookup` is total.
//! - Catalogs are configuration, never mutated by action handlers.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Effort tier attached to a task or routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityKey {
    Light,
    Moderate,
    Intense,
    Epic,
}

impl IntensityKey {
    /// All keys, lightest first.
    pub const ALL: [IntensityKey; 4] = [
        IntensityKey::Light,
        IntensityKey::Moderate,
        IntensityKey::Intense,
        IntensityKey::Epic,
    ];

    /// Stable storage name (`light|moderate|intense|epic`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Intense => "intense",
            Self::Epic => "epic",
        }
    }
}

impl Display for IntensityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a known intensity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIntensity(pub String);

impl Display for UnknownIntensity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown intensity `{}`; expected light|moderate|intense|epic",
            self.0
        )
    }
}

impl Error for UnknownIntensity {}

impl FromStr for IntensityKey {
    type Err = UnknownIntensity;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "intense" => Ok(Self::Intense),
            "epic" => Ok(Self::Epic),
            other => Err(UnknownIntensity(other.to_string())),
        }
    }
}

/// Reward granted for one completion at a given intensity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityTier {
    pub label: String,
    #[serde(rename = "baseXP")]
    pub base_xp: u64,
    pub gems: u64,
}

impl IntensityTier {
    fn new(label: &str, base_xp: u64, gems: u64) -> Self {
        Self {
            label: label.to_string(),
            base_xp,
            gems,
        }
    }
}

/// One tier per intensity key.
///
/// Serialized as an object keyed by the storage name so stored files can
/// override individual tiers through the merge-onto-defaults rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityCatalog {
    pub light: IntensityTier,
    pub moderate: IntensityTier,
    pub intense: IntensityTier,
    pub epic: IntensityTier,
}

impl IntensityCatalog {
    /// Returns the tier for `key`.
    pub fn lookup(&self, key: IntensityKey) -> &IntensityTier {
        match key {
            IntensityKey::Light => &self.light,
            IntensityKey::Moderate => &self.moderate,
            IntensityKey::Intense => &self.intense,
            IntensityKey::Epic => &self.epic,
        }
    }

    /// Iterates tiers lightest first.
    pub fn iter(&self) -> impl Iterator<Item = (IntensityKey, &IntensityTier)> {
        IntensityKey::ALL
            .into_iter()
            .map(move |key| (key, self.lookup(key)))
    }
}

impl Default for IntensityCatalog {
    fn default() -> Self {
        Self {
            light: IntensityTier::new("Light", 80, 1),
            moderate: IntensityTier::new("Moderate", 130, 2),
            intense: IntensityTier::new("Intense", 190, 3),
            epic: IntensityTier::new("Epic", 260, 4),
        }
    }
}

/// Permanent, repeatable catalog action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub title: String,
    pub intensity: IntensityKey,
}

impl Routine {
    fn new(id: &str, title: &str, intensity: IntensityKey) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            intensity,
        }
    }
}

/// Something gems can be spent on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: String,
    pub label: String,
    pub cost: u64,
}

impl ShopItem {
    fn new(id: &str, label: &str, cost: u64) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            cost,
        }
    }
}

/// Routines seeded into every fresh aggregate.
pub fn default_routines() -> Vec<Routine> {
    vec![
        Routine::new("rt_tidy_15", "Tidy up 15 min", IntensityKey::Light),
        Routine::new("rt_dishes", "Dishes + clear counter", IntensityKey::Light),
        Routine::new("rt_mobility", "Mobility / stretching 10 min", IntensityKey::Light),
        Routine::new("rt_focus25", "Focus 25 min (1 pomodoro)", IntensityKey::Moderate),
        Routine::new("rt_walk20", "Brisk walk 20-30 min", IntensityKey::Moderate),
        Routine::new("rt_admin10", "Admin 10 min (bills, paperwork)", IntensityKey::Light),
        Routine::new("rt_read15", "Read 10 pages / 15 min", IntensityKey::Light),
    ]
}

/// Shop seeded into every fresh aggregate.
pub fn default_shop() -> Vec<ShopItem> {
    vec![
        ShopItem::new("sh_coffee", "Premium coffee break", 10),
        ShopItem::new("sh_movie", "Movie night", 25),
        ShopItem::new("sh_dayoff", "Planned day off", 40),
        ShopItem::new("sh_restaurant", "Restaurant outing", 60),
    ]
}

#[cfg(test)]
mod tests {
    use super::{IntensityCatalog, IntensityKey};

    #[test]
    fn lookup_is_total_and_matches_default_rewards() {
        let catalog = IntensityCatalog::default();
        let rewards = catalog
            .iter()
            .map(|(key, tier)| (key, tier.base_xp, tier.gems))
            .collect::<Vec<_>>();
        assert_eq!(
            rewards,
            vec![
                (IntensityKey::Light, 80, 1),
                (IntensityKey::Moderate, 130, 2),
                (IntensityKey::Intense, 190, 3),
                (IntensityKey::Epic, 260, 4),
            ]
        );
    }

    #[test]
    fn intensity_key_parses_case_insensitively() {
        assert_eq!(" EPIC ".parse::<IntensityKey>(), Ok(IntensityKey::Epic));
        let err = "heroic".parse::<IntensityKey>().unwrap_err();
        assert!(err.to_string().contains("heroic"));
    }

    #[test]
    fn intensity_key_serializes_as_storage_name() {
        let json = serde_json::to_string(&IntensityKey::Moderate).unwrap();
        assert_eq!(json, "\"moderate\"");
    }
}
