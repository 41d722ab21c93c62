//! XP curve, rank titles and reward resolution.
//!
//! # Responsibility
//! - Compute the XP threshold of each level.
//! - Apply XP/gem rewards to a profile, resolving every level-up they cause.
//!
//! # Invariants
//! - `xp_needed` is strictly increasing in `level` for `base > 0`.
//! - After `award` returns, `profile.xp < xp_needed(profile.level, base)`.
//! - Each crossed threshold adds exactly `LEVEL_UP_BONUS_GEMS`.
//! - Rounding is half away from zero (`f64::round`), equal to half-up for the
//!   non-negative values involved.

use crate::model::profile::Profile;

/// Gems granted on every level reached.
pub const LEVEL_UP_BONUS_GEMS: u64 = 5;

/// Rank names ordered from level 1 upward; higher levels keep the last one.
pub const RANK_TITLES: [&str; 9] = [
    "Novice",
    "Aspirant",
    "Adventurer",
    "Veteran",
    "Hero",
    "Champion",
    "Master",
    "Grand Master",
    "Legend",
];

/// Level reached during one `award` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    /// The new level.
    pub level: u32,
    pub bonus_gems: u64,
}

/// XP needed to advance from `level` to `level + 1`: `round(base * level^1.5)`.
pub fn xp_needed(level: u32, base: u64) -> u64 {
    let needed = (base as f64) * f64::from(level).powf(1.5);
    needed.round() as u64
}

/// Rank title shown for `level`.
pub fn title_for_level(level: u32) -> &'static str {
    let index = level.saturating_sub(1) as usize;
    RANK_TITLES[index.min(RANK_TITLES.len() - 1)]
}

/// Progress inside the current level as a whole percentage (0..=100).
pub fn progress_percent(profile: &Profile, base: u64) -> u8 {
    let needed = xp_needed(profile.level, base);
    if needed == 0 {
        return 0;
    }
    let percent = (profile.xp as f64 / needed as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Adds a reward to `profile` and resolves every level-up it causes.
///
/// Loops until the remaining XP is below the current threshold, so a single
/// large reward can cross several levels. Returns one event per level gained,
/// in ascending order.
pub fn award(profile: &mut Profile, xp_gain: u64, gem_gain: u64, base: u64) -> Vec<LevelUp> {
    profile.xp = profile.xp.saturating_add(xp_gain);
    profile.gems = profile.gems.saturating_add(gem_gain);

    let mut level_ups = Vec::new();
    loop {
        let threshold = xp_needed(profile.level, base);
        // Zero only for invalid aggregates (base 0 or level 0).
        if threshold == 0 || profile.xp < threshold {
            break;
        }
        profile.xp -= threshold;
        profile.level = profile.level.saturating_add(1);
        profile.gems = profile.gems.saturating_add(LEVEL_UP_BONUS_GEMS);
        level_ups.push(LevelUp {
            level: profile.level,
            bonus_gems: LEVEL_UP_BONUS_GEMS,
        });
    }
    level_ups
}
