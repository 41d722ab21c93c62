//! Player profile.

use serde::{Deserialize, Serialize};

/// Name used when the player leaves the profile name blank.
pub const DEFAULT_PROFILE_NAME: &str = "Player";

/// Current progression of the single local player.
///
/// `xp` is the progress inside the current level, not a lifetime total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub level: u32,
    pub xp: u64,
    pub gems: u64,
}

impl Profile {
    /// Sets the display name, falling back to the default when blank.
    pub fn rename(&mut self, name: &str) {
        let trimmed = name.trim();
        self.name = if trimmed.is_empty() {
            DEFAULT_PROFILE_NAME.to_string()
        } else {
            trimmed.to_string()
        };
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROFILE_NAME.to_string(),
            level: 1,
            xp: 0,
            gems: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Profile, DEFAULT_PROFILE_NAME};

    #[test]
    fn rename_trims_and_falls_back_to_default() {
        let mut profile = Profile::default();
        profile.rename("  Ada  ");
        assert_eq!(profile.name, "Ada");

        profile.rename("   ");
        assert_eq!(profile.name, DEFAULT_PROFILE_NAME);
    }
}
