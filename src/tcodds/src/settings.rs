//! Calculator settings

use serde::{Deserialize, Serialize};

/// Which per-ruleset fields of the catalog drive the calculation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ruleset {
    Classic,
    #[default]
    Expansion,
}

impl std::fmt::Display for Ruleset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ruleset::Classic => write!(f, "classic"),
            Ruleset::Expansion => write!(f, "expansion"),
        }
    }
}

/// Inputs that stay fixed for one calculator run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Monster level, or area level for chests
    pub monster_level: i32,
    /// Magic find bonus in percent
    pub magic_find: i32,
    /// Players modifier: floor((players in game + players in party) / 2)
    pub players: u32,
    pub ruleset: Ruleset,
    /// Item find skill removes the no-drop weight of replacement tables
    pub item_find: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            monster_level: 1,
            magic_find: 0,
            players: 1,
            ruleset: Ruleset::Expansion,
            item_find: false,
        }
    }
}
