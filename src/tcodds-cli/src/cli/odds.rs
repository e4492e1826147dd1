//! Arguments shared by the odds commands

use clap::Args;
use std::path::PathBuf;
use tcodds::{Ruleset, Settings};

use crate::config::Config;

/// Calculator inputs; unset values fall back to the config file
#[derive(Args, Debug, Clone, Default)]
pub struct CalculatorArgs {
    /// Magic find bonus in percent
    #[arg(short, long, allow_negative_numbers = true)]
    pub magic_find: Option<i32>,

    /// Players modifier: floor((players in game + players in party) / 2)
    #[arg(short, long)]
    pub players: Option<u32>,

    /// Use the classic ruleset
    #[arg(long, conflicts_with = "expansion")]
    pub classic: bool,

    /// Use the expansion ruleset (default)
    #[arg(long, visible_alias = "lod")]
    pub expansion: bool,

    /// Item find skill (no no-drop weight)
    #[arg(short, long)]
    pub find: bool,

    /// Path to the catalog (JSON or YAML)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

impl CalculatorArgs {
    pub fn ruleset(&self) -> Ruleset {
        if self.classic {
            Ruleset::Classic
        } else {
            Ruleset::Expansion
        }
    }

    /// Calculator settings with flags taking precedence over `config`
    pub fn settings(&self, monster_level: i32, config: &Config) -> Settings {
        Settings {
            monster_level,
            magic_find: self.magic_find.or(config.magic_find).unwrap_or(0),
            players: self.players.or(config.players).unwrap_or(1),
            ruleset: self.ruleset(),
            item_find: self.find,
        }
    }
}

/// How results are printed
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputArgs {
    /// Print probabilities as exact fractions
    #[arg(short = 'F', long)]
    pub fractions: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}
