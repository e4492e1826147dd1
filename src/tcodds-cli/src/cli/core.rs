//! Core CLI definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use super::odds::{CalculatorArgs, OutputArgs};

#[derive(Parser)]
#[command(name = "tcodds")]
#[command(about = "Exact treasure class drop probabilities", long_about = None)]
pub struct Cli {
    /// Log engine activity to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drop odds of every item class from a treasure class
    #[command(visible_alias = "s")]
    Solve {
        /// Treasure class index
        tc: usize,

        /// Monster level (for chests often 1 or 2)
        monster_level: i32,

        #[command(flatten)]
        calc: CalculatorArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Drop odds of one item class from a treasure class
    #[command(visible_alias = "i")]
    Item {
        /// Treasure class index
        tc: usize,

        /// Monster level
        monster_level: i32,

        /// Item class index
        class: usize,

        #[command(flatten)]
        calc: CalculatorArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Quality tier odds of an item class, with no bonus thresholds
    #[command(visible_alias = "q")]
    Quality {
        /// Item class index
        class: usize,

        /// Monster level
        monster_level: i32,

        /// Magic find bonus in percent
        #[arg(short, long, allow_negative_numbers = true)]
        magic_find: Option<i32>,

        /// Path to the catalog (JSON or YAML)
        #[arg(long)]
        catalog: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show a treasure class and its entries
    Show {
        /// Treasure class index
        tc: usize,

        /// Path to the catalog (JSON or YAML)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set the default catalog path
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Set the default magic find bonus
        #[arg(long, allow_negative_numbers = true)]
        magic_find: Option<i32>,

        /// Set the default players modifier
        #[arg(long)]
        players: Option<u32>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
