//! CLI argument definitions for tcodds
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod core;
mod odds;

pub use core::{Cli, Commands};
pub use odds::{CalculatorArgs, OutputArgs};
