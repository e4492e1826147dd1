//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting tcodds defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Values given to `tcodds configure`
#[derive(Debug, Default)]
pub struct ConfigUpdate {
    pub catalog: Option<PathBuf>,
    pub magic_find: Option<i32>,
    pub players: Option<u32>,
}

impl ConfigUpdate {
    fn is_empty(&self) -> bool {
        self.catalog.is_none() && self.magic_find.is_none() && self.players.is_none()
    }

    fn apply(self, config: &mut Config) {
        if let Some(path) = self.catalog {
            config.catalog = Some(path);
        }
        if let Some(mf) = self.magic_find {
            config.magic_find = Some(mf);
        }
        if let Some(players) = self.players {
            config.players = Some(players);
        }
    }
}

/// Handle the configure command
pub fn handle(update: ConfigUpdate, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if update.is_empty() {
        show_usage();
        return Ok(());
    }

    update.apply(&mut config);
    config.save()?;

    println!("Configuration updated");
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) {
    match &config.catalog {
        Some(path) => println!("Catalog: {}", path.display()),
        None => println!("No catalog configured"),
    }
    match config.magic_find {
        Some(mf) => println!("Magic find: {}", mf),
        None => println!("Magic find: 0 (default)"),
    }
    match config.players {
        Some(players) => println!("Players: {}", players),
        None => println!("Players: 1 (default)"),
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: tcodds configure --catalog PATH [--magic-find N] [--players N]");
    println!("   or: tcodds configure --show");
}
