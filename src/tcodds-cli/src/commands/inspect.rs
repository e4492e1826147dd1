//! Catalog inspection command handlers

use super::{load_catalog, Probability};
use crate::cli::OutputArgs;
use crate::config::Config;
use anyhow::{Context, Result};
use num_traits::Zero;
use serde::Serialize;
use std::path::Path;
use tcodds::{quality_probability, BonusVector, Catalog, Quality, Target, QUALITY_TIERS};

#[derive(Debug, Clone, PartialEq, Serialize)]
struct QualityRow {
    quality: Quality,
    probability: Probability,
}

/// Handle the quality command
pub fn quality(
    class: usize,
    monster_level: i32,
    magic_find: Option<i32>,
    catalog_path: Option<&Path>,
    output: OutputArgs,
) -> Result<()> {
    let config = Config::load()?;
    let catalog = load_catalog(catalog_path, &config)?;
    let magic_find = magic_find.or(config.magic_find).unwrap_or(0);

    let rows = quality_rows(&catalog, class, monster_level, magic_find, output.fractions)?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let item = catalog.item(class)?;
    println!(
        "Item class {} ({}) at monster level {}, magic find {}:\n",
        class,
        item.name.as_deref().unwrap_or(&item.code),
        monster_level,
        magic_find
    );
    for row in &rows {
        println!("  {:<9} {}", row.quality.name(), row.probability);
    }

    Ok(())
}

fn quality_rows(
    catalog: &Catalog,
    class: usize,
    monster_level: i32,
    magic_find: i32,
    fractions: bool,
) -> Result<Vec<QualityRow>> {
    let tiers = quality_probability(
        catalog,
        class,
        monster_level,
        magic_find,
        &BonusVector::default(),
    )
    .with_context(|| format!("Failed to roll quality for item class {}", class))?;

    Ok(QUALITY_TIERS
        .iter()
        .zip(tiers.iter())
        .filter(|(_, p)| !p.is_zero())
        .map(|(&quality, p)| QualityRow {
            quality,
            probability: Probability::new(p, fractions),
        })
        .collect())
}

/// Handle the show command
pub fn show(tc: usize, catalog_path: Option<&Path>) -> Result<()> {
    let config = Config::load()?;
    let catalog = load_catalog(catalog_path, &config)?;

    for line in describe_table(&catalog, tc)? {
        println!("{}", line);
    }
    Ok(())
}

fn describe_target(catalog: &Catalog, target: Target) -> String {
    match target {
        Target::Nothing => "nothing".to_string(),
        Target::Item(class) => match catalog.items.get(class) {
            Some(item) => format!("item {} ({})", class, item.code),
            None => format!("item {} (missing)", class),
        },
        Target::TreasureClass(index) => match catalog.treasure_classes.get(index) {
            Some(table) => match &table.name {
                Some(name) => format!("tc {} ({})", index, name),
                None => format!("tc {}", index),
            },
            None => format!("tc {} (missing)", index),
        },
    }
}

fn describe_table(catalog: &Catalog, tc: usize) -> Result<Vec<String>> {
    let table = catalog.treasure_class(tc)?;
    let mut lines = Vec::new();

    lines.push(match &table.name {
        Some(name) => format!("Treasure class {}: {}", tc, name),
        None => format!("Treasure class {}", tc),
    });
    lines.push(format!(
        "  group {}  level {}  classic {}  expansion {}  picks {}  no-drop {}",
        table.group, table.level, table.classic, table.expansion, table.n_pick, table.no_drop
    ));
    if !table.bonus.is_zero() {
        lines.push(format!("  bonus: {}", table.bonus));
    }
    lines.push(String::new());

    lines.push(format!(
        "  {:>3} {:>8} {:>9}  {:<30} {}",
        "#", "Classic", "Expansion", "Target", "Flags"
    ));
    for (i, entry) in table.entries.iter().enumerate() {
        let mut flags = Vec::new();
        if entry.force_unique {
            flags.push("unique");
        }
        if entry.force_set {
            flags.push("set");
        }
        if entry.continues_previous {
            flags.push("continued");
        }
        lines.push(format!(
            "  {:>3} {:>8} {:>9}  {:<30} {}",
            i,
            entry.classic_start,
            entry.expansion_start,
            describe_target(catalog, entry.target),
            flags.join(",")
        ));
    }

    Ok(lines)
}
