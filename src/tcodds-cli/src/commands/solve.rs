//! Drop odds command handlers

use super::{load_catalog, Probability};
use crate::cli::{CalculatorArgs, OutputArgs};
use crate::config::Config;
use anyhow::{Context, Result};
use num_traits::Zero;
use serde::Serialize;
use tcodds::{BigRational, Catalog, ItemOdds, Quality, Settings, Solver};

/// One item class in a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    pub class: usize,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub total: Probability,
    pub tiers: Vec<TierReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierReport {
    pub quality: Quality,
    pub probability: Probability,
}

impl ItemReport {
    fn new(odds: &ItemOdds, fractions: bool) -> Self {
        Self {
            class: odds.class,
            code: odds.code.clone(),
            name: odds.name.clone(),
            total: Probability::new(&odds.total, fractions),
            tiers: odds
                .nonzero_tiers()
                .map(|(quality, p)| TierReport {
                    quality,
                    probability: Probability::new(p, fractions),
                })
                .collect(),
        }
    }
}

/// Handle the solve command
pub fn solve(tc: usize, monster_level: i32, calc: &CalculatorArgs, output: OutputArgs) -> Result<()> {
    let config = Config::load()?;
    let catalog = load_catalog(calc.catalog.as_deref(), &config)?;
    let settings = calc.settings(monster_level, &config);

    let reports = solve_reports(&catalog, settings, tc, output.fractions)?;
    print_reports(&catalog, tc, &reports, output.json)
}

/// Handle the item command
pub fn item(
    tc: usize,
    monster_level: i32,
    class: usize,
    calc: &CalculatorArgs,
    output: OutputArgs,
) -> Result<()> {
    let config = Config::load()?;
    let catalog = load_catalog(calc.catalog.as_deref(), &config)?;
    let settings = calc.settings(monster_level, &config);

    let report = item_report(&catalog, settings, tc, class, output.fractions)?;
    print_reports(&catalog, tc, &[report], output.json)
}

fn solve_reports(
    catalog: &Catalog,
    settings: Settings,
    tc: usize,
    fractions: bool,
) -> Result<Vec<ItemReport>> {
    let mut solver = Solver::new(catalog, settings);
    let odds = solver
        .solve_all(tc)
        .with_context(|| format!("Failed to solve treasure class {}", tc))?;

    Ok(odds.iter().map(|o| ItemReport::new(o, fractions)).collect())
}

fn item_report(
    catalog: &Catalog,
    settings: Settings,
    tc: usize,
    class: usize,
    fractions: bool,
) -> Result<ItemReport> {
    let mut solver = Solver::new(catalog, settings);
    let tiers = solver
        .solve(tc, class)
        .with_context(|| format!("Failed to solve item class {} in treasure class {}", class, tc))?;

    let item = catalog.item(class)?;
    let total = tiers.iter().fold(BigRational::zero(), |acc, p| acc + p);
    let odds = ItemOdds {
        class,
        code: item.code.clone(),
        name: item.name.clone(),
        total,
        tiers,
    };
    Ok(ItemReport::new(&odds, fractions))
}

fn print_reports(catalog: &Catalog, tc: usize, reports: &[ItemReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }

    let table = catalog.treasure_class(tc)?;
    match &table.name {
        Some(name) => println!("Treasure class {} ({}):\n", tc, name),
        None => println!("Treasure class {}:\n", tc),
    }

    if reports.is_empty() {
        println!("Nothing can drop.");
        return Ok(());
    }

    println!("{:>6} {:<6} {:<9} {}", "Class", "Code", "Quality", "Probability");
    println!("{}", "-".repeat(50));
    for report in reports {
        println!(
            "{:>6} {:<6} {:<9} {}",
            report.class, report.code, "all", report.total
        );
        for tier in &report.tiers {
            println!(
                "{:>6} {:<6} {:<9} {}",
                report.class,
                report.code,
                tier.quality.name(),
                tier.probability
            );
        }
    }

    Ok(())
}
