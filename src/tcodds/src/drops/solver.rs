//! Per item class quality breakdowns

use super::capped::CappedEngine;
use super::types::ItemOdds;
use crate::catalog::Catalog;
use crate::quality::{quality_probability, zero_vector, Quality, QualityVector};
use crate::settings::Settings;
use crate::Result;
use num_rational::BigRational;
use num_traits::Zero;

/// Resolves engine outcomes into quality tier probabilities
pub struct Solver<'a> {
    capped: CappedEngine<'a>,
}

impl<'a> Solver<'a> {
    pub fn new(catalog: &'a Catalog, settings: Settings) -> Self {
        Self {
            capped: CappedEngine::new(catalog, settings),
        }
    }

    fn catalog(&self) -> &'a Catalog {
        self.capped.engine().catalog()
    }

    /// Probability of item class `class` dropping from `tc`, per quality tier
    ///
    /// The table's own bonus thresholds seed the evaluation. Returns the zero
    /// vector when the class never appears under `tc`.
    pub fn solve(&mut self, tc: usize, class: usize) -> Result<QualityVector> {
        let catalog = self.catalog();
        catalog.item(class)?;
        let table = catalog.treasure_class(tc)?;
        let distribution = self.capped.get_capped(tc, table.picks(), table.bonus)?;

        let mut result = zero_vector();
        let Some(variants) = distribution.item(class) else {
            return Ok(result);
        };

        let settings = self.capped.engine().settings();
        for (variant, p) in variants {
            if variant.quality == Quality::Unresolved {
                let tiers = quality_probability(
                    catalog,
                    class,
                    settings.monster_level,
                    settings.magic_find,
                    &variant.bonus,
                )?;
                for (slot, q) in result.iter_mut().zip(tiers) {
                    *slot += q * p;
                }
            } else {
                result[variant.quality.index()] += p;
            }
        }
        Ok(result)
    }

    /// Every item class with a nonzero drop probability from `tc`
    pub fn solve_all(&mut self, tc: usize) -> Result<Vec<ItemOdds>> {
        let catalog = self.catalog();
        let table = catalog.treasure_class(tc)?;
        let distribution = self.capped.get_capped(tc, table.picks(), table.bonus)?;

        let mut results = Vec::new();
        for &class in distribution.items.keys() {
            let tiers = self.solve(tc, class)?;
            let total = tiers.iter().fold(BigRational::zero(), |acc, p| acc + p);
            if total.is_zero() {
                continue;
            }
            let item = catalog.item(class)?;
            results.push(ItemOdds {
                class,
                code: item.code.clone(),
                name: item.name.clone(),
                total,
                tiers,
            });
        }
        tracing::debug!(tc, items = results.len(), "solved treasure class");
        Ok(results)
    }
}
