//! Corrections for tables whose real drops are capped at six items
//!
//! The engine treats every pick as independent. A few table families in the
//! game data stop after six items, so their naive results overcount. The
//! indices and formulas here are data-specific and are not generalized.

use super::engine::Engine;
use super::types::{CacheKey, Distribution};
use crate::bonus::BonusVector;
use crate::catalog::{Catalog, TreasureClassRecord};
use crate::coef::depletion_coefficients;
use crate::settings::Settings;
use crate::{Error, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::rc::Rc;

/// Tables with six-slot depletion sampling
pub const SIX_SLOT_TABLES: RangeInclusive<usize> = 989..=994;

/// Tables alternating between two sub-tables
pub const ALTERNATION_TABLES: RangeInclusive<usize> = 1004..=1006;

/// `n_pick` of the seven-pick tables
pub const SEVEN_PICK: i32 = 7;

/// Item class that receives the offset term in six-slot tables
pub const ANCHOR_CLASS: usize = 529;

/// Most items one drop can produce
const DROP_CAP: u32 = 6;

/// Engine wrapper applying the capped-table corrections
pub struct CappedEngine<'a> {
    engine: Engine<'a>,
    cache: HashMap<CacheKey, Rc<Distribution>>,
}

impl<'a> CappedEngine<'a> {
    pub fn new(catalog: &'a Catalog, settings: Settings) -> Self {
        Self::from_engine(Engine::new(catalog, settings))
    }

    pub fn from_engine(engine: Engine<'a>) -> Self {
        Self {
            engine,
            cache: HashMap::new(),
        }
    }

    pub fn engine(&self) -> &Engine<'a> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<'a> {
        &mut self.engine
    }

    /// Engine result for `tc`, corrected when `tc` is a capped table
    pub fn get_capped(
        &mut self,
        tc: usize,
        picks: u32,
        bonus: BonusVector,
    ) -> Result<Rc<Distribution>> {
        let key = CacheKey::new(tc, picks, bonus);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Rc::clone(hit));
        }

        let table = self.engine.catalog().treasure_class(tc)?;
        let result = if SIX_SLOT_TABLES.contains(&tc) {
            tracing::debug!(tc, "applying six-slot correction");
            Rc::new(self.six_slot(tc, table, picks)?)
        } else if ALTERNATION_TABLES.contains(&tc) {
            tracing::debug!(tc, "applying alternation correction");
            Rc::new(self.alternation(tc, table, picks, bonus)?)
        } else if table.n_pick == SEVEN_PICK {
            tracing::debug!(tc, "applying seven-pick correction");
            Rc::new(self.seven_pick(tc, picks, bonus)?)
        } else {
            self.engine.get(tc, picks, bonus)?
        };

        self.cache.insert(key, Rc::clone(&result));
        Ok(result)
    }

    /// Evaluated under the inner table's own bonus, whatever was passed in
    fn six_slot(
        &mut self,
        tc: usize,
        table: &TreasureClassRecord,
        picks: u32,
    ) -> Result<Distribution> {
        let sub = sub_table(tc, table, 1)?;
        let bonus = self.engine.catalog().treasure_class(sub)?.bonus;

        let inner_no_drop = self.engine.get(sub, 1, bonus)?.no_drop.clone();
        let coef = depletion_coefficients(
            &ratio(2, 3),
            &ratio(1, 3),
            5,
            7,
            &inner_no_drop,
            DROP_CAP,
        );

        let base = self.engine.get(tc, picks, bonus)?;
        let mut result = Distribution {
            no_drop: base.no_drop.clone(),
            max_count: base.max_count.max(DROP_CAP),
            ..Distribution::empty()
        };
        for (&class, variants) in &base.items {
            for (&variant, p) in variants {
                let corrected = if class == ANCHOR_CLASS {
                    p * &coef.anchor_scale + &coef.anchor_offset
                } else {
                    p * &coef.scale
                };
                result.add(class, variant, corrected);
            }
        }
        Ok(result)
    }

    fn alternation(
        &mut self,
        tc: usize,
        table: &TreasureClassRecord,
        picks: u32,
        bonus: BonusVector,
    ) -> Result<Distribution> {
        let first = sub_table(tc, table, 0)?;
        let second = sub_table(tc, table, 1)?;

        let n1 = self.engine.get(first, 1, bonus)?.no_drop.clone();
        let n2 = self.engine.get(second, 1, bonus)?.no_drop.clone();
        let second_picks = self.engine.catalog().treasure_class(second)?.picks();
        let second_result = self.engine.get(second, second_picks, bonus)?;

        let one = BigRational::one();
        let d1 = &one - &n1;
        let d2 = &one - &n2;
        let overlap = num_traits::pow(d1.clone(), 4)
            * (&d1 * (ratio(2, 1) + &n2) * &d2
                + ratio(5, 1) * &n1 * num_traits::pow(d2.clone(), 2))
            / ratio(3, 1);

        let base = self.engine.get(tc, picks, bonus)?;
        let mut result = Distribution {
            max_count: base.max_count.max(DROP_CAP),
            ..(*base).clone()
        };
        for &class in base.items.keys() {
            let Some(variants) = second_result.item(class) else {
                continue;
            };
            for (&variant, p) in variants {
                result.add(class, variant, -(p * &overlap));
            }
        }
        Ok(result)
    }

    fn seven_pick(&mut self, tc: usize, picks: u32, bonus: BonusVector) -> Result<Distribution> {
        let single = self.engine.get(tc, 1, bonus)?.no_drop.clone();
        let drop = BigRational::one() - single;
        let factor = (ratio(7, 1) - num_traits::pow(drop, DROP_CAP as usize)) / ratio(7, 1);

        let base = self.engine.get(tc, picks, bonus)?;
        let mut result = Distribution {
            max_count: base.max_count.min(DROP_CAP),
            ..(*base).clone()
        };
        result.scale_items(&factor);
        Ok(result)
    }
}

fn sub_table(tc: usize, table: &TreasureClassRecord, slot: usize) -> Result<usize> {
    table
        .entries
        .get(slot)
        .and_then(|entry| entry.target.treasure_class())
        .ok_or(Error::InvalidTable {
            index: tc,
            reason: "capped table entry is not a treasure class",
        })
}

fn ratio(numer: i64, denom: i64) -> BigRational {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}
