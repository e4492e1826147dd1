//! Memoized recursive evaluation of treasure classes

use super::types::{CacheKey, Distribution, DropVariant};
use crate::bonus::BonusVector;
use crate::catalog::{Catalog, Target, TreasureClassRecord};
use crate::quality::Quality;
use crate::settings::{Ruleset, Settings};
use crate::{Error, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Level requirement at or above which an item never drops in classic
const CLASSIC_LEVEL_LIMIT: i32 = 100;

/// Selection window `[lo, hi)` over a table's cumulative weights
#[derive(Debug, Clone)]
struct Window {
    lo: i64,
    hi: i64,
    no_drop: BigRational,
}

impl Window {
    fn width(&self) -> i64 {
        self.hi - self.lo
    }
}

/// Drop probability engine
///
/// Evaluates `(treasure class, picks, bonus)` triples into a [`Distribution`]
/// and caches every result for the lifetime of the engine.
pub struct Engine<'a> {
    catalog: &'a Catalog,
    settings: Settings,
    cache: HashMap<CacheKey, Rc<Distribution>>,
    in_progress: HashSet<CacheKey>,
}

impl<'a> Engine<'a> {
    pub fn new(catalog: &'a Catalog, settings: Settings) -> Self {
        Self {
            catalog,
            settings,
            cache: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Number of cached evaluations
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Outcome distribution of `picks` picks from treasure class `tc`
    pub fn get(&mut self, tc: usize, picks: u32, bonus: BonusVector) -> Result<Rc<Distribution>> {
        let key = CacheKey::new(tc, picks, bonus);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Rc::clone(hit));
        }
        if !self.in_progress.insert(key) {
            return Err(Error::CyclicTreasureClass(tc));
        }

        tracing::debug!(tc, picks, %bonus, "evaluating treasure class");
        let result = self.evaluate(key);
        self.in_progress.remove(&key);

        let distribution = Rc::new(result?);
        self.cache.insert(key, Rc::clone(&distribution));
        Ok(distribution)
    }

    fn evaluate(&mut self, key: CacheKey) -> Result<Distribution> {
        let catalog = self.catalog;
        let tc = key.treasure_class;
        let table = catalog.treasure_class(tc)?;
        let total = table.total(self.settings.ruleset);

        if total == 0 || table.entries.is_empty() {
            return Ok(Distribution::certain_no_drop());
        }

        let window = self.window(tc, table, i64::from(total), key.picks)?;
        let selection = self.selection(table, i64::from(total), &window);

        let mut result = Distribution::empty();
        let mut no_drop = window.no_drop;
        let mut repeat = BigRational::zero();

        for (entry, p) in table.entries.iter().zip(selection) {
            if p.is_zero() {
                continue;
            }
            tracing::trace!(tc, target = ?entry.target, %p, "entry selected");

            match entry.target {
                Target::Nothing => no_drop += p,
                Target::TreasureClass(sub) => {
                    let sub_table = catalog.treasure_class(sub)?;
                    let sub_bonus = key.bonus.combine(&sub_table.bonus);
                    let nested = self.get(sub, sub_table.picks(), sub_bonus)?;

                    no_drop += &nested.no_drop * &p;
                    result.max_count = result.max_count.max(nested.max_count);
                    for (&class, variants) in &nested.items {
                        for (&variant, q) in variants {
                            result.add(class, variant, q * &p);
                        }
                    }
                }
                Target::Item(class) => {
                    let item = catalog.item(class)?;
                    let classic = self.settings.ruleset == Ruleset::Classic;
                    if classic && item.level_req >= CLASSIC_LEVEL_LIMIT {
                        no_drop += p;
                        continue;
                    }

                    let bonus = if classic {
                        key.bonus.combine(&entry.bonus)
                    } else {
                        key.bonus
                    };
                    let quality = entry.forced_quality().unwrap_or(Quality::Unresolved);

                    if table.bonus.tc30 > 0 {
                        return Err(Error::UnsupportedTableFeature {
                            index: tc,
                            feature: "TC30",
                        });
                    }
                    if table.bonus.tc32 > 0 {
                        return Err(Error::UnsupportedTableFeature {
                            index: tc,
                            feature: "TC32",
                        });
                    }

                    if classic && catalog.item_type(item.item_type)?.throwable {
                        repeat += p;
                        continue;
                    }

                    result.add(class, DropVariant { quality, bonus }, p);
                    result.max_count = result.max_count.max(1);
                }
            }
        }
        result.no_drop = no_drop;

        if !repeat.is_zero() {
            if repeat >= BigRational::one() {
                tracing::debug!(tc, "every selectable entry is throwable");
                return Ok(Distribution::certain_no_drop());
            }
            let factor = (BigRational::one() - repeat).recip();
            result.scale_items(&factor);
            result.no_drop *= factor;
        }

        if key.picks > 1 {
            self.combine_picks(table, key, &mut result)?;
        }

        Ok(result)
    }

    /// Window for one evaluation and the no-drop mass outside the entries
    fn window(
        &self,
        tc: usize,
        table: &TreasureClassRecord,
        total: i64,
        picks: u32,
    ) -> Result<Window> {
        let (lo, hi) = if table.is_depletion() {
            let lo = -i64::from(table.n_pick) - i64::from(picks);
            (lo, lo + 1)
        } else if self.settings.item_find {
            (0, total)
        } else {
            let mut weight = i64::from(table.no_drop);
            if weight > 0 && self.settings.players > 1 {
                weight = scaled_no_drop(tc, weight, total, self.settings.players)?;
            }
            (-weight, total)
        };

        let width = hi - lo;
        if width <= 0 {
            return Err(Error::InvalidTable {
                index: tc,
                reason: "selection window is empty",
            });
        }

        let no_drop = if table.is_depletion() {
            if lo >= total {
                BigRational::one()
            } else {
                BigRational::zero()
            }
        } else if lo < 0 {
            ratio(-lo, width)
        } else {
            BigRational::zero()
        };

        Ok(Window { lo, hi, no_drop })
    }

    /// Probability that each entry is selected by one pick
    fn selection(
        &self,
        table: &TreasureClassRecord,
        total: i64,
        window: &Window,
    ) -> Vec<BigRational> {
        let ruleset = self.settings.ruleset;
        let entries = &table.entries;
        let width = window.width();

        entries
            .iter()
            .enumerate()
            .map(|(j, entry)| {
                if ruleset == Ruleset::Classic && entry.continues_previous {
                    return BigRational::zero();
                }
                let next = match ruleset {
                    Ruleset::Expansion => entries.get(j + 1),
                    Ruleset::Classic => entries[j + 1..].iter().find(|e| !e.continues_previous),
                };
                let end = next.map_or(total, |e| i64::from(e.start(ruleset)));
                let start = i64::from(entry.start(ruleset));

                let overlap = end.min(window.hi) - start.max(window.lo);
                if overlap > 0 {
                    ratio(overlap, width)
                } else {
                    BigRational::zero()
                }
            })
            .collect()
    }

    /// Fold a single-pick result into a `picks`-pick result
    fn combine_picks(
        &mut self,
        table: &TreasureClassRecord,
        key: CacheKey,
        result: &mut Distribution,
    ) -> Result<()> {
        if table.is_depletion() {
            // Each depletion pick sees a different window, so recurse one pick at a time
            let previous = self.get(key.treasure_class, key.picks - 1, key.bonus)?;
            for (&class, variants) in &previous.items {
                for (&variant, p) in variants {
                    result.add(class, variant, p.clone());
                }
            }
            result.max_count = result.max_count.saturating_add(previous.max_count);
            result.no_drop *= &previous.no_drop;
        } else {
            let picks = BigRational::from_integer(BigInt::from(key.picks));
            result.scale_items(&picks);
            result.no_drop = num_traits::pow(result.no_drop.clone(), key.picks as usize);
            result.max_count = result.max_count.saturating_mul(key.picks);
        }
        Ok(())
    }
}

fn ratio(numer: i64, denom: i64) -> BigRational {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

/// No-drop weight rescaled for the players modifier
///
/// `floor(total / (((weight + total) / weight)^players - 1))`, computed exactly.
fn scaled_no_drop(tc: usize, weight: i64, total: i64, players: u32) -> Result<i64> {
    let base = ratio(weight + total, weight);
    let denom = num_traits::pow(base, players as usize) - BigRational::one();
    if denom.is_zero() {
        return Err(Error::InvalidTable {
            index: tc,
            reason: "no-drop weight cannot be scaled for players",
        });
    }
    let scaled = (BigRational::from_integer(BigInt::from(total)) / denom).trunc();
    scaled.to_integer().to_i64().ok_or(Error::InvalidTable {
        index: tc,
        reason: "scaled no-drop weight overflows",
    })
}
