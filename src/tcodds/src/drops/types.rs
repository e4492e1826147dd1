//! Drop distribution types

use crate::bonus::BonusVector;
use crate::quality::{Quality, QualityVector};
use num_rational::BigRational;
use num_traits::{One, Zero};
use std::collections::BTreeMap;

/// Memoization key for one treasure class evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub treasure_class: usize,
    pub picks: u32,
    pub bonus: BonusVector,
}

impl CacheKey {
    pub fn new(treasure_class: usize, picks: u32, bonus: BonusVector) -> Self {
        Self {
            treasure_class,
            picks,
            bonus,
        }
    }
}

/// Quality and effective bonus under which an item class was produced
///
/// `Quality::Unresolved` means the quality cascade still has to run with
/// `bonus`; any other quality was forced by the producing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DropVariant {
    pub quality: Quality,
    pub bonus: BonusVector,
}

/// Outcome mass of one treasure class evaluation
///
/// For a single pick the no-drop mass plus every item mass sums to exactly 1.
/// With several picks item masses are expected counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub no_drop: BigRational,
    /// Upper bound on the number of items one evaluation can produce
    pub max_count: u32,
    pub items: BTreeMap<usize, BTreeMap<DropVariant, BigRational>>,
}

/// One entry of a [`Distribution`], as returned by [`Distribution::outcomes`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<'a> {
    NoDrop(&'a BigRational),
    MaxCount(u32),
    Item {
        class: usize,
        variant: DropVariant,
        probability: &'a BigRational,
    },
}

impl Distribution {
    /// Zero mass everywhere
    pub fn empty() -> Self {
        Self {
            no_drop: BigRational::zero(),
            max_count: 0,
            items: BTreeMap::new(),
        }
    }

    /// Nothing can ever drop
    pub fn certain_no_drop() -> Self {
        Self {
            no_drop: BigRational::one(),
            ..Self::empty()
        }
    }

    /// Add `probability` to one item variant
    pub fn add(&mut self, class: usize, variant: DropVariant, probability: BigRational) {
        let slot = self
            .items
            .entry(class)
            .or_default()
            .entry(variant)
            .or_insert_with(BigRational::zero);
        *slot += probability;
    }

    /// Variants of one item class
    pub fn item(&self, class: usize) -> Option<&BTreeMap<DropVariant, BigRational>> {
        self.items.get(&class)
    }

    /// Multiply every item mass by `factor`
    pub fn scale_items(&mut self, factor: &BigRational) {
        for variants in self.items.values_mut() {
            for p in variants.values_mut() {
                *p *= factor;
            }
        }
    }

    /// No-drop mass plus every item mass
    pub fn total_mass(&self) -> BigRational {
        self.items
            .values()
            .flat_map(|variants| variants.values())
            .fold(self.no_drop.clone(), |acc, p| acc + p)
    }

    /// Every outcome: no-drop first, then the max count, then items in
    /// class order
    pub fn outcomes(&self) -> impl Iterator<Item = Outcome<'_>> {
        let items = self.items.iter().flat_map(|(&class, variants)| {
            variants.iter().map(move |(&variant, probability)| Outcome::Item {
                class,
                variant,
                probability,
            })
        });
        [
            Outcome::NoDrop(&self.no_drop),
            Outcome::MaxCount(self.max_count),
        ]
        .into_iter()
        .chain(items)
    }
}

/// Quality breakdown of one item class under one treasure class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOdds {
    pub class: usize,
    pub code: String,
    pub name: Option<String>,
    /// Sum over all tiers
    pub total: BigRational,
    pub tiers: QualityVector,
}

impl ItemOdds {
    /// Nonzero tiers in vector order
    pub fn nonzero_tiers(&self) -> impl Iterator<Item = (Quality, &BigRational)> {
        crate::quality::QUALITY_TIERS
            .iter()
            .zip(self.tiers.iter())
            .filter(|(_, p)| !p.is_zero())
            .map(|(&q, p)| (q, p))
    }
}
