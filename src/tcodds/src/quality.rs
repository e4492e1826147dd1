//! Item quality tiers and the quality cascade
//!
//! Quality is decided by a fixed sequence of rolls, rarest first. Each roll
//! has a chance value `v`; when `v > 128` the tier takes `128 / v` of the mass
//! still unassigned, otherwise it takes all of it and the cascade stops.

use crate::bonus::BonusVector;
use crate::catalog::{Catalog, ItemRatioRecord};
use crate::hierarchy::has_type;
use crate::{Error, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

/// Item-type code of armor
pub const ARMOR_TYPE: i32 = 50;
/// Item-type code of weapons
pub const WEAPON_TYPE: i32 = 45;
/// Item-type code of missile potions
pub const MISSILE_POTION_TYPE: i32 = 38;

/// Chance values at or below this claim all remaining mass
const CHANCE_FLOOR: i64 = 128;

/// Item-ratio version used for quality rolls
const RATIO_VERSION: i32 = 100;

/// Quality tiers, numbered as in the result vector
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Not yet rolled (in distributions) or not applicable (in results)
    Unresolved = 0,
    Low = 1,
    Normal = 2,
    Superior = 3,
    Magic = 4,
    Set = 5,
    Rare = 6,
    Unique = 7,
}

/// All tiers in result-vector order
pub const QUALITY_TIERS: [Quality; 8] = [
    Quality::Unresolved,
    Quality::Low,
    Quality::Normal,
    Quality::Superior,
    Quality::Magic,
    Quality::Set,
    Quality::Rare,
    Quality::Unique,
];

impl Quality {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Quality::Unresolved => "n/a",
            Quality::Low => "Low",
            Quality::Normal => "Normal",
            Quality::Superior => "Superior",
            Quality::Magic => "Magic",
            Quality::Set => "Set",
            Quality::Rare => "Rare",
            Quality::Unique => "Unique",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Probability per quality tier, indexed by [`Quality::index`]
pub type QualityVector = [BigRational; 8];

pub fn zero_vector() -> QualityVector {
    std::array::from_fn(|_| BigRational::zero())
}

fn one_hot(quality: Quality) -> QualityVector {
    let mut v = zero_vector();
    v[quality.index()] = BigRational::one();
    v
}

/// How a tier derives its chance value
#[derive(Debug, Clone, Copy)]
enum Roll {
    /// Unique/set/rare: magic find damped by `coef`, then floor and bonus
    Damped {
        coef: i64,
        base: i64,
        divisor: i64,
        min: i64,
        bonus: i64,
        field: &'static str,
    },
    /// Magic: raw magic find, then floor and bonus
    Magic {
        base: i64,
        divisor: i64,
        min: i64,
        bonus: i64,
    },
    /// Superior/normal: level difference only
    Plain {
        base: i64,
        divisor: i64,
        field: &'static str,
    },
    /// Takes whatever mass is left
    Rest,
}

impl Roll {
    /// Chance value for this tier, `None` for [`Roll::Rest`]
    fn chance(&self, level_diff: i64, magic_find: i64) -> Result<Option<i64>> {
        let v = match *self {
            Roll::Damped {
                coef,
                base,
                divisor,
                min,
                bonus,
                field,
            } => {
                let mut v = (base - div(level_diff, divisor, field)?) * 128;
                if magic_find != 0 {
                    let mf = if magic_find > 10 {
                        magic_find * coef / (coef + magic_find)
                    } else {
                        magic_find
                    };
                    if mf != -100 {
                        v = v * 100 / (mf + 100);
                    }
                }
                let v = v.max(min);
                v - v * bonus / 1024
            }
            Roll::Magic {
                base,
                divisor,
                min,
                bonus,
            } => {
                let mut v = (base - div(level_diff, divisor, "magic_divisor")?) * 128;
                if magic_find != 0 {
                    v = v * 100 / (magic_find + 100);
                }
                let v = v.max(min);
                v - v * bonus / 1024
            }
            Roll::Plain {
                base,
                divisor,
                field,
            } => (base - div(level_diff, divisor, field)?) * 128,
            Roll::Rest => return Ok(None),
        };
        Ok(Some(v))
    }
}

fn div(value: i64, divisor: i64, field: &'static str) -> Result<i64> {
    value.checked_div(divisor).ok_or(Error::ZeroDivisor(field))
}

/// Ordered tier rolls for an item type
fn rolls(
    ratio: &ItemRatioRecord,
    bonus: &BonusVector,
    magic_find: i64,
    always_magic: bool,
    can_be_rare: bool,
) -> Vec<(Quality, Roll)> {
    let mut rolls = Vec::with_capacity(7);

    if magic_find > -100 {
        rolls.push((
            Quality::Unique,
            Roll::Damped {
                coef: 250,
                base: ratio.unique,
                divisor: ratio.unique_divisor,
                min: ratio.unique_min,
                bonus: i64::from(bonus.unique),
                field: "unique_divisor",
            },
        ));
        rolls.push((
            Quality::Set,
            Roll::Damped {
                coef: 500,
                base: ratio.set,
                divisor: ratio.set_divisor,
                min: ratio.set_min,
                bonus: i64::from(bonus.set),
                field: "set_divisor",
            },
        ));
        if can_be_rare {
            rolls.push((
                Quality::Rare,
                Roll::Damped {
                    coef: 600,
                    base: ratio.rare,
                    divisor: ratio.rare_divisor,
                    min: ratio.rare_min,
                    bonus: i64::from(bonus.rare),
                    field: "rare_divisor",
                },
            ));
        }
        if always_magic {
            rolls.push((Quality::Magic, Roll::Rest));
            return rolls;
        }
        rolls.push((
            Quality::Magic,
            Roll::Magic {
                base: ratio.magic,
                divisor: ratio.magic_divisor,
                min: ratio.magic_min,
                bonus: i64::from(bonus.magic),
            },
        ));
    }

    rolls.push((
        Quality::Superior,
        Roll::Plain {
            base: ratio.hi_quality,
            divisor: ratio.hi_quality_divisor,
            field: "hi_quality_divisor",
        },
    ));
    rolls.push((
        Quality::Normal,
        Roll::Plain {
            base: ratio.normal,
            divisor: ratio.normal_divisor,
            field: "normal_divisor",
        },
    ));
    rolls.push((Quality::Low, Roll::Rest));
    rolls
}

/// Whether an item rolls against the uber item-ratio rows
///
/// True for armor and weapons whose base code is their own exceptional or
/// elite code, unless the item is a missile potion or a quest item.
fn is_uber(catalog: &Catalog, class: usize) -> Result<bool> {
    let item = catalog.item(class)?;
    if !(has_type(catalog, class, ARMOR_TYPE)? || has_type(catalog, class, WEAPON_TYPE)?) {
        return Ok(false);
    }
    if item.code != item.ultra_code && item.code != item.uber_code {
        return Ok(false);
    }
    Ok(item.item_type != MISSILE_POTION_TYPE && !item.quest)
}

/// Probability of each quality tier for one item class
///
/// Normal-only types, unique items and quest items of always-magic types
/// short-circuit to a single tier.
pub fn quality_probability(
    catalog: &Catalog,
    class: usize,
    monster_level: i32,
    magic_find: i32,
    bonus: &BonusVector,
) -> Result<QualityVector> {
    let item = catalog.item(class)?;
    let item_type = catalog.item_type(item.item_type)?;

    if item_type.normal {
        return Ok(one_hot(Quality::Normal));
    }
    if item.unique {
        return Ok(one_hot(Quality::Unique));
    }
    if item_type.always_magic && item.quest {
        return Ok(one_hot(Quality::Unique));
    }

    let class_specific = item_type.is_class_specific();
    let uber = is_uber(catalog, class)?;
    let ratio = catalog.item_ratio(class_specific, uber, RATIO_VERSION)?;

    let level_diff = i64::from(monster_level) - i64::from(item.level);
    let magic_find = i64::from(magic_find);

    let mut result = zero_vector();
    let mut remaining = BigRational::one();

    for (quality, roll) in rolls(
        ratio,
        bonus,
        magic_find,
        item_type.always_magic,
        item_type.can_be_rare,
    ) {
        match roll.chance(level_diff, magic_find)? {
            Some(v) if v > CHANCE_FLOOR => {
                let p = BigRational::new(BigInt::from(CHANCE_FLOOR), BigInt::from(v));
                result[quality.index()] = &p * &remaining;
                remaining *= BigRational::one() - p;
            }
            _ => {
                result[quality.index()] = remaining;
                return Ok(result);
            }
        }
    }

    // The cascade always ends on a Rest roll
    Ok(result)
}
