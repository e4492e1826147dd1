//! Quality bonus thresholds carried through nested treasure classes

use serde::{Deserialize, Serialize};

/// Modifier levels per quality category
///
/// Nested scopes combine by taking the elementwise maximum, so a sub-table
/// never lowers a bonus inherited from its parent. Field order is fixed,
/// which makes the derived `Hash`/`Ord` a canonical encoding for cache keys.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(default)]
pub struct BonusVector {
    pub magic: i32,
    pub rare: i32,
    pub set: i32,
    pub unique: i32,
    #[serde(rename = "TC30", alias = "tc30")]
    pub tc30: i32,
    #[serde(rename = "TC32", alias = "tc32")]
    pub tc32: i32,
}

impl BonusVector {
    /// Elementwise maximum of two bonus vectors
    ///
    /// Not the derived `Ord::max`, which compares lexicographically.
    pub fn combine(&self, other: &BonusVector) -> BonusVector {
        BonusVector {
            magic: self.magic.max(other.magic),
            rare: self.rare.max(other.rare),
            set: self.set.max(other.set),
            unique: self.unique.max(other.unique),
            tc30: self.tc30.max(other.tc30),
            tc32: self.tc32.max(other.tc32),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == BonusVector::default()
    }
}

impl std::fmt::Display for BonusVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "magic={} rare={} set={} unique={} TC30={} TC32={}",
            self.magic, self.rare, self.set, self.unique, self.tc30, self.tc32
        )
    }
}
