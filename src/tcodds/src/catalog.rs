//! Static catalog records
//!
//! The catalog holds the four record tables the calculator reads: item
//! classes, item types, item ratios and treasure classes. Records are indexed
//! by contiguous small integers and never change after loading.

use crate::bonus::BonusVector;
use crate::quality::Quality;
use crate::settings::Ruleset;
use crate::{Error, RecordKind, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One item class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemRecord {
    /// Base code (e.g., "hax", "rin")
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Item-type code (index into the item-type table)
    pub item_type: i32,
    /// Item level
    pub level: i32,
    /// Minimum level field; 100 or more marks items unavailable in classic
    pub level_req: i32,
    /// Always spawns as unique
    pub unique: bool,
    /// Quest item
    pub quest: bool,
    /// Exceptional variant code
    pub ultra_code: String,
    /// Elite variant code
    pub uber_code: String,
}

/// One item type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ItemTypeRecord {
    pub code: String,
    /// First equivalent type code
    pub equiv1: i32,
    /// Second equivalent type code
    pub equiv2: i32,
    /// Only spawns at normal quality
    pub normal: bool,
    pub throwable: bool,
    /// Never spawns below magic quality
    pub always_magic: bool,
    pub can_be_rare: bool,
    /// Character class restriction; values below 7 are class-specific
    pub class_tier: i32,
}

impl ItemTypeRecord {
    pub fn is_class_specific(&self) -> bool {
        self.class_tier < 7
    }
}

/// Quality tuning constants for one (class specific, uber, version) triple
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemRatioRecord {
    pub unique: i64,
    pub unique_divisor: i64,
    pub unique_min: i64,
    pub rare: i64,
    pub rare_divisor: i64,
    pub rare_min: i64,
    pub set: i64,
    pub set_divisor: i64,
    pub set_min: i64,
    pub magic: i64,
    pub magic_divisor: i64,
    pub magic_min: i64,
    pub hi_quality: i64,
    pub hi_quality_divisor: i64,
    pub normal: i64,
    pub normal_divisor: i64,
    pub version: i32,
    pub uber: bool,
    pub class_specific: bool,
}

/// What a treasure class entry produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Target {
    #[default]
    Nothing,
    Item(usize),
    TreasureClass(usize),
}

impl Target {
    /// Sub-table index, if this entry recurses
    pub fn treasure_class(&self) -> Option<usize> {
        match self {
            Target::TreasureClass(index) => Some(*index),
            _ => None,
        }
    }
}

/// One weighted entry of a treasure class
///
/// Starts are cumulative weight offsets: entry `j` covers
/// `[start_j, start_{j+1})`, the last entry ending at the table total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
    pub classic_start: i32,
    pub expansion_start: i32,
    pub target: Target,
    pub quality_bump: i16,
    pub force_unique: bool,
    pub force_set: bool,
    /// Classic only: this entry extends the interval of the previous real entry
    pub continues_previous: bool,
    /// Per-entry minimum bonus thresholds (classic only)
    pub bonus: BonusVector,
}

impl Entry {
    pub fn start(&self, ruleset: Ruleset) -> i32 {
        match ruleset {
            Ruleset::Classic => self.classic_start,
            Ruleset::Expansion => self.expansion_start,
        }
    }

    /// Quality forced by the entry flags (unique wins over set)
    pub fn forced_quality(&self) -> Option<Quality> {
        if self.force_unique {
            Some(Quality::Unique)
        } else if self.force_set {
            Some(Quality::Set)
        } else {
            None
        }
    }
}

/// One treasure class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreasureClassRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub group: u16,
    pub level: u16,
    /// Total weight under the classic ruleset; 0 disables the table
    pub classic: i32,
    /// Total weight under the expansion ruleset; 0 disables the table
    pub expansion: i32,
    /// Repeat count; negative values select depletion picks
    pub n_pick: i32,
    pub no_drop: i32,
    pub bonus: BonusVector,
    pub entries: Vec<Entry>,
}

impl TreasureClassRecord {
    pub fn total(&self, ruleset: Ruleset) -> i32 {
        match ruleset {
            Ruleset::Classic => self.classic,
            Ruleset::Expansion => self.expansion,
        }
    }

    /// Number of picks a drop from this table makes: `max(|n_pick|, 1)`
    pub fn picks(&self) -> u32 {
        self.n_pick.unsigned_abs().max(1)
    }

    pub fn is_depletion(&self) -> bool {
        self.n_pick < 0
    }
}

/// The full record set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub items: Vec<ItemRecord>,
    pub item_types: Vec<ItemTypeRecord>,
    pub item_ratios: Vec<ItemRatioRecord>,
    pub treasure_classes: Vec<TreasureClassRecord>,
}

impl Catalog {
    /// Load a catalog from a `.json`, `.yaml` or `.yml` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        let catalog = if is_yaml {
            Self::from_yaml(&content)?
        } else {
            Self::from_json(&content)?
        };

        tracing::debug!(
            items = catalog.items.len(),
            item_types = catalog.item_types.len(),
            item_ratios = catalog.item_ratios.len(),
            treasure_classes = catalog.treasure_classes.len(),
            "loaded catalog from {}",
            path.display()
        );
        Ok(catalog)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn item(&self, class: usize) -> Result<&ItemRecord> {
        self.items.get(class).ok_or(Error::OutOfRange {
            kind: RecordKind::Item,
            index: class as i64,
            len: self.items.len(),
        })
    }

    /// Table position of an item-type code
    pub fn item_type_index(&self, code: i32) -> Result<usize> {
        usize::try_from(code)
            .ok()
            .filter(|&i| i < self.item_types.len())
            .ok_or(Error::OutOfRange {
                kind: RecordKind::ItemType,
                index: i64::from(code),
                len: self.item_types.len(),
            })
    }

    pub fn item_type(&self, code: i32) -> Result<&ItemTypeRecord> {
        let index = self.item_type_index(code)?;
        Ok(&self.item_types[index])
    }

    pub fn treasure_class(&self, index: usize) -> Result<&TreasureClassRecord> {
        self.treasure_classes.get(index).ok_or(Error::OutOfRange {
            kind: RecordKind::TreasureClass,
            index: index as i64,
            len: self.treasure_classes.len(),
        })
    }

    /// Item ratio for a (class specific, uber) pair
    ///
    /// Picks the highest version not above `version`; on ties the later
    /// record wins.
    pub fn item_ratio(
        &self,
        class_specific: bool,
        uber: bool,
        version: i32,
    ) -> Result<&ItemRatioRecord> {
        if version != 0 && version != 100 {
            return Err(Error::UnsupportedVersion(version));
        }

        let mut best: Option<&ItemRatioRecord> = None;
        for ratio in &self.item_ratios {
            if ratio.class_specific == class_specific
                && ratio.uber == uber
                && ratio.version <= version
                && best.map_or(true, |b| ratio.version >= b.version)
            {
                best = Some(ratio);
            }
        }

        best.ok_or(Error::UnresolvedTuning {
            class_specific,
            uber,
            version,
        })
    }
}
