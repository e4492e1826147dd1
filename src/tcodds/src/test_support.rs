//! Synthetic catalogs for unit tests

use crate::catalog::{
    Catalog, Entry, ItemRatioRecord, ItemRecord, ItemTypeRecord, Target, TreasureClassRecord,
};
use num_bigint::BigInt;
use num_rational::BigRational;

/// Placeholder types so the armor/weapon codes used by quality rolls exist
const FILLER_TYPES: i32 = 51;

pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        let item_types = (0..FILLER_TYPES)
            .map(|i| ItemTypeRecord {
                code: format!("t{i:02}"),
                class_tier: 7,
                ..Default::default()
            })
            .collect();
        Self {
            catalog: Catalog {
                item_types,
                ..Default::default()
            },
        }
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn item_type(&mut self, f: impl FnOnce(&mut ItemTypeRecord)) -> i32 {
        let code = self.catalog.item_types.len() as i32;
        let mut record = ItemTypeRecord {
            code: format!("t{code:02}"),
            class_tier: 7,
            ..Default::default()
        };
        f(&mut record);
        self.catalog.item_types.push(record);
        code
    }

    pub fn item(&mut self, item_type: i32, level: i32, f: impl FnOnce(&mut ItemRecord)) -> usize {
        let class = self.catalog.items.len();
        let mut record = ItemRecord {
            code: format!("i{class:02}"),
            item_type,
            level,
            ..Default::default()
        };
        f(&mut record);
        self.catalog.items.push(record);
        class
    }

    pub fn ratio(&mut self, record: ItemRatioRecord) {
        self.catalog.item_ratios.push(record);
    }

    pub fn table(&mut self, f: impl FnOnce(&mut TreasureClassRecord)) -> usize {
        let index = self.catalog.treasure_classes.len();
        let mut record = TreasureClassRecord {
            name: Some(format!("tc{index}")),
            ..Default::default()
        };
        f(&mut record);
        self.catalog.treasure_classes.push(record);
        index
    }

    /// Pad the treasure class table with disabled tables up to `len`
    pub fn pad_tables(&mut self, len: usize) {
        while self.catalog.treasure_classes.len() < len {
            self.table(|_| {});
        }
    }

    pub fn build(self) -> Catalog {
        self.catalog
    }
}

/// Entry starting at `start` under both rulesets
pub fn entry(start: i32, target: Target) -> Entry {
    Entry {
        classic_start: start,
        expansion_start: start,
        target,
        ..Default::default()
    }
}

/// Builder with one non-class-specific, non-uber item ratio
///
/// At a level difference of 10 the chance values are: unique 256 (floor 200),
/// set 512, rare 1024, magic 256, superior 384, normal 256.
pub fn quality_builder() -> CatalogBuilder {
    let mut b = CatalogBuilder::new();
    b.ratio(ItemRatioRecord {
        unique: 3,
        unique_divisor: 10,
        unique_min: 200,
        set: 5,
        set_divisor: 10,
        rare: 9,
        rare_divisor: 10,
        magic: 3,
        magic_divisor: 10,
        hi_quality: 4,
        hi_quality_divisor: 10,
        normal: 3,
        normal_divisor: 10,
        version: 100,
        ..Default::default()
    });
    b
}

/// Catalog whose item class 0 is a level 0, rare-capable item
pub fn quality_catalog() -> Catalog {
    let mut b = quality_builder();
    let t = b.item_type(|t| t.can_be_rare = true);
    b.item(t, 0, |_| {});
    b.build()
}

pub fn ratio(n: i64, d: i64) -> BigRational {
    BigRational::new(BigInt::from(n), BigInt::from(d))
}
