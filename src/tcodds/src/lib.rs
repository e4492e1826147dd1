//! Exact drop probabilities for hierarchical treasure class tables
//!
//! A treasure class is a weighted list of entries. Each entry either names an
//! item class, refers to another treasure class, or yields nothing. Given a
//! treasure class, a monster level and the modifier settings, this crate
//! computes the exact probability of every item class dropping at each quality
//! tier.
//!
//! # Layers
//!
//! - [`Catalog`]: the immutable item, item-type, item-ratio and treasure class
//!   records, loaded from JSON or YAML
//! - [`has_type`]: item-type equivalence closure
//! - [`quality_probability`]: the quality tier cascade for one item class
//! - [`depletion_coefficients`]: the combinatorial correction solver
//! - [`Engine`]: memoized recursive evaluation of treasure classes
//! - [`CappedEngine`]: table-specific corrections on top of the engine
//! - [`Solver`]: per item class quality breakdowns
//!
//! All probabilities are [`BigRational`] values; nothing is rounded until the
//! caller formats a result.
//!
//! ## Example
//!
//! ```no_run
//! use tcodds::{Catalog, Settings, Solver};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::load("catalog.json")?;
//! let settings = Settings {
//!     monster_level: 88,
//!     ..Settings::default()
//! };
//!
//! let mut solver = Solver::new(&catalog, settings);
//! for odds in solver.solve_all(991)? {
//!     println!("{} {}", odds.class, odds.total);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bonus;
pub mod catalog;
pub mod coef;
pub mod drops;
pub mod hierarchy;
pub mod quality;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use num_rational::BigRational;

// Re-export main types
#[doc(inline)]
pub use bonus::BonusVector;
#[doc(inline)]
pub use catalog::{
    Catalog, Entry, ItemRatioRecord, ItemRecord, ItemTypeRecord, Target, TreasureClassRecord,
};
#[doc(inline)]
pub use coef::{depletion_coefficients, DepletionCoefficients};
#[doc(inline)]
pub use drops::{
    CacheKey, CappedEngine, Distribution, DropVariant, Engine, ItemOdds, Outcome, Solver,
};
#[doc(inline)]
pub use hierarchy::has_type;
#[doc(inline)]
pub use quality::{quality_probability, Quality, QualityVector, QUALITY_TIERS};
#[doc(inline)]
pub use settings::{Ruleset, Settings};

/// Kind of catalog record an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Item,
    ItemType,
    TreasureClass,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Item => write!(f, "item class"),
            RecordKind::ItemType => write!(f, "item type"),
            RecordKind::TreasureClass => write!(f, "treasure class"),
        }
    }
}

/// Errors from catalog loading and probability evaluation
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{kind} index {index} is out of range (catalog has {len})")]
    OutOfRange {
        kind: RecordKind,
        index: i64,
        len: usize,
    },

    #[error("no item ratio for class_specific={class_specific} uber={uber} version={version}")]
    UnresolvedTuning {
        class_specific: bool,
        uber: bool,
        version: i32,
    },

    #[error("unsupported ruleset version {0} (expected 0 or 100)")]
    UnsupportedVersion(i32),

    #[error("treasure class {index} uses {feature} modifiers, which are not modelled")]
    UnsupportedTableFeature { index: usize, feature: &'static str },

    #[error("treasure class {0} refers back to itself")]
    CyclicTreasureClass(usize),

    #[error("treasure class {index} is malformed: {reason}")]
    InvalidTable { index: usize, reason: &'static str },

    #[error("item ratio field {0} is zero")]
    ZeroDivisor(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
