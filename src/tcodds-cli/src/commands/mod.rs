//! Command handlers for tcodds CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod inspect;
pub mod solve;

use anyhow::{Context, Result};
use num_traits::ToPrimitive;
use serde::Serialize;
use std::path::Path;
use tcodds::{BigRational, Catalog};

use crate::config::Config;

/// A probability as printed: exact fraction or float
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Probability {
    Fraction(String),
    Float(f64),
}

impl Probability {
    pub fn new(p: &BigRational, fractions: bool) -> Self {
        if fractions {
            Probability::Fraction(p.to_string())
        } else {
            Probability::Float(p.to_f64().unwrap_or(f64::NAN))
        }
    }
}

impl std::fmt::Display for Probability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Probability::Fraction(s) => write!(f, "{}", s),
            Probability::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Load the catalog named on the command line or in the config
fn load_catalog(arg: Option<&Path>, config: &Config) -> Result<Catalog> {
    let path = config.catalog_path(arg)?;
    tracing::debug!(path = %path.display(), "loading catalog");
    Catalog::load(&path).with_context(|| format!("Failed to load catalog {}", path.display()))
}
