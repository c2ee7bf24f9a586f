//! # Requirement Catalog
//!
//! Read-only data collaborator consumed by every pipeline stage.
//!
//! ## Lookups
//!
//! - `requirement_template(category)` - business/technical requirement template
//! - `services(category, provider)` - ordered candidate service list
//! - `default_provider(category)` - provider used when a lookup misses
//! - `category_signatures()` - weighted tokens per category (classifier input)
//! - `category_priority_order()` - tie-break order for classification
//! - `compliance_controls()` - compliance tag -> accepted security features
//!
//! A miss is `CatalogError::NotFound` and always has a fallback downstream.
//! `CatalogError::Unavailable` is an infrastructure failure.

pub mod builtin;
pub mod static_catalog;

#[cfg(test)]
pub(crate) mod testing;

use crate::models::{CloudProvider, CloudService, ProblemCategory, RequirementSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use static_catalog::{CatalogData, ServiceEntry, StaticCatalog};

/// Catalog lookup failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Expected miss: no entry for the requested key
    #[error("catalog has no entry for {0}")]
    NotFound(String),
    /// Catalog unreachable or corrupt
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// One weighted signature token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedToken {
    pub token: String,
    pub weight: f64,
}

impl WeightedToken {
    pub fn new(token: &str, weight: f64) -> Self {
        Self {
            token: token.to_lowercase(),
            weight,
        }
    }
}

/// Token signature of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySignature {
    pub category: ProblemCategory,
    pub tokens: Vec<WeightedToken>,
}

/// Catalog collaborator interface.
///
/// Calls are side-effect free and treated as fast local lookups.
pub trait Catalog: Send + Sync {
    fn requirement_template(&self, category: ProblemCategory) -> CatalogResult<RequirementSet>;

    fn services(
        &self,
        category: ProblemCategory,
        provider: CloudProvider,
    ) -> CatalogResult<Vec<CloudService>>;

    fn default_provider(&self, category: ProblemCategory) -> CatalogResult<CloudProvider>;

    fn category_signatures(&self) -> CatalogResult<Vec<CategorySignature>>;

    fn category_priority_order(&self) -> CatalogResult<Vec<ProblemCategory>>;

    fn compliance_controls(&self) -> CatalogResult<BTreeMap<String, Vec<String>>>;
}
