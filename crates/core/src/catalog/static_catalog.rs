//! # Static Catalog
//!
//! In-memory [`Catalog`] backed by plain data. Ships with the built-in
//! tables from [`super::builtin`] and can be loaded from a JSON file so the
//! service lists can be changed without touching code.

use super::{Catalog, CatalogError, CatalogResult, CategorySignature};
use crate::models::{CloudProvider, CloudService, ProblemCategory, RequirementSet};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Service list for one (category, provider) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub category: ProblemCategory,
    pub provider: CloudProvider,
    pub services: Vec<CloudService>,
}

/// Serializable catalog content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    pub priority_order: Vec<ProblemCategory>,
    pub signatures: Vec<CategorySignature>,
    pub templates: Vec<RequirementSet>,
    pub services: Vec<ServiceEntry>,
    #[serde(default)]
    pub default_providers: BTreeMap<ProblemCategory, CloudProvider>,
    #[serde(default)]
    pub compliance_controls: BTreeMap<String, Vec<String>>,
}

/// Catalog served from [`CatalogData`]
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    data: CatalogData,
}

impl StaticCatalog {
    pub fn new(data: CatalogData) -> Self {
        Self { data }
    }

    /// Catalog with the tables bundled into the crate
    pub fn builtin() -> Self {
        Self::new(super::builtin::catalog_data())
    }

    /// Parse catalog JSON, rejecting templates with out-of-range priorities
    pub fn from_json(json: &str) -> Result<Self> {
        let data: CatalogData =
            serde_json::from_str(json).context("Failed to parse catalog JSON")?;
        for template in &data.templates {
            template
                .validate_priorities()
                .with_context(|| format!("Invalid requirement template for '{}'", template.category))?;
        }
        Ok(Self::new(data))
    }

    /// Load a catalog file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
        Self::from_json(&content).with_context(|| format!("Invalid catalog file: {:?}", path))
    }

    /// Serialize the catalog content as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    pub fn data(&self) -> &CatalogData {
        &self.data
    }
}

impl Catalog for StaticCatalog {
    fn requirement_template(&self, category: ProblemCategory) -> CatalogResult<RequirementSet> {
        self.data
            .templates
            .iter()
            .find(|t| t.category == category)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("requirement template '{}'", category)))
    }

    fn services(
        &self,
        category: ProblemCategory,
        provider: CloudProvider,
    ) -> CatalogResult<Vec<CloudService>> {
        self.data
            .services
            .iter()
            .find(|e| e.category == category && e.provider == provider)
            .map(|e| e.services.clone())
            .ok_or_else(|| {
                CatalogError::NotFound(format!("services for '{}' on '{}'", category, provider))
            })
    }

    fn default_provider(&self, category: ProblemCategory) -> CatalogResult<CloudProvider> {
        Ok(self
            .data
            .default_providers
            .get(&category)
            .copied()
            .unwrap_or_default())
    }

    fn category_signatures(&self) -> CatalogResult<Vec<CategorySignature>> {
        Ok(self.data.signatures.clone())
    }

    fn category_priority_order(&self) -> CatalogResult<Vec<ProblemCategory>> {
        Ok(self.data.priority_order.clone())
    }

    fn compliance_controls(&self) -> CatalogResult<BTreeMap<String, Vec<String>>> {
        if self.data.compliance_controls.is_empty() {
            return Err(CatalogError::NotFound("compliance controls".to_string()));
        }
        Ok(self.data.compliance_controls.clone())
    }
}
