//! Catalog doubles for unit tests.

use super::{Catalog, CatalogError, CatalogResult, CategorySignature, StaticCatalog};
use crate::models::{CloudProvider, CloudService, ProblemCategory, RequirementSet};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Lookup {
    Template,
    Services,
    DefaultProvider,
    Signatures,
    Priority,
    Controls,
}

/// Built-in catalog whose selected lookups report `Unavailable`
pub(crate) struct FaultyCatalog {
    inner: StaticCatalog,
    failing: BTreeSet<Lookup>,
}

impl FaultyCatalog {
    pub(crate) fn failing(lookups: &[Lookup]) -> Self {
        Self {
            inner: StaticCatalog::builtin(),
            failing: lookups.iter().copied().collect(),
        }
    }

    pub(crate) fn all_down() -> Self {
        Self::failing(&[
            Lookup::Template,
            Lookup::Services,
            Lookup::DefaultProvider,
            Lookup::Signatures,
            Lookup::Priority,
            Lookup::Controls,
        ])
    }

    fn check(&self, lookup: Lookup) -> CatalogResult<()> {
        if self.failing.contains(&lookup) {
            Err(CatalogError::Unavailable(format!("{:?} lookup offline", lookup)))
        } else {
            Ok(())
        }
    }
}

impl Catalog for FaultyCatalog {
    fn requirement_template(&self, category: ProblemCategory) -> CatalogResult<RequirementSet> {
        self.check(Lookup::Template)?;
        self.inner.requirement_template(category)
    }

    fn services(
        &self,
        category: ProblemCategory,
        provider: CloudProvider,
    ) -> CatalogResult<Vec<CloudService>> {
        self.check(Lookup::Services)?;
        self.inner.services(category, provider)
    }

    fn default_provider(&self, category: ProblemCategory) -> CatalogResult<CloudProvider> {
        self.check(Lookup::DefaultProvider)?;
        self.inner.default_provider(category)
    }

    fn category_signatures(&self) -> CatalogResult<Vec<CategorySignature>> {
        self.check(Lookup::Signatures)?;
        self.inner.category_signatures()
    }

    fn category_priority_order(&self) -> CatalogResult<Vec<ProblemCategory>> {
        self.check(Lookup::Priority)?;
        self.inner.category_priority_order()
    }

    fn compliance_controls(&self) -> CatalogResult<BTreeMap<String, Vec<String>>> {
        self.check(Lookup::Controls)?;
        self.inner.compliance_controls()
    }
}
