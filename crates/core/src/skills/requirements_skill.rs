//! # Requirements Skill
//!
//! Turns a classified category into a structured [`RequirementSet`] by
//! looking up the catalog's template. An unknown category, or a category
//! with no template, gets the generic set at low confidence. The generic set
//! still carries the classified category.

use crate::catalog::{Catalog, CatalogError};
use crate::error::SkillError;
use crate::models::{AgentResult, ProblemCategory, RequirementSet};
use crate::skills::Agent;
use std::sync::Arc;

pub const NAME: &str = "requirements";

/// Confidence of a catalog template
pub const TEMPLATE_CONFIDENCE: f64 = 0.9;
/// Confidence of the generic fallback set
pub const GENERIC_CONFIDENCE: f64 = 0.3;

pub struct RequirementsSkill {
    catalog: Arc<dyn Catalog>,
}

impl Agent for RequirementsSkill {
    fn name(&self) -> &str {
        NAME
    }

    fn expertise(&self) -> &[&'static str] {
        &["business requirements", "technical requirements"]
    }
}

impl RequirementsSkill {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    pub fn extract(
        &self,
        category: ProblemCategory,
    ) -> Result<AgentResult<RequirementSet>, SkillError> {
        if !category.is_known() {
            return Ok(AgentResult::fallback(
                RequirementSet::generic(),
                GENERIC_CONFIDENCE,
            ));
        }

        match self.catalog.requirement_template(category) {
            Ok(mut template) => {
                // A template must describe the category it was filed under
                template.category = category;
                let corrupt = |reason: String| {
                    SkillError::CatalogUnavailable(format!(
                        "corrupt requirement template for '{}': {}",
                        category, reason
                    ))
                };
                template
                    .validate_dependencies()
                    .map_err(|e| corrupt(e.to_string()))?;
                template
                    .validate_priorities()
                    .map_err(|e| corrupt(e.to_string()))?;
                Ok(AgentResult::success(template, TEMPLATE_CONFIDENCE))
            }
            Err(CatalogError::NotFound(what)) => {
                tracing::warn!(%category, %what, "no requirement template, using generic set");
                let mut generic = RequirementSet::generic();
                generic.category = category;
                Ok(AgentResult::fallback(generic, GENERIC_CONFIDENCE))
            }
            Err(err) => Err(SkillError::from_catalog(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{FaultyCatalog, Lookup};
    use crate::catalog::StaticCatalog;
    use crate::models::{tags, RequirementKind, TechnicalRequirement};

    fn builtin() -> RequirementsSkill {
        RequirementsSkill::new(Arc::new(StaticCatalog::builtin()))
    }

    #[test]
    fn test_ecommerce_template() {
        let result = builtin().extract(ProblemCategory::Ecommerce).unwrap();
        assert!(!result.is_fallback());
        assert_eq!(result.confidence, TEMPLATE_CONFIDENCE);

        let set = result.payload.unwrap();
        assert_eq!(set.category, ProblemCategory::Ecommerce);
        assert!(set.business_requirements.iter().any(|r| r.priority == 5
            && r.category == RequirementKind::Scalability));
        assert!(set.business_requirements.iter().any(|r| r.priority == 5
            && r.category == RequirementKind::Security
            && r.constraints.contains(tags::PCI_DSS_COMPLIANCE)));
        assert!(set.has_constraint(tags::BUDGET_CONSCIOUS));
    }

    #[test]
    fn test_every_supported_category_has_a_valid_template() {
        let skill = builtin();
        for category in ProblemCategory::supported() {
            let result = skill.extract(category).unwrap();
            assert!(!result.is_fallback(), "{category} fell back");
            let set = result.payload.unwrap();
            assert_eq!(set.category, category);
            assert!(set.validate_dependencies().is_ok());
        }
    }

    #[test]
    fn test_unknown_gets_generic_set() {
        let result = builtin().extract(ProblemCategory::Unknown).unwrap();
        assert!(result.is_fallback());
        assert_eq!(result.confidence, GENERIC_CONFIDENCE);
        let set = result.payload.unwrap();
        assert_eq!(set, RequirementSet::generic());
        assert_eq!(set.business_requirements.len(), 2);
        assert!(set.technical_requirements.is_empty());
    }

    #[test]
    fn test_missing_template_falls_back() {
        let mut data = StaticCatalog::builtin().data().clone();
        data.templates
            .retain(|t| t.category != ProblemCategory::Chatbot);
        let skill = RequirementsSkill::new(Arc::new(StaticCatalog::new(data)));
        let result = skill.extract(ProblemCategory::Chatbot).unwrap();
        assert!(result.is_fallback());
        let set = result.payload.unwrap();
        assert_eq!(set.category, ProblemCategory::Chatbot);
        assert!(set.technical_requirements.is_empty());
    }

    #[test]
    fn test_corrupt_template_is_unavailable() {
        let mut data = StaticCatalog::builtin().data().clone();
        for template in &mut data.templates {
            if template.category == ProblemCategory::Ecommerce {
                template
                    .technical_requirements
                    .insert(0, TechnicalRequirement::new("cdn", &[], &["file_storage"]));
            }
        }
        let skill = RequirementsSkill::new(Arc::new(StaticCatalog::new(data)));
        assert!(matches!(
            skill.extract(ProblemCategory::Ecommerce),
            Err(SkillError::CatalogUnavailable(_))
        ));
    }

    #[test]
    fn test_out_of_range_priority_is_unavailable() {
        let mut data = StaticCatalog::builtin().data().clone();
        for template in &mut data.templates {
            if template.category == ProblemCategory::Ecommerce {
                template.business_requirements[0].priority = 9;
            }
        }
        let skill = RequirementsSkill::new(Arc::new(StaticCatalog::new(data)));
        match skill.extract(ProblemCategory::Ecommerce) {
            Err(SkillError::CatalogUnavailable(reason)) => {
                assert!(reason.contains("priority 9"), "{reason}")
            }
            other => panic!("expected CatalogUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_unavailable_catalog_surfaces() {
        let skill = RequirementsSkill::new(Arc::new(FaultyCatalog::failing(&[Lookup::Template])));
        assert!(matches!(
            skill.extract(ProblemCategory::Ecommerce),
            Err(SkillError::CatalogUnavailable(_))
        ));
        // Unknown never touches the catalog
        assert!(skill.extract(ProblemCategory::Unknown).is_ok());
    }
}
