//! # ArchPlan Skills
//!
//! The agents of the planning pipeline.
//!
//! ## Architecture
//!
//! ```text
//! Orchestrator
//!   ├── Mandatory stages (sequential)
//!   │     Classifier → Requirements → Architect
//!   └── Specialists (parallel, read-only)
//!         Cost | Security | Integration
//! ```
//!
//! ## Skill Categories
//!
//! **Mandatory Skills** (each consumes the previous stage's output):
//! - `ClassifierSkill` - Map a description to a problem category
//! - `RequirementsSkill` - Look up the category's requirement template
//! - `ArchitectSkill` - Select services and write the architecture narratives
//!
//! **Specialist Skills** (behind the [`Specialist`] trait):
//! - `CostSkill` - Pricing totals and budget optimizations
//! - `SecuritySkill` - Compliance coverage of the selected services
//! - `IntegrationSkill` - Compatibility notes for external-system edges

pub mod pricing;

// Mandatory Skills
pub mod architect_skill;
pub mod classifier_skill;
pub mod requirements_skill;

// Specialist Skills
pub mod cost_skill;
pub mod integration_skill;
pub mod security_skill;

use crate::catalog::Catalog;
use crate::models::{AgentResult, ArchitectureRecommendation, RequirementSet, SpecialistAnnotation};
use async_trait::async_trait;
use std::sync::Arc;

// Re-exports for convenience
pub use architect_skill::ArchitectSkill;
pub use classifier_skill::ClassifierSkill;
pub use cost_skill::CostSkill;
pub use integration_skill::IntegrationSkill;
pub use requirements_skill::RequirementsSkill;
pub use security_skill::SecuritySkill;

/// Identity of a pipeline agent
pub trait Agent {
    fn name(&self) -> &str;

    /// Areas this agent is responsible for
    fn expertise(&self) -> &[&'static str] {
        &[]
    }
}

/// An independent reviewer of a synthesized architecture.
///
/// Implementations only read their inputs. A reviewer that cannot finish
/// returns a failed annotation instead of an error.
#[async_trait]
pub trait Specialist: Agent + Send + Sync {
    async fn review(
        &self,
        architecture: &ArchitectureRecommendation,
        context: &RequirementSet,
    ) -> AgentResult<SpecialistAnnotation>;
}

/// Names accepted by [`specialists_from_names`]
pub const SPECIALIST_NAMES: [&str; 3] = [
    cost_skill::NAME,
    security_skill::NAME,
    integration_skill::NAME,
];

/// Build specialists by name, in the given order
pub fn specialists_from_names(
    names: &[String],
    catalog: Arc<dyn Catalog>,
) -> anyhow::Result<Vec<Arc<dyn Specialist>>> {
    names
        .iter()
        .map(|name| -> anyhow::Result<Arc<dyn Specialist>> {
            match name.trim().to_lowercase().as_str() {
                cost_skill::NAME => Ok(Arc::new(CostSkill::new())),
                security_skill::NAME => Ok(Arc::new(SecuritySkill::new(catalog.clone()))),
                integration_skill::NAME => Ok(Arc::new(IntegrationSkill::new())),
                other => anyhow::bail!(
                    "unknown specialist '{}' (expected one of: {})",
                    other,
                    SPECIALIST_NAMES.join(", ")
                ),
            }
        })
        .collect()
}

/// Cost, security, and integration reviewers
pub fn default_specialists(catalog: Arc<dyn Catalog>) -> Vec<Arc<dyn Specialist>> {
    vec![
        Arc::new(CostSkill::new()),
        Arc::new(SecuritySkill::new(catalog)),
        Arc::new(IntegrationSkill::new()),
    ]
}
