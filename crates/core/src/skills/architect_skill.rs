//! # Architect Skill
//!
//! Builds the candidate [`ArchitectureRecommendation`] for a requirement set.
//!
//! ## Service Selection
//!
//! 1. Catalog list for `(category, provider)`.
//! 2. On a miss, the list of the category's default provider. The deployment
//!    narrative records the substitution and confidence drops to
//!    [`SUBSTITUTED_CONFIDENCE`].
//! 3. If that misses as well, no services and [`EMPTY_CONFIDENCE`].
//!
//! The category always comes from the requirement set. An `Unknown` set
//! gets the catalog's generic baseline list, capped at
//! [`UNKNOWN_CONFIDENCE_CAP`].
//!
//! ## Narratives
//!
//! Deployment, scalability, and monitoring read the set-level constraints.
//! Security considerations read every constraint tag in the set, business
//! requirements included.

use crate::catalog::{Catalog, CatalogError};
use crate::error::SkillError;
use crate::models::{
    tags, AgentResult, ArchitectureRecommendation, CloudProvider, CloudService, DeploymentPlan,
    DeploymentStrategy, ProblemCategory, RequirementSet,
};
use crate::skills::pricing::PricingSummary;
use crate::skills::Agent;
use std::collections::BTreeSet;
use std::sync::Arc;

pub const NAME: &str = "architect";

pub const SYNTHESIS_CONFIDENCE: f64 = 0.85;
pub const SUBSTITUTED_CONFIDENCE: f64 = 0.5;
pub const EMPTY_CONFIDENCE: f64 = 0.2;
pub const UNKNOWN_CONFIDENCE_CAP: f64 = 0.3;

const BASELINE_SECURITY: [&str; 3] = [
    "Encryption in transit and at rest",
    "Identity and access management (IAM)",
    "Network security groups and firewalls",
];

// ============================================================================
// Narrative Rules
// ============================================================================

/// Strategy precedence: high availability, then budget, then canary.
pub fn deployment_strategy(constraints: &BTreeSet<String>) -> DeploymentStrategy {
    if constraints.contains(tags::HIGH_AVAILABILITY) {
        DeploymentStrategy::BlueGreen
    } else if constraints.contains(tags::BUDGET_CONSCIOUS) {
        DeploymentStrategy::Rolling
    } else {
        DeploymentStrategy::Canary
    }
}

fn conditional_security(tag: &str) -> Option<&'static str> {
    match tag {
        tags::PCI_DSS_COMPLIANCE => Some("PCI DSS compliance for payment processing"),
        tags::DATA_PRIVACY => Some("GDPR compliance for personal data privacy"),
        tags::SECURE_DATA_TRANSFER => Some("Encrypted channels for external system integrations"),
        _ => None,
    }
}

/// Baseline items followed by one item per recognized compliance tag
pub fn security_considerations(requirements: &RequirementSet) -> Vec<String> {
    let mut items: Vec<String> = BASELINE_SECURITY.iter().map(|s| s.to_string()).collect();
    for tag in requirements.all_constraint_tags() {
        if let Some(item) = conditional_security(&tag) {
            if !items.iter().any(|i| i == item) {
                items.push(item.to_string());
            }
        }
    }
    items
}

fn cost_narrative(services: &[CloudService]) -> String {
    if services.is_empty() {
        return "No cost estimate available: no services selected".to_string();
    }
    let summary = PricingSummary::of(services);
    let priced = services.len() - summary.unparseable.len();
    let mut text = format!(
        "Estimated {} across {} priced services",
        summary.total, priced
    );
    if !summary.is_fully_priced() {
        text.push_str(&format!(
            " ({} with unparseable pricing not included: {})",
            summary.unparseable.len(),
            summary.unparseable.join(", ")
        ));
    }
    text
}

fn scalability_narrative(services: &[CloudService], requirements: &RequirementSet) -> String {
    let mut parts = vec!["Auto-scaling based on demand with load balancing".to_string()];

    let mut seen = BTreeSet::new();
    let descriptors: Vec<&str> = services
        .iter()
        .map(|s| s.scalability.as_str())
        .filter(|d| !d.is_empty() && seen.insert(*d))
        .collect();
    if !descriptors.is_empty() {
        parts.push(format!("Service scaling: {}", descriptors.join(", ")));
    }
    if requirements.has_constraint(tags::BUDGET_CONSCIOUS) {
        parts.push("Scale in to minimum capacity during off-peak hours".to_string());
    }
    format!("{}.", parts.join(". "))
}

fn monitoring_narrative(provider: CloudProvider, requirements: &RequirementSet) -> String {
    let mut text = format!(
        "{} dashboards and alarms for application and infrastructure metrics",
        provider.monitoring_service()
    );
    if requirements.has_constraint(tags::HIGH_AVAILABILITY) {
        text.push_str(", with uptime alerting on health-check failures");
    }
    text
}

// ============================================================================
// Skill
// ============================================================================

/// Outcome of the provider lookup chain
struct Selection {
    provider: CloudProvider,
    services: Vec<CloudService>,
    note: Option<String>,
    confidence: f64,
}

pub struct ArchitectSkill {
    catalog: Arc<dyn Catalog>,
}

impl Agent for ArchitectSkill {
    fn name(&self) -> &str {
        NAME
    }

    fn expertise(&self) -> &[&'static str] {
        &["service selection", "deployment", "scalability", "monitoring"]
    }
}

impl ArchitectSkill {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    fn select_services(
        &self,
        category: ProblemCategory,
        requested: CloudProvider,
    ) -> Result<Selection, SkillError> {
        match self.catalog.services(category, requested) {
            Ok(services) => {
                return Ok(Selection {
                    provider: requested,
                    services,
                    note: None,
                    confidence: SYNTHESIS_CONFIDENCE,
                })
            }
            Err(CatalogError::NotFound(_)) => {}
            Err(err) => return Err(SkillError::from_catalog(err)),
        }

        let default = match self.catalog.default_provider(category) {
            Ok(p) => Some(p),
            Err(CatalogError::NotFound(_)) => None,
            Err(err) => return Err(SkillError::from_catalog(err)),
        };

        let substitute = match default.filter(|p| *p != requested) {
            Some(p) => match self.catalog.services(category, p) {
                Ok(services) => Some((p, services)),
                Err(CatalogError::NotFound(_)) => None,
                Err(err) => return Err(SkillError::from_catalog(err)),
            },
            None => None,
        };

        Ok(match substitute {
            Some((provider, services)) => {
                tracing::warn!(%category, requested = %requested, substitute = %provider, "provider substituted");
                Selection {
                    provider,
                    services,
                    note: Some(format!(
                        "[substituted: {} services used, no {} catalog entry for {}]",
                        provider.display_name(),
                        requested.display_name(),
                        category
                    )),
                    confidence: SUBSTITUTED_CONFIDENCE,
                }
            }
            None => {
                tracing::warn!(%category, requested = %requested, "no services for category on any provider");
                Selection {
                    provider: requested,
                    services: Vec::new(),
                    note: Some(format!(
                        "[no catalog services for {} on {} or the default provider]",
                        category,
                        requested.display_name()
                    )),
                    confidence: EMPTY_CONFIDENCE,
                }
            }
        })
    }

    /// Build the candidate architecture.
    ///
    /// Misses are recovered with fallback status; only an unavailable
    /// catalog is an error.
    pub fn synthesize(
        &self,
        requirements: &RequirementSet,
        provider: CloudProvider,
    ) -> Result<AgentResult<ArchitectureRecommendation>, SkillError> {
        let category = requirements.category;
        let selection = self.select_services(category, provider)?;

        let mut fallback = selection.note.is_some();
        let mut confidence = selection.confidence;
        if !category.is_known() {
            fallback = true;
            confidence = confidence.min(UNKNOWN_CONFIDENCE_CAP);
        }

        let strategy = deployment_strategy(&requirements.constraints);
        let description = match &selection.note {
            Some(note) => format!("{} {}", strategy.describe(), note),
            None => strategy.describe().to_string(),
        };

        let architecture = ArchitectureRecommendation {
            category,
            provider: selection.provider,
            cost_estimate: cost_narrative(&selection.services),
            security_considerations: security_considerations(requirements),
            scalability_plan: scalability_narrative(&selection.services, requirements),
            monitoring_strategy: monitoring_narrative(selection.provider, requirements),
            deployment: DeploymentPlan {
                strategy,
                description,
            },
            services: selection.services,
            confidence_score: confidence,
        };

        Ok(if fallback {
            AgentResult::fallback(architecture, confidence)
        } else {
            AgentResult::success(architecture, confidence)
        })
    }
}
