//! # Integration Skill
//!
//! Specialist that reviews the edges between external-system components and
//! the rest of the design. Every technical requirement tagged `integration`
//! contributes one compatibility note per dependency edge.

use crate::models::{
    tags, AgentResult, ArchitectureRecommendation, CloudService, RequirementSet, ServiceType,
    SpecialistAnnotation,
};
use crate::skills::{Agent, Specialist};
use async_trait::async_trait;

pub const NAME: &str = "integration";

const OK_CONFIDENCE: f64 = 0.75;
const DEGRADED_CONFIDENCE: f64 = 0.45;

/// Need key carrying how often an integration syncs
const SYNC_FREQUENCY: &str = "sync_frequency";

/// Networking service that manages APIs (gateway, API management)
fn is_api_service(service: &CloudService) -> bool {
    matches!(service.service_type, ServiceType::Networking)
        && [&service.name, &service.description].iter().any(|text| {
            text.split(|c: char| !c.is_ascii_alphanumeric())
                .any(|word| word.eq_ignore_ascii_case("api"))
        })
}

/// API gateway of the architecture, else its first messaging service.
///
/// CDNs and load balancers never mediate an integration.
fn mediator(architecture: &ArchitectureRecommendation) -> Option<&CloudService> {
    let services = &architecture.services;
    services
        .iter()
        .find(|s| is_api_service(s))
        .or_else(|| {
            services
                .iter()
                .find(|s| matches!(s.service_type, ServiceType::Messaging))
        })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IntegrationSkill;

impl IntegrationSkill {
    pub fn new() -> Self {
        Self
    }

    fn annotate(
        &self,
        architecture: &ArchitectureRecommendation,
        context: &RequirementSet,
    ) -> SpecialistAnnotation {
        if let Err(e) = context.validate_dependencies() {
            tracing::warn!(error = %e, "integration review skipped");
            return SpecialistAnnotation::failed(NAME);
        }

        let via = mediator(architecture);
        let mut findings = Vec::new();
        for tech in context
            .technical_requirements
            .iter()
            .filter(|t| t.has_tag(tags::INTEGRATION))
        {
            for dep in &tech.dependencies {
                let mut note = match via {
                    Some(service) => format!("{} -> {}: route through {}", tech.component, dep, service.name),
                    None => format!(
                        "{} -> {}: no API or messaging service selected to mediate",
                        tech.component, dep
                    ),
                };
                if let Some(freq) = tech.performance_needs.get(SYNC_FREQUENCY) {
                    note.push_str(&format!(" (sync frequency: {})", freq));
                }
                findings.push(note);
            }
        }

        if findings.is_empty() {
            return SpecialistAnnotation::ok(
                NAME,
                vec!["No external integrations to review".to_string()],
                OK_CONFIDENCE,
            );
        }

        if via.is_some() {
            SpecialistAnnotation::ok(NAME, findings, OK_CONFIDENCE)
        } else {
            SpecialistAnnotation::degraded(NAME, findings, DEGRADED_CONFIDENCE)
        }
    }
}

impl Agent for IntegrationSkill {
    fn name(&self) -> &str {
        NAME
    }

    fn expertise(&self) -> &[&'static str] {
        &["external systems", "api compatibility"]
    }
}

#[async_trait]
impl Specialist for IntegrationSkill {
    async fn review(
        &self,
        architecture: &ArchitectureRecommendation,
        context: &RequirementSet,
    ) -> AgentResult<SpecialistAnnotation> {
        self.annotate(architecture, context).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, StaticCatalog};
    use crate::models::{AnnotationStatus, CloudProvider, ProblemCategory, TechnicalRequirement};
    use crate::skills::{ArchitectSkill, RequirementsSkill};
    use std::sync::Arc;

    fn plan(category: ProblemCategory) -> (ArchitectureRecommendation, RequirementSet) {
        let catalog: Arc<dyn Catalog> = Arc::new(StaticCatalog::builtin());
        let set = RequirementsSkill::new(catalog.clone())
            .extract(category)
            .unwrap()
            .payload
            .unwrap();
        let arch = ArchitectSkill::new(catalog)
            .synthesize(&set, CloudProvider::Aws)
            .unwrap()
            .payload
            .unwrap();
        (arch, set)
    }

    #[tokio::test]
    async fn test_chatbot_crm_edge() {
        let (arch, set) = plan(ProblemCategory::Chatbot);
        let annotation = IntegrationSkill::new()
            .review(&arch, &set)
            .await
            .payload
            .unwrap();
        assert_eq!(annotation.status, AnnotationStatus::Ok);
        assert_eq!(
            annotation.findings,
            vec!["crm_integration -> ai_service: route through Amazon API Gateway (sync frequency: real_time)"]
        );
    }

    #[tokio::test]
    async fn test_expense_payroll_edge_uses_messaging() {
        let (arch, set) = plan(ProblemCategory::ExpenseTracker);
        let annotation = IntegrationSkill::new()
            .review(&arch, &set)
            .await
            .payload
            .unwrap();
        assert_eq!(annotation.findings.len(), 1);
        assert!(annotation.findings[0].contains("route through Amazon SNS"));
        assert!(annotation.findings[0].contains("daily"));
    }

    #[tokio::test]
    async fn test_no_integrations() {
        let (arch, set) = plan(ProblemCategory::Ecommerce);
        let annotation = IntegrationSkill::new()
            .review(&arch, &set)
            .await
            .payload
            .unwrap();
        assert_eq!(annotation.findings, vec!["No external integrations to review"]);
    }

    #[tokio::test]
    async fn test_cdn_and_load_balancer_do_not_mediate() {
        let (arch, mut set) = plan(ProblemCategory::Ecommerce);
        set.technical_requirements.push(TechnicalRequirement::new(
            "erp_sync",
            &[tags::INTEGRATION],
            &["web_application"],
        ));
        let result = IntegrationSkill::new().review(&arch, &set).await;
        assert!(result.is_fallback());
        let finding = &result.payload.unwrap().findings[0];
        assert!(finding.contains("no API or messaging service"), "{finding}");
        assert!(!finding.contains("CloudFront"));
        assert!(!finding.contains("Load Balancer"));
    }

    #[tokio::test]
    async fn test_api_gateway_preferred_over_messaging() {
        let (mut arch, set) = plan(ProblemCategory::Chatbot);
        arch.services.reverse();
        let annotation = IntegrationSkill::new()
            .review(&arch, &set)
            .await
            .payload
            .unwrap();
        assert!(annotation.findings[0].contains("route through Amazon API Gateway"));
    }

    #[tokio::test]
    async fn test_missing_mediator_degrades() {
        let (mut arch, set) = plan(ProblemCategory::Chatbot);
        arch.services.retain(|s| {
            !matches!(s.service_type, ServiceType::Networking | ServiceType::Messaging)
        });
        let result = IntegrationSkill::new().review(&arch, &set).await;
        assert!(result.is_fallback());
        assert!(result.payload.unwrap().findings[0].contains("no API or messaging service"));
    }

    #[tokio::test]
    async fn test_invalid_dependency_graph_fails() {
        let (arch, mut set) = plan(ProblemCategory::Chatbot);
        set.technical_requirements
            .push(TechnicalRequirement::new("ghost", &[tags::INTEGRATION], &["nowhere"]));
        let result = IntegrationSkill::new().review(&arch, &set).await;
        assert!(result.is_failed());
        assert_eq!(result.confidence, 0.0);
    }
}
