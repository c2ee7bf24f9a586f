//! # Cost Skill
//!
//! Specialist that totals the monthly pricing of the selected services and,
//! for budget-conscious requirement sets, suggests per-service savings.

use crate::models::{
    tags, AgentResult, ArchitectureRecommendation, RequirementSet, ServiceType,
    SpecialistAnnotation,
};
use crate::skills::pricing::PricingSummary;
use crate::skills::{Agent, Specialist};
use async_trait::async_trait;

pub const NAME: &str = "cost";

const OK_CONFIDENCE: f64 = 0.8;
const DEGRADED_CONFIDENCE: f64 = 0.5;

fn savings_hint(service_type: ServiceType) -> &'static str {
    match service_type {
        ServiceType::Compute => "use spot or preemptible capacity for interruptible workloads",
        ServiceType::Database => "buy reserved capacity for the steady baseline",
        ServiceType::Storage => "add lifecycle rules to tier cold objects",
        ServiceType::Networking => "cache at the CDN edge and review egress traffic",
        ServiceType::Security => "right-size rule sets to the traffic actually served",
        ServiceType::Ai | ServiceType::Messaging => "set usage quotas and budget alerts",
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CostSkill;

impl CostSkill {
    pub fn new() -> Self {
        Self
    }

    fn annotate(
        &self,
        architecture: &ArchitectureRecommendation,
        context: &RequirementSet,
    ) -> SpecialistAnnotation {
        if architecture.services.is_empty() {
            return SpecialistAnnotation::failed(NAME);
        }

        let summary = PricingSummary::of(&architecture.services);
        let mut findings = vec![format!(
            "Estimated monthly total {} for {} services",
            summary.total,
            architecture.services.len()
        )];

        if context.has_constraint(tags::BUDGET_CONSCIOUS) {
            findings.extend(
                architecture
                    .services
                    .iter()
                    .map(|s| format!("{}: {}", s.name, savings_hint(s.service_type))),
            );
        }

        if summary.is_fully_priced() {
            SpecialistAnnotation::ok(NAME, findings, OK_CONFIDENCE)
        } else {
            findings.extend(
                summary
                    .unparseable
                    .iter()
                    .map(|name| format!("Pricing for {} could not be parsed", name)),
            );
            SpecialistAnnotation::degraded(NAME, findings, DEGRADED_CONFIDENCE)
        }
    }
}

impl Agent for CostSkill {
    fn name(&self) -> &str {
        NAME
    }

    fn expertise(&self) -> &[&'static str] {
        &["pricing", "cost optimization"]
    }
}

#[async_trait]
impl Specialist for CostSkill {
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
    use crate::models::{AgentStatus, AnnotationStatus, CloudProvider, ProblemCategory};
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
    async fn test_budget_conscious_gets_suggestions() {
        let (arch, set) = plan(ProblemCategory::Ecommerce);
        let result = CostSkill::new().review(&arch, &set).await;
        assert_eq!(result.status, AgentStatus::Success);
        assert_eq!(result.confidence, OK_CONFIDENCE);

        let annotation = result.payload.unwrap();
        assert_eq!(annotation.findings[0], "Estimated monthly total $410-1180/month for 6 services");
        assert_eq!(annotation.findings.len(), 1 + arch.services.len());
        assert!(annotation
            .findings
            .iter()
            .any(|f| f.starts_with("Amazon EC2: use spot")));
    }

    #[tokio::test]
    async fn test_no_budget_constraint_only_totals() {
        let (arch, set) = plan(ProblemCategory::Chatbot);
        let annotation = CostSkill::new()
            .review(&arch, &set)
            .await
            .payload
            .unwrap();
        assert_eq!(annotation.findings.len(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_pricing_degrades() {
        let (mut arch, set) = plan(ProblemCategory::Chatbot);
        arch.services[1].cost_estimate = "per request".to_string();
        let result = CostSkill::new().review(&arch, &set).await;
        assert!(result.is_fallback());
        let annotation = result.payload.unwrap();
        assert_eq!(annotation.status, AnnotationStatus::Degraded);
        assert!(annotation
            .findings
            .iter()
            .any(|f| f.contains("Amazon Lex could not be parsed")));
    }

    #[test]
    fn test_empty_services_fail() {
        let (mut arch, set) = plan(ProblemCategory::ExpenseTracker);
        arch.services.clear();
        let result = tokio_test::block_on(CostSkill::new().review(&arch, &set));
        assert!(result.is_failed());
        assert_eq!(result.confidence, 0.0);
        assert!(result.payload.is_none());
    }
}
