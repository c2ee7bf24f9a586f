//! End-to-end planning scenarios
//!
//! Runs the full pipeline against the built-in catalog:
//! - E-commerce description with and without specialists
//! - Unrecognized description (fallback path, never an abort)
//! - Deterministic output across runs
//! - Slow and failing specialists
//! - Catalog outage and caller cancellation

use archplan_core::catalog::{
    Catalog, CatalogError, CatalogResult, CategorySignature, StaticCatalog,
};
use archplan_core::models::{
    tags, AgentResult, AnnotationStatus, ArchitectureRecommendation, CloudProvider, CloudService,
    DeploymentStrategy, ProblemCategory, RequirementKind, RequirementSet, ServiceType,
    SpecialistAnnotation,
};
use archplan_core::skills::{Agent, Specialist};
use archplan_core::swarm::{MemorySink, PipelineEventKind, PipelineStage};
use archplan_core::{Orchestrator, OrchestratorConfig, PlanError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

const STORE: &str = "Online store for small business with product catalog, shopping cart, payment processing, admin dashboard";
const GIBBERISH: &str = "asdkj qpwoe random text";

fn orchestrator() -> Orchestrator {
    Orchestrator::new(
        Arc::new(StaticCatalog::builtin()),
        OrchestratorConfig::default(),
    )
}

/// Reviewer that sleeps far past any reasonable timeout
struct Stalled;

impl Agent for Stalled {
    fn name(&self) -> &str {
        "stalled"
    }
}

#[async_trait]
impl Specialist for Stalled {
    async fn review(
        &self,
        _: &ArchitectureRecommendation,
        _: &RequirementSet,
    ) -> AgentResult<SpecialistAnnotation> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        SpecialistAnnotation::ok("stalled", vec![], 1.0).into_result()
    }
}

/// Built-in catalog whose service lists are unreachable
struct ServicesOffline(StaticCatalog);

impl Catalog for ServicesOffline {
    fn requirement_template(&self, category: ProblemCategory) -> CatalogResult<RequirementSet> {
        self.0.requirement_template(category)
    }

    fn services(&self, _: ProblemCategory, _: CloudProvider) -> CatalogResult<Vec<CloudService>> {
        Err(CatalogError::Unavailable("service index offline".into()))
    }

    fn default_provider(&self, category: ProblemCategory) -> CatalogResult<CloudProvider> {
        self.0.default_provider(category)
    }

    fn category_signatures(&self) -> CatalogResult<Vec<CategorySignature>> {
        self.0.category_signatures()
    }

    fn category_priority_order(&self) -> CatalogResult<Vec<ProblemCategory>> {
        self.0.category_priority_order()
    }

    fn compliance_controls(&self) -> CatalogResult<BTreeMap<String, Vec<String>>> {
        self.0.compliance_controls()
    }
}

#[tokio::test]
async fn test_ecommerce_scenario() {
    let plan = orchestrator().plan(STORE, None).await.unwrap();

    assert_eq!(plan.category, ProblemCategory::Ecommerce);

    let reqs = &plan.requirements;
    assert!(reqs
        .business_requirements
        .iter()
        .any(|r| r.priority == 5 && r.category == RequirementKind::Scalability));
    assert!(reqs.business_requirements.iter().any(|r| r.priority == 5
        && r.category == RequirementKind::Security
        && r.constraints.contains(tags::PCI_DSS_COMPLIANCE)));

    let arch = &plan.architecture;
    for ty in [
        ServiceType::Compute,
        ServiceType::Database,
        ServiceType::Storage,
        ServiceType::Networking,
    ] {
        assert!(arch.has_service_type(ty), "missing {:?}", ty);
    }
    assert_eq!(arch.deployment.strategy, DeploymentStrategy::Rolling);
    assert_eq!(
        arch.deployment.description,
        "Rolling deployment with cost optimization"
    );

    assert!(plan.overall_confidence >= 0.8);
    assert!(plan.complete);
    assert!(plan.annotations.is_empty());
}

#[tokio::test]
async fn test_ecommerce_scenario_with_default_specialists() {
    let plan = orchestrator()
        .with_default_specialists()
        .plan(STORE, None)
        .await
        .unwrap();

    let names: Vec<&str> = plan
        .annotations
        .iter()
        .map(|a| a.specialist.as_str())
        .collect();
    assert_eq!(names, vec!["cost", "security", "integration"]);
    assert!(plan
        .annotations
        .iter()
        .all(|a| a.status == AnnotationStatus::Ok));
    assert!(plan.complete);
    assert!(plan.overall_confidence >= 0.8);
}

#[tokio::test]
async fn test_gibberish_scenario() {
    let plan = orchestrator().plan(GIBBERISH, None).await.unwrap();

    assert_eq!(plan.category, ProblemCategory::Unknown);
    assert_eq!(plan.stage_confidences.classification, 0.0);
    assert_eq!(plan.requirements, RequirementSet::generic());
    assert!(!plan.complete);
    assert!(!plan.fallbacks.is_empty());
    assert!(plan.overall_confidence <= 0.3);
}

#[tokio::test]
async fn test_empty_description_is_rejected() {
    for input in ["", "   ", "\n\t"] {
        let err = orchestrator().plan(input, None).await.unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput(_)), "{:?}", input);
    }
}

#[tokio::test]
async fn test_plans_are_deterministic() {
    let orchestrator = orchestrator().with_default_specialists();
    for description in [STORE, GIBBERISH, "Chatbot for customer support with CRM"] {
        let first = orchestrator.plan(description, None).await.unwrap();
        let second = orchestrator.plan(description, None).await.unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[tokio::test]
async fn test_every_provider_yields_services() {
    let orchestrator = orchestrator();
    for provider in CloudProvider::all() {
        let plan = orchestrator.plan(STORE, Some(provider)).await.unwrap();
        assert_eq!(plan.architecture.provider, provider);
        assert!(!plan.architecture.services.is_empty());
        assert!(plan
            .architecture
            .services
            .iter()
            .all(|s| s.provider == provider));
    }
}

#[tokio::test]
async fn test_stalled_specialist_is_bounded_by_timeout() {
    let config = OrchestratorConfig {
        specialist_timeout_ms: 100,
        ..OrchestratorConfig::default()
    };
    let baseline = Orchestrator::new(Arc::new(StaticCatalog::builtin()), config.clone())
        .plan(STORE, None)
        .await
        .unwrap();

    let orchestrator = Orchestrator::new(Arc::new(StaticCatalog::builtin()), config)
        .with_specialist(Arc::new(Stalled))
        .with_default_specialists();

    let started = Instant::now();
    let plan = orchestrator.plan(STORE, None).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));

    assert_eq!(plan.annotations[0].specialist, "stalled");
    assert_eq!(plan.annotations[0].status, AnnotationStatus::Failed);
    assert!(plan.annotations[0].findings.is_empty());
    assert!(!plan.complete);

    // Mandatory stages are untouched
    assert_eq!(plan.requirements, baseline.requirements);
    assert_eq!(plan.architecture, baseline.architecture);
    assert_eq!(plan.stage_confidences, baseline.stage_confidences);
    let expected = baseline.overall_confidence * 0.9;
    assert!((plan.overall_confidence - expected).abs() < 1e-9);
}

#[tokio::test]
async fn test_catalog_outage_aborts_with_partial_plan() {
    let sink = Arc::new(MemorySink::new());
    let orchestrator = Orchestrator::new(
        Arc::new(ServicesOffline(StaticCatalog::builtin())),
        OrchestratorConfig::default(),
    )
    .with_default_specialists()
    .with_event_sink(sink.clone());

    match orchestrator.plan(STORE, None).await {
        Err(PlanError::CatalogUnavailable {
            stage,
            reason,
            partial,
        }) => {
            assert_eq!(stage, PipelineStage::Synthesizing);
            assert!(reason.contains("service index offline"));
            assert!(partial.classification.is_some());
            let requirements = partial.requirements.unwrap().payload.unwrap();
            assert_eq!(requirements.category, ProblemCategory::Ecommerce);
        }
        other => panic!("expected CatalogUnavailable, got {:?}", other),
    }

    let kinds = sink.kinds();
    assert!(kinds.contains(&PipelineEventKind::PipelineAborted));
    assert!(!kinds.contains(&PipelineEventKind::PipelineCompleted));
}

#[tokio::test]
async fn test_cancellation_during_review() {
    let orchestrator = Arc::new(orchestrator().with_specialist(Arc::new(Stalled)));
    let token = CancellationToken::new();

    let task = tokio::spawn({
        let orchestrator = orchestrator.clone();
        let token = token.clone();
        async move {
            orchestrator
                .plan_with_cancellation(STORE, None, token)
                .await
        }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    token.cancel();

    let result = tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("cancelled plan should return promptly")
        .unwrap();
    assert!(matches!(result, Err(PlanError::Cancelled)));
}
