//! # Orchestrator
//!
//! Drives one planning request through the pipeline:
//!
//! ```text
//! Classifying → Extracting → Synthesizing → Reviewing → Aggregating → Done
//!      └──────────────┴────────────┴── CatalogUnavailable ──→ Aborted
//!                      caller cancellation (any stage) ──→ Cancelled
//! ```
//!
//! Mandatory stages run in order on the caller's task. Review fans the
//! architecture out to every configured specialist on a `JoinSet`, bounded
//! by a semaphore and a per-specialist timeout, then joins them back into
//! configuration order.

use crate::catalog::{Catalog, StaticCatalog};
use crate::error::{PartialPlan, PlanError, SkillError};
use crate::models::{
    clamp_unit, default_next_steps, AgentResult, AgentStatus, AnnotationStatus,
    ArchitectureRecommendation, CloudProvider, FallbackMarker, FinalRecommendation,
    ProblemCategory, RequirementSet, SpecialistAnnotation, StageConfidences,
};
use crate::skills::{
    architect_skill, classifier_skill, requirements_skill, specialists_from_names, ArchitectSkill,
    ClassifierSkill, RequirementsSkill, Specialist,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::events::{EventSink, PipelineEvent, PipelineEventKind, TracingSink};
use super::pipeline::Pipeline;

const AGENT: &str = "orchestrator";

/// Configuration for the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Provider used when the request names none
    pub default_provider: CloudProvider,
    /// Per-specialist review timeout
    pub specialist_timeout_ms: u64,
    /// Maximum specialists reviewing at once (default: 3)
    pub max_concurrent_specialists: usize,
    /// Confidence multiplier applied once per failed specialist
    pub failed_specialist_penalty: f64,
    /// Overall confidence below this flags the plan for manual review
    pub manual_review_threshold: f64,
    /// Specialists to run, in annotation order
    pub specialists: Vec<String>,
    /// JSON catalog file replacing the built-in tables
    pub catalog_path: Option<PathBuf>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_provider: CloudProvider::Aws,
            specialist_timeout_ms: 2_000,
            max_concurrent_specialists: 3,
            failed_specialist_penalty: 0.9,
            manual_review_threshold: 0.6,
            specialists: crate::skills::SPECIALIST_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            catalog_path: None,
        }
    }
}

impl OrchestratorConfig {
    pub fn specialist_timeout(&self) -> Duration {
        Duration::from_millis(self.specialist_timeout_ms)
    }
}

/// How a specialist task ended
enum ReviewOutcome {
    Finished(AgentResult<SpecialistAnnotation>),
    TimedOut,
}

/// The planning pipeline
pub struct Orchestrator {
    config: OrchestratorConfig,
    catalog: Arc<dyn Catalog>,
    classifier: ClassifierSkill,
    requirements: RequirementsSkill,
    architect: ArchitectSkill,
    specialists: Vec<Arc<dyn Specialist>>,
    sink: Arc<dyn EventSink>,
}

impl Orchestrator {
    /// Create an orchestrator with no specialists
    pub fn new(catalog: Arc<dyn Catalog>, config: OrchestratorConfig) -> Self {
        Self {
            classifier: ClassifierSkill::new(catalog.clone()),
            requirements: RequirementsSkill::new(catalog.clone()),
            architect: ArchitectSkill::new(catalog.clone()),
            catalog,
            config,
            specialists: Vec::new(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Build the catalog and the named specialists from configuration
    pub fn from_config(config: OrchestratorConfig) -> Result<Self> {
        let catalog: Arc<dyn Catalog> = match &config.catalog_path {
            Some(path) => Arc::new(StaticCatalog::load(path)?),
            None => Arc::new(StaticCatalog::builtin()),
        };
        let specialists = specialists_from_names(&config.specialists, catalog.clone())?;
        Ok(Self::new(catalog, config).with_specialists(specialists))
    }

    pub fn with_specialist(mut self, specialist: Arc<dyn Specialist>) -> Self {
        self.specialists.push(specialist);
        self
    }

    pub fn with_specialists(mut self, specialists: Vec<Arc<dyn Specialist>>) -> Self {
        self.specialists.extend(specialists);
        self
    }

    /// Add the cost, security, and integration reviewers
    pub fn with_default_specialists(self) -> Self {
        let specialists = crate::skills::default_specialists(self.catalog.clone());
        self.with_specialists(specialists)
    }

    /// Replace the default tracing sink
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    pub fn specialist_names(&self) -> Vec<&str> {
        self.specialists.iter().map(|s| s.name()).collect()
    }

    async fn emit(&self, event: PipelineEvent) {
        self.sink.emit(event).await;
    }

    async fn enter(&self, pipeline: &Pipeline) {
        tracing::info!(stage = pipeline.stage.as_str(), "entering stage");
        self.emit(
            PipelineEvent::new(PipelineEventKind::StageEntered, AGENT)
                .with_data(serde_json::json!({ "stage": pipeline.stage })),
        )
        .await;
    }

    async fn report<T>(&self, agent: &str, result: &AgentResult<T>) {
        let kind = match result.status {
            AgentStatus::Success => PipelineEventKind::AgentCompleted,
            AgentStatus::Fallback => {
                tracing::warn!(agent, confidence = result.confidence, "stage fell back");
                PipelineEventKind::AgentFallback
            }
            AgentStatus::Failed => PipelineEventKind::AgentFailed,
        };
        self.emit(
            PipelineEvent::new(kind, agent)
                .with_data(serde_json::json!({ "confidence": result.confidence })),
        )
        .await;
    }

    /// Move to a terminal failure state and build the error
    async fn fail(
        &self,
        pipeline: &mut Pipeline,
        agent: &str,
        err: SkillError,
        partial: PartialPlan,
    ) -> PlanError {
        let stage = pipeline.stage;
        pipeline.abort();
        tracing::warn!(agent, stage = stage.as_str(), error = %err, "pipeline aborted");
        self.emit(
            PipelineEvent::new(PipelineEventKind::AgentFailed, agent)
                .with_data(serde_json::json!({ "error": err.to_string() })),
        )
        .await;
        self.emit(
            PipelineEvent::new(PipelineEventKind::PipelineAborted, AGENT)
                .with_data(serde_json::json!({ "stage": stage, "error": err.to_string() })),
        )
        .await;
        PlanError::from_stage(err, stage, partial)
    }

    async fn cancel(&self, pipeline: &mut Pipeline) -> PlanError {
        let stage = pipeline.stage;
        pipeline.cancel();
        tracing::info!(stage = stage.as_str(), "planning cancelled");
        self.emit(
            PipelineEvent::new(PipelineEventKind::PipelineCancelled, AGENT)
                .with_data(serde_json::json!({ "stage": stage })),
        )
        .await;
        PlanError::Cancelled
    }

    /// Run the pipeline for one description
    pub async fn plan(
        &self,
        description: &str,
        provider: Option<CloudProvider>,
    ) -> Result<FinalRecommendation, PlanError> {
        self.plan_with_cancellation(description, provider, CancellationToken::new())
            .await
    }

    /// Run the pipeline, stopping early once `cancel` fires
    #[tracing::instrument(
        skip(self, description, cancel),
        fields(description_preview = %description.chars().take(50).collect::<String>())
    )]
    pub async fn plan_with_cancellation(
        &self,
        description: &str,
        provider: Option<CloudProvider>,
        cancel: CancellationToken,
    ) -> Result<FinalRecommendation, PlanError> {
        let provider = provider.unwrap_or(self.config.default_provider);
        let mut pipeline = Pipeline::new();
        let mut partial = PartialPlan::default();

        self.emit(
            PipelineEvent::new(PipelineEventKind::PipelineStarted, AGENT)
                .with_data(serde_json::json!({ "provider": provider })),
        )
        .await;

        // CLASSIFY
        if cancel.is_cancelled() {
            return Err(self.cancel(&mut pipeline).await);
        }
        self.enter(&pipeline).await;
        let classification = match self.classifier.classify(description) {
            Ok(result) => result,
            Err(e) => {
                return Err(self
                    .fail(&mut pipeline, classifier_skill::NAME, e, partial)
                    .await)
            }
        };
        self.report(classifier_skill::NAME, &classification).await;
        let category: ProblemCategory = classification.payload.unwrap_or_default();
        partial.classification = Some(classification.clone());

        // EXTRACT
        pipeline.advance();
        if cancel.is_cancelled() {
            return Err(self.cancel(&mut pipeline).await);
        }
        self.enter(&pipeline).await;
        let extraction = match self.requirements.extract(category) {
            Ok(result) => result,
            Err(e) => {
                return Err(self
                    .fail(&mut pipeline, requirements_skill::NAME, e, partial)
                    .await)
            }
        };
        self.report(requirements_skill::NAME, &extraction).await;
        partial.requirements = Some(extraction.clone());
        let Some(requirements) = extraction.payload.clone() else {
            let err = SkillError::CatalogUnavailable("requirements stage returned no set".into());
            return Err(self
                .fail(&mut pipeline, requirements_skill::NAME, err, partial)
                .await);
        };

        // SYNTHESIZE
        pipeline.advance();
        if cancel.is_cancelled() {
            return Err(self.cancel(&mut pipeline).await);
        }
        self.enter(&pipeline).await;
        let synthesis = match self.architect.synthesize(&requirements, provider) {
            Ok(result) => result,
            Err(e) => {
                return Err(self
                    .fail(&mut pipeline, architect_skill::NAME, e, partial)
                    .await)
            }
        };
        self.report(architect_skill::NAME, &synthesis).await;
        let Some(architecture) = synthesis.payload.clone() else {
            let err = SkillError::CatalogUnavailable("synthesis stage returned no architecture".into());
            return Err(self
                .fail(&mut pipeline, architect_skill::NAME, err, partial)
                .await);
        };

        // REVIEW
        pipeline.advance();
        if cancel.is_cancelled() {
            return Err(self.cancel(&mut pipeline).await);
        }
        self.enter(&pipeline).await;
        let annotations = match self
            .review(&architecture, &requirements, &cancel)
            .await
        {
            Some(annotations) => annotations,
            None => return Err(self.cancel(&mut pipeline).await),
        };

        // AGGREGATE
        pipeline.advance();
        if cancel.is_cancelled() {
            return Err(self.cancel(&mut pipeline).await);
        }
        self.enter(&pipeline).await;

        let stage_confidences = StageConfidences {
            classification: classification.confidence,
            extraction: extraction.confidence,
            synthesis: synthesis.confidence,
        };
        let failed = annotations
            .iter()
            .filter(|a| a.status == AnnotationStatus::Failed)
            .count();
        let penalty = self
            .config
            .failed_specialist_penalty
            .powi(i32::try_from(failed).unwrap_or(i32::MAX));
        let overall_confidence = clamp_unit(stage_confidences.mean() * penalty);

        let mut fallbacks = Vec::new();
        if classification.is_fallback() {
            fallbacks.push(FallbackMarker::new(
                classifier_skill::NAME,
                "description matched no known problem category",
            ));
        }
        if extraction.is_fallback() {
            fallbacks.push(FallbackMarker::new(
                requirements_skill::NAME,
                "generic requirement set used",
            ));
        }
        if synthesis.is_fallback() {
            fallbacks.push(FallbackMarker::new(
                architect_skill::NAME,
                synthesis_fallback_reason(&architecture, provider),
            ));
        }
        for annotation in annotations
            .iter()
            .filter(|a| a.status == AnnotationStatus::Failed)
        {
            fallbacks.push(FallbackMarker::new(
                format!("specialist:{}", annotation.specialist),
                "specialist failed or timed out",
            ));
        }

        let needs_manual_review = overall_confidence < self.config.manual_review_threshold;
        let recommendation = FinalRecommendation {
            problem_description: description.to_string(),
            category,
            requirements,
            architecture,
            annotations,
            stage_confidences,
            overall_confidence,
            next_steps: default_next_steps(),
            complete: fallbacks.is_empty(),
            fallbacks,
            needs_manual_review,
        };

        pipeline.advance();
        tracing::info!(
            category = %recommendation.category,
            overall_confidence,
            complete = recommendation.complete,
            "planning finished"
        );
        self.emit(
            PipelineEvent::new(PipelineEventKind::PipelineCompleted, AGENT).with_data(
                serde_json::json!({
                    "category": recommendation.category,
                    "overall_confidence": overall_confidence,
                    "complete": recommendation.complete,
                }),
            ),
        )
        .await;

        Ok(recommendation)
    }

    /// Fan the architecture out to every specialist and join the results in
    /// configuration order. Returns `None` when cancelled mid-review.
    async fn review(
        &self,
        architecture: &ArchitectureRecommendation,
        requirements: &RequirementSet,
        cancel: &CancellationToken,
    ) -> Option<Vec<SpecialistAnnotation>> {
        let total = self.specialists.len();
        if total == 0 {
            return Some(Vec::new());
        }

        let architecture = Arc::new(architecture.clone());
        let requirements = Arc::new(requirements.clone());
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_specialists.max(1)));
        let timeout = self.config.specialist_timeout();

        let mut join_set = JoinSet::new();

        // SCATTER: one task per specialist, tagged with its slot
        for (slot, specialist) in self.specialists.iter().enumerate() {
            self.emit(PipelineEvent::new(PipelineEventKind::AgentStarted, specialist.name()))
                .await;

            let specialist = specialist.clone();
            let architecture = architecture.clone();
            let requirements = requirements.clone();
            let semaphore = semaphore.clone();

            join_set.spawn(async move {
                let work = async {
                    // Hold the permit until the review completes
                    let _permit = semaphore.acquire_owned().await.ok()?;
                    Some(specialist.review(&architecture, &requirements).await)
                };
                let outcome = match tokio::time::timeout(timeout, work).await {
                    Ok(Some(result)) => ReviewOutcome::Finished(result),
                    Ok(None) => ReviewOutcome::Finished(AgentResult::failed()),
                    Err(_) => ReviewOutcome::TimedOut,
                };
                (slot, outcome)
            });
        }

        // GATHER: slots left empty belong to tasks that panicked
        let mut slots: Vec<Option<SpecialistAnnotation>> = vec![None; total];
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    join_set.abort_all();
                    return None;
                }
                joined = join_set.join_next() => match joined {
                    Some(Ok((slot, outcome))) => {
                        let name = self.specialists.get(slot).map(|s| s.name()).unwrap_or("unknown");
                        let annotation = self.settle(name, outcome).await;
                        if let Some(entry) = slots.get_mut(slot) {
                            *entry = Some(annotation);
                        }
                    }
                    Some(Err(e)) => {
                        tracing::warn!("Specialist task panicked: {}", e);
                    }
                    None => break,
                }
            }
        }

        let mut annotations = Vec::with_capacity(total);
        for (slot, specialist) in slots.into_iter().zip(&self.specialists) {
            let annotation = match slot {
                Some(annotation) => annotation,
                None => {
                    self.emit(PipelineEvent::new(
                        PipelineEventKind::AgentFailed,
                        specialist.name(),
                    ))
                    .await;
                    SpecialistAnnotation::failed(specialist.name())
                }
            };
            annotations.push(annotation);
        }
        Some(annotations)
    }

    /// Normalize a finished review into an annotation and report it
    async fn settle(&self, name: &str, outcome: ReviewOutcome) -> SpecialistAnnotation {
        match outcome {
            ReviewOutcome::TimedOut => {
                tracing::warn!(specialist = name, "specialist timed out");
                self.emit(
                    PipelineEvent::new(PipelineEventKind::SpecialistTimedOut, name).with_data(
                        serde_json::json!({ "timeout_ms": self.config.specialist_timeout_ms }),
                    ),
                )
                .await;
                SpecialistAnnotation::failed(name)
            }
            ReviewOutcome::Finished(result) => {
                self.report(name, &result).await;
                match result.payload {
                    Some(annotation) if !result.is_failed() => SpecialistAnnotation {
                        specialist: name.to_string(),
                        ..annotation
                    },
                    _ => SpecialistAnnotation::failed(name),
                }
            }
        }
    }
}

fn synthesis_fallback_reason(architecture: &ArchitectureRecommendation, requested: CloudProvider) -> String {
    if architecture.services.is_empty() {
        "no catalog services available".to_string()
    } else if !architecture.category.is_known() {
        "generic baseline services used".to_string()
    } else if architecture.provider != requested {
        format!(
            "services substituted from {}",
            architecture.provider.display_name()
        )
    } else {
        "architecture built from fallback inputs".to_string()
    }
}
