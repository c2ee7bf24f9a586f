//! # ArchPlan Models
//!
//! Centralized data types shared by every stage of the pipeline: problem
//! categories, cloud providers, requirement sets, cloud services, the
//! synthesized architecture, specialist annotations, and the final
//! recommendation compiled by the orchestrator.
//!
//! All types serialize with serde so a [`FinalRecommendation`] can be handed
//! to any downstream consumer as a structured record.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Well-known constraint and requirement tags.
///
/// Tags are open vocabulary (the catalog may introduce new ones), but the
/// pipeline branches on these.
pub mod tags {
    pub const HIGH_AVAILABILITY: &str = "high_availability";
    pub const BUDGET_CONSCIOUS: &str = "budget_conscious";
    pub const TIME_TO_MARKET: &str = "time_to_market";
    pub const DATA_PRIVACY: &str = "data_privacy";
    pub const PCI_DSS_COMPLIANCE: &str = "pci_dss_compliance";
    pub const SECURE_DATA_TRANSFER: &str = "secure_data_transfer";
    /// Marks a technical requirement that talks to an external system.
    pub const INTEGRATION: &str = "integration";
}

// ============================================================================
// Categories & Providers
// ============================================================================

/// Problem category produced by the classifier.
///
/// `Unknown` is a valid outcome, not an error.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ProblemCategory {
    Ecommerce,
    Chatbot,
    ExpenseTracker,
    #[default]
    Unknown,
}

impl ProblemCategory {
    /// Categories the catalog can hold templates for
    pub fn supported() -> Vec<ProblemCategory> {
        vec![
            ProblemCategory::Ecommerce,
            ProblemCategory::Chatbot,
            ProblemCategory::ExpenseTracker,
        ]
    }

    /// Stable identifier used in catalogs and events
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemCategory::Ecommerce => "ecommerce",
            ProblemCategory::Chatbot => "chatbot",
            ProblemCategory::ExpenseTracker => "expense_tracker",
            ProblemCategory::Unknown => "unknown",
        }
    }

    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            ProblemCategory::Ecommerce => "E-commerce",
            ProblemCategory::Chatbot => "Customer Support Chatbot",
            ProblemCategory::ExpenseTracker => "Employee Expense Tracker",
            ProblemCategory::Unknown => "Unclassified",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != ProblemCategory::Unknown
    }
}

impl std::fmt::Display for ProblemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported cloud providers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    #[default]
    Aws,
    Azure,
    Gcp,
}

impl CloudProvider {
    /// Get all available providers
    pub fn all() -> Vec<CloudProvider> {
        vec![CloudProvider::Aws, CloudProvider::Azure, CloudProvider::Gcp]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azure",
            CloudProvider::Gcp => "gcp",
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "AWS",
            CloudProvider::Azure => "Azure",
            CloudProvider::Gcp => "Google Cloud",
        }
    }

    /// Native monitoring product of the provider
    pub fn monitoring_service(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "CloudWatch",
            CloudProvider::Azure => "Azure Monitor",
            CloudProvider::Gcp => "Cloud Monitoring",
        }
    }
}

impl std::fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CloudProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aws" | "amazon" => Ok(CloudProvider::Aws),
            "azure" | "microsoft" => Ok(CloudProvider::Azure),
            "gcp" | "google" => Ok(CloudProvider::Gcp),
            other => Err(format!("unknown cloud provider: {}", other)),
        }
    }
}

// ============================================================================
// Requirements
// ============================================================================

/// Category tag of a business requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    Performance,
    Security,
    Scalability,
    Cost,
    Compliance,
    Functionality,
    Integration,
}

/// Lowest business requirement priority
pub const MIN_PRIORITY: u8 = 1;
/// Highest business requirement priority
pub const MAX_PRIORITY: u8 = 5;

/// A business requirement for the architecture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRequirement {
    pub description: String,
    /// 1-5, 5 being highest
    pub priority: u8,
    pub category: RequirementKind,
    #[serde(default)]
    pub constraints: BTreeSet<String>,
}

impl BusinessRequirement {
    pub fn new(
        description: impl Into<String>,
        priority: u8,
        category: RequirementKind,
        constraints: &[&str],
    ) -> Self {
        Self {
            description: description.into(),
            priority: priority.clamp(MIN_PRIORITY, MAX_PRIORITY),
            category,
            constraints: constraints.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Value of a performance need: numbers, free text ("<2s", "high"), or durations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerformanceValue {
    Number(f64),
    Duration { seconds: u64 },
    Text(String),
}

impl std::fmt::Display for PerformanceValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PerformanceValue::Number(n) => write!(f, "{}", n),
            PerformanceValue::Duration { seconds } => write!(f, "{}s", seconds),
            PerformanceValue::Text(t) => f.write_str(t),
        }
    }
}

/// A technical requirement for one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalRequirement {
    pub component: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Components this one depends on; only earlier components of the same set
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub performance_needs: BTreeMap<String, PerformanceValue>,
}

impl TechnicalRequirement {
    pub fn new(component: impl Into<String>, requirements: &[&str], dependencies: &[&str]) -> Self {
        Self {
            component: component.into(),
            requirements: requirements.iter().map(|r| r.to_string()).collect(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            performance_needs: BTreeMap::new(),
        }
    }

    pub fn with_need(mut self, key: impl Into<String>, value: PerformanceValue) -> Self {
        self.performance_needs.insert(key.into(), value);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.requirements.iter().any(|r| r == tag)
    }
}

/// Business requirement priority outside 1-5
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("requirement '{description}' has priority {priority}, expected 1-5")]
pub struct PriorityError {
    pub description: String,
    pub priority: u8,
}

/// Dependency graph violation inside a requirement set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DependencyError {
    #[error("component '{component}' depends on '{dependency}', which is not defined earlier")]
    UndefinedOrForward {
        component: String,
        dependency: String,
    },
    #[error("component '{0}' is defined more than once")]
    Duplicate(String),
}

/// Structured requirements for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementSet {
    /// Category this set was produced for, threaded to every later stage
    pub category: ProblemCategory,
    pub business_requirements: Vec<BusinessRequirement>,
    pub technical_requirements: Vec<TechnicalRequirement>,
    #[serde(default)]
    pub constraints: BTreeSet<String>,
    #[serde(default)]
    pub success_metrics: BTreeSet<String>,
}

impl RequirementSet {
    /// Minimal requirement set used when the category is unknown
    pub fn generic() -> Self {
        Self {
            category: ProblemCategory::Unknown,
            business_requirements: vec![
                BusinessRequirement::new(
                    "Deliver the core application functionality",
                    4,
                    RequirementKind::Functionality,
                    &[],
                ),
                BusinessRequirement::new(
                    "Scale with demand",
                    3,
                    RequirementKind::Scalability,
                    &[],
                ),
            ],
            technical_requirements: Vec::new(),
            constraints: BTreeSet::new(),
            success_metrics: ["uptime".to_string()].into_iter().collect(),
        }
    }

    /// Set-level constraint check
    pub fn has_constraint(&self, tag: &str) -> bool {
        self.constraints.contains(tag)
    }

    /// Every constraint tag carried by the set: set-level tags first, then
    /// business-requirement tags in requirement order. No duplicates.
    pub fn all_constraint_tags(&self) -> Vec<String> {
        let mut out: Vec<String> = self.constraints.iter().cloned().collect();
        for req in &self.business_requirements {
            for tag in &req.constraints {
                if !out.contains(tag) {
                    out.push(tag.clone());
                }
            }
        }
        out
    }

    /// Check that every business requirement priority is within 1-5
    pub fn validate_priorities(&self) -> Result<(), PriorityError> {
        match self
            .business_requirements
            .iter()
            .find(|r| !(MIN_PRIORITY..=MAX_PRIORITY).contains(&r.priority))
        {
            Some(r) => Err(PriorityError {
                description: r.description.clone(),
                priority: r.priority,
            }),
            None => Ok(()),
        }
    }

    /// Check that every dependency references a component defined earlier.
    ///
    /// Ordering by definition rules out cycles.
    pub fn validate_dependencies(&self) -> Result<(), DependencyError> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for tech in &self.technical_requirements {
            for dep in &tech.dependencies {
                if !seen.contains(dep.as_str()) {
                    return Err(DependencyError::UndefinedOrForward {
                        component: tech.component.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
            if !seen.insert(tech.component.as_str()) {
                return Err(DependencyError::Duplicate(tech.component.clone()));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Cloud Services & Architecture
// ============================================================================

/// Kind of cloud service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Compute,
    Storage,
    Database,
    Networking,
    Security,
    Ai,
    Messaging,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Compute => "compute",
            ServiceType::Storage => "storage",
            ServiceType::Database => "database",
            ServiceType::Networking => "networking",
            ServiceType::Security => "security",
            ServiceType::Ai => "ai",
            ServiceType::Messaging => "messaging",
        }
    }
}

/// A catalog-sourced cloud service recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudService {
    pub name: String,
    pub provider: CloudProvider,
    pub service_type: ServiceType,
    pub description: String,
    /// Monthly price range, e.g. `$200-500/month`
    pub cost_estimate: String,
    pub scalability: String,
    #[serde(default)]
    pub security_features: BTreeSet<String>,
}

impl CloudService {
    pub fn new(
        name: &str,
        provider: CloudProvider,
        service_type: ServiceType,
        description: &str,
        cost_estimate: &str,
        scalability: &str,
        security_features: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            provider,
            service_type,
            description: description.to_string(),
            cost_estimate: cost_estimate.to_string(),
            scalability: scalability.to_string(),
            security_features: security_features.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Rollout strategy chosen from the constraint tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentStrategy {
    BlueGreen,
    Rolling,
    Canary,
}

impl DeploymentStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStrategy::BlueGreen => "blue-green",
            DeploymentStrategy::Rolling => "rolling",
            DeploymentStrategy::Canary => "canary",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            DeploymentStrategy::BlueGreen => "Blue-green deployment with zero downtime",
            DeploymentStrategy::Rolling => "Rolling deployment with cost optimization",
            DeploymentStrategy::Canary => "Canary deployment with gradual rollout",
        }
    }
}

/// Strategy plus its narrative (which carries substitution markers)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    pub strategy: DeploymentStrategy,
    pub description: String,
}

/// Candidate architecture produced by the synthesis stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureRecommendation {
    pub category: ProblemCategory,
    /// Provider whose services were actually selected
    pub provider: CloudProvider,
    pub services: Vec<CloudService>,
    pub deployment: DeploymentPlan,
    pub cost_estimate: String,
    pub security_considerations: Vec<String>,
    pub scalability_plan: String,
    pub monitoring_strategy: String,
    pub confidence_score: f64,
}

impl ArchitectureRecommendation {
    pub fn has_service_type(&self, service_type: ServiceType) -> bool {
        self.services.iter().any(|s| s.service_type == service_type)
    }
}

// ============================================================================
// Agent Results & Annotations
// ============================================================================

/// Status of a stage result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Success,
    Fallback,
    Failed,
}

/// Output of one stage with its status and confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult<T> {
    pub status: AgentStatus,
    pub payload: Option<T>,
    /// Confidence in [0, 1]; always 0 when failed
    pub confidence: f64,
}

impl<T> AgentResult<T> {
    pub fn success(payload: T, confidence: f64) -> Self {
        Self {
            status: AgentStatus::Success,
            payload: Some(payload),
            confidence: clamp_unit(confidence),
        }
    }

    pub fn fallback(payload: T, confidence: f64) -> Self {
        Self {
            status: AgentStatus::Fallback,
            payload: Some(payload),
            confidence: clamp_unit(confidence),
        }
    }

    pub fn failed() -> Self {
        Self {
            status: AgentStatus::Failed,
            payload: None,
            confidence: 0.0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.status == AgentStatus::Fallback
    }

    pub fn is_failed(&self) -> bool {
        self.status == AgentStatus::Failed
    }
}

/// Clamp a score into [0, 1], mapping NaN to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Outcome reported by a specialist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationStatus {
    Ok,
    Degraded,
    Failed,
}

/// Advisory output of one specialist reviewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistAnnotation {
    pub specialist: String,
    pub status: AnnotationStatus,
    pub findings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl SpecialistAnnotation {
    pub fn ok(specialist: &str, findings: Vec<String>, confidence: f64) -> Self {
        Self {
            specialist: specialist.to_string(),
            status: AnnotationStatus::Ok,
            findings,
            confidence: Some(clamp_unit(confidence)),
        }
    }

    pub fn degraded(specialist: &str, findings: Vec<String>, confidence: f64) -> Self {
        Self {
            specialist: specialist.to_string(),
            status: AnnotationStatus::Degraded,
            findings,
            confidence: Some(clamp_unit(confidence)),
        }
    }

    /// Failed annotation: no findings, zero confidence
    pub fn failed(specialist: &str) -> Self {
        Self {
            specialist: specialist.to_string(),
            status: AnnotationStatus::Failed,
            findings: Vec::new(),
            confidence: Some(0.0),
        }
    }

    /// Wrap into the common stage result shape
    pub fn into_result(self) -> AgentResult<SpecialistAnnotation> {
        let confidence = self.confidence.unwrap_or(0.0);
        match self.status {
            AnnotationStatus::Ok => AgentResult::success(self, confidence),
            AnnotationStatus::Degraded => AgentResult::fallback(self, confidence),
            AnnotationStatus::Failed => AgentResult::failed(),
        }
    }
}

// ============================================================================
// Final Recommendation
// ============================================================================

/// Why a recommendation is incomplete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackMarker {
    pub stage: String,
    pub reason: String,
}

impl FallbackMarker {
    pub fn new(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            reason: reason.into(),
        }
    }
}

/// Confidences of the mandatory stages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageConfidences {
    pub classification: f64,
    pub extraction: f64,
    pub synthesis: f64,
}

impl StageConfidences {
    /// Equal-weight mean of the mandatory stages
    pub fn mean(&self) -> f64 {
        (self.classification + self.extraction + self.synthesis) / 3.0
    }
}

/// The compiled output of one planning request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalRecommendation {
    pub problem_description: String,
    pub category: ProblemCategory,
    pub requirements: RequirementSet,
    pub architecture: ArchitectureRecommendation,
    pub annotations: Vec<SpecialistAnnotation>,
    pub stage_confidences: StageConfidences,
    pub overall_confidence: f64,
    pub next_steps: Vec<String>,
    pub complete: bool,
    #[serde(default)]
    pub fallbacks: Vec<FallbackMarker>,
    #[serde(default)]
    pub needs_manual_review: bool,
}

/// Checklist appended to every recommendation
pub fn default_next_steps() -> Vec<String> {
    vec![
        "Review and approve architecture design".to_string(),
        "Set up development environment".to_string(),
        "Implement security controls".to_string(),
        "Plan deployment strategy".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing_and_names() {
        assert_eq!("AWS".parse::<CloudProvider>(), Ok(CloudProvider::Aws));
        assert_eq!(" gcp ".parse::<CloudProvider>(), Ok(CloudProvider::Gcp));
        assert!("ibm".parse::<CloudProvider>().is_err());
        assert_eq!(CloudProvider::Azure.display_name(), "Azure");
        assert_eq!(CloudProvider::default(), CloudProvider::Aws);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&ProblemCategory::ExpenseTracker).unwrap();
        assert_eq!(json, "\"expense_tracker\"");
        let json = serde_json::to_string(&DeploymentStrategy::BlueGreen).unwrap();
        assert_eq!(json, "\"blue-green\"");
    }

    #[test]
    fn test_agent_result_clamps_confidence() {
        let result = AgentResult::success("x", 1.7);
        assert_eq!(result.confidence, 1.0);
        let result = AgentResult::fallback("x", f64::NAN);
        assert_eq!(result.confidence, 0.0);
        let failed: AgentResult<&str> = AgentResult::failed();
        assert!(failed.payload.is_none());
        assert_eq!(failed.confidence, 0.0);
    }

    #[test]
    fn test_dependency_validation() {
        let mut set = RequirementSet::generic();
        set.technical_requirements = vec![
            TechnicalRequirement::new("api", &[], &[]),
            TechnicalRequirement::new("db", &[], &["api"]),
        ];
        assert!(set.validate_dependencies().is_ok());

        set.technical_requirements
            .push(TechnicalRequirement::new("cache", &[], &["worker"]));
        assert_eq!(
            set.validate_dependencies(),
            Err(DependencyError::UndefinedOrForward {
                component: "cache".to_string(),
                dependency: "worker".to_string(),
            })
        );
    }

    #[test]
    fn test_self_dependency_is_rejected() {
        let mut set = RequirementSet::generic();
        set.technical_requirements = vec![TechnicalRequirement::new("loop", &[], &["loop"])];
        assert!(set.validate_dependencies().is_err());
    }

    #[test]
    fn test_all_constraint_tags_dedupes_in_order() {
        let mut set = RequirementSet::generic();
        set.constraints = ["budget_conscious".to_string()].into_iter().collect();
        set.business_requirements = vec![
            BusinessRequirement::new("a", 5, RequirementKind::Security, &["pci_dss_compliance"]),
            BusinessRequirement::new("b", 3, RequirementKind::Cost, &["budget_conscious"]),
        ];
        assert_eq!(
            set.all_constraint_tags(),
            vec!["budget_conscious".to_string(), "pci_dss_compliance".to_string()]
        );
    }

    #[test]
    fn test_failed_annotation_maps_to_failed_result() {
        let result = SpecialistAnnotation::failed("cost").into_result();
        assert!(result.is_failed());
        assert_eq!(result.confidence, 0.0);
        assert!(result.payload.is_none());
    }

    #[test]
    fn test_performance_value_untagged() {
        let tech = TechnicalRequirement::new("db", &[], &[])
            .with_need("concurrent_users", PerformanceValue::Number(1000.0))
            .with_need("response_time", PerformanceValue::Text("<2s".into()))
            .with_need("approval_time", PerformanceValue::Duration { seconds: 86400 });
        let json = serde_json::to_string(&tech).unwrap();
        let back: TechnicalRequirement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tech);
    }
}
