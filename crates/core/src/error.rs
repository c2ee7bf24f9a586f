//! Error types for the planning pipeline.
//!
//! `CatalogMiss` never appears here: a miss is recovered inside the stage
//! that hit it. Specialist failures and timeouts are folded into annotations.

use crate::catalog::CatalogError;
use crate::models::{AgentResult, ProblemCategory, RequirementSet};
use crate::swarm::pipeline::PipelineStage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a mandatory stage
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkillError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),
}

impl SkillError {
    /// Promote a catalog error that has no local fallback
    pub fn from_catalog(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(what) => {
                SkillError::CatalogUnavailable(format!("required entry missing: {}", what))
            }
            CatalogError::Unavailable(reason) => SkillError::CatalogUnavailable(reason),
        }
    }
}

/// Mandatory-stage results that completed before an abort
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<AgentResult<ProblemCategory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<AgentResult<RequirementSet>>,
}

/// Conditions that prevent a FinalRecommendation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("pipeline aborted during {stage:?}: catalog unavailable: {reason}")]
    CatalogUnavailable {
        stage: PipelineStage,
        reason: String,
        partial: Box<PartialPlan>,
    },

    #[error("planning request cancelled")]
    Cancelled,
}

impl PlanError {
    pub(crate) fn from_stage(err: SkillError, stage: PipelineStage, partial: PartialPlan) -> Self {
        match err {
            SkillError::InvalidInput(message) => PlanError::InvalidInput(message),
            SkillError::CatalogUnavailable(reason) => PlanError::CatalogUnavailable {
                stage,
                reason,
                partial: Box::new(partial),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_promotes_to_unavailable() {
        let err = SkillError::from_catalog(CatalogError::NotFound("signatures".into()));
        assert!(matches!(err, SkillError::CatalogUnavailable(ref m) if m.contains("signatures")));
    }

    #[test]
    fn test_stage_error_keeps_partial_results() {
        let partial = PartialPlan {
            classification: Some(AgentResult::success(ProblemCategory::Chatbot, 0.7)),
            requirements: None,
        };
        let err = PlanError::from_stage(
            SkillError::CatalogUnavailable("disk gone".into()),
            PipelineStage::Extracting,
            partial.clone(),
        );
        match err {
            PlanError::CatalogUnavailable {
                stage,
                reason,
                partial: got,
            } => {
                assert_eq!(stage, PipelineStage::Extracting);
                assert_eq!(reason, "disk gone");
                assert_eq!(*got, partial);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
