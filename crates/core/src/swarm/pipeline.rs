//! # Pipeline Stages
//!
//! Defines the stages of the planning pipeline and its forward-only state
//! machine.

use serde::{Deserialize, Serialize};

/// Stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Mapping the description to a problem category
    Classifying,
    /// Looking up the requirement template
    Extracting,
    /// Building the candidate architecture
    Synthesizing,
    /// Specialists reviewing the architecture in parallel
    Reviewing,
    /// Combining confidences into the final recommendation
    Aggregating,
    /// Complete
    Done,
    /// A mandatory stage hit an unrecoverable catalog failure
    Aborted,
    /// The caller cancelled the request
    Cancelled,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Classifying => "classifying",
            PipelineStage::Extracting => "extracting",
            PipelineStage::Synthesizing => "synthesizing",
            PipelineStage::Reviewing => "reviewing",
            PipelineStage::Aggregating => "aggregating",
            PipelineStage::Done => "done",
            PipelineStage::Aborted => "aborted",
            PipelineStage::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineStage::Done | PipelineStage::Aborted | PipelineStage::Cancelled
        )
    }
}

/// The pipeline state machine
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Current stage
    pub stage: PipelineStage,
    /// Stages visited, in order
    history: Vec<PipelineStage>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            stage: PipelineStage::Classifying,
            history: vec![PipelineStage::Classifying],
        }
    }
}

impl Pipeline {
    /// Create a new pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next stage; terminal stages absorb
    pub fn advance(&mut self) -> PipelineStage {
        let next = match self.stage {
            PipelineStage::Classifying => PipelineStage::Extracting,
            PipelineStage::Extracting => PipelineStage::Synthesizing,
            PipelineStage::Synthesizing => PipelineStage::Reviewing,
            PipelineStage::Reviewing => PipelineStage::Aggregating,
            PipelineStage::Aggregating => PipelineStage::Done,
            terminal => terminal,
        };
        self.enter(next);
        self.stage
    }

    /// Abort the pipeline. Only meaningful before aggregation.
    pub fn abort(&mut self) {
        if !self.stage.is_terminal() {
            self.enter(PipelineStage::Aborted);
        }
    }

    /// Cancel the pipeline on caller request
    pub fn cancel(&mut self) {
        if !self.stage.is_terminal() {
            self.enter(PipelineStage::Cancelled);
        }
    }

    fn enter(&mut self, stage: PipelineStage) {
        if stage != self.stage {
            self.stage = stage;
            self.history.push(stage);
        }
    }

    /// Check if pipeline reached a terminal stage
    pub fn is_complete(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Check if pipeline succeeded
    pub fn is_success(&self) -> bool {
        self.stage == PipelineStage::Done
    }

    pub fn history(&self) -> &[PipelineStage] {
        &self.history
    }
}
