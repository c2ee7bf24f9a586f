//! # Swarm Orchestration
//!
//! Coordinates the agent pipeline for ArchPlan.
//!
//! ## Pipeline Flow
//!
//! ```text
//! Description → Classifier → Requirements → Architect → Specialists (parallel) → Recommendation
//! ```

pub mod events;
pub mod orchestrator;
pub mod pipeline;
pub mod report;

pub use events::{EventSink, MemorySink, PipelineEvent, PipelineEventKind, TracingSink};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use pipeline::{Pipeline, PipelineStage};
pub use report::render_markdown;
