//! # ArchPlan Core
//!
//! The "Brain" of ArchPlan - turns a natural-language problem description
//! into a cloud architecture recommendation.
//!
//! ## Architecture
//!
//! - `catalog/` - Requirement templates, service lists, classifier signatures
//! - `models` - Shared data types
//! - `skills/` - Pipeline agents (classifier, requirements, architect, specialists)
//! - `swarm/` - Orchestrator, pipeline state machine, events, reports
//! - `config` - `.archplan` runtime directory and config file
//!
//! ## Usage
//!
//! ```rust,ignore
//! use archplan_core::swarm::{Orchestrator, OrchestratorConfig};
//!
//! let orchestrator = Orchestrator::from_config(OrchestratorConfig::default())?;
//! let plan = orchestrator.plan("Online store with shopping cart", None).await?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod skills;
pub mod swarm;

pub use error::{PartialPlan, PlanError, SkillError};
pub use models::FinalRecommendation;
pub use swarm::{Orchestrator, OrchestratorConfig};
