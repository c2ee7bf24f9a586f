//! # Pipeline Events
//!
//! Structured events emitted by the orchestrator, and the sinks that receive
//! them. The sink is injected; the pipeline never configures global logging.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Kind of pipeline event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineEventKind {
    /// Pipeline started
    PipelineStarted,
    /// Pipeline moved to a new stage
    StageEntered,
    /// Agent started working
    AgentStarted,
    /// Agent completed successfully
    AgentCompleted,
    /// Agent recovered with a fallback value
    AgentFallback,
    /// Agent failed
    AgentFailed,
    /// Specialist exceeded its timeout
    SpecialistTimedOut,
    /// Pipeline completed
    PipelineCompleted,
    /// Pipeline aborted on an infrastructure failure
    PipelineAborted,
    /// Caller cancelled the request
    PipelineCancelled,
}

/// An event in the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// Unique event ID
    pub id: String,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Kind of event
    pub kind: PipelineEventKind,
    /// Agent that produced this event
    pub agent: String,
    /// Associated data (JSON)
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl PipelineEvent {
    /// Create a new event
    pub fn new(kind: PipelineEventKind, agent: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            kind,
            agent: agent.to_string(),
            data: None,
        }
    }

    /// Add data to the event
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Receiver of pipeline events
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: PipelineEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl EventSink for TracingSink {
    async fn emit(&self, event: PipelineEvent) {
        let data = event
            .data
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        match event.kind {
            PipelineEventKind::AgentFailed
            | PipelineEventKind::SpecialistTimedOut
            | PipelineEventKind::PipelineAborted => {
                tracing::warn!(kind = ?event.kind, agent = %event.agent, %data, "pipeline event")
            }
            _ => tracing::debug!(kind = ?event.kind, agent = %event.agent, %data, "pipeline event"),
        }
    }
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn kinds(&self) -> Vec<PipelineEventKind> {
        self.events().into_iter().map(|e| e.kind).collect()
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn emit(&self, event: PipelineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Streams events to a channel without waiting for the receiver.
///
/// A full or closed channel drops the event; emitting never blocks the
/// pipeline on a slow consumer.
#[async_trait]
impl EventSink for mpsc::Sender<PipelineEvent> {
    async fn emit(&self, event: PipelineEvent) {
        match self.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::debug!(kind = ?event.kind, agent = %event.agent, "event channel full, dropping event")
            }
            Err(TrySendError::Closed(event)) => {
                tracing::warn!(kind = ?event.kind, agent = %event.agent, "event receiver closed, dropping event")
            }
        }
    }
}
