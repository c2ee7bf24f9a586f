//! # Plan API
//!
//! Endpoints for planning requests and health checks.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use archplan_core::models::CloudProvider;
use archplan_core::swarm::PipelineStage;
use archplan_core::{FinalRecommendation, PartialPlan, PlanError};

use crate::AppState;

/// Status used when the client went away before the plan finished
const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Request to plan an architecture
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub description: String,
    /// Overrides the configured default provider
    #[serde(default)]
    pub provider: Option<CloudProvider>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub default_provider: CloudProvider,
    pub specialists: Vec<String>,
}

/// Error body; `partial` is set when a catalog outage aborted the run
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<PipelineStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<PartialPlan>,
}

/// HTTP view of a failed request
#[derive(Debug)]
pub enum ApiError {
    Plan(PlanError),
    Internal(String),
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        ApiError::Plan(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Plan(err) => {
                let error = err.to_string();
                match err {
                    PlanError::InvalidInput(_) => (
                        StatusCode::BAD_REQUEST,
                        ErrorBody {
                            error,
                            stage: None,
                            partial: None,
                        },
                    ),
                    PlanError::CatalogUnavailable { stage, partial, .. } => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        ErrorBody {
                            error,
                            stage: Some(stage),
                            partial: Some(*partial),
                        },
                    ),
                    PlanError::Cancelled => (
                        StatusCode::from_u16(CLIENT_CLOSED_REQUEST)
                            .unwrap_or(StatusCode::REQUEST_TIMEOUT),
                        ErrorBody {
                            error,
                            stage: None,
                            partial: None,
                        },
                    ),
                }
            }
            ApiError::Internal(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error,
                    stage: None,
                    partial: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/plan", post(create_plan))
        .route("/health", get(health))
}

/// Run the pipeline for one description.
///
/// The plan runs on its own task. If the client disconnects, this handler is
/// dropped, the guard fires, and the pipeline stops at its next checkpoint.
async fn create_plan(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<FinalRecommendation>, ApiError> {
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    let orchestrator = state.orchestrator.clone();

    let handle = tokio::spawn(async move {
        orchestrator
            .plan_with_cancellation(&req.description, req.provider, token)
            .await
    });
    let joined = handle.await;
    guard.disarm();

    match joined {
        Ok(result) => Ok(Json(result?)),
        Err(e) => {
            tracing::warn!("Planning task failed: {}", e);
            Err(ApiError::Internal(format!("planning task failed: {}", e)))
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.orchestrator.config();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        default_provider: config.default_provider,
        specialists: state
            .orchestrator
            .specialist_names()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}
