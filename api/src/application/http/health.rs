use axum::{Router, extract::State, routing::get};
use incognito_core::domain::food_analysis::ports::LLMClient;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::application::http::server::{api_entities::response::Response, app_state::AppState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LivenessStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReadinessStatus {
    pub status: String,
    pub provider: String,
    pub model: String,
    pub strict_schema: bool,
}

#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    summary = "Liveness probe",
    responses((status = 200, body = LivenessStatus))
)]
pub async fn live() -> Response<LivenessStatus> {
    Response::OK(LivenessStatus {
        status: "ok".to_string(),
    })
}

/// The model is resolved before the server binds, so a running process is ready.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    summary = "Readiness probe",
    responses((status = 200, body = ReadinessStatus))
)]
pub async fn ready(State(state): State<AppState>) -> Response<ReadinessStatus> {
    let llm_client = state.service.llm_client();

    Response::OK(ReadinessStatus {
        status: "ready".to_string(),
        provider: llm_client.provider().to_string(),
        model: llm_client.model_name(),
        strict_schema: state.args.analysis.strict_schema,
    })
}

#[derive(OpenApi)]
#[openapi(paths(live, ready))]
pub struct HealthApiDoc;

pub fn health_routes(root_path: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("{}/health/live", root_path), get(live))
        .route(&format!("{}/health/ready", root_path), get(ready))
}
