use axum::{Json, extract::State};

use confide_filter::POLICY_VERSION;
use confide_types::api::HealthResponse;

use crate::state::AppState;

/// GET /health: liveness check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        policy_version: POLICY_VERSION.to_string(),
        backend: state.backend.name().to_string(),
    })
}
