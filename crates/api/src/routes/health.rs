use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the record store answered.
    pub store_healthy: bool,
    /// Queued task stubs, when the store answered.
    pub pending_tasks: Option<u64>,
}

/// GET /health -- returns service and store health. No API key required.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let pending_tasks = match state.pipeline.pending_tasks().await {
        Ok(count) => Some(count),
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the store");
            None
        }
    };
    let store_healthy = pending_tasks.is_some();

    let status = if store_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store_healthy,
        pending_tasks,
    })
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
