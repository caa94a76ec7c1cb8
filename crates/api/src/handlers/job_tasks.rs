//! Handler for `/job-tasks`, the worker dispatch endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::AppResult;
use crate::middleware::auth::ApiKey;
use crate::state::AppState;

/// GET /job-tasks
///
/// Claim the next unit of work. Returns 200 with the job to run, or 204
/// when nothing is queued. A claimed task is never handed out again.
pub async fn next_task(_key: ApiKey, State(state): State<AppState>) -> AppResult<Response> {
    let response = match state.pipeline.dequeue().await? {
        Some(job) => Json(job).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}
