//! Handlers for the `/jobs` resource.
//!
//! All endpoints require the shared API key via [`ApiKey`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use brush_core::types::RecordId;
use brush_db::models::job::NewJob;

use crate::error::AppResult;
use crate::extract::{ApiPath, ValidJson};
use crate::middleware::auth::ApiKey;
use crate::response::JobsResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /jobs
///
/// Store a new job and enqueue `count` tasks for it. `id`, `created` and
/// `cancelled` are assigned server-side. Returns 201 with the created job.
pub async fn submit_job(
    _key: ApiKey,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<NewJob>,
) -> AppResult<impl IntoResponse> {
    let job = state.pipeline.submit_job(input).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /jobs
///
/// Every job, newest first. Not paginated.
pub async fn list_jobs(
    _key: ApiKey,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let jobs = state.pipeline.list_jobs().await?;
    Ok(Json(JobsResponse { jobs }))
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

/// GET /jobs/{id}
pub async fn get_job(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<RecordId>,
) -> AppResult<impl IntoResponse> {
    let job = state.pipeline.get_job(job_id).await?;
    Ok(Json(job))
}

// ---------------------------------------------------------------------------
// Cancel
// ---------------------------------------------------------------------------

/// POST /jobs/{id}/cancel
///
/// Mark the job cancelled. Its queued tasks are discarded when dequeued.
/// Returns 204; cancelling twice is not an error.
pub async fn cancel_job(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<RecordId>,
) -> AppResult<StatusCode> {
    state.pipeline.cancel_job(job_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// DELETE /jobs/{id}
///
/// Delete the job after removing its results and their attachments.
/// Returns 204.
pub async fn delete_job(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<RecordId>,
) -> AppResult<StatusCode> {
    state.pipeline.delete_job(job_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
