//! Handlers for job results: `/jobs/{id}/results` and `/job-results/{id}`.
//!
//! All endpoints require the shared API key via [`ApiKey`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use brush_core::types::RecordId;
use brush_storage::AttachmentPair;
use serde::Deserialize;
use validator::Validate;

use crate::encoding;
use crate::error::AppResult;
use crate::extract::{ApiPath, ApiQuery, ValidJson};
use crate::middleware::auth::ApiKey;
use crate::query::CursorParams;
use crate::response::{ResultsResponse, WithEncodedAttachments};
use crate::state::AppState;

/// Body of `POST /jobs/{id}/results`.
#[derive(Debug, Deserialize, Validate)]
pub struct PostResult {
    #[validate(length(min = 1, message = "encoded_image must not be empty"))]
    pub encoded_image: String,
    #[validate(length(min = 1, message = "encoded_latents must not be empty"))]
    pub encoded_latents: String,
}

// ---------------------------------------------------------------------------
// Per-job listing and creation
// ---------------------------------------------------------------------------

/// GET /jobs/{id}/results?cursor=&direction=
///
/// One page of the job's result index: `{results: [{id, job_id, created}]}`.
pub async fn list_results(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<RecordId>,
    ApiQuery(params): ApiQuery<CursorParams>,
) -> AppResult<impl IntoResponse> {
    let results = state
        .pipeline
        .list_results(job_id, params.cursor, params.direction)
        .await?;
    Ok(Json(ResultsResponse { results }))
}

/// POST /jobs/{id}/results
///
/// Store the attachment pair and record the result. Returns 201 with the
/// result record.
pub async fn post_result(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<RecordId>,
    ValidJson(input): ValidJson<PostResult>,
) -> AppResult<impl IntoResponse> {
    let attachments = AttachmentPair {
        image: encoding::decode("encoded_image", &input.encoded_image)?,
        latents: encoding::decode("encoded_latents", &input.encoded_latents)?,
    };

    let result = state.pipeline.post_result(job_id, attachments).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

// ---------------------------------------------------------------------------
// Single result
// ---------------------------------------------------------------------------

/// GET /job-results/{id}
///
/// The result with `encoded_image` and `encoded_latents`. Fails if either
/// attachment is missing.
pub async fn get_result(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiPath(result_id): ApiPath<RecordId>,
) -> AppResult<impl IntoResponse> {
    let result = state.pipeline.get_result(result_id).await?;
    Ok(Json(WithEncodedAttachments::from(result)))
}

/// DELETE /job-results/{id}
pub async fn delete_result(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiPath(result_id): ApiPath<RecordId>,
) -> AppResult<StatusCode> {
    state.pipeline.delete_result(result_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /job-results/{id}
///
/// Promote the result to a saved image. Promoting an id that is no longer
/// a result (already promoted or deleted) also returns 204.
pub async fn promote_result(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiPath(result_id): ApiPath<RecordId>,
) -> AppResult<StatusCode> {
    state.pipeline.promote_result(result_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
