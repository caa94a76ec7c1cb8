//! Handlers for the `/images` resource (saved images).
//!
//! All endpoints require the shared API key via [`ApiKey`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use brush_core::types::RecordId;

use crate::error::AppResult;
use crate::extract::{ApiPath, ApiQuery};
use crate::middleware::auth::ApiKey;
use crate::query::ImageCursorParams;
use crate::response::WithEncodedAttachments;
use crate::state::AppState;

/// GET /images?cursor=
///
/// Newest-first page of the global image index as a bare `[{id, created}]`
/// array.
pub async fn list_images(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ImageCursorParams>,
) -> AppResult<impl IntoResponse> {
    let images = state.pipeline.list_images(params.cursor).await?;
    Ok(Json(images))
}

/// GET /images/{id}
pub async fn get_image(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiPath(image_id): ApiPath<RecordId>,
) -> AppResult<impl IntoResponse> {
    let image = state.pipeline.get_image(image_id).await?;
    Ok(Json(WithEncodedAttachments::from(image)))
}

/// DELETE /images/{id}
///
/// Remove the image, its index entry and both attachments. Returns 204.
pub async fn delete_image(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiPath(image_id): ApiPath<RecordId>,
) -> AppResult<StatusCode> {
    state.pipeline.delete_image(image_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
