//! Shared-secret authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use brush_core::error::CoreError;
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the configured API key.
///
/// The key is sent as the raw `Authorization` header value, optionally
/// prefixed with `Bearer `. Add this as an extractor parameter to every
/// handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(_key: ApiKey, State(state): State<AppState>) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let presented = header.strip_prefix("Bearer ").unwrap_or(header).trim();

        if !keys_match(presented, &state.config.api_key) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid API key".into(),
            )));
        }

        Ok(ApiKey)
    }
}

/// Compares SHA-256 digests of the two keys.
fn keys_match(presented: &str, expected: &str) -> bool {
    Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
}
