use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use brush_core::error::CoreError;
use brush_db::StoreError;
use brush_pipeline::PipelineError;
use brush_storage::BlobError;
use serde_json::json;

/// Client-visible message for every store or blob failure.
const OPERATION_FAILED: &str = "Operation failed";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, keeps store and blob failures
/// intact for server-side logging, and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce `{message, code, errors?}` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `brush_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Blob(#[from] BlobError),

    /// Request body failed field validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Core(e) => AppError::Core(e),
            PipelineError::Store(e) => AppError::Store(e),
            PipelineError::Blob(e) => AppError::Blob(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    operation_failed()
                }
            },

            // --- Backing store failures ---
            AppError::Store(err) => classify_store_error(err),
            AppError::Blob(err) => {
                tracing::error!(error = %err, "Blob store error");
                operation_failed()
            }

            // --- HTTP-specific errors ---
            AppError::Validation(errors) => {
                let body = json!({
                    "message": "Invalid request",
                    "code": "VALIDATION_ERROR",
                    "errors": errors,
                });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "message": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn operation_failed() -> (StatusCode, &'static str, String) {
    (
        StatusCode::BAD_REQUEST,
        "OPERATION_FAILED",
        OPERATION_FAILED.to_string(),
    )
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - Conflicts (explicit, or a PostgreSQL unique violation `23505`) map to 409.
/// - Everything else maps to the generic 400 with the cause logged.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        StoreError::Database(sqlx::Error::Database(db_err))
            if db_err.code().as_deref() == Some("23505") =>
        {
            let constraint = db_err.constraint().unwrap_or("unknown");
            (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            )
        }
        StoreError::Inconsistent(msg) => {
            tracing::error!(error = %msg, "Store records out of step");
            operation_failed()
        }
        StoreError::Database(other) => {
            tracing::error!(error = %other, "Database error");
            operation_failed()
        }
    }
}
