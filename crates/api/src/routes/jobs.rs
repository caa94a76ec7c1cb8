//! Route definitions for the `/jobs` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{job_results, jobs};
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET    /                -> list_jobs
/// POST   /                -> submit_job
/// GET    /{id}            -> get_job
/// DELETE /{id}            -> delete_job
/// POST   /{id}/cancel     -> cancel_job
/// GET    /{id}/results    -> list_results
/// POST   /{id}/results    -> post_result
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::submit_job))
        .route("/{id}", get(jobs::get_job).delete(jobs::delete_job))
        .route("/{id}/cancel", post(jobs::cancel_job))
        .route(
            "/{id}/results",
            get(job_results::list_results).post(job_results::post_result),
        )
}
