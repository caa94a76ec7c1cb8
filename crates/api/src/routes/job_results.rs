//! Route definitions for the `/job-results` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::job_results;
use crate::state::AppState;

/// Routes mounted at `/job-results`.
///
/// ```text
/// GET    /{id}            -> get_result
/// PUT    /{id}            -> promote_result
/// DELETE /{id}            -> delete_result
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(job_results::get_result)
            .put(job_results::promote_result)
            .delete(job_results::delete_result),
    )
}
