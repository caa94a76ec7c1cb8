use axum::routing::get;
use axum::Router;

use crate::handlers::job_tasks;
use crate::state::AppState;

/// Routes mounted at `/job-tasks`.
///
/// ```text
/// GET    /                -> next_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(job_tasks::next_task))
}
