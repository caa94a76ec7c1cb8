pub mod health;
pub mod images;
pub mod job_results;
pub mod job_tasks;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /jobs                          list, submit
/// /jobs/{id}                     get, delete
/// /jobs/{id}/cancel              cancel (POST)
/// /jobs/{id}/results             list page, post result
///
/// /job-results/{id}              get, promote (PUT), delete
///
/// /job-tasks                     claim next task (GET)
///
/// /images                        list page
/// /images/{id}                   get, delete
/// ```
///
/// Every route here requires the API key; `/health` is mounted separately.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/jobs", jobs::router())
        .nest("/job-results", job_results::router())
        .nest("/job-tasks", job_tasks::router())
        .nest("/images", images::router())
}
