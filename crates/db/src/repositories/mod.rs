//! PostgreSQL implementations of the [`crate::store`] traits.
//!
//! Each repo owns a clone of the pool. Composite units run inside a single
//! transaction; dropping the transaction on an early return rolls it back.

pub mod image_repo;
pub mod job_repo;
pub mod job_result_repo;
pub mod task_repo;

pub use image_repo::ImageRepo;
pub use job_repo::JobRepo;
pub use job_result_repo::JobResultRepo;
pub use task_repo::TaskRepo;

use crate::store::StoreError;

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Turn a unique-constraint violation into [`StoreError::Conflict`]; pass
/// every other error through.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: impl FnOnce() -> String) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            StoreError::Conflict(message())
        }
        _ => StoreError::Database(err),
    }
}
