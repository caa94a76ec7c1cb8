use brush_core::error::CoreError;
use brush_db::StoreError;
use brush_storage::BlobError;

/// Failure of a workflow step. Store and blob errors keep their source so
/// the HTTP layer can log the root cause.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Blob(#[from] BlobError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
