#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blob that must exist for the read to succeed is absent.
    #[error("Blob not found: {key}")]
    Missing { key: String },

    #[error("Blob backend error: {0}")]
    Backend(String),
}
