use async_trait::async_trait;

use crate::error::BlobError;

/// Opaque bytes addressed by string keys.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key`, replacing any previous value.
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), BlobError>;

    /// Fetch the bytes under `key`, or `None` if nothing is stored there.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), BlobError>;
}
