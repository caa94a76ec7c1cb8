use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::blob::BlobStore;
use crate::error::BlobError;

/// Process-local blob store for tests and development.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), BlobError> {
        self.blobs.write().await.insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        self.blobs.write().await.remove(key);
        Ok(())
    }
}
