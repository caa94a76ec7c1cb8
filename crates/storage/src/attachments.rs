//! Image/latents blob pairs owned by a result or image id.
//!
//! Both halves live under keys derived from the owning id, so a promoted
//! image keeps reading the blobs its result wrote.

use std::sync::Arc;

use brush_core::types::RecordId;

use crate::blob::BlobStore;
use crate::error::BlobError;

/// Key of the image half of `id`'s pair.
pub fn image_key(id: RecordId) -> String {
    format!("{id}:image")
}

/// Key of the latents half of `id`'s pair.
pub fn latents_key(id: RecordId) -> String {
    format!("{id}:latents")
}

/// The two payloads attached to a result or image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPair {
    pub image: Vec<u8>,
    pub latents: Vec<u8>,
}

#[derive(Clone)]
pub struct AttachmentStore {
    blobs: Arc<dyn BlobStore>,
}

impl AttachmentStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Write both halves concurrently. If either write fails, both keys are
    /// removed again before the error is returned.
    pub async fn put(&self, id: RecordId, pair: AttachmentPair) -> Result<(), BlobError> {
        let image_key = image_key(id);
        let latents_key = latents_key(id);

        let (image, latents) = tokio::join!(
            self.blobs.put(&image_key, pair.image),
            self.blobs.put(&latents_key, pair.latents),
        );

        if let Err(err) = image.and(latents) {
            if let Err(cleanup) = self.delete(id).await {
                tracing::error!(
                    attachment_id = %id,
                    error = %cleanup,
                    "Failed to remove partially written attachment pair",
                );
            }
            return Err(err);
        }

        Ok(())
    }

    /// Read both halves concurrently. Fails with [`BlobError::Missing`] if
    /// either one is absent; there is no partial result.
    pub async fn get(&self, id: RecordId) -> Result<AttachmentPair, BlobError> {
        let image_key = image_key(id);
        let latents_key = latents_key(id);

        let (image, latents) =
            tokio::try_join!(self.require(&image_key), self.require(&latents_key))?;

        Ok(AttachmentPair { image, latents })
    }

    /// Remove both halves concurrently, tolerating either being absent.
    pub async fn delete(&self, id: RecordId) -> Result<(), BlobError> {
        let image_key = image_key(id);
        let latents_key = latents_key(id);

        let (image, latents) = tokio::join!(
            self.blobs.delete(&image_key),
            self.blobs.delete(&latents_key),
        );
        image.and(latents)
    }

    async fn require(&self, key: &str) -> Result<Vec<u8>, BlobError> {
        self.blobs
            .get(key)
            .await?
            .ok_or_else(|| BlobError::Missing {
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use brush_core::types::new_id;

    use super::*;
    use crate::memory::MemoryBlobStore;

    fn pair() -> AttachmentPair {
        AttachmentPair {
            image: b"png-bytes".to_vec(),
            latents: vec![0, 1, 2, 3],
        }
    }

    /// Refuses writes to latents keys, delegating everything else.
    struct RejectLatents(Arc<MemoryBlobStore>);

    #[async_trait]
    impl BlobStore for RejectLatents {
        async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), BlobError> {
            if key.ends_with(":latents") {
                return Err(BlobError::Backend("quota exceeded".into()));
            }
            self.0.put(key, data).await
        }

        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
            self.0.get(key).await
        }

        async fn delete(&self, key: &str) -> Result<(), BlobError> {
            self.0.delete(key).await
        }
    }

    #[test]
    fn keys_are_derived_from_the_owner_id() {
        let id = new_id();
        assert_eq!(image_key(id), format!("{id}:image"));
        assert_eq!(latents_key(id), format!("{id}:latents"));
    }

    #[tokio::test]
    async fn put_then_get_returns_same_bytes() {
        let store = AttachmentStore::new(Arc::new(MemoryBlobStore::new()));
        let id = new_id();
        store.put(id, pair()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), pair());
    }

    #[tokio::test]
    async fn get_fails_when_latents_are_missing() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let store = AttachmentStore::new(blobs.clone());
        let id = new_id();
        store.put(id, pair()).await.unwrap();
        blobs.delete(&latents_key(id)).await.unwrap();

        let err = store.get(id).await.unwrap_err();
        assert_matches!(err, BlobError::Missing { key } if key == latents_key(id));
    }

    #[tokio::test]
    async fn get_fails_when_image_is_missing() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let store = AttachmentStore::new(blobs.clone());
        let id = new_id();
        store.put(id, pair()).await.unwrap();
        blobs.delete(&image_key(id)).await.unwrap();

        assert_matches!(store.get(id).await, Err(BlobError::Missing { .. }));
    }

    #[tokio::test]
    async fn delete_tolerates_absent_halves() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let store = AttachmentStore::new(blobs.clone());
        let id = new_id();
        store.put(id, pair()).await.unwrap();
        blobs.delete(&image_key(id)).await.unwrap();

        store.delete(id).await.unwrap();
        store.delete(id).await.unwrap();
        assert!(blobs.is_empty().await);
    }

    #[tokio::test]
    async fn failed_put_leaves_no_half_behind() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let store = AttachmentStore::new(Arc::new(RejectLatents(blobs.clone())));

        let err = store.put(new_id(), pair()).await.unwrap_err();
        assert_matches!(err, BlobError::Backend(_));
        assert!(blobs.is_empty().await);
    }
}
