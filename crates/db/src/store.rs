//! Store traits shared by the PostgreSQL and in-memory backends.
//!
//! Each method is one logical store operation. The composite units
//! ([`ResultStore::create`], [`ResultStore::delete`], [`ResultStore::promote`],
//! [`ImageStore::delete`]) either apply every write or none of them.

use std::sync::Arc;

use async_trait::async_trait;
use brush_core::pagination::PageRequest;
use brush_core::types::RecordId;

use crate::memory::MemoryStore;
use crate::models::image::{Image, ImageIndexEntry};
use crate::models::job::Job;
use crate::models::job_result::{JobResult, ResultIndexEntry};
use crate::models::task::Task;
use crate::repositories::{ImageRepo, JobRepo, JobResultRepo, TaskRepo};
use crate::DbPool;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A write collided with an existing record.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A composite unit found the records it spans out of step with each other.
    #[error("Inconsistent state: {0}")]
    Inconsistent(String),
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, job: &Job) -> Result<(), StoreError>;

    async fn find(&self, id: RecordId) -> Result<Option<Job>, StoreError>;

    /// Every job, newest first.
    async fn list(&self) -> Result<Vec<Job>, StoreError>;

    /// Set `cancelled`. Returns `false` if the job does not exist.
    async fn cancel(&self, id: RecordId) -> Result<bool, StoreError>;

    /// Returns `false` if the job did not exist.
    async fn delete(&self, id: RecordId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Append `count` stubs for `job_id` to the back of the queue.
    async fn enqueue(&self, job_id: RecordId, count: u32) -> Result<Vec<Task>, StoreError>;

    /// Remove the oldest stub and hand it back. The stub is gone from the
    /// queue before the caller sees it.
    async fn pop(&self) -> Result<Option<Task>, StoreError>;

    /// Number of stubs still queued.
    async fn pending(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Insert the result together with its index entry.
    async fn create(&self, result: &JobResult) -> Result<(), StoreError>;

    async fn find(&self, id: RecordId) -> Result<Option<JobResult>, StoreError>;

    /// One page of a job's index under the cursor rules of [`PageRequest`].
    async fn list(
        &self,
        job_id: RecordId,
        page: &PageRequest,
    ) -> Result<Vec<ResultIndexEntry>, StoreError>;

    /// Raw index insert, without touching the result record.
    async fn record_index(&self, entry: &ResultIndexEntry) -> Result<(), StoreError>;

    /// Raw index delete, without touching the result record.
    async fn remove_index(&self, entry: &ResultIndexEntry) -> Result<(), StoreError>;

    /// Delete the result named by `entry` and the entry itself. Either may
    /// already be gone.
    async fn delete(&self, entry: &ResultIndexEntry) -> Result<(), StoreError>;

    /// Move a result into the image collection: insert the image and its
    /// index entry, delete the result and its index entry. Returns `None`
    /// when no such result exists.
    async fn promote(&self, id: RecordId) -> Result<Option<Image>, StoreError>;
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn find(&self, id: RecordId) -> Result<Option<Image>, StoreError>;

    /// One page of the global image index.
    async fn list(&self, page: &PageRequest) -> Result<Vec<ImageIndexEntry>, StoreError>;

    /// Delete the image and its index entry.
    async fn delete(&self, image: &Image) -> Result<(), StoreError>;
}

/// The four stores a pipeline runs against.
#[derive(Clone)]
pub struct Stores {
    pub jobs: Arc<dyn JobStore>,
    pub tasks: Arc<dyn TaskQueue>,
    pub results: Arc<dyn ResultStore>,
    pub images: Arc<dyn ImageStore>,
}

impl Stores {
    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: DbPool) -> Self {
        Self {
            jobs: Arc::new(JobRepo::new(pool.clone())),
            tasks: Arc::new(TaskRepo::new(pool.clone())),
            results: Arc::new(JobResultRepo::new(pool.clone())),
            images: Arc::new(ImageRepo::new(pool)),
        }
    }

    /// In-process stores sharing one [`MemoryStore`].
    pub fn memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Wrap an existing [`MemoryStore`] so callers can keep a handle to it.
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            jobs: store.clone(),
            tasks: store.clone(),
            results: store.clone(),
            images: store,
        }
    }
}
