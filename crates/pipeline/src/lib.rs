//! Workflows over the job, queue, result and image stores.
//!
//! [`Pipeline`] is cheap to clone and holds no mutable state of its own;
//! every call is an independent unit of work against the backing stores.

pub mod dispatch;
pub mod error;
pub mod images;
pub mod jobs;
pub mod promotion;
pub mod results;

use brush_core::cascade::CascadeMode;
use brush_core::pagination::DEFAULT_PAGE_SIZE;
use brush_db::Stores;
use brush_storage::{AttachmentPair, AttachmentStore};

pub use error::{PipelineError, PipelineResult};
pub use jobs::CascadeReport;

/// Default upper bound on `count` for a single job submission.
pub const DEFAULT_MAX_TASKS_PER_JOB: i32 = 1000;

/// Tunables that shape workflow behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Entries per result index page (also the cascade's batch size).
    pub result_page_size: u32,
    /// Entries per image index page.
    pub image_page_size: u32,
    pub cascade: CascadeMode,
    pub max_tasks_per_job: i32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            result_page_size: DEFAULT_PAGE_SIZE,
            image_page_size: DEFAULT_PAGE_SIZE,
            cascade: CascadeMode::default(),
            max_tasks_per_job: DEFAULT_MAX_TASKS_PER_JOB,
        }
    }
}

/// A stored record together with its attachment pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithAttachments<T> {
    pub record: T,
    pub attachments: AttachmentPair,
}

#[derive(Clone)]
pub struct Pipeline {
    stores: Stores,
    attachments: AttachmentStore,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(stores: Stores, attachments: AttachmentStore, settings: PipelineSettings) -> Self {
        Self {
            stores,
            attachments,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use brush_db::memory::MemoryStore;
    use brush_db::models::job::NewJob;
    use brush_storage::MemoryBlobStore;

    use super::*;

    /// A pipeline on in-memory backends plus handles to poke at them.
    pub struct Harness {
        pub pipeline: Pipeline,
        pub stores: Stores,
        pub blobs: Arc<MemoryBlobStore>,
    }

    pub fn harness(settings: PipelineSettings) -> Harness {
        let stores = Stores::from_memory(Arc::new(MemoryStore::new()));
        let blobs = Arc::new(MemoryBlobStore::new());
        let pipeline = Pipeline::new(
            stores.clone(),
            AttachmentStore::new(blobs.clone()),
            settings,
        );
        Harness {
            pipeline,
            stores,
            blobs,
        }
    }

    pub fn new_job(count: i32) -> NewJob {
        NewJob {
            count,
            parent: Some("origin-image".into()),
            phrases: vec!["a moth".into(), "made of glass".into()],
            params: Default::default(),
        }
    }

    pub fn pair(tag: u8) -> AttachmentPair {
        AttachmentPair {
            image: vec![tag; 8],
            latents: vec![tag.wrapping_add(1); 4],
        }
    }
}
