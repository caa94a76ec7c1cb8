//! In-process implementation of every store trait.
//!
//! All state sits behind one mutex, so each trait call (including the
//! composite units) observes and leaves a consistent snapshot. Intended for
//! tests and local development.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::ops::Bound;

use async_trait::async_trait;
use brush_core::pagination::{Direction, PageRequest};
use brush_core::types::{new_id, RecordId, Timestamp};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::image::{Image, ImageIndexEntry};
use crate::models::job::Job;
use crate::models::job_result::{JobResult, ResultIndexEntry};
use crate::models::task::Task;
use crate::store::{ImageStore, JobStore, ResultStore, StoreError, TaskQueue};

#[derive(Debug, Default)]
struct State {
    jobs: HashMap<RecordId, Job>,
    tasks: VecDeque<Task>,
    results: HashMap<RecordId, JobResult>,
    /// `(job_id, created, result_id)`
    result_index: BTreeSet<(RecordId, Timestamp, RecordId)>,
    images: HashMap<RecordId, Image>,
    /// `(created, image_id)`
    image_index: BTreeSet<(Timestamp, RecordId)>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert(&self, job: &Job) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.jobs.contains_key(&job.id) {
            return Err(StoreError::Conflict(format!("job {} already exists", job.id)));
        }
        state.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn find(&self, id: RecordId) -> Result<Option<Job>, StoreError> {
        Ok(self.state.lock().await.jobs.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Job>, StoreError> {
        let state = self.state.lock().await;
        let mut jobs: Vec<Job> = state.jobs.values().cloned().collect();
        jobs.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(jobs)
    }

    async fn cancel(&self, id: RecordId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        match state.jobs.get_mut(&id) {
            Some(job) => {
                job.cancelled = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: RecordId) -> Result<bool, StoreError> {
        Ok(self.state.lock().await.jobs.remove(&id).is_some())
    }
}

#[async_trait]
impl TaskQueue for MemoryStore {
    async fn enqueue(&self, job_id: RecordId, count: u32) -> Result<Vec<Task>, StoreError> {
        let tasks: Vec<Task> = (0..count).map(|_| Task { id: new_id(), job_id }).collect();
        self.state.lock().await.tasks.extend(tasks.iter().cloned());
        Ok(tasks)
    }

    async fn pop(&self) -> Result<Option<Task>, StoreError> {
        Ok(self.state.lock().await.tasks.pop_front())
    }

    async fn pending(&self) -> Result<u64, StoreError> {
        Ok(self.state.lock().await.tasks.len() as u64)
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn create(&self, result: &JobResult) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.results.contains_key(&result.id) {
            return Err(StoreError::Conflict(format!(
                "result {} already exists",
                result.id
            )));
        }
        state.results.insert(result.id, result.clone());
        state
            .result_index
            .insert((result.job_id, result.created, result.id));
        Ok(())
    }

    async fn find(&self, id: RecordId) -> Result<Option<JobResult>, StoreError> {
        Ok(self.state.lock().await.results.get(&id).cloned())
    }

    async fn list(
        &self,
        job_id: RecordId,
        page: &PageRequest,
    ) -> Result<Vec<ResultIndexEntry>, StoreError> {
        let state = self.state.lock().await;
        let (lower, upper) = match page.direction {
            Direction::Reverse => (
                Bound::Included((job_id, Timestamp::MIN, Uuid::nil())),
                Bound::Excluded((job_id, page.cursor, Uuid::nil())),
            ),
            Direction::Forward => (
                Bound::Excluded((job_id, page.cursor, Uuid::max())),
                Bound::Included((job_id, Timestamp::MAX, Uuid::max())),
            ),
        };
        let range = state.result_index.range((lower, upper));
        let to_entry = |&(job_id, created, result_id): &(RecordId, Timestamp, RecordId)| {
            ResultIndexEntry {
                job_id,
                created,
                result_id,
            }
        };
        let limit = page.limit as usize;
        let entries = match page.direction {
            Direction::Reverse => range.rev().take(limit).map(to_entry).collect(),
            Direction::Forward => range.take(limit).map(to_entry).collect(),
        };
        Ok(entries)
    }

    async fn record_index(&self, entry: &ResultIndexEntry) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .result_index
            .insert((entry.job_id, entry.created, entry.result_id));
        Ok(())
    }

    async fn remove_index(&self, entry: &ResultIndexEntry) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .result_index
            .remove(&(entry.job_id, entry.created, entry.result_id));
        Ok(())
    }

    async fn delete(&self, entry: &ResultIndexEntry) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.results.remove(&entry.result_id);
        state
            .result_index
            .remove(&(entry.job_id, entry.created, entry.result_id));
        Ok(())
    }

    async fn promote(&self, id: RecordId) -> Result<Option<Image>, StoreError> {
        let mut state = self.state.lock().await;
        let Some(result) = state.results.get(&id).cloned() else {
            return Ok(None);
        };

        let key = (result.job_id, result.created, result.id);
        if !state.result_index.contains(&key) {
            tracing::error!(
                result_id = %id,
                job_id = %result.job_id,
                "Result has no index entry, promotion aborted"
            );
            return Err(StoreError::Inconsistent(format!(
                "result {id} has no index entry"
            )));
        }
        if state.images.contains_key(&id) {
            return Err(StoreError::Conflict(format!("image {id} already exists")));
        }

        let image = Image::from_result(&result);
        state.results.remove(&id);
        state.result_index.remove(&key);
        state.image_index.insert((image.created, image.id));
        state.images.insert(image.id, image.clone());
        Ok(Some(image))
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn find(&self, id: RecordId) -> Result<Option<Image>, StoreError> {
        Ok(self.state.lock().await.images.get(&id).cloned())
    }

    async fn list(&self, page: &PageRequest) -> Result<Vec<ImageIndexEntry>, StoreError> {
        let state = self.state.lock().await;
        let to_entry = |&(created, image_id): &(Timestamp, RecordId)| ImageIndexEntry {
            created,
            image_id,
        };
        let limit = page.limit as usize;
        let entries = match page.direction {
            Direction::Reverse => state
                .image_index
                .range(..(page.cursor, Uuid::nil()))
                .rev()
                .take(limit)
                .map(to_entry)
                .collect(),
            Direction::Forward => state
                .image_index
                .range((Bound::Excluded((page.cursor, Uuid::max())), Bound::Unbounded))
                .take(limit)
                .map(to_entry)
                .collect(),
        };
        Ok(entries)
    }

    async fn delete(&self, image: &Image) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.images.remove(&image.id);
        state.image_index.remove(&(image.created, image.id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;

    use super::*;
    use crate::store::Stores;

    fn result(job_id: RecordId, created: Timestamp) -> JobResult {
        JobResult {
            id: new_id(),
            job_id,
            created,
            parent: None,
            phrases: vec!["a lighthouse".into()],
        }
    }

    #[tokio::test]
    async fn queue_is_fifo() {
        let stores = Stores::memory();
        let first = new_id();
        let second = new_id();
        stores.tasks.enqueue(first, 2).await.unwrap();
        stores.tasks.enqueue(second, 1).await.unwrap();

        assert_eq!(stores.tasks.pending().await.unwrap(), 3);
        assert_eq!(stores.tasks.pop().await.unwrap().unwrap().job_id, first);
        assert_eq!(stores.tasks.pop().await.unwrap().unwrap().job_id, first);
        assert_eq!(stores.tasks.pop().await.unwrap().unwrap().job_id, second);
        assert!(stores.tasks.pop().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reverse_page_excludes_cursor_and_newer() {
        let stores = Stores::memory();
        let job_id = new_id();
        for created in [100, 150, 200] {
            stores.results.create(&result(job_id, created)).await.unwrap();
        }
        // Other jobs' entries never leak into the page.
        stores.results.create(&result(new_id(), 120)).await.unwrap();

        let page = PageRequest::reverse_from(150, 10);
        let entries = stores.results.list(job_id, &page).await.unwrap();
        let created: Vec<_> = entries.iter().map(|e| e.created).collect();
        assert_eq!(created, vec![100]);
    }

    #[tokio::test]
    async fn forward_page_is_ascending_and_bounded() {
        let stores = Stores::memory();
        let job_id = new_id();
        for created in [10, 20, 30, 40] {
            stores.results.create(&result(job_id, created)).await.unwrap();
        }

        let page = PageRequest::new(Some(10), Some(Direction::Forward), 2);
        let entries = stores.results.list(job_id, &page).await.unwrap();
        let created: Vec<_> = entries.iter().map(|e| e.created).collect();
        assert_eq!(created, vec![20, 30]);
    }

    #[tokio::test]
    async fn equal_timestamps_are_both_indexed() {
        let stores = Stores::memory();
        let job_id = new_id();
        stores.results.create(&result(job_id, 500)).await.unwrap();
        stores.results.create(&result(job_id, 500)).await.unwrap();

        let entries = stores
            .results
            .list(job_id, &PageRequest::reverse_from(501, 10))
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn promote_moves_result_into_images() {
        let stores = Stores::memory();
        let r = result(new_id(), 300);
        stores.results.create(&r).await.unwrap();

        let image = stores.results.promote(r.id).await.unwrap().unwrap();
        assert_eq!(image.id, r.id);
        assert_eq!(image.created, 300);

        assert!(stores.results.find(r.id).await.unwrap().is_none());
        let entries = stores
            .results
            .list(r.job_id, &PageRequest::reverse_from(1_000, 10))
            .await
            .unwrap();
        assert!(entries.is_empty());

        let listed = stores
            .images
            .list(&PageRequest::reverse_from(1_000, 10))
            .await
            .unwrap();
        assert_eq!(listed, vec![image.index_entry()]);
    }

    #[tokio::test]
    async fn promote_of_missing_result_is_noop() {
        let stores = Stores::memory();
        assert!(stores.results.promote(new_id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn promote_without_index_entry_changes_nothing() {
        let stores = Stores::from_memory(Arc::new(MemoryStore::new()));
        let r = result(new_id(), 300);
        stores.results.create(&r).await.unwrap();
        stores.results.remove_index(&r.index_entry()).await.unwrap();

        let err = stores.results.promote(r.id).await.unwrap_err();
        assert_matches!(err, StoreError::Inconsistent(_));

        assert!(stores.results.find(r.id).await.unwrap().is_some());
        assert!(stores.images.find(r.id).await.unwrap().is_none());
        let images = stores
            .images
            .list(&PageRequest::reverse_from(1_000, 10))
            .await
            .unwrap();
        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn delete_tolerates_orphaned_index_entry() {
        let stores = Stores::memory();
        let job_id = new_id();
        let orphan = ResultIndexEntry {
            job_id,
            created: 42,
            result_id: new_id(),
        };
        stores.results.record_index(&orphan).await.unwrap();

        stores.results.delete(&orphan).await.unwrap();
        let entries = stores
            .results
            .list(job_id, &PageRequest::reverse_from(100, 10))
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn cancel_and_delete_report_missing_jobs() {
        let stores = Stores::memory();
        assert!(!stores.jobs.cancel(new_id()).await.unwrap());
        assert!(!stores.jobs.delete(new_id()).await.unwrap());
    }
}
