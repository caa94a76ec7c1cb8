//! Job submission, lookup, cancellation and the deletion cascade.

use brush_core::cascade::CascadeMode;
use brush_core::error::CoreError;
use brush_core::pagination::{cursor_now, PageRequest};
use brush_core::types::RecordId;
use brush_db::models::job::{Job, NewJob};
use brush_db::models::job_result::ResultIndexEntry;
use futures::future::join_all;

use crate::error::{PipelineError, PipelineResult};
use crate::Pipeline;

/// What a job deletion removed alongside the job record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeReport {
    pub results_removed: usize,
    /// `true` when a single-page cascade stopped at a full page, so older
    /// results may have been left behind.
    pub truncated: bool,
}

impl Pipeline {
    /// Store the job and enqueue `count` dispatch stubs for it.
    pub async fn submit_job(&self, input: NewJob) -> PipelineResult<Job> {
        let max = self.settings.max_tasks_per_job;
        if input.count < 1 || input.count > max {
            return Err(CoreError::Validation(format!("count must be between 1 and {max}")).into());
        }

        let job = input.into_job();
        self.stores.jobs.insert(&job).await?;

        // count was range-checked above.
        let count = job.count as u32;
        if let Err(err) = self.stores.tasks.enqueue(job.id, count).await {
            if let Err(cleanup) = self.stores.jobs.delete(job.id).await {
                tracing::error!(
                    job_id = %job.id,
                    error = %cleanup,
                    "Failed to remove job after enqueue failure",
                );
            }
            return Err(err.into());
        }

        tracing::info!(job_id = %job.id, count, "Job submitted");
        Ok(job)
    }

    pub async fn list_jobs(&self) -> PipelineResult<Vec<Job>> {
        Ok(self.stores.jobs.list().await?)
    }

    pub async fn get_job(&self, id: RecordId) -> PipelineResult<Job> {
        self.stores
            .jobs
            .find(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Job", id).into())
    }

    pub async fn cancel_job(&self, id: RecordId) -> PipelineResult<()> {
        if !self.stores.jobs.cancel(id).await? {
            return Err(CoreError::not_found("Job", id).into());
        }
        tracing::info!(job_id = %id, "Job cancelled");
        Ok(())
    }

    /// Delete the job's results (records, index entries and attachments),
    /// then the job itself. The job record survives if any result fails to
    /// delete, so the cascade can be retried.
    pub async fn delete_job(&self, id: RecordId) -> PipelineResult<CascadeReport> {
        if self.stores.jobs.find(id).await?.is_none() {
            return Err(CoreError::not_found("Job", id).into());
        }

        // Entries vanish as they are deleted, so every page restarts from the
        // same cursor.
        let page = PageRequest::reverse_from(cursor_now(), self.settings.result_page_size);
        let mut report = CascadeReport {
            results_removed: 0,
            truncated: false,
        };

        loop {
            let entries = self.stores.results.list(id, &page).await?;
            if entries.is_empty() {
                break;
            }

            let full = entries.len() as u32 == page.limit;
            report.results_removed += self.remove_results(&entries).await?;

            match self.settings.cascade {
                CascadeMode::Exhaustive if full => continue,
                CascadeMode::Exhaustive => break,
                CascadeMode::SinglePage => {
                    if full {
                        report.truncated = true;
                        tracing::warn!(
                            job_id = %id,
                            page_size = page.limit,
                            "Single-page cascade hit a full page; older results are orphaned",
                        );
                    }
                    break;
                }
            }
        }

        self.stores.jobs.delete(id).await?;
        tracing::info!(
            job_id = %id,
            results_removed = report.results_removed,
            cascade = self.settings.cascade.name(),
            "Job deleted",
        );
        Ok(report)
    }

    /// Delete every entry's result and attachments concurrently. All
    /// deletions are attempted; the first failure is returned.
    async fn remove_results(&self, entries: &[ResultIndexEntry]) -> PipelineResult<usize> {
        let outcomes = join_all(entries.iter().map(|entry| self.remove_result(entry))).await;
        let removed = outcomes.len();
        outcomes.into_iter().collect::<Result<Vec<()>, _>>()?;
        Ok(removed)
    }

    /// Delete one result: record and index entry as a unit, attachment pair
    /// alongside.
    pub(crate) async fn remove_result(&self, entry: &ResultIndexEntry) -> PipelineResult<()> {
        let (record, blobs) = tokio::join!(
            self.stores.results.delete(entry),
            self.attachments.delete(entry.result_id),
        );
        record?;
        blobs.map_err(PipelineError::from)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use brush_core::pagination::PageRequest;

    use super::*;
    use crate::testing::{harness, new_job, pair};
    use crate::PipelineSettings;

    #[tokio::test]
    async fn submit_enqueues_count_stubs() {
        let h = harness(PipelineSettings::default());
        let job = h.pipeline.submit_job(new_job(3)).await.unwrap();

        assert!(!job.cancelled);
        assert_eq!(h.pipeline.pending_tasks().await.unwrap(), 3);
        assert_eq!(h.pipeline.get_job(job.id).await.unwrap(), job);
    }

    #[tokio::test]
    async fn submit_rejects_count_out_of_range() {
        let h = harness(PipelineSettings {
            max_tasks_per_job: 5,
            ..Default::default()
        });

        for count in [0, 6] {
            let err = h.pipeline.submit_job(new_job(count)).await.unwrap_err();
            assert_matches!(err, PipelineError::Core(CoreError::Validation(_)));
        }
        assert!(h.pipeline.list_jobs().await.unwrap().is_empty());
        assert_eq!(h.pipeline.pending_tasks().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn cancel_and_delete_of_missing_job_are_not_found() {
        let h = harness(PipelineSettings::default());
        let id = brush_core::types::new_id();

        assert_matches!(
            h.pipeline.cancel_job(id).await,
            Err(PipelineError::Core(CoreError::NotFound { entity: "Job", .. }))
        );
        assert_matches!(
            h.pipeline.delete_job(id).await,
            Err(PipelineError::Core(CoreError::NotFound { .. }))
        );
    }

    #[tokio::test]
    async fn cancel_is_sticky() {
        let h = harness(PipelineSettings::default());
        let job = h.pipeline.submit_job(new_job(1)).await.unwrap();

        h.pipeline.cancel_job(job.id).await.unwrap();
        h.pipeline.cancel_job(job.id).await.unwrap();

        assert!(h.pipeline.get_job(job.id).await.unwrap().cancelled);
    }

    #[tokio::test]
    async fn single_page_cascade_leaves_older_results() {
        let h = harness(PipelineSettings {
            result_page_size: 2,
            cascade: CascadeMode::SinglePage,
            ..Default::default()
        });
        let job = h.pipeline.submit_job(new_job(1)).await.unwrap();
        for tag in 0..5 {
            h.pipeline.post_result(job.id, pair(tag)).await.unwrap();
        }

        let report = h.pipeline.delete_job(job.id).await.unwrap();
        assert_eq!(report.results_removed, 2);
        assert!(report.truncated);

        let leftovers = h
            .stores
            .results
            .list(job.id, &PageRequest::reverse_from(i64::MAX, 10))
            .await
            .unwrap();
        assert_eq!(leftovers.len(), 3);
        assert_eq!(h.blobs.len().await, 6);
    }

    #[tokio::test]
    async fn exhaustive_cascade_removes_every_page() {
        let h = harness(PipelineSettings {
            result_page_size: 2,
            ..Default::default()
        });
        let job = h.pipeline.submit_job(new_job(1)).await.unwrap();
        for tag in 0..5 {
            h.pipeline.post_result(job.id, pair(tag)).await.unwrap();
        }

        let report = h.pipeline.delete_job(job.id).await.unwrap();
        assert_eq!(report.results_removed, 5);
        assert!(!report.truncated);

        assert!(h
            .stores
            .results
            .list(job.id, &PageRequest::reverse_from(i64::MAX, 10))
            .await
            .unwrap()
            .is_empty());
        assert!(h.blobs.is_empty().await);
        assert_matches!(
            h.pipeline.get_job(job.id).await,
            Err(PipelineError::Core(CoreError::NotFound { .. }))
        );
    }
}
