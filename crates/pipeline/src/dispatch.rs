//! Handing queued work to workers.

use brush_db::models::job::Job;

use crate::error::PipelineResult;
use crate::Pipeline;

impl Pipeline {
    /// Pop stubs until one references a live, uncancelled job and return
    /// that job. Stubs for deleted or cancelled jobs are consumed and
    /// dropped. Returns `None` once the queue is drained.
    ///
    /// A stub is off the queue before its job is looked up, so an error
    /// after the pop loses that unit of work; there is no redelivery.
    pub async fn dequeue(&self) -> PipelineResult<Option<Job>> {
        let mut discarded: u64 = 0;

        while let Some(task) = self.stores.tasks.pop().await? {
            match self.stores.jobs.find(task.job_id).await? {
                Some(job) if !job.cancelled => {
                    tracing::debug!(
                        job_id = %job.id,
                        task_id = %task.id,
                        discarded,
                        "Task dispatched",
                    );
                    return Ok(Some(job));
                }
                Some(_) => {
                    tracing::debug!(job_id = %task.job_id, task_id = %task.id, "Dropping stub of cancelled job");
                    discarded += 1;
                }
                None => {
                    tracing::debug!(job_id = %task.job_id, task_id = %task.id, "Dropping stub of deleted job");
                    discarded += 1;
                }
            }
        }

        if discarded > 0 {
            tracing::info!(discarded, "Task queue drained; only stale stubs remained");
        }
        Ok(None)
    }

    /// Stubs still waiting in the queue, stale ones included.
    pub async fn pending_tasks(&self) -> PipelineResult<u64> {
        Ok(self.stores.tasks.pending().await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{harness, new_job};
    use crate::PipelineSettings;

    #[tokio::test]
    async fn empty_queue_yields_none() {
        let h = harness(PipelineSettings::default());
        assert!(h.pipeline.dequeue().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn jobs_are_dispatched_in_submission_order() {
        let h = harness(PipelineSettings::default());
        let first = h.pipeline.submit_job(new_job(1)).await.unwrap();
        let second = h.pipeline.submit_job(new_job(2)).await.unwrap();

        let order: Vec<_> = [
            h.pipeline.dequeue().await.unwrap(),
            h.pipeline.dequeue().await.unwrap(),
            h.pipeline.dequeue().await.unwrap(),
        ]
        .into_iter()
        .map(|job| job.map(|j| j.id))
        .collect();

        assert_eq!(order, vec![Some(first.id), Some(second.id), Some(second.id)]);
        assert!(h.pipeline.dequeue().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stubs_of_deleted_jobs_are_consumed() {
        let h = harness(PipelineSettings::default());
        let gone = h.pipeline.submit_job(new_job(2)).await.unwrap();
        let live = h.pipeline.submit_job(new_job(1)).await.unwrap();
        h.pipeline.delete_job(gone.id).await.unwrap();

        assert_eq!(h.pipeline.pending_tasks().await.unwrap(), 3);
        let job = h.pipeline.dequeue().await.unwrap().unwrap();
        assert_eq!(job.id, live.id);
        assert_eq!(h.pipeline.pending_tasks().await.unwrap(), 0);
    }
}
