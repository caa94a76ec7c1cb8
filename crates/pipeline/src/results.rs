//! Posting, reading, listing and deleting job results.

use brush_core::error::CoreError;
use brush_core::pagination::{Direction, PageRequest};
use brush_core::types::{new_id, now_millis, RecordId, Timestamp};
use brush_db::models::job_result::{JobResult, ResultIndexEntry};
use brush_storage::AttachmentPair;

use crate::error::PipelineResult;
use crate::{Pipeline, WithAttachments};

impl Pipeline {
    /// Record a finished unit of work for `job_id`.
    ///
    /// The attachment pair is written first; if the record and its index
    /// entry then fail to land, the pair is deleted again. Results are
    /// accepted for cancelled jobs.
    pub async fn post_result(
        &self,
        job_id: RecordId,
        attachments: AttachmentPair,
    ) -> PipelineResult<JobResult> {
        let job = self.get_job(job_id).await?;
        let result = JobResult::for_job(&job, new_id(), now_millis());

        self.attachments.put(result.id, attachments).await?;

        if let Err(err) = self.stores.results.create(&result).await {
            if let Err(cleanup) = self.attachments.delete(result.id).await {
                tracing::error!(
                    result_id = %result.id,
                    error = %cleanup,
                    "Failed to remove attachments of unrecorded result",
                );
            }
            return Err(err.into());
        }

        tracing::info!(job_id = %job.id, result_id = %result.id, "Result recorded");
        Ok(result)
    }

    /// One page of `job_id`'s result index.
    pub async fn list_results(
        &self,
        job_id: RecordId,
        cursor: Option<Timestamp>,
        direction: Option<Direction>,
    ) -> PipelineResult<Vec<ResultIndexEntry>> {
        let page = PageRequest::new(cursor, direction, self.settings.result_page_size);
        Ok(self.stores.results.list(job_id, &page).await?)
    }

    /// The result and both attachments, fetched concurrently.
    pub async fn get_result(&self, id: RecordId) -> PipelineResult<WithAttachments<JobResult>> {
        let (record, attachments) =
            tokio::join!(self.stores.results.find(id), self.attachments.get(id));

        let record = record?.ok_or_else(|| CoreError::not_found("JobResult", id))?;
        Ok(WithAttachments {
            record,
            attachments: attachments?,
        })
    }

    pub async fn delete_result(&self, id: RecordId) -> PipelineResult<()> {
        let result = self
            .stores
            .results
            .find(id)
            .await?
            .ok_or_else(|| CoreError::not_found("JobResult", id))?;

        self.remove_result(&result.index_entry()).await?;
        tracing::info!(job_id = %result.job_id, result_id = %id, "Result deleted");
        Ok(())
    }
}
