//! Job results and their per-job index entries.

use brush_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::job::Job;

/// One unit of worker output. `parent` and `phrases` are copied from the job
/// when the result is created so they survive later job changes.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct JobResult {
    pub id: RecordId,
    pub job_id: RecordId,
    pub created: Timestamp,
    pub parent: Option<String>,
    pub phrases: Vec<String>,
}

impl JobResult {
    /// New result for `job`, denormalizing the job's prompt fields.
    pub fn for_job(job: &Job, id: RecordId, created: Timestamp) -> Self {
        Self {
            id,
            job_id: job.id,
            created,
            parent: job.parent.clone(),
            phrases: job.phrases.clone(),
        }
    }

    /// The index entry that must exist while this result is live.
    pub fn index_entry(&self) -> ResultIndexEntry {
        ResultIndexEntry {
            job_id: self.job_id,
            created: self.created,
            result_id: self.id,
        }
    }
}

/// `(job_id, created) -> result_id`, the unit of result pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ResultIndexEntry {
    pub job_id: RecordId,
    pub created: Timestamp,
    #[serde(rename = "id")]
    pub result_id: RecordId,
}
