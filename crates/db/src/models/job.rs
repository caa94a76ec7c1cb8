//! Job records and the submission DTO.

use brush_core::types::{new_id, now_millis, RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Keys the server assigns itself; dropped from client-supplied parameters.
const RESERVED_PARAM_KEYS: [&str; 4] = ["id", "created", "cancelled", "job_id"];

/// A generation job. Everything the client sends beyond the known fields is
/// kept verbatim in `params` and flattened back out on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: RecordId,
    pub created: Timestamp,
    #[serde(default)]
    pub cancelled: bool,
    pub count: i32,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub phrases: Vec<String>,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

/// DTO for `POST /jobs`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewJob {
    /// Number of dispatch stubs to enqueue.
    #[validate(range(min = 1, message = "count must be at least 1"))]
    pub count: i32,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    #[validate(length(max = 64, message = "at most 64 phrases are allowed"))]
    pub phrases: Vec<String>,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl NewJob {
    /// Materialize the job, assigning id and creation time server-side.
    pub fn into_job(self) -> Job {
        let mut params = self.params;
        for key in RESERVED_PARAM_KEYS {
            params.remove(key);
        }

        Job {
            id: new_id(),
            created: now_millis(),
            cancelled: false,
            count: self.count,
            parent: self.parent,
            phrases: self.phrases,
            params,
        }
    }
}
