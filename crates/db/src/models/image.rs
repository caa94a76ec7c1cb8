//! Saved images and the global image index.

use brush_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::job_result::JobResult;

/// Partition token shared by every image index entry.
pub const IMAGE_PARTITION: &str = "image";

/// A result that was promoted into the permanent collection. Keeps the
/// result's id, and with it the result's attachment pair.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Image {
    pub id: RecordId,
    pub created: Timestamp,
    pub parent: Option<String>,
    pub phrases: Vec<String>,
}

impl Image {
    /// The image a promotion of `result` produces (`job_id` is dropped).
    pub fn from_result(result: &JobResult) -> Self {
        Self {
            id: result.id,
            created: result.created,
            parent: result.parent.clone(),
            phrases: result.phrases.clone(),
        }
    }

    pub fn index_entry(&self) -> ImageIndexEntry {
        ImageIndexEntry {
            created: self.created,
            image_id: self.id,
        }
    }
}

/// `(IMAGE_PARTITION, created) -> image_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ImageIndexEntry {
    pub created: Timestamp,
    #[serde(rename = "id")]
    pub image_id: RecordId,
}
