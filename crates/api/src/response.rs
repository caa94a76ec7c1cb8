//! Response envelopes for API handlers.

use brush_db::models::job::Job;
use brush_db::models::job_result::ResultIndexEntry;
use brush_pipeline::WithAttachments;
use serde::Serialize;

use crate::encoding;

/// `GET /jobs` body.
#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<Job>,
}

/// `GET /jobs/{id}/results` body.
#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<ResultIndexEntry>,
}

/// A result or image with both attachments inlined as base64.
#[derive(Debug, Serialize)]
pub struct WithEncodedAttachments<T: Serialize> {
    #[serde(flatten)]
    pub record: T,
    pub encoded_image: String,
    pub encoded_latents: String,
}

impl<T: Serialize> From<WithAttachments<T>> for WithEncodedAttachments<T> {
    fn from(value: WithAttachments<T>) -> Self {
        Self {
            encoded_image: encoding::encode(&value.attachments.image),
            encoded_latents: encoding::encode(&value.attachments.latents),
            record: value.record,
        }
    }
}
