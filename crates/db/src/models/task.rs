use brush_core::types::RecordId;
use serde::Serialize;
use sqlx::FromRow;

/// A pending dispatch stub. Carries no payload beyond the job it points at.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Task {
    pub id: RecordId,
    pub job_id: RecordId,
}
