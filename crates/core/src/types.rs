/// Every record id (job, task, result, image) is a UUID v4.
pub type RecordId = uuid::Uuid;

/// Milliseconds since the Unix epoch, UTC. Doubles as the pagination cursor.
pub type Timestamp = i64;

/// Current wall-clock time as a [`Timestamp`].
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh record id.
pub fn new_id() -> RecordId {
    uuid::Uuid::new_v4()
}
