//! Shared query parameter types for API handlers.

use brush_core::pagination::Direction;
use brush_core::types::Timestamp;
use serde::Deserialize;

/// Cursor pagination over a job's results (`?cursor=&direction=`).
///
/// `cursor` is the `created` value of the last entry already seen; it
/// defaults to now, `direction` to `reverse`.
#[derive(Debug, Default, Deserialize)]
pub struct CursorParams {
    pub cursor: Option<Timestamp>,
    pub direction: Option<Direction>,
}

/// Cursor for the global image index (`?cursor=`); always newest first.
#[derive(Debug, Default, Deserialize)]
pub struct ImageCursorParams {
    pub cursor: Option<Timestamp>,
}
