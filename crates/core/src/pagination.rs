//! Cursor pagination over time-ordered indexes.
//!
//! A cursor is a creation [`Timestamp`] and is always an *exclusive* bound:
//! reverse pages hold entries strictly older than the cursor, forward pages
//! entries strictly newer. Clients continue by sending back the `created`
//! value of the last item they received.

use serde::{Deserialize, Serialize};

use crate::types::{now_millis, Timestamp};

/// Default number of entries per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound accepted for configured page sizes.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Walk direction through an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `created < cursor`, newest first.
    #[default]
    Reverse,
    /// `created > cursor`, oldest first.
    Forward,
}

/// One page request against a time-ordered index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Timestamp,
    pub direction: Direction,
    pub limit: u32,
}

impl PageRequest {
    /// Build a request, defaulting the cursor to [`cursor_now`] and the
    /// direction to [`Direction::Reverse`].
    pub fn new(cursor: Option<Timestamp>, direction: Option<Direction>, limit: u32) -> Self {
        Self {
            cursor: cursor.unwrap_or_else(cursor_now),
            direction: direction.unwrap_or_default(),
            limit,
        }
    }

    /// Newest-first page ending just before `cursor`.
    pub fn reverse_from(cursor: Timestamp, limit: u32) -> Self {
        Self {
            cursor,
            direction: Direction::Reverse,
            limit,
        }
    }
}

/// The "now" cursor. One past the current millisecond, so a reverse page
/// still includes entries written during it.
pub fn cursor_now() -> Timestamp {
    now_millis().saturating_add(1)
}

/// Clamp a configured page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(size: u32) -> u32 {
    size.clamp(1, MAX_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_cursor_and_direction_are_kept() {
        let page = PageRequest::new(Some(150), Some(Direction::Forward), 20);
        assert_eq!(page.cursor, 150);
        assert_eq!(page.direction, Direction::Forward);
        assert_eq!(page.limit, 20);
    }

    #[test]
    fn defaults_to_reverse_from_now() {
        let before = now_millis();
        let page = PageRequest::new(None, None, 5);
        assert_eq!(page.direction, Direction::Reverse);
        assert!(page.cursor > before);
        assert_eq!(page.limit, 5);
    }

    #[test]
    fn reverse_from_sets_direction() {
        let page = PageRequest::reverse_from(150, 3);
        assert_eq!(page.direction, Direction::Reverse);
        assert_eq!(page.cursor, 150);
    }

    #[test]
    fn direction_deserializes_lowercase() {
        let d: Direction = serde_json::from_str("\"forward\"").unwrap();
        assert_eq!(d, Direction::Forward);
        assert!(serde_json::from_str::<Direction>("\"sideways\"").is_err());
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(clamp_page_size(0), 1);
        assert_eq!(clamp_page_size(20), 20);
        assert_eq!(clamp_page_size(10_000), MAX_PAGE_SIZE);
    }
}
