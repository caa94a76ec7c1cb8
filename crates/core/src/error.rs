use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] keyed by a UUID.
    pub fn not_found(entity: &'static str, id: uuid::Uuid) -> Self {
        CoreError::NotFound {
            entity,
            id: EntityId(id),
        }
    }
}

/// Displayable id carried by [`CoreError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub uuid::Uuid);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
