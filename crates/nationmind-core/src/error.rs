//! Domain error taxonomy for game operations.
//!
//! Every rule the game enforces fails with one of these variants. The
//! HTTP layer maps them to status codes; nothing here knows about HTTP.

/// Errors produced by game logic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// An entity (by id, name or pair) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Input violated a field constraint or structural rule
    /// (length, range, self-relation, duplicate name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request is well-formed but the game rules forbid it
    /// (insufficient troops or gold, unknown action).
    #[error("{0}")]
    BusinessRule(String),

    /// The request conflicts with existing state (double initialization,
    /// duplicate relation pair, no turn yet).
    #[error("{0}")]
    Conflict(String),
}

impl GameError {
    /// Shorthand for a [`GameError::NotFound`] naming the entity and id.
    pub fn not_found(entity: &str, id: impl core::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} with ID {id} not found"))
    }
}

impl From<validator::ValidationErrors> for GameError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}
