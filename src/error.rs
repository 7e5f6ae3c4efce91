//! Engine errors.
//!
//! Refused moves are not errors: they come back as a [`Rejection`](crate::game::types::Rejection)
//! on the action result. A `GameError` means either the match could not be set up or the
//! engine itself is broken.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The match cannot be set up with the requested parameters.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Board state that normal play can never produce.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

pub type GameResult<T> = Result<T, GameError>;
