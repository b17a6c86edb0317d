//! Error taxonomy surfaced by the score service

use thiserror::Error;

use crate::event_store::PersistenceError;

/// Result type for service operations
pub type ScoreResult<T> = Result<T, ScoreError>;

/// Errors returned by `ScoreService` operations
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Missing or malformed input, reported to the client as a 400
    #[error("{0}")]
    Validation(String),

    /// Unknown player on a stats/reset/delete request
    #[error("No scores found for player '{0}'")]
    NotFound(String),

    /// No event carries the requested sequence number
    #[error("No score found with sequence {0}")]
    EventNotFound(u64),

    /// Flush or load failed; in-memory state was left as it was before the mutation
    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

impl ScoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        ScoreError::Validation(message.into())
    }

    pub fn not_found(player_id: impl Into<String>) -> Self {
        ScoreError::NotFound(player_id.into())
    }
}
