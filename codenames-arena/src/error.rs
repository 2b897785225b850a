//! Error types for simulation and persistence

use codenames_core::CoreError;

/// Failure reported by a move provider
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("malformed response: {0}")]
    InvalidResponse(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while running games or touching the match store
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("move provider '{model_id}' failed: {source}")]
    InvalidMoveProviderResponse {
        model_id: String,
        #[source]
        source: ProviderError,
    },

    #[error("game did not finish within {limit} steps")]
    StepLimitExceeded { limit: usize },

    #[error("failed to write match record: {message}")]
    PersistenceWriteFailure { message: String },

    #[error("failed to read match records: {message}")]
    PersistenceReadFailure { message: String },
}

impl ArenaError {
    pub(crate) fn write_failure(message: impl ToString) -> Self {
        ArenaError::PersistenceWriteFailure {
            message: message.to_string(),
        }
    }

    pub(crate) fn read_failure(message: impl ToString) -> Self {
        ArenaError::PersistenceReadFailure {
            message: message.to_string(),
        }
    }

    /// True for failures that end a single game but not a batch
    pub fn is_per_game(&self) -> bool {
        !matches!(
            self,
            ArenaError::PersistenceWriteFailure { .. } | ArenaError::PersistenceReadFailure { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ArenaError>;
