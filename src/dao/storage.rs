//! Backend-neutral storage errors.

use std::error::Error;
use thiserror::Error;

use crate::dao::models::TeamId;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend could not be reached or failed mid-operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// What the backend was doing.
        message: String,
        /// Driver error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// Stored data contradicts itself, e.g. a game referencing a team that no longer exists.
    #[error("storage integrity violation: {message}")]
    Integrity {
        /// Description of the inconsistency.
        message: String,
    },
    /// A game write named a team that is no longer stored.
    #[error("cannot record a game for missing team `{team_id}`")]
    MissingTeam {
        /// Identifier of the absent team.
        team_id: TeamId,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct an integrity error describing inconsistent stored data.
    pub fn integrity(message: impl Into<String>) -> Self {
        StorageError::Integrity {
            message: message.into(),
        }
    }
}
