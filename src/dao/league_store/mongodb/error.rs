//! Errors raised by the MongoDB store.

use mongodb::error::Error as MongoError;
use thiserror::Error;

use crate::dao::models::{GameId, TeamId};

/// Result alias for MongoDB store operations.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures of the MongoDB store, before they are folded into storage errors.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// Connection string could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// Rejected connection string.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Driver rejected the client options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Server never answered while connecting.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Pings sent before giving up.
        attempts: u32,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Server stopped answering.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Index creation failed.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Collection involved.
        collection: &'static str,
        /// Index name.
        index: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Identifier counter could not be bumped.
    #[error("failed to allocate the next `{counter}` identifier")]
    NextId {
        /// Counter collection key.
        counter: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Query failed.
    #[error("failed to read from collection `{collection}`")]
    Read {
        /// Collection involved.
        collection: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Insert, update or delete failed.
    #[error("failed to write to collection `{collection}`")]
    Write {
        /// Collection involved.
        collection: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Stored game points at a removed team.
    #[error("game `{game_id}` references missing team `{team_id}`")]
    DanglingTeam {
        /// Game holding the reference.
        game_id: GameId,
        /// Missing team.
        team_id: TeamId,
    },
    /// Game write names a team that is not stored.
    #[error("cannot record a game for missing team `{team_id}`")]
    UnknownTeam {
        /// Missing team.
        team_id: TeamId,
    },
}
