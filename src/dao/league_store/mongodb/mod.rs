//! MongoDB backend for the league store.

mod config;
mod connection;
mod error;
mod models;
/// [`LeagueStore`](crate::dao::league_store::LeagueStore) implementation over MongoDB collections.
pub mod store;

pub use config::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoLeagueStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::UnknownTeam { team_id } => StorageError::MissingTeam { team_id },
            MongoDaoError::DanglingTeam { .. } => StorageError::integrity(err.to_string()),
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
