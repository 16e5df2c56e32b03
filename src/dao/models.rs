//! Entities shared between the storage backends and the services.

use serde::{Deserialize, Serialize};
use time::Date;

/// Server-assigned identifier of a stored team.
pub type TeamId = i64;
/// Server-assigned identifier of a stored game.
pub type GameId = i64;
/// Server-assigned identifier of a user account.
pub type UserId = i64;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Representation of a team stored in persistence and shared across layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Internal identifier, referenced by games.
    pub id: TeamId,
    /// Unique path identifier derived from the name, see [`crate::slug`].
    pub slug: String,
    /// Display name of the team.
    pub name: String,
    /// Free-form description, at most 1024 characters.
    pub description: String,
}

/// Team fields written on creation or update; the store assigns or keeps the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDraft {
    /// Derived from `name`.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

impl From<TeamEntity> for TeamDraft {
    fn from(team: TeamEntity) -> Self {
        Self {
            slug: team.slug,
            name: team.name,
            description: team.description,
        }
    }
}

/// Outcome of a team write that may collide with another team's slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamWrite {
    /// The team was written and is returned as stored.
    Written(TeamEntity),
    /// No team is stored under the slug used to locate the record.
    Missing,
    /// Another team already owns the target slug.
    SlugTaken,
}

/// Outcome of a team deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamRemoval {
    /// The team is gone.
    Removed,
    /// No team is stored under the slug.
    Missing,
    /// The team still takes part in recorded games.
    InUse,
}

/// Game fully resolved with both participating teams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the game.
    pub id: GameId,
    /// Calendar day the game was played.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Hosting team.
    pub home: TeamEntity,
    /// Visiting team.
    pub away: TeamEntity,
    /// Goals scored by the home team.
    pub home_score: u32,
    /// Goals scored by the away team.
    pub away_score: u32,
}

/// Validated game proposal whose teams are resolved to identifiers but which is not stored yet.
///
/// Only produced by the game validation pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProtoGame {
    /// Day of play, inside the accepted window.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Identifier of the hosting team.
    pub home: TeamId,
    /// Identifier of the visiting team, distinct from `home`.
    pub away: TeamId,
    /// Goals scored by the home team.
    pub home_score: u32,
    /// Goals scored by the away team.
    pub away_score: u32,
}

/// Account allowed to open sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntity {
    /// Primary key of the account.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Argon2id PHC string, see [`crate::auth::password`].
    pub password_hash: String,
}
