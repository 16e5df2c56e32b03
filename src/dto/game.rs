//! Game payloads of the REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    dao::models::{GameEntity, GameId},
    dto::{format_date, team::TeamResponse},
};

/// Raw game fields as submitted by clients.
///
/// Values are kept untyped so that malformed input surfaces as field errors instead of a
/// rejected body. On `PATCH`, absent (or `null`) fields keep their stored value.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct GameInput {
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "2024-03-01")]
    pub date: Option<Value>,
    /// Slug of the home team.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "valur")]
    pub home: Option<Value>,
    /// Non-negative integer, or a string holding one.
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub home_score: Option<Value>,
    /// Slug of the away team.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "fram")]
    pub away: Option<Value>,
    /// Same rules as `home_score`.
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub away_score: Option<Value>,
}

/// Public projection of a game with both teams expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GameResponse {
    /// Identifier used in `/games/{id}`.
    pub id: GameId,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Hosting team.
    pub home: TeamResponse,
    /// Visiting team.
    pub away: TeamResponse,
    /// Goals scored by the home team.
    pub home_score: u32,
    /// Goals scored by the away team.
    pub away_score: u32,
}

impl From<GameEntity> for GameResponse {
    fn from(game: GameEntity) -> Self {
        Self {
            id: game.id,
            date: format_date(game.date),
            home: game.home.into(),
            away: game.away.into(),
            home_score: game.home_score,
            away_score: game.away_score,
        }
    }
}
