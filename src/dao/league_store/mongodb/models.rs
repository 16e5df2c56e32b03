use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::dao::models::{
    GameEntity, GameId, ProtoGame, TeamDraft, TeamEntity, TeamId, UserEntity, UserId,
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTeamDocument {
    #[serde(rename = "_id")]
    pub id: TeamId,
    pub slug: String,
    pub name: String,
    pub description: String,
}

impl MongoTeamDocument {
    pub fn from_draft(id: TeamId, draft: TeamDraft) -> Self {
        Self {
            id,
            slug: draft.slug,
            name: draft.name,
            description: draft.description,
        }
    }
}

impl From<MongoTeamDocument> for TeamEntity {
    fn from(value: MongoTeamDocument) -> Self {
        Self {
            id: value.id,
            slug: value.slug,
            name: value.name,
            description: value.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    pub id: GameId,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub home: TeamId,
    pub away: TeamId,
    pub home_score: u32,
    pub away_score: u32,
}

impl MongoGameDocument {
    pub fn from_proto(id: GameId, game: ProtoGame) -> Self {
        Self {
            id,
            date: game.date,
            home: game.home,
            away: game.away,
            home_score: game.home_score,
            away_score: game.away_score,
        }
    }

    /// Attach the resolved participants, which must match the stored identifiers.
    pub fn into_entity(self, home: TeamEntity, away: TeamEntity) -> GameEntity {
        GameEntity {
            id: self.id,
            date: self.date,
            home,
            away,
            home_score: self.home_score,
            away_score: self.away_score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUserDocument {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub password_hash: String,
}

impl From<MongoUserDocument> for UserEntity {
    fn from(value: MongoUserDocument) -> Self {
        Self {
            id: value.id,
            username: value.username,
            name: value.name,
            password_hash: value.password_hash,
        }
    }
}

impl From<UserEntity> for MongoUserDocument {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            username: value.username,
            name: value.name,
            password_hash: value.password_hash,
        }
    }
}

pub fn doc_id(id: i64) -> Document {
    doc! {"_id": id}
}
