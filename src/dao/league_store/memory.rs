//! In-process implementation of [`LeagueStore`], used by default and by the test-suite.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use futures::future::BoxFuture;
use time::Date;
use tokio::sync::RwLock;

use crate::dao::{
    league_store::LeagueStore,
    models::{
        GameEntity, GameId, ProtoGame, TeamDraft, TeamEntity, TeamId, TeamRemoval, TeamWrite,
        UserEntity,
    },
    storage::{StorageError, StorageResult},
};

/// Game row as stored: teams are kept by identifier and resolved on read.
#[derive(Debug, Clone, Copy)]
struct GameRow {
    date: Date,
    home: TeamId,
    away: TeamId,
    home_score: u32,
    away_score: u32,
}

impl From<ProtoGame> for GameRow {
    fn from(game: ProtoGame) -> Self {
        Self {
            date: game.date,
            home: game.home,
            away: game.away,
            home_score: game.home_score,
            away_score: game.away_score,
        }
    }
}

#[derive(Default)]
struct Tables {
    teams: BTreeMap<TeamId, TeamEntity>,
    games: BTreeMap<GameId, GameRow>,
    users: HashMap<String, UserEntity>,
    last_team_id: TeamId,
    last_game_id: GameId,
}

impl Tables {
    fn team_by_slug(&self, slug: &str) -> Option<&TeamEntity> {
        self.teams.values().find(|team| team.slug == slug)
    }

    fn team(&self, game_id: GameId, team_id: TeamId) -> StorageResult<TeamEntity> {
        self.teams.get(&team_id).cloned().ok_or_else(|| {
            StorageError::integrity(format!(
                "game `{game_id}` references missing team `{team_id}`"
            ))
        })
    }

    fn resolve(&self, id: GameId, row: &GameRow) -> StorageResult<GameEntity> {
        Ok(GameEntity {
            id,
            date: row.date,
            home: self.team(id, row.home)?,
            away: self.team(id, row.away)?,
            home_score: row.home_score,
            away_score: row.away_score,
        })
    }

    fn ensure_teams_exist(&self, game: &ProtoGame) -> StorageResult<()> {
        for team_id in [game.home, game.away] {
            if !self.teams.contains_key(&team_id) {
                return Err(StorageError::MissingTeam { team_id });
            }
        }
        Ok(())
    }
}

/// Volatile store keeping every table behind a single lock.
#[derive(Clone, Default)]
pub struct MemoryLeagueStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryLeagueStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store whose user table is pre-populated with `users`.
    pub fn with_users(users: impl IntoIterator<Item = UserEntity>) -> Self {
        let tables = Tables {
            users: users
                .into_iter()
                .map(|user| (user.username.clone(), user))
                .collect(),
            ..Tables::default()
        };
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    async fn insert_team(&self, draft: TeamDraft) -> TeamWrite {
        let mut tables = self.tables.write().await;
        if tables.team_by_slug(&draft.slug).is_some() {
            return TeamWrite::SlugTaken;
        }

        tables.last_team_id += 1;
        let team = TeamEntity {
            id: tables.last_team_id,
            slug: draft.slug,
            name: draft.name,
            description: draft.description,
        };
        tables.teams.insert(team.id, team.clone());
        TeamWrite::Written(team)
    }

    async fn update_team(&self, old_slug: String, draft: TeamDraft) -> TeamWrite {
        let mut tables = self.tables.write().await;
        let Some(id) = tables.team_by_slug(&old_slug).map(|team| team.id) else {
            return TeamWrite::Missing;
        };
        if tables
            .team_by_slug(&draft.slug)
            .is_some_and(|other| other.id != id)
        {
            return TeamWrite::SlugTaken;
        }

        let team = TeamEntity {
            id,
            slug: draft.slug,
            name: draft.name,
            description: draft.description,
        };
        tables.teams.insert(id, team.clone());
        TeamWrite::Written(team)
    }

    async fn delete_team(&self, slug: String) -> TeamRemoval {
        let mut tables = self.tables.write().await;
        let Some(id) = tables.team_by_slug(&slug).map(|team| team.id) else {
            return TeamRemoval::Missing;
        };
        if tables
            .games
            .values()
            .any(|game| game.home == id || game.away == id)
        {
            return TeamRemoval::InUse;
        }

        tables.teams.remove(&id);
        TeamRemoval::Removed
    }

    async fn list_games(&self) -> StorageResult<Vec<GameEntity>> {
        let tables = self.tables.read().await;
        tables
            .games
            .iter()
            .map(|(id, row)| tables.resolve(*id, row))
            .collect()
    }

    async fn find_game(&self, id: GameId) -> StorageResult<Option<GameEntity>> {
        let tables = self.tables.read().await;
        tables
            .games
            .get(&id)
            .map(|row| tables.resolve(id, row))
            .transpose()
    }

    async fn insert_game(&self, game: ProtoGame) -> StorageResult<GameEntity> {
        let mut tables = self.tables.write().await;
        tables.ensure_teams_exist(&game)?;

        tables.last_game_id += 1;
        let id = tables.last_game_id;
        let row = GameRow::from(game);
        tables.games.insert(id, row);
        tables.resolve(id, &row)
    }

    async fn update_game(&self, id: GameId, game: ProtoGame) -> StorageResult<Option<GameEntity>> {
        let mut tables = self.tables.write().await;
        if !tables.games.contains_key(&id) {
            return Ok(None);
        }
        tables.ensure_teams_exist(&game)?;

        let row = GameRow::from(game);
        tables.games.insert(id, row);
        tables.resolve(id, &row).map(Some)
    }
}

impl LeagueStore for MemoryLeagueStore {
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.tables.read().await.teams.values().cloned().collect()) })
    }

    fn find_team(&self, slug: String) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.tables.read().await.team_by_slug(&slug).cloned()) })
    }

    fn find_team_id(&self, slug: String) -> BoxFuture<'static, StorageResult<Option<TeamId>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .tables
                .read()
                .await
                .team_by_slug(&slug)
                .map(|team| team.id))
        })
    }

    fn insert_team(&self, team: TeamDraft) -> BoxFuture<'static, StorageResult<TeamWrite>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.insert_team(team).await) })
    }

    fn update_team(
        &self,
        old_slug: String,
        team: TeamDraft,
    ) -> BoxFuture<'static, StorageResult<TeamWrite>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.update_team(old_slug, team).await) })
    }

    fn delete_team(&self, slug: String) -> BoxFuture<'static, StorageResult<TeamRemoval>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.delete_team(slug).await) })
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_games().await })
    }

    fn find_game(&self, id: GameId) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game(id).await })
    }

    fn insert_game(&self, game: ProtoGame) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_game(game).await })
    }

    fn update_game(
        &self,
        id: GameId,
        game: ProtoGame,
    ) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.update_game(id, game).await })
    }

    fn delete_game(&self, id: GameId) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.tables.write().await.games.remove(&id).is_some()) })
    }

    fn find_user(
        &self,
        username: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.tables.read().await.users.get(&username).cloned()) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
