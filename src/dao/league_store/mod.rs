//! Storage trait implemented by every backend.

/// In-process store.
pub mod memory;
/// MongoDB-backed store.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{
    GameEntity, GameId, ProtoGame, TeamDraft, TeamEntity, TeamId, TeamRemoval, TeamWrite,
    UserEntity,
};
use crate::dao::storage::StorageResult;
#[cfg(doc)]
use crate::dao::storage::StorageError;
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for teams, games and user accounts.
///
/// Every call is atomic on its own; callers chaining a lookup and a write must tolerate the
/// record disappearing in between.
pub trait LeagueStore: Send + Sync {
    /// Every team ordered by identifier.
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    /// Team stored under `slug`.
    fn find_team(&self, slug: String) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Identifier of the team stored under `slug`.
    fn find_team_id(&self, slug: String) -> BoxFuture<'static, StorageResult<Option<TeamId>>>;
    /// Insert a new team; [`TeamWrite::SlugTaken`] when the slug already exists.
    fn insert_team(&self, team: TeamDraft) -> BoxFuture<'static, StorageResult<TeamWrite>>;
    /// Overwrite the team stored under `old_slug`, possibly moving it to a new slug.
    fn update_team(
        &self,
        old_slug: String,
        team: TeamDraft,
    ) -> BoxFuture<'static, StorageResult<TeamWrite>>;
    /// Remove the team stored under `slug` unless a game references it.
    fn delete_team(&self, slug: String) -> BoxFuture<'static, StorageResult<TeamRemoval>>;
    /// Every game ordered by identifier, teams resolved.
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Game `id` with its teams resolved.
    fn find_game(&self, id: GameId) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Record a new game; [`StorageError::MissingTeam`] when either team is gone.
    fn insert_game(&self, game: ProtoGame) -> BoxFuture<'static, StorageResult<GameEntity>>;
    /// Replace every field of game `id`; `None` when the game does not exist.
    fn update_game(
        &self,
        id: GameId,
        game: ProtoGame,
    ) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Remove game `id`; `false` when it does not exist.
    fn delete_game(&self, id: GameId) -> BoxFuture<'static, StorageResult<bool>>;
    /// Account with login name `username`.
    fn find_user(&self, username: String)
    -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    /// Cheap round trip proving the backend answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the backend connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
