//! Team, game and user collections with counter-allocated identifiers.

use std::{collections::HashMap, sync::Arc};

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Document, doc},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;
use tracing::info;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoGameDocument, MongoTeamDocument, MongoUserDocument, doc_id},
};
use crate::dao::{
    league_store::LeagueStore,
    models::{
        GameEntity, GameId, ProtoGame, TeamDraft, TeamEntity, TeamId, TeamRemoval, TeamWrite,
        UserEntity,
    },
    storage::StorageResult,
};

const TEAM_COLLECTION_NAME: &str = "teams";
const GAME_COLLECTION_NAME: &str = "games";
const USER_COLLECTION_NAME: &str = "users";
const COUNTER_COLLECTION_NAME: &str = "counters";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// [`LeagueStore`] backed by MongoDB; integer identifiers come from a `counters` collection.
#[derive(Clone)]
pub struct MongoLeagueStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = self.state.read().await.database.clone();
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY_CODE
    )
}

fn read_error(collection: &'static str) -> impl FnOnce(MongoError) -> MongoDaoError {
    move |source| MongoDaoError::Read { collection, source }
}

fn write_error(collection: &'static str) -> impl FnOnce(MongoError) -> MongoDaoError {
    move |source| MongoDaoError::Write { collection, source }
}

fn resolve_game(
    document: MongoGameDocument,
    teams: &HashMap<TeamId, TeamEntity>,
) -> MongoResult<GameEntity> {
    let lookup = |team_id: TeamId| {
        teams
            .get(&team_id)
            .cloned()
            .ok_or(MongoDaoError::DanglingTeam {
                game_id: document.id,
                team_id,
            })
    };
    let home = lookup(document.home)?;
    let away = lookup(document.away)?;
    Ok(document.into_entity(home, away))
}

impl MongoLeagueStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;
        let indexes: [(&'static str, &'static str, Document, bool); 4] = [
            (TEAM_COLLECTION_NAME, "slug", doc! {"slug": 1}, true),
            (GAME_COLLECTION_NAME, "home", doc! {"home": 1}, false),
            (GAME_COLLECTION_NAME, "away", doc! {"away": 1}, false),
            (USER_COLLECTION_NAME, "username", doc! {"username": 1}, true),
        ];

        for (collection, index, keys, unique) in indexes {
            let model = IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .name(Some(format!("{collection}_{index}_idx")))
                        .unique(Some(unique))
                        .build(),
                )
                .build();

            database
                .collection::<Document>(collection)
                .create_index(model)
                .await
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection,
                    index,
                    source,
                })?;
        }

        Ok(())
    }

    /// Insert the given accounts unless a user with the same username already exists.
    pub async fn seed_users(&self, users: Vec<UserEntity>) -> MongoResult<()> {
        let collection = self.user_collection().await;
        for user in users {
            let username = user.username.clone();
            let document = MongoUserDocument::from(user);
            let result = collection
                .update_one(
                    doc! {"username": document.username.as_str()},
                    doc! {"$setOnInsert": {
                        "_id": document.id,
                        "name": document.name.as_str(),
                        "password_hash": document.password_hash.as_str(),
                    }},
                )
                .upsert(true)
                .await
                .map_err(write_error(USER_COLLECTION_NAME))?;
            if result.upserted_id.is_some() {
                info!(%username, "seeded user account");
            }
        }
        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn team_collection(&self) -> Collection<MongoTeamDocument> {
        self.database()
            .await
            .collection::<MongoTeamDocument>(TEAM_COLLECTION_NAME)
    }

    async fn game_collection(&self) -> Collection<MongoGameDocument> {
        self.database()
            .await
            .collection::<MongoGameDocument>(GAME_COLLECTION_NAME)
    }

    async fn user_collection(&self) -> Collection<MongoUserDocument> {
        self.database()
            .await
            .collection::<MongoUserDocument>(USER_COLLECTION_NAME)
    }

    /// Atomically increment and return the counter named `counter`.
    async fn next_id(&self, counter: &'static str) -> MongoResult<i64> {
        let counters = self
            .database()
            .await
            .collection::<Document>(COUNTER_COLLECTION_NAME);
        let document = counters
            .find_one_and_update(doc! {"_id": counter}, doc! {"$inc": {"seq": 1_i64}})
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::NextId { counter, source })?;

        Ok(document
            .and_then(|doc| doc.get_i64("seq").ok())
            .unwrap_or(1))
    }

    async fn find_team_document(&self, filter: Document) -> MongoResult<Option<MongoTeamDocument>> {
        self.team_collection()
            .await
            .find_one(filter)
            .await
            .map_err(read_error(TEAM_COLLECTION_NAME))
    }

    async fn teams_by_id(&self, filter: Document) -> MongoResult<HashMap<TeamId, TeamEntity>> {
        let documents: Vec<MongoTeamDocument> = self
            .team_collection()
            .await
            .find(filter)
            .await
            .map_err(read_error(TEAM_COLLECTION_NAME))?
            .try_collect()
            .await
            .map_err(read_error(TEAM_COLLECTION_NAME))?;

        Ok(documents
            .into_iter()
            .map(|doc| (doc.id, TeamEntity::from(doc)))
            .collect())
    }

    async fn list_teams(&self) -> MongoResult<Vec<TeamEntity>> {
        let documents: Vec<MongoTeamDocument> = self
            .team_collection()
            .await
            .find(doc! {})
            .sort(doc! {"_id": 1})
            .await
            .map_err(read_error(TEAM_COLLECTION_NAME))?
            .try_collect()
            .await
            .map_err(read_error(TEAM_COLLECTION_NAME))?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn insert_team(&self, draft: TeamDraft) -> MongoResult<TeamWrite> {
        if self
            .find_team_document(doc! {"slug": draft.slug.as_str()})
            .await?
            .is_some()
        {
            return Ok(TeamWrite::SlugTaken);
        }

        let id = self.next_id(TEAM_COLLECTION_NAME).await?;
        let document = MongoTeamDocument::from_draft(id, draft);
        match self.team_collection().await.insert_one(&document).await {
            Ok(_) => Ok(TeamWrite::Written(document.into())),
            Err(err) if is_duplicate_key(&err) => Ok(TeamWrite::SlugTaken),
            Err(source) => Err(write_error(TEAM_COLLECTION_NAME)(source)),
        }
    }

    async fn update_team(&self, old_slug: String, draft: TeamDraft) -> MongoResult<TeamWrite> {
        let Some(current) = self.find_team_document(doc! {"slug": old_slug.as_str()}).await? else {
            return Ok(TeamWrite::Missing);
        };
        if draft.slug != old_slug
            && self
                .find_team_document(doc! {"slug": draft.slug.as_str()})
                .await?
                .is_some()
        {
            return Ok(TeamWrite::SlugTaken);
        }

        let document = MongoTeamDocument::from_draft(current.id, draft);
        match self
            .team_collection()
            .await
            .replace_one(doc_id(current.id), &document)
            .await
        {
            Ok(result) if result.matched_count == 0 => Ok(TeamWrite::Missing),
            Ok(_) => Ok(TeamWrite::Written(document.into())),
            Err(err) if is_duplicate_key(&err) => Ok(TeamWrite::SlugTaken),
            Err(source) => Err(write_error(TEAM_COLLECTION_NAME)(source)),
        }
    }

    async fn delete_team(&self, slug: String) -> MongoResult<TeamRemoval> {
        let Some(team) = self.find_team_document(doc! {"slug": slug.as_str()}).await? else {
            return Ok(TeamRemoval::Missing);
        };

        let games = self
            .game_collection()
            .await
            .count_documents(doc! {"$or": [{"home": team.id}, {"away": team.id}]})
            .await
            .map_err(read_error(GAME_COLLECTION_NAME))?;
        if games > 0 {
            return Ok(TeamRemoval::InUse);
        }

        let result = self
            .team_collection()
            .await
            .delete_one(doc_id(team.id))
            .await
            .map_err(write_error(TEAM_COLLECTION_NAME))?;
        Ok(if result.deleted_count > 0 {
            TeamRemoval::Removed
        } else {
            TeamRemoval::Missing
        })
    }

    async fn list_games(&self) -> MongoResult<Vec<GameEntity>> {
        let documents: Vec<MongoGameDocument> = self
            .game_collection()
            .await
            .find(doc! {})
            .sort(doc! {"_id": 1})
            .await
            .map_err(read_error(GAME_COLLECTION_NAME))?
            .try_collect()
            .await
            .map_err(read_error(GAME_COLLECTION_NAME))?;

        let teams = self.teams_by_id(doc! {}).await?;
        documents
            .into_iter()
            .map(|document| resolve_game(document, &teams))
            .collect()
    }

    async fn find_game(&self, id: GameId) -> MongoResult<Option<GameEntity>> {
        let Some(document) = self
            .game_collection()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(read_error(GAME_COLLECTION_NAME))?
        else {
            return Ok(None);
        };

        let teams = self
            .teams_by_id(doc! {"_id": {"$in": [document.home, document.away]}})
            .await?;
        resolve_game(document, &teams).map(Some)
    }

    async fn ensure_teams_exist(&self, game: &ProtoGame) -> MongoResult<()> {
        let teams = self
            .teams_by_id(doc! {"_id": {"$in": [game.home, game.away]}})
            .await?;
        for team_id in [game.home, game.away] {
            if !teams.contains_key(&team_id) {
                return Err(MongoDaoError::UnknownTeam { team_id });
            }
        }
        Ok(())
    }

    async fn insert_game(&self, game: ProtoGame) -> MongoResult<GameEntity> {
        self.ensure_teams_exist(&game).await?;

        let id = self.next_id(GAME_COLLECTION_NAME).await?;
        self.game_collection()
            .await
            .insert_one(MongoGameDocument::from_proto(id, game))
            .await
            .map_err(write_error(GAME_COLLECTION_NAME))?;

        self.find_game(id).await?.ok_or(MongoDaoError::DanglingTeam {
            game_id: id,
            team_id: game.home,
        })
    }

    async fn update_game(&self, id: GameId, game: ProtoGame) -> MongoResult<Option<GameEntity>> {
        self.ensure_teams_exist(&game).await?;

        let result = self
            .game_collection()
            .await
            .replace_one(doc_id(id), MongoGameDocument::from_proto(id, game))
            .await
            .map_err(write_error(GAME_COLLECTION_NAME))?;
        if result.matched_count == 0 {
            return Ok(None);
        }
        self.find_game(id).await
    }

    async fn delete_game(&self, id: GameId) -> MongoResult<bool> {
        let result = self
            .game_collection()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(write_error(GAME_COLLECTION_NAME))?;
        Ok(result.deleted_count > 0)
    }

    async fn find_user(&self, username: String) -> MongoResult<Option<UserEntity>> {
        let document = self
            .user_collection()
            .await
            .find_one(doc! {"username": username})
            .await
            .map_err(read_error(USER_COLLECTION_NAME))?;
        Ok(document.map(Into::into))
    }
}

impl LeagueStore for MongoLeagueStore {
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_teams().await.map_err(Into::into) })
    }

    fn find_team(&self, slug: String) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let document = store.find_team_document(doc! {"slug": slug}).await?;
            Ok(document.map(Into::into))
        })
    }

    fn find_team_id(&self, slug: String) -> BoxFuture<'static, StorageResult<Option<TeamId>>> {
        let store = self.clone();
        Box::pin(async move {
            let document = store.find_team_document(doc! {"slug": slug}).await?;
            Ok(document.map(|doc| doc.id))
        })
    }

    fn insert_team(&self, team: TeamDraft) -> BoxFuture<'static, StorageResult<TeamWrite>> {
        let store = self.clone();
        Box::pin(async move { store.insert_team(team).await.map_err(Into::into) })
    }

    fn update_team(
        &self,
        old_slug: String,
        team: TeamDraft,
    ) -> BoxFuture<'static, StorageResult<TeamWrite>> {
        let store = self.clone();
        Box::pin(async move { store.update_team(old_slug, team).await.map_err(Into::into) })
    }

    fn delete_team(&self, slug: String) -> BoxFuture<'static, StorageResult<TeamRemoval>> {
        let store = self.clone();
        Box::pin(async move { store.delete_team(slug).await.map_err(Into::into) })
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_games().await.map_err(Into::into) })
    }

    fn find_game(&self, id: GameId) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game(id).await.map_err(Into::into) })
    }

    fn insert_game(&self, game: ProtoGame) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_game(game).await.map_err(Into::into) })
    }

    fn update_game(
        &self,
        id: GameId,
        game: ProtoGame,
    ) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.update_game(id, game).await.map_err(Into::into) })
    }

    fn delete_game(&self, id: GameId) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_game(id).await.map_err(Into::into) })
    }

    fn find_user(
        &self,
        username: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_user(username).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
