//! Game recording, lookup and patching.

use tracing::info;

use crate::{
    dao::{
        models::{GameId, ProtoGame},
        storage::StorageError,
    },
    dto::{
        game::{GameInput, GameResponse},
        validation::InvalidField,
    },
    error::ServiceError,
    services::validation::{self, validate_game, validate_game_patch},
    state::SharedState,
};

fn game_not_found(id: impl std::fmt::Display) -> ServiceError {
    ServiceError::NotFound(format!("Game {id} does not exist"))
}

/// Interpret a path segment as a game identifier; anything else names no game.
fn parse_game_id(raw: &str) -> Result<GameId, ServiceError> {
    raw.trim().parse().map_err(|_| game_not_found(raw))
}

/// A team deleted after validation but before the write is reported like an unknown team.
fn write_failure(game: &ProtoGame, err: StorageError) -> ServiceError {
    match err {
        StorageError::MissingTeam { team_id } => {
            let field = if team_id == game.home { "home" } else { "away" };
            ServiceError::Validation(vec![InvalidField::new(field, validation::UNKNOWN_TEAM)])
        }
        other => other.into(),
    }
}

/// Every recorded game with both teams expanded.
pub async fn list_games(state: &SharedState) -> Result<Vec<GameResponse>, ServiceError> {
    let store = state.require_league_store().await?;
    let games = store.list_games().await?;
    Ok(games.into_iter().map(GameResponse::from).collect())
}

/// The game with identifier `raw_id`.
pub async fn get_game(state: &SharedState, raw_id: &str) -> Result<GameResponse, ServiceError> {
    let id = parse_game_id(raw_id)?;
    let store = state.require_league_store().await?;
    let game = store
        .find_game(id)
        .await?
        .ok_or_else(|| game_not_found(id))?;
    Ok(game.into())
}

/// Validate a submission and record the game.
pub async fn create_game(
    state: &SharedState,
    input: GameInput,
) -> Result<GameResponse, ServiceError> {
    let store = state.require_league_store().await?;
    let proto = validate_game(store.as_ref(), &input, validation::today()).await?;

    let game = store
        .insert_game(proto)
        .await
        .map_err(|err| write_failure(&proto, err))?;
    info!(
        id = game.id,
        home = %game.home.slug,
        away = %game.away.slug,
        "game recorded"
    );
    Ok(game.into())
}

/// Validate the supplied fields of `patch`, merge them over the stored game and persist it.
pub async fn update_game(
    state: &SharedState,
    raw_id: &str,
    patch: GameInput,
) -> Result<GameResponse, ServiceError> {
    let id = parse_game_id(raw_id)?;
    let store = state.require_league_store().await?;
    let current = store
        .find_game(id)
        .await?
        .ok_or_else(|| game_not_found(id))?;

    let merged = validate_game_patch(store.as_ref(), &current, &patch, validation::today()).await?;

    let game = store
        .update_game(id, merged)
        .await
        .map_err(|err| write_failure(&merged, err))?
        .ok_or_else(|| game_not_found(id))?;
    info!(id = game.id, "game updated");
    Ok(game.into())
}

/// Remove the game with identifier `raw_id`.
pub async fn delete_game(state: &SharedState, raw_id: &str) -> Result<(), ServiceError> {
    let id = parse_game_id(raw_id)?;
    let store = state.require_league_store().await?;

    if !store.delete_game(id).await? {
        return Err(game_not_found(id));
    }
    info!(id, "game deleted");
    Ok(())
}
