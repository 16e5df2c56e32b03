//! `/games` routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
};

use crate::{
    dto::{
        game::{GameInput, GameResponse},
        validation::InvalidField,
    },
    error::AppError,
    routes::auth::require_session,
    services::game_service,
    state::SharedState,
};

/// Game routes: reads are public, writes need a session.
pub fn router(state: SharedState) -> Router<SharedState> {
    let public = Router::new()
        .route("/games", get(list_games))
        .route("/games/{id}", get(get_game));

    let protected = Router::new()
        .route("/games", post(create_game))
        .route("/games/{id}", patch(update_game).delete(delete_game))
        .route_layer(middleware::from_fn_with_state(state, require_session));

    public.merge(protected)
}

/// List every recorded game.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    responses((status = 200, description = "All games", body = [GameResponse]))
)]
pub async fn list_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    Ok(Json(game_service::list_games(&state).await?))
}

/// Fetch a game by identifier.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Numeric identifier of the game")),
    responses(
        (status = 200, description = "Game", body = GameResponse),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(game_service::get_game(&state, &id).await?))
}

/// Record a game between two existing teams.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    params(("Authorization" = String, Header, description = "Bearer token issued by /login")),
    request_body = GameInput,
    responses(
        (status = 200, description = "Game recorded", body = GameResponse),
        (status = 400, description = "Invalid fields", body = [InvalidField])
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Json(payload): Json<GameInput>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(game_service::create_game(&state, payload).await?))
}

/// Patch the supplied fields of a game.
#[utoipa::path(
    patch,
    path = "/games/{id}",
    tag = "games",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by /login"),
        ("id" = String, Path, description = "Numeric identifier of the game")
    ),
    request_body = GameInput,
    responses(
        (status = 200, description = "Game updated", body = GameResponse),
        (status = 400, description = "Invalid fields", body = [InvalidField]),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn update_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<GameInput>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(game_service::update_game(&state, &id, payload).await?))
}

/// Delete a game.
#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "games",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by /login"),
        ("id" = String, Path, description = "Numeric identifier of the game")
    ),
    responses(
        (status = 204, description = "Game deleted"),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    game_service::delete_game(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
