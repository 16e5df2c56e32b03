//! `/teams` routes.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
};
use tracing::debug;

use crate::{
    auth::SessionUser,
    dto::{
        team::{CreateTeamRequest, TeamResponse, UpdateTeamRequest},
        validation::InvalidField,
    },
    error::AppError,
    routes::auth::require_session,
    services::team_service,
    state::SharedState,
};

/// Team routes: reads are public, writes need a session.
pub fn router(state: SharedState) -> Router<SharedState> {
    let public = Router::new()
        .route("/teams", get(list_teams))
        .route("/teams/{slug}", get(get_team));

    let protected = Router::new()
        .route("/teams", post(create_team))
        .route("/teams/{slug}", patch(update_team).delete(delete_team))
        .route_layer(middleware::from_fn_with_state(state, require_session));

    public.merge(protected)
}

/// List every team.
#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    responses((status = 200, description = "All teams", body = [TeamResponse]))
)]
pub async fn list_teams(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TeamResponse>>, AppError> {
    Ok(Json(team_service::list_teams(&state).await?))
}

/// Fetch a team by slug.
#[utoipa::path(
    get,
    path = "/teams/{slug}",
    tag = "teams",
    params(("slug" = String, Path, description = "Slug of the team")),
    responses(
        (status = 200, description = "Team", body = TeamResponse),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn get_team(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<TeamResponse>, AppError> {
    Ok(Json(team_service::get_team(&state, slug).await?))
}

/// Create a team; the slug is derived from the name.
#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    params(("Authorization" = String, Header, description = "Bearer token issued by /login")),
    request_body = CreateTeamRequest,
    responses(
        (status = 200, description = "Team created", body = TeamResponse),
        (status = 400, description = "Invalid fields", body = [InvalidField]),
        (status = 409, description = "A team with the same slug exists")
    )
)]
pub async fn create_team(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<CreateTeamRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    debug!(user = %user.username, "creating team");
    Ok(Json(team_service::create_team(&state, payload).await?))
}

/// Patch a team; renaming moves it to a new slug.
#[utoipa::path(
    patch,
    path = "/teams/{slug}",
    tag = "teams",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by /login"),
        ("slug" = String, Path, description = "Slug of the team")
    ),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Team updated", body = TeamResponse),
        (status = 400, description = "Invalid fields", body = [InvalidField]),
        (status = 404, description = "Unknown slug"),
        (status = 409, description = "The new slug belongs to another team")
    )
)]
pub async fn update_team(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateTeamRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    Ok(Json(team_service::update_team(&state, slug, payload).await?))
}

/// Delete a team that has no recorded games.
#[utoipa::path(
    delete,
    path = "/teams/{slug}",
    tag = "teams",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by /login"),
        ("slug" = String, Path, description = "Slug of the team")
    ),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 404, description = "Unknown slug"),
        (status = 409, description = "Team has recorded games")
    )
)]
pub async fn delete_team(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    team_service::delete_team(&state, slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
