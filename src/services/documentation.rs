//! OpenAPI document generation.

use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for League Back.
#[openapi(
    paths(
        crate::routes::index::index,
        crate::routes::health::healthcheck,
        crate::routes::auth::login,
        crate::routes::team::list_teams,
        crate::routes::team::get_team,
        crate::routes::team::create_team,
        crate::routes::team::update_team,
        crate::routes::team::delete_team,
        crate::routes::game::list_games,
        crate::routes::game::get_game,
        crate::routes::game::create_game,
        crate::routes::game::update_game,
        crate::routes::game::delete_game,
    ),
    components(
        schemas(
            crate::dto::index::RouteDescriptor,
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::auth::LoginRequest,
            crate::dto::auth::LoginResponse,
            crate::dto::team::CreateTeamRequest,
            crate::dto::team::UpdateTeamRequest,
            crate::dto::team::TeamResponse,
            crate::dto::game::GameInput,
            crate::dto::game::GameResponse,
            crate::dto::validation::InvalidField,
        )
    ),
    tags(
        (name = "index", description = "Resource index"),
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Session management"),
        (name = "teams", description = "Team management"),
        (name = "games", description = "Game records"),
    )
)]
/// OpenAPI document listing every route and schema.
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths = [
            "/",
            "/healthcheck",
            "/login",
            "/teams",
            "/teams/{slug}",
            "/games",
            "/games/{id}",
        ];
        for path in paths {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
