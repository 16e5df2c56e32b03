//! Router assembly.

use axum::Router;

use crate::state::SharedState;

/// Login route and the session guard.
pub mod auth;
/// Swagger UI and the OpenAPI document.
pub mod docs;
/// Game routes.
pub mod game;
/// Health check route.
pub mod health;
/// API index route.
pub mod index;
/// Team routes.
pub mod team;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = index::router()
        .merge(health::router())
        .merge(auth::router())
        .merge(team::router(state.clone()))
        .merge(game::router(state.clone()));

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
