//! Services called by the route handlers.

/// Login and bearer-token resolution.
pub mod auth_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Game recording, lookup and patching.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Storage connection supervisor driving degraded mode.
pub mod storage_supervisor;
/// Team management operations.
pub mod team_service;
/// Field validators and the game validation pipeline.
pub mod validation;
