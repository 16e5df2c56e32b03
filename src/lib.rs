//! Library crate for league-back, exposing modules for binaries and integration tests.

/// Password checks and session tokens.
pub mod auth;
/// Runtime configuration and seed accounts.
pub mod config;
/// Persistence layer.
pub mod dao;
mod dto;
mod error;
/// HTTP handlers and router assembly.
pub mod routes;
/// Business logic behind the handlers.
pub mod services;
pub mod slug;
/// Shared application state.
pub mod state;
