//! Storage trait, entities and backends.

/// Team, game and user persistence operations.
pub mod league_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
