//! Application-level configuration loading: session lifetime, seed accounts and storage backend.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::dao::models::UserEntity;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "LEAGUE_BACK_CONFIG_PATH";
/// Environment variable selecting the storage backend.
const STORAGE_BACKEND_ENV: &str = "STORAGE_BACKEND";
/// Sessions expire one hour after login unless configured otherwise.
const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    session_ttl: Duration,
    users: Vec<UserEntity>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        users = app_config.users.len(),
                        session_ttl_secs = app_config.session_ttl.as_secs(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Replace the seed accounts, mostly useful for tests.
    pub fn with_users(mut self, users: Vec<UserEntity>) -> Self {
        self.users = users;
        self
    }

    /// Replace the session lifetime.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// How long a session stays valid after login.
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Accounts seeded into the store at startup.
    pub fn users(&self) -> &[UserEntity] {
        &self.users
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session_ttl: DEFAULT_SESSION_TTL,
            users: Vec::new(),
        }
    }
}

/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    session_ttl_secs: Option<u64>,
    #[serde(default)]
    users: Vec<RawUser>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let users = value
            .users
            .into_iter()
            .zip(1..)
            .map(|(user, id)| UserEntity {
                id,
                username: user.username,
                name: user.name,
                password_hash: user.password_hash,
            })
            .collect();

        Self {
            session_ttl: value
                .session_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_SESSION_TTL),
            users,
        }
    }
}

/// JSON representation of a seed account; `password_hash` comes from the `hash-password` tool.
#[derive(Debug, Deserialize)]
struct RawUser {
    username: String,
    name: String,
    password_hash: String,
}

/// Persistence backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Volatile in-process tables.
    Memory,
    /// MongoDB reached through `MONGO_URI`.
    #[cfg(feature = "mongo-store")]
    Mongo,
}

impl StorageBackend {
    /// Read [`STORAGE_BACKEND_ENV`], defaulting to the in-memory store.
    pub fn from_env() -> Self {
        let requested = env::var(STORAGE_BACKEND_ENV).unwrap_or_default();
        match requested.trim().to_ascii_lowercase().as_str() {
            "" | "memory" => StorageBackend::Memory,
            #[cfg(feature = "mongo-store")]
            "mongo" | "mongodb" => StorageBackend::Mongo,
            other => {
                warn!(
                    backend = other,
                    "unknown storage backend; using the in-memory store"
                );
                StorageBackend::Memory
            }
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_config_assigns_user_ids_and_ttl() {
        let raw: RawConfig = serde_json::from_str(
            r#"{
                "session_ttl_secs": 120,
                "users": [
                    {"username": "admin", "name": "Admin", "password_hash": "aa:bb"},
                    {"username": "ritari", "name": "Ritari", "password_hash": "cc:dd"}
                ]
            }"#,
        )
        .unwrap();
        let config = AppConfig::from(raw);

        assert_eq!(config.session_ttl(), Duration::from_secs(120));
        assert_eq!(config.users().len(), 2);
        assert_eq!(config.users()[0].id, 1);
        assert_eq!(config.users()[1].id, 2);
        assert_eq!(config.users()[1].username, "ritari");
    }

    #[test]
    fn test_bundled_config_seeds_a_usable_account() {
        use crate::auth::{Argon2Verifier, PasswordVerifier};

        let raw: RawConfig = serde_json::from_str(include_str!("../config/app.json")).unwrap();
        let config = AppConfig::from(raw);
        let admin = &config.users()[0];
        assert_eq!(admin.username, "admin");
        assert!(Argon2Verifier.verify(&admin.password_hash, "changeme"));
    }

    #[test]
    fn test_raw_config_defaults() {
        let raw: RawConfig = serde_json::from_str("{}").unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.session_ttl(), DEFAULT_SESSION_TTL);
        assert!(config.users().is_empty());
    }
}
