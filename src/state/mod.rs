//! Storage handle, degraded flag and auth collaborators shared across requests.

use std::sync::Arc;

use tokio::sync::{RwLock, watch};
use tracing::{info, warn};

use crate::{
    auth::{Argon2Verifier, MemorySessionStore, PasswordVerifier, SessionStore},
    config::AppConfig,
    dao::league_store::LeagueStore,
    error::ServiceError,
};

/// Handle to the state shared by handlers and background tasks.
pub type SharedState = Arc<AppState>;

/// Central application state holding the storage handle and the auth collaborators.
pub struct AppState {
    league_store: RwLock<Option<Arc<dyn LeagueStore>>>,
    sessions: Arc<dyn SessionStore>,
    passwords: Arc<dyn PasswordVerifier>,
    config: AppConfig,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let sessions = Arc::new(MemorySessionStore::new(config.session_ttl()));
        Self::with_collaborators(config, sessions, Arc::new(Argon2Verifier))
    }

    /// Construct the state with explicit session and password collaborators.
    pub fn with_collaborators(
        config: AppConfig,
        sessions: Arc<dyn SessionStore>,
        passwords: Arc<dyn PasswordVerifier>,
    ) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            league_store: RwLock::new(None),
            sessions,
            passwords,
            config,
            degraded: degraded_tx,
        })
    }

    /// Obtain a handle to the current league store, if one is installed.
    pub async fn league_store(&self) -> Option<Arc<dyn LeagueStore>> {
        let guard = self.league_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the league store or fail with [`ServiceError::Degraded`].
    ///
    /// The read guard is released before returning so no lock spans a storage call.
    pub async fn require_league_store(&self) -> Result<Arc<dyn LeagueStore>, ServiceError> {
        if self.is_degraded().await {
            return Err(ServiceError::Degraded);
        }
        self.league_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new league store implementation and leave degraded mode.
    pub async fn set_league_store(&self, store: Arc<dyn LeagueStore>) {
        {
            let mut guard = self.league_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current league store and enter degraded mode.
    pub async fn clear_league_store(&self) {
        {
            let mut guard = self.league_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update the degraded flag, logging transitions.
    pub async fn update_degraded(&self, value: bool) {
        let previous = self.degraded.send_replace(value);
        if previous == value {
            return;
        }
        if value {
            warn!("entering degraded mode");
        } else {
            info!("leaving degraded mode");
        }
    }

    /// Session issuance and verification.
    pub fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    /// Password hash verification.
    pub fn passwords(&self) -> &dyn PasswordVerifier {
        self.passwords.as_ref()
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
