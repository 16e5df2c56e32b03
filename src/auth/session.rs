//! In-memory session tokens with a fixed time-to-live.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::{UserEntity, UserId};

/// Identity attached to a valid session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SessionUser {
    /// Account identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Display name.
    pub name: String,
}

impl From<&UserEntity> for SessionUser {
    fn from(user: &UserEntity) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}

/// Issues and checks opaque session tokens.
pub trait SessionStore: Send + Sync {
    /// Open a session for `user` and return its token.
    fn create_session(&self, user: SessionUser) -> String;
    /// Resolve `token` to its user, or `None` when unknown or expired.
    fn validate_session(&self, token: &str) -> Option<SessionUser>;
}

struct Session {
    user: SessionUser,
    expires_at: Instant,
}

/// Session table kept in process memory; sessions do not survive a restart.
///
/// Expired sessions are swept whenever a new one is created.
pub struct MemorySessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl MemorySessionStore {
    /// Empty table whose sessions live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn create_session(&self, user: SessionUser) -> String {
        let now = Instant::now();
        self.sessions.retain(|_, session| now < session.expires_at);

        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                user,
                expires_at: now + self.ttl,
            },
        );
        token
    }

    fn validate_session(&self, token: &str) -> Option<SessionUser> {
        let session = self.sessions.get(token)?;
        if Instant::now() < session.expires_at {
            return Some(session.user.clone());
        }

        drop(session);
        self.sessions.remove(token);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            id: 7,
            username: "admin".into(),
            name: "Admin".into(),
        }
    }

    #[test]
    fn test_created_session_validates() {
        let store = MemorySessionStore::new(Duration::from_secs(3600));
        let token = store.create_session(user());
        assert_eq!(token.len(), 32);
        assert_eq!(store.validate_session(&token), Some(user()));
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let store = MemorySessionStore::new(Duration::from_secs(3600));
        store.create_session(user());
        assert_eq!(store.validate_session("not-a-token"), None);
    }

    #[test]
    fn test_expired_session_is_rejected_and_evicted() {
        let store = MemorySessionStore::new(Duration::ZERO);
        let token = store.create_session(user());
        assert_eq!(store.validate_session(&token), None);
        assert!(store.sessions.is_empty());
    }

    #[test]
    fn test_login_sweeps_expired_sessions() {
        let store = MemorySessionStore::new(Duration::ZERO);
        let tokens: Vec<_> = (0..50).map(|_| store.create_session(user())).collect();

        assert_eq!(store.sessions.len(), 1);
        assert!(store.sessions.contains_key(tokens.last().unwrap()));
    }

    #[test]
    fn test_sweep_keeps_live_sessions() {
        let store = MemorySessionStore::new(Duration::from_secs(3600));
        let first = store.create_session(user());
        let second = store.create_session(user());

        assert_eq!(store.sessions.len(), 2);
        assert_eq!(store.validate_session(&first), Some(user()));
        assert_eq!(store.validate_session(&second), Some(user()));
    }
}
