//! Login and bearer-token resolution.

use tracing::{debug, info};
use validator::Validate;

use crate::{
    auth::SessionUser,
    dto::{
        auth::{LoginRequest, LoginResponse},
        validation::invalid_fields,
    },
    error::ServiceError,
    state::SharedState,
};

const BEARER_PREFIX: &str = "Bearer ";
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Exchange credentials for a session token.
///
/// A missing username is reported before a missing password; wrong usernames and wrong
/// passwords are indistinguishable.
pub async fn login(
    state: &SharedState,
    request: LoginRequest,
) -> Result<LoginResponse, ServiceError> {
    if let Err(errors) = request.validate() {
        let message = invalid_fields(&errors, &["username", "password"])
            .into_iter()
            .next()
            .map_or_else(|| INVALID_CREDENTIALS.to_string(), |field| field.message);
        return Err(ServiceError::InvalidInput(message));
    }
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(ServiceError::InvalidInput(INVALID_CREDENTIALS.into()));
    };

    let store = state.require_league_store().await?;
    let user = store.find_user(username.clone()).await?;

    let Some(user) = user.filter(|user| state.passwords().verify(&user.password_hash, &password))
    else {
        debug!(username = %username, "login rejected");
        return Err(ServiceError::InvalidInput(INVALID_CREDENTIALS.into()));
    };

    let token = state.sessions().create_session(SessionUser::from(&user));
    info!(username = %user.username, "session opened");
    Ok(LoginResponse { token })
}

/// Resolve the value of an `Authorization` header to the user of a live session.
pub fn authenticate(
    state: &SharedState,
    header: Option<&str>,
) -> Result<SessionUser, ServiceError> {
    let header = header
        .ok_or_else(|| ServiceError::Unauthorized("Missing Authorization header".into()))?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ServiceError::Unauthorized("Session token missing from Authorization header".into())
        })?;

    state
        .sessions()
        .validate_session(token)
        .ok_or_else(|| ServiceError::Unauthorized("Invalid session token".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::password::hash_password,
        config::AppConfig,
        dao::{league_store::memory::MemoryLeagueStore, models::UserEntity},
        state::AppState,
    };
    use std::sync::Arc;

    async fn state() -> SharedState {
        let admin = UserEntity {
            id: 1,
            username: "admin".into(),
            name: "Admin".into(),
            password_hash: hash_password("hunter2").unwrap(),
        };
        let state = AppState::new(AppConfig::default());
        state
            .set_league_store(Arc::new(MemoryLeagueStore::with_users([admin])))
            .await;
        state
    }

    fn credentials(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn test_login_then_authenticate() {
        let state = state().await;
        let LoginResponse { token } = login(&state, credentials("admin", "hunter2"))
            .await
            .unwrap();

        let header = format!("Bearer {token}");
        let user = authenticate(&state, Some(&header)).unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials_alike() {
        let state = state().await;
        for request in [credentials("admin", "wrong"), credentials("nobody", "hunter2")] {
            assert!(matches!(
                login(&state, request).await,
                Err(ServiceError::InvalidInput(message)) if message == INVALID_CREDENTIALS
            ));
        }
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let state = state().await;
        let err = login(&state, LoginRequest::default()).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidInput(message) if message == "Missing username"
        ));

        let request = LoginRequest {
            username: Some("admin".into()),
            password: None,
        };
        assert!(matches!(
            login(&state, request).await,
            Err(ServiceError::InvalidInput(message)) if message == "Missing password"
        ));
    }

    #[tokio::test]
    async fn test_authenticate_header_errors() {
        let state = state().await;
        let cases = [
            (None, "Missing Authorization header"),
            (Some("Bearer "), "Session token missing from Authorization header"),
            (Some("Basic abc"), "Session token missing from Authorization header"),
            (Some("Bearer deadbeef"), "Invalid session token"),
        ];
        for (header, expected) in cases {
            assert!(matches!(
                authenticate(&state, header),
                Err(ServiceError::Unauthorized(message)) if message == expected
            ));
        }
    }
}
