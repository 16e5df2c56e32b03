//! Storage health reporting.

use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether storage is reachable, logging connectivity issues.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.league_store().await {
        Some(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
                return HealthResponse::degraded();
            }
        }
        None => warn!("storage unavailable (degraded mode)"),
    }

    if state.is_degraded().await {
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig, dao::league_store::memory::MemoryLeagueStore, dto::health::HealthStatus,
        state::AppState,
    };
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_follows_store_presence() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(health_status(&state).await.status, HealthStatus::Degraded);

        state
            .set_league_store(Arc::new(MemoryLeagueStore::new()))
            .await;
        assert_eq!(health_status(&state).await.status, HealthStatus::Ok);

        state.clear_league_store().await;
        assert_eq!(health_status(&state).await.status, HealthStatus::Degraded);
    }
}
