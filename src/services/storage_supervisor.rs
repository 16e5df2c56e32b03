//! Background task connecting to storage and toggling degraded mode.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{league_store::LeagueStore, storage::StorageError},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Connect to the storage backend and keep the shared state in degraded mode while it is
/// unreachable.
///
/// Runs forever; spawn it on the runtime.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn LeagueStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        match connect().await {
            Ok(store) => {
                state.set_league_store(store.clone()).await;
                info!("storage connection established");
                delay = INITIAL_DELAY;

                watch_health(&state, store.as_ref()).await;

                warn!("exhausted storage reconnect attempts; dropping the connection");
                state.clear_league_store().await;
                sleep(delay).await;
            }
            Err(err) => {
                warn!(error = %err, "storage connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }
}

/// Poll `store` until it stays unreachable through [`MAX_RECONNECT_ATTEMPTS`] reconnects.
async fn watch_health(state: &SharedState, store: &dyn LeagueStore) {
    loop {
        if let Err(err) = store.health_check().await {
            warn!(error = %err, "storage health check failed");
            if !reconnect(state, store).await {
                return;
            }
        } else if state.is_degraded().await {
            info!("storage healthy again");
            state.update_degraded(false).await;
        }
        sleep(HEALTH_POLL_INTERVAL).await;
    }
}

async fn reconnect(state: &SharedState, store: &dyn LeagueStore) -> bool {
    let mut delay = INITIAL_DELAY;

    for attempt in 0..MAX_RECONNECT_ATTEMPTS {
        match store.try_reconnect().await {
            Ok(()) => {
                info!(attempt, "storage reconnection succeeded");
                state.update_degraded(false).await;
                return true;
            }
            Err(err) => {
                if attempt == 0 {
                    warn!(
                        attempt, error = %err,
                        "storage reconnect failed; entering degraded mode"
                    );
                    state.update_degraded(true).await;
                } else {
                    warn!(attempt, error = %err, "storage reconnect attempt failed");
                }
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, dao::league_store::memory::MemoryLeagueStore, state::AppState};

    #[tokio::test]
    async fn test_supervisor_installs_connected_store() {
        let state = AppState::new(AppConfig::default());
        assert!(state.is_degraded().await);

        let handle = tokio::spawn(run(state.clone(), || async {
            Ok(Arc::new(MemoryLeagueStore::new()) as Arc<dyn LeagueStore>)
        }));

        let connected = tokio::time::timeout(Duration::from_secs(2), async {
            while state.is_degraded().await {
                tokio::task::yield_now().await;
            }
        })
        .await;
        handle.abort();

        assert!(connected.is_ok());
        assert!(state.require_league_store().await.is_ok());
    }
}
