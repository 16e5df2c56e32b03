//! League Back binary entrypoint wiring the REST API to its storage backend.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_back::{
    config::{AppConfig, StorageBackend},
    dao::league_store::memory::MemoryLeagueStore,
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config);

    match StorageBackend::from_env() {
        StorageBackend::Memory => {
            info!("using the in-memory store; data is lost on restart");
            let store = MemoryLeagueStore::with_users(app_state.config().users().to_vec());
            app_state.set_league_store(Arc::new(store)).await;
        }
        #[cfg(feature = "mongo-store")]
        StorageBackend::Mongo => {
            tokio::spawn(mongo::supervise(app_state.clone()));
        }
    }

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

#[cfg(feature = "mongo-store")]
mod mongo {
    use std::{env, sync::Arc};

    use league_back::{
        dao::{
            league_store::{
                LeagueStore,
                mongodb::{MongoConfig, MongoLeagueStore},
            },
            storage::StorageError,
        },
        services::storage_supervisor,
        state::SharedState,
    };

    /// Keep a MongoDB-backed store installed, seeding the configured accounts on every connect.
    pub async fn supervise(state: SharedState) {
        let uri = env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into());
        let db_name = env::var("MONGO_DB").ok();
        let users = state.config().users().to_vec();

        storage_supervisor::run(state, move || {
            let uri = uri.clone();
            let db_name = db_name.clone();
            let users = users.clone();
            async move {
                let config = MongoConfig::from_uri(&uri, db_name.as_deref()).await?;
                let store = MongoLeagueStore::connect(config).await?;
                store.seed_users(users).await?;
                Ok::<_, StorageError>(Arc::new(store) as Arc<dyn LeagueStore>)
            }
        })
        .await;
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "cannot install SIGTERM handler; waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
