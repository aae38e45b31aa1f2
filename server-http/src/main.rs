use quire::CacheClient;
use server_http::{build_router, AppState};
use shared::config::{CacheConfig, Config};
use shared::Error;
use std::sync::Arc;
use storage_engine::{PgTodoStore, RedisConnector};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env before the subscriber so RUST_LOG from the file applies
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting quire HTTP Server...");

    match dotenv {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let config = Config::from_env();
    config.log_summary();

    // A broken schema must never serve traffic
    let store = PgTodoStore::connect(&config.database).await?;
    store.ensure_schema().await?;

    let cache = init_cache(config.cache.as_ref()).await;

    let state = AppState::new(Arc::new(store.clone()), cache);
    let router = build_router(state, &config.http);

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("failed to bind {}: {}", addr, e)))?;

    info!("HTTP Server listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Internal(format!("server error: {}", e)))?;

    store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// A cache that fails to connect leaves the server running in degraded mode.
async fn init_cache(config: Option<&CacheConfig>) -> Arc<CacheClient> {
    let Some(config) = config else {
        warn!("No cache endpoint configured (REDIS_URL / REDIS_HOST); cache routes disabled");
        return Arc::new(CacheClient::disabled("redis"));
    };

    let connector = match RedisConnector::new(config) {
        Ok(connector) => connector,
        Err(e) => {
            warn!("Cache disabled: {}", e);
            return Arc::new(CacheClient::disabled("redis"));
        }
    };

    let client = Arc::new(CacheClient::new(
        "redis",
        Arc::new(connector),
        config.connect_timeout,
    ));

    if client.connect().await.is_err() {
        warn!("Continuing without cache; retrying in the background");
    }
    client.spawn_reconnect(config.reconnect_interval);

    client
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Shutting down gracefully...");
}
