//! vercache gateway - serves one versioned cache over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vercache::api::{create_router, AppState};
use vercache::{spawn_cleanup_task, Cache, Config, InMemoryRepository, StoreBackend};

/// Main entry point for the cache gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the repository for the configured backend
/// 4. Start background TTL cleanup task (memory backend only)
/// 5. Create Axum router with all endpoints
/// 6. Serve until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vercache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting vercache gateway");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, key_prefix={:?}, version={}, port={}",
        config.backend, config.key_prefix, config.version, config.server_port
    );

    let (state, cleanup_handle) = build_state(&config).await?;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn build_state(config: &Config) -> anyhow::Result<(AppState, Option<JoinHandle<()>>)> {
    match config.backend {
        StoreBackend::Memory => {
            let repository = InMemoryRepository::new(config.max_entries);
            let cleanup = spawn_cleanup_task(repository.store(), config.cleanup_interval);
            let cache = Cache::new(Arc::new(repository.clone()), config.cache_config());
            info!(max_entries = config.max_entries, "In-memory repository ready");
            Ok((AppState::new(cache).with_memory_stats(repository), Some(cleanup)))
        }
        StoreBackend::Redis => redis_state(config).await,
    }
}

#[cfg(feature = "redis")]
async fn redis_state(config: &Config) -> anyhow::Result<(AppState, Option<JoinHandle<()>>)> {
    let repository = vercache::RedisRepository::connect(&config.redis_url)
        .await
        .with_context(|| format!("failed to connect to {}", config.redis_url))?;
    info!("Redis repository connected");
    let cache = Cache::new(Arc::new(repository), config.cache_config());
    Ok((AppState::new(cache), None))
}

#[cfg(not(feature = "redis"))]
async fn redis_state(_config: &Config) -> anyhow::Result<(AppState, Option<JoinHandle<()>>)> {
    anyhow::bail!("STORE_BACKEND=redis requires the `redis` feature")
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the cleanup task.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
