//! HTTP server initialization and runtime setup.
//!
//! Handles storage connections, snapshot restore, the click stats flush task
//! and the Axum server lifecycle.

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::{LinkRepository, StatsRepository};
use crate::infrastructure::persistence::{
    MemoryLinkRepository, MemoryStatsRepository, PgLinkRepository, PgStatsRepository,
};
use crate::routes::app_router;
use crate::state::{AppState, Identity};

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Connects the configured storage backend and wires the application state.
///
/// For PostgreSQL this opens the pool and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or migrations fail.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let (links, stats): (Arc<dyn LinkRepository>, Arc<dyn StatsRepository>) =
        match config.storage_backend {
            StorageBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is required for the postgres backend")?;

                let pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                    .connect(url)
                    .await
                    .context("Failed to connect to database")?;
                tracing::info!("Connected to database");

                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to migrate")?;

                let pool = Arc::new(pool);
                (
                    Arc::new(PgLinkRepository::new(pool.clone())),
                    Arc::new(PgStatsRepository::new(pool)),
                )
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; links are lost on restart");
                (
                    Arc::new(MemoryLinkRepository::new()),
                    Arc::new(MemoryStatsRepository::new()),
                )
            }
        };

    let identity = if config.is_dev() {
        Identity::dev(config.user_header.clone())
    } else {
        Identity {
            user_header: config.user_header.clone(),
            fallback_user: None,
        }
    };

    Ok(AppState::new(links, stats, config.hostname.clone(), identity))
}

/// Saves the links of an export file that are missing from storage.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is not a link.
pub async fn restore_snapshot(state: &AppState, path: &Path) -> Result<usize> {
    let snapshot = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;

    let restored = state
        .link_service
        .restore_snapshot(&snapshot)
        .await
        .with_context(|| format!("Failed to restore snapshot {}", path.display()))?;

    tracing::info!(restored, path = %path.display(), "Restored links from snapshot");
    Ok(restored)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage (PostgreSQL with migrations, or memory)
/// - Links from `SNAPSHOT_PATH`, if set
/// - Click totals from storage
/// - Background click stats flush
/// - Axum HTTP server
///
/// Pending clicks are flushed once more on shutdown.
///
/// # Errors
///
/// Returns an error if:
/// - Storage connection fails
/// - The snapshot cannot be restored
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    if let Some(ref path) = config.snapshot_path {
        restore_snapshot(&state, path).await?;
    }

    if let Err(e) = state.click_stats.initialize().await {
        tracing::warn!("Failed to load click stats: {}. Starting from zero.", e);
    }

    let flush_interval = Duration::from_secs(config.stats_flush_interval_secs);
    tokio::spawn(state.click_stats.clone().run_flush_loop(flush_interval));

    let click_stats = state.click_stats.clone();
    let app = app_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match click_stats.flush().await {
        Ok(links) => tracing::info!(links, "Flushed click stats on shutdown"),
        Err(e) => tracing::error!("Failed to flush click stats on shutdown: {}", e),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
