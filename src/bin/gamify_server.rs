//! # Gamify Local Server
//!
//! Serves the three handlers over HTTP for local development. Configuration
//! comes from `config/gamify.toml`, the per-environment overlay and
//! `GAMIFY__*` environment variables.

use std::sync::Arc;

use anyhow::Context;
use gamify_core::config::ConfigLoader;
use gamify_core::database::DatabaseConnection;
use gamify_core::handlers::GamifyHandlers;
use gamify_core::logging::init_structured_logging;
use gamify_core::store::PgStore;
use gamify_core::web::{router, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loader = ConfigLoader::new();
    let config = loader.load().context("failed to load configuration")?;
    init_structured_logging(&config.logging);

    info!(
        environment = loader.environment(),
        config_directory = %loader.config_directory().display(),
        config = %config.sanitized(),
        "Configuration loaded"
    );

    let connection = DatabaseConnection::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    if !connection.health_check().await? {
        warn!("Database health check returned an unexpected value");
    }

    let store = Arc::new(PgStore::new(connection.pool().clone()));
    let state = AppState::from(GamifyHandlers::new(store, &config));

    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_address))?;
    info!(address = %config.server.bind_address, "Gamify server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    connection.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
    }
}
