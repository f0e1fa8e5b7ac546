//! Serve command - runs the HTTP prediction service.

use std::sync::Arc;

use anyhow::{Context, Result};
use config::Config;
use database::create_pool;
use eta_model::ArtifactStore;
use tracing::info;

use crate::server::{build_router, AppState};
use crate::trainer::PgEventSource;

/// Runs the serve command.
///
/// # Errors
///
/// Returns an error if the database, model store or listener cannot be
/// opened, or if the server fails while running.
pub async fn run(config: &Config) -> Result<()> {
    let pool = create_pool(&config.database_url)
        .await
        .context("failed to connect to database")?;
    let artifacts = ArtifactStore::new(config.open_model_store()?);

    let state = AppState {
        events: Arc::new(PgEventSource::new(pool)),
        artifacts,
        training_row_limit: config.training_row_limit,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Refund ETA service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutting down");
}
