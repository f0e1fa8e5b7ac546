//! Train command - one-shot training run from recorded status history.

use anyhow::{Context, Result};
use config::Config;
use database::create_pool;
use eta_model::ArtifactStore;
use tracing::info;

use crate::trainer::{run_training, PgEventSource};

/// Runs the train command.
///
/// # Errors
///
/// Returns an error if training fails, including when too little usable
/// history exists.
pub async fn run(config: &Config) -> Result<()> {
    info!("Starting training");

    let pool = create_pool(&config.database_url)
        .await
        .context("failed to connect to database")?;
    let artifacts = ArtifactStore::new(config.open_model_store()?);
    let source = PgEventSource::new(pool);

    let meta = run_training(&source, &artifacts, config.training_row_limit).await?;

    info!(
        version = %meta.model_version,
        rows = meta.rows.unwrap_or_default(),
        "Model trained and persisted"
    );
    Ok(())
}
