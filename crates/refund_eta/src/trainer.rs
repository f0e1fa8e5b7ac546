//! Training orchestration: events to training frame to persisted artifact.

use async_trait::async_trait;
use chrono::Utc;
use eta_model::{version_stamp, ArtifactStore, EtaPipeline, GbrtConfig, TrainError, FEATURE_SCHEMA};
use refund_structs::{ModelMetadata, StatusEvent, MODEL_NAME};
use sqlx::PgPool;
use tracing::info;
use training_frame::build_training_frame;

/// Source of historical status transition events.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetches the most recent events, newest first, up to `limit` rows.
    async fn fetch_recent(&self, limit: i64) -> anyhow::Result<Vec<StatusEvent>>;
}

/// Event source backed by the Postgres event table.
pub struct PgEventSource {
    pool: PgPool,
}

impl PgEventSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventSource for PgEventSource {
    async fn fetch_recent(&self, limit: i64) -> anyhow::Result<Vec<StatusEvent>> {
        Ok(database::fetch_status_events(&self.pool, limit).await?)
    }
}

/// Runs one full training pass and persists the result.
///
/// Nothing is persisted when any step fails, so the previously trained model
/// keeps serving until a run completes.
///
/// # Errors
///
/// Returns [`TrainError::InsufficientData`] when too few usable rows exist,
/// or [`TrainError::Source`] when fetching events or persisting the artifact
/// fails.
pub async fn run_training(
    source: &dyn EventSource,
    store: &ArtifactStore,
    row_limit: i64,
) -> Result<ModelMetadata, TrainError> {
    let events = source
        .fetch_recent(row_limit)
        .await
        .map_err(TrainError::Source)?;
    info!(events = events.len(), "Loaded status history");

    let rows = build_training_frame(&events, row_limit.max(0) as usize);
    info!(rows = rows.len(), "Built training frame");

    let pipeline = EtaPipeline::fit(&rows, &GbrtConfig::default())?;

    let trained_at = Utc::now();
    let meta = ModelMetadata {
        model_name: MODEL_NAME.to_string(),
        model_version: version_stamp(trained_at),
        trained_at: Some(trained_at),
        rows: Some(rows.len() as u64),
        features: Some(FEATURE_SCHEMA.iter().map(|s| (*s).to_string()).collect()),
    };

    store
        .save(&pipeline, &meta)
        .await
        .map_err(TrainError::Source)?;

    info!(
        version = %meta.model_version,
        rows = rows.len(),
        train_mse = pipeline.training_mse(&rows),
        "Training complete"
    );
    Ok(meta)
}
