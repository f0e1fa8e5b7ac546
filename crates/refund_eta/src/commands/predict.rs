//! Predict command - one-shot prediction against the persisted model.

use anyhow::Result;
use chrono::Utc;
use config::Config;
use eta_model::ArtifactStore;
use refund_structs::FeatureRow;
use tracing::info;

use crate::eta::clamp_eta_days;

/// Runs the predict command.
///
/// Works entirely from the persisted artifact; no database connection is
/// needed.
///
/// # Errors
///
/// Returns an error if no trained model exists or the artifact cannot be
/// read.
pub async fn run(config: &Config, status: &str, expected_amount: Option<f64>) -> Result<()> {
    let artifacts = ArtifactStore::new(config.open_model_store()?);

    let Some(pipeline) = artifacts.load().await? else {
        anyhow::bail!("no trained model found; run `refund-eta train` first");
    };
    let meta = artifacts.load_metadata().await?;

    let features = FeatureRow::at(status.to_string(), expected_amount.unwrap_or(0.0), Utc::now());
    let raw = pipeline.predict_row(&features);
    let eta_days = clamp_eta_days(raw);

    info!(
        model = %meta.model_name,
        version = %meta.model_version,
        "Loaded persisted model"
    );
    info!(
        status = %features.status,
        expected_amount = features.expected_amount,
        dow = features.dow,
        month = features.month,
        "Features"
    );
    info!(eta_days, raw, "Estimated days until the refund is available");
    Ok(())
}
