//! The fitted prediction pipeline: status encoder plus boosted ensemble.

use refund_structs::{FeatureRow, TrainingRow};
use serde::{Deserialize, Serialize};

use crate::{Gbrt, GbrtConfig, StatusEncoder, TrainError, MIN_TRAINING_ROWS};

/// Logical feature schema reported in model metadata, in consumption order.
pub const FEATURE_SCHEMA: [&str; 4] = ["status", "expected_amount", "dow", "month"];

/// A fitted encode-then-predict unit.
///
/// The encoder and the ensemble are fitted together and serialized together,
/// so a persisted pipeline always decodes feature rows with the exact column
/// layout it was trained on.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EtaPipeline {
    encoder: StatusEncoder,
    model: Gbrt,
}

impl EtaPipeline {
    /// Fits the encoder and the ensemble on a training frame.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::InsufficientData`] when fewer than
    /// [`MIN_TRAINING_ROWS`] rows are provided.
    pub fn fit(rows: &[TrainingRow], config: &GbrtConfig) -> Result<Self, TrainError> {
        if rows.len() < MIN_TRAINING_ROWS {
            return Err(TrainError::InsufficientData { rows: rows.len() });
        }

        let encoder = StatusEncoder::fit(rows.iter().map(|row| row.status.as_str()));
        let matrix: Vec<Vec<f64>> = rows
            .iter()
            .map(|row| encoder.transform(&row.feature_row()))
            .collect();
        let targets: Vec<f64> = rows.iter().map(|row| row.days_to_available).collect();
        let model = Gbrt::fit(&matrix, &targets, config);

        Ok(Self { encoder, model })
    }

    /// Predicts the raw (unclamped, fractional) days-to-available estimate.
    pub fn predict_row(&self, row: &FeatureRow) -> f64 {
        self.model.predict_row(&self.encoder.transform(row))
    }

    /// Mean squared error over a labeled training frame.
    pub fn training_mse(&self, rows: &[TrainingRow]) -> f64 {
        let matrix: Vec<Vec<f64>> = rows
            .iter()
            .map(|row| self.encoder.transform(&row.feature_row()))
            .collect();
        let targets: Vec<f64> = rows.iter().map(|row| row.days_to_available).collect();
        self.model.mse(&matrix, &targets)
    }

    /// The fitted status encoder.
    pub fn encoder(&self) -> &StatusEncoder {
        &self.encoder
    }
}
