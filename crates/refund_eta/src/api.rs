//! JSON request and response types for the HTTP surface.

use refund_structs::FeatureRow;
use serde::{Deserialize, Serialize};

/// Body for `POST /predict`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    /// Taxpayer the refund belongs to
    pub user_id: i64,

    /// Tax year of the filing
    pub tax_year: i32,

    /// Current refund status code
    pub status: String,

    /// Expected refund amount; treated as zero when omitted
    #[serde(default)]
    pub expected_amount: Option<f64>,
}

/// Body for a successful `POST /predict`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    /// Whole-day availability estimate, clamped to a sane range
    pub eta_days: i64,

    /// Model family that produced the estimate
    pub model_name: String,

    /// Version stamp of the model that produced the estimate
    pub model_version: String,

    /// The exact features the model consumed
    pub features: FeatureRow,
}
