use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::MODEL_NAME;

/// Version string reported before any training run has completed.
pub const UNTRAINED_VERSION: &str = "untrained";

/// Descriptive metadata persisted next to a fitted model.
///
/// The optional fields are absent (not null) for the untrained placeholder,
/// so clients can probe model state with a plain key check.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    /// Model family identifier
    pub model_name: String,

    /// Version stamp of the training run, or "untrained"
    pub model_version: String,

    /// When the training run completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,

    /// Number of rows the model was fitted on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u64>,

    /// Logical feature schema the model consumes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

impl ModelMetadata {
    /// Placeholder metadata for a store that has no fitted model yet.
    pub fn untrained() -> Self {
        Self {
            model_name: MODEL_NAME.to_string(),
            model_version: UNTRAINED_VERSION.to_string(),
            trained_at: None,
            rows: None,
            features: None,
        }
    }

    /// Whether this metadata describes a completed training run.
    pub fn is_trained(&self) -> bool {
        self.model_version != UNTRAINED_VERSION
    }
}
