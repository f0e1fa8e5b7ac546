//! ETA model crate for refund availability prediction.
//!
//! This crate defines the gradient-boosted regression ensemble, the status
//! encoder that turns feature rows into numeric vectors, the fitted pipeline
//! combining the two, and the artifact store that persists trained models.

use std::fmt;

mod artifact;
mod encoder;
mod gbrt;
mod pipeline;

pub use artifact::{version_stamp, ArtifactStore, ARTIFACT_OBJECT, METADATA_OBJECT};
pub use encoder::StatusEncoder;
pub use gbrt::{Gbrt, GbrtConfig};
pub use pipeline::{EtaPipeline, FEATURE_SCHEMA};

/// Minimum number of usable training rows required to fit a model.
pub const MIN_TRAINING_ROWS: usize = 50;

/// Error from a training run.
#[derive(Debug)]
pub enum TrainError {
    /// Too few labeled rows survived the training frame filters.
    InsufficientData {
        /// Number of usable rows that were available.
        rows: usize,
    },
    /// Fetching events or persisting the artifact failed.
    Source(anyhow::Error),
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData { rows } => write!(
                f,
                "not enough training data: have {rows} usable rows, \
                 need >= {MIN_TRAINING_ROWS} with AVAILABLE outcomes"
            ),
            Self::Source(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InsufficientData { .. } => None,
            Self::Source(err) => Some(err.as_ref()),
        }
    }
}
