//! One-hot encoding for the categorical status feature.

use refund_structs::FeatureRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Numeric features appended after the one-hot block: expected_amount, dow, month.
const NUMERIC_FEATURES: usize = 3;

/// Fitted encoder mapping a [`FeatureRow`] to a dense numeric vector.
///
/// The layout is one binary column per status learned at fit time, in sorted
/// order, followed by the numeric passthrough columns. A status never seen
/// during fitting encodes as all zeros in the one-hot block, so predictions
/// for it fall back to the numeric features alone.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatusEncoder {
    categories: Vec<String>,
}

impl StatusEncoder {
    /// Learns the category set from the statuses present in the training data.
    pub fn fit<'a>(statuses: impl IntoIterator<Item = &'a str>) -> Self {
        let distinct: BTreeSet<&str> = statuses.into_iter().collect();
        Self {
            categories: distinct.into_iter().map(str::to_owned).collect(),
        }
    }

    /// The statuses this encoder was fitted on, sorted.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Width of the encoded vector.
    pub fn width(&self) -> usize {
        self.categories.len() + NUMERIC_FEATURES
    }

    /// Encodes a feature row into a dense vector of [`Self::width`] columns.
    pub fn transform(&self, row: &FeatureRow) -> Vec<f64> {
        let mut out = vec![0.0; self.width()];
        if let Ok(slot) = self
            .categories
            .binary_search_by(|category| category.as_str().cmp(row.status.as_str()))
        {
            out[slot] = 1.0;
        }
        let numeric_start = self.categories.len();
        out[numeric_start] = row.expected_amount;
        out[numeric_start + 1] = f64::from(row.dow);
        out[numeric_start + 2] = f64::from(row.month);
        out
    }
}
