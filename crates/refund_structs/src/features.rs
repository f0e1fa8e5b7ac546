use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Day of week for a timestamp, Monday = 0 through Sunday = 6.
pub fn day_of_week(at: DateTime<Utc>) -> u32 {
    at.weekday().num_days_from_monday()
}

/// Calendar month for a timestamp, January = 1 through December = 12.
pub fn month_of_year(at: DateTime<Utc>) -> u32 {
    at.month()
}

/// The fixed feature schema the model consumes.
///
/// Serialized field order matches the schema order reported in metadata.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeatureRow {
    /// Current refund status code
    pub status: String,

    /// Expected refund amount, zero when unknown
    pub expected_amount: f64,

    /// Day of week the features were taken at, Monday = 0
    pub dow: u32,

    /// Calendar month the features were taken at, 1-12
    pub month: u32,
}

impl FeatureRow {
    /// Builds a feature row for a status observed at the given instant.
    pub fn at(status: String, expected_amount: f64, when: DateTime<Utc>) -> Self {
        Self {
            status,
            expected_amount,
            dow: day_of_week(when),
            month: month_of_year(when),
        }
    }
}

/// One labeled example in the training frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRow {
    /// Status the refund was in
    pub status: String,

    /// Expected refund amount, zero when unknown
    pub expected_amount: f64,

    /// Day of week of the event, Monday = 0
    pub dow: u32,

    /// Calendar month of the event, 1-12
    pub month: u32,

    /// Target: fractional days until the refund became available
    pub days_to_available: f64,

    /// When the event happened, kept for recency ordering
    pub occurred_at: DateTime<Utc>,
}

impl TrainingRow {
    /// The feature portion of this example.
    pub fn feature_row(&self) -> FeatureRow {
        FeatureRow {
            status: self.status.clone(),
            expected_amount: self.expected_amount,
            dow: self.dow,
            month: self.month,
        }
    }
}
