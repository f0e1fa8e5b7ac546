use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded status transition for a refund, as read from the event table.
///
/// `status` is the status the refund transitioned *into*. Only the columns
/// the training pipeline consumes are carried here.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, sqlx::FromRow)]
pub struct StatusEvent {
    /// Taxpayer the refund belongs to
    pub user_id: i64,

    /// Tax year of the filing
    pub tax_year: i32,

    /// Status the refund moved into
    pub status: String,

    /// Expected refund amount, if known at the time of the event
    pub expected_amount: Option<f64>,

    /// When the transition happened
    pub occurred_at: DateTime<Utc>,
}

/// A status transition to be appended to the event table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewStatusEvent {
    /// Taxpayer the refund belongs to
    pub user_id: i64,

    /// Tax year of the filing
    pub tax_year: i32,

    /// Status the refund moved out of, if any
    pub from_status: Option<String>,

    /// Status the refund moved into
    pub to_status: String,

    /// Expected refund amount, if known
    pub expected_amount: Option<f64>,

    /// External tracking identifier for the filing, if any
    pub irs_tracking_id: Option<String>,

    /// Where the event came from (IRS, SIMULATION, BACKFILL)
    pub source: String,

    /// When the transition happened
    pub occurred_at: DateTime<Utc>,
}
