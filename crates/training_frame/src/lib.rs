//! Training frame builder for the refund ETA model.
//!
//! This crate turns raw status transition events into labeled training rows.
//! Each refund is identified by its (user, tax year) pair; the label for an
//! event is the time from that event until the refund became available.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use refund_structs::{day_of_week, month_of_year, StatusEvent, TrainingRow, AVAILABLE_STATUS};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Key identifying one refund across its status history.
type RefundKey = (i64, i32);

/// Builds a supervised training frame from raw status transition events.
///
/// The availability horizon for each refund is the latest transition into
/// AVAILABLE; a refund that re-enters AVAILABLE keeps the later timestamp.
/// Rows are dropped when:
/// - the refund never reached AVAILABLE (no label exists), or
/// - the event is itself the AVAILABLE transition, or
/// - the event happened after the horizon (negative elapsed time).
///
/// Surviving rows are sorted newest first and capped at `limit`.
pub fn build_training_frame(events: &[StatusEvent], limit: usize) -> Vec<TrainingRow> {
    let horizons = availability_horizons(events);

    let mut rows: Vec<TrainingRow> = events
        .iter()
        .filter_map(|event| {
            if event.status == AVAILABLE_STATUS {
                return None;
            }
            let available_at = horizons.get(&(event.user_id, event.tax_year))?;
            let elapsed_ms = (*available_at - event.occurred_at).num_milliseconds();
            if elapsed_ms < 0 {
                return None;
            }
            Some(TrainingRow {
                status: event.status.clone(),
                expected_amount: event.expected_amount.unwrap_or(0.0),
                dow: day_of_week(event.occurred_at),
                month: month_of_year(event.occurred_at),
                days_to_available: elapsed_ms as f64 / MS_PER_DAY,
                occurred_at: event.occurred_at,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    rows.truncate(limit);
    rows
}

/// Latest AVAILABLE transition per refund.
fn availability_horizons(events: &[StatusEvent]) -> HashMap<RefundKey, DateTime<Utc>> {
    let mut horizons: HashMap<RefundKey, DateTime<Utc>> = HashMap::new();
    for event in events {
        if event.status != AVAILABLE_STATUS {
            continue;
        }
        horizons
            .entry((event.user_id, event.tax_year))
            .and_modify(|at| {
                if event.occurred_at > *at {
                    *at = event.occurred_at;
                }
            })
            .or_insert(event.occurred_at);
    }
    horizons
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn event(
        user_id: i64,
        tax_year: i32,
        status: &str,
        amount: Option<f64>,
        occurred_at: DateTime<Utc>,
    ) -> StatusEvent {
        StatusEvent {
            user_id,
            tax_year,
            status: status.to_string(),
            expected_amount: amount,
            occurred_at,
        }
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 3, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_target_is_days_until_available() {
        let t0 = base_time();
        let events = vec![
            event(1, 2024, "RECEIVED", Some(900.0), t0),
            event(1, 2024, "AVAILABLE", Some(900.0), t0 + Duration::days(5)),
        ];

        let rows = build_training_frame(&events, 100);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "RECEIVED");
        assert!((rows[0].days_to_available - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_reentry_uses_latest_available_horizon() {
        let t0 = base_time();
        let events = vec![
            event(1, 2024, "RECEIVED", None, t0),
            event(1, 2024, "AVAILABLE", None, t0 + Duration::days(3)),
            event(1, 2024, "PROCESSING", None, t0 + Duration::days(4)),
            event(1, 2024, "AVAILABLE", None, t0 + Duration::days(10)),
        ];

        let rows = build_training_frame(&events, 100);

        // Both non-AVAILABLE events are labeled against day 10.
        assert_eq!(rows.len(), 2);
        let received = rows.iter().find(|r| r.status == "RECEIVED").unwrap();
        let processing = rows.iter().find(|r| r.status == "PROCESSING").unwrap();
        assert!((received.days_to_available - 10.0).abs() < 1e-9);
        assert!((processing.days_to_available - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_unresolved_refunds_are_dropped() {
        let t0 = base_time();
        let events = vec![
            event(1, 2024, "RECEIVED", None, t0),
            event(1, 2024, "REJECTED", None, t0 + Duration::days(2)),
            event(2, 2024, "RECEIVED", None, t0),
            event(2, 2024, "AVAILABLE", None, t0 + Duration::days(7)),
        ];

        let rows = build_training_frame(&events, 100);

        // User 1 never reached AVAILABLE, so neither of their events trains.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "RECEIVED");
        assert!((rows[0].days_to_available - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_events_after_horizon_are_dropped() {
        let t0 = base_time();
        let events = vec![
            event(1, 2024, "SENT", None, t0),
            event(1, 2024, "AVAILABLE", None, t0 + Duration::days(1)),
            event(1, 2024, "PROCESSING", None, t0 + Duration::days(5)),
        ];

        let rows = build_training_frame(&events, 100);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "SENT");
    }

    #[test]
    fn test_available_events_do_not_become_rows() {
        let t0 = base_time();
        let events = vec![
            event(1, 2024, "SENT", None, t0),
            event(1, 2024, "AVAILABLE", None, t0 + Duration::days(2)),
        ];

        let rows = build_training_frame(&events, 100);

        assert!(rows.iter().all(|r| r.status != AVAILABLE_STATUS));
    }

    #[test]
    fn test_same_user_different_years_are_separate_refunds() {
        let t0 = base_time();
        let events = vec![
            event(1, 2023, "RECEIVED", None, t0),
            event(1, 2024, "RECEIVED", None, t0),
            event(1, 2024, "AVAILABLE", None, t0 + Duration::days(4)),
        ];

        let rows = build_training_frame(&events, 100);

        // The 2023 filing has no horizon; only the 2024 row survives.
        assert_eq!(rows.len(), 1);
        assert!((rows[0].days_to_available - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_amount_defaults_to_zero() {
        let t0 = base_time();
        let events = vec![
            event(1, 2024, "RECEIVED", None, t0),
            event(1, 2024, "AVAILABLE", None, t0 + Duration::days(1)),
        ];

        let rows = build_training_frame(&events, 100);

        assert_eq!(rows[0].expected_amount, 0.0);
    }

    #[test]
    fn test_rows_sorted_newest_first_and_capped() {
        let t0 = base_time();
        let mut events = Vec::new();
        for i in 0..10 {
            events.push(event(i, 2024, "RECEIVED", None, t0 + Duration::days(i)));
            events.push(event(
                i,
                2024,
                "AVAILABLE",
                None,
                t0 + Duration::days(i + 30),
            ));
        }

        let rows = build_training_frame(&events, 3);

        assert_eq!(rows.len(), 3);
        // Cap keeps the most recent events.
        assert_eq!(rows[0].occurred_at, t0 + Duration::days(9));
        assert_eq!(rows[1].occurred_at, t0 + Duration::days(8));
        assert_eq!(rows[2].occurred_at, t0 + Duration::days(7));
    }

    #[test]
    fn test_temporal_features_come_from_event_time() {
        // 2025-02-03 was a Monday.
        let t0 = base_time();
        let events = vec![
            event(1, 2024, "RECEIVED", None, t0),
            event(1, 2024, "AVAILABLE", None, t0 + Duration::days(2)),
        ];

        let rows = build_training_frame(&events, 100);

        assert_eq!(rows[0].dow, 0);
        assert_eq!(rows[0].month, 2);
    }

    #[test]
    fn test_sub_day_horizon_keeps_fractional_target() {
        let t0 = base_time();
        let events = vec![
            event(1, 2024, "SENT", None, t0),
            event(1, 2024, "AVAILABLE", None, t0 + Duration::hours(12)),
        ];

        let rows = build_training_frame(&events, 100);

        assert!((rows[0].days_to_available - 0.5).abs() < 1e-9);
    }
}
