//! Synthetic status histories for local development and load testing.
//!
//! The generator walks each simulated filing through the normal progression
//! RECEIVED -> PROCESSING -> APPROVED -> SENT -> AVAILABLE, with a small
//! share of filings dead-ending in REJECTED. All timestamps land in the
//! past so the generated history is immediately trainable.

use chrono::{DateTime, Duration, Utc};
use refund_structs::NewStatusEvent;
use uuid::Uuid;

/// Orderly progression a simulated filing walks through.
const PROGRESSION: [&str; 5] = ["RECEIVED", "PROCESSING", "APPROVED", "SENT", "AVAILABLE"];

const REJECTED_STATUS: &str = "REJECTED";

/// Source tag recorded on every generated event.
pub const SIMULATION_SOURCE: &str = "SIMULATION";

/// Step the LCG and return the next raw draw.
fn next_rand(rng_state: &mut u64) -> u64 {
    // LCG: state = (a * state + c) mod m
    *rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
    *rng_state >> 33
}

/// Generates deterministic status histories for `users` simulated filings.
///
/// Roughly one in ten filings is rejected after PROCESSING and never reaches
/// AVAILABLE; roughly one in twelve has no expected amount on file.
pub fn generate_events(
    users: u32,
    tax_year: i32,
    seed: u64,
    now: DateTime<Utc>,
) -> Vec<NewStatusEvent> {
    let mut rng_state = seed.wrapping_add(12345);
    let mut events = Vec::new();

    for user in 0..users {
        let user_id = 1_000 + i64::from(user);
        let tracking_id = format!("SIM-{}", Uuid::new_v4());

        let expected_amount = if next_rand(&mut rng_state) % 12 == 0 {
            None
        } else {
            Some(250.0 + (next_rand(&mut rng_state) % 7_750) as f64)
        };
        let rejected = next_rand(&mut rng_state) % 10 == 0;

        // Filed 90 to 210 days ago; hops below add at most 60 days, so the
        // whole history stays in the past.
        let mut occurred_at =
            now - Duration::days(90 + (next_rand(&mut rng_state) % 120) as i64);
        let mut from_status: Option<String> = None;

        for status in PROGRESSION {
            let status = if rejected && status == "APPROVED" {
                REJECTED_STATUS
            } else {
                status
            };

            events.push(NewStatusEvent {
                user_id,
                tax_year,
                from_status: from_status.clone(),
                to_status: status.to_string(),
                expected_amount,
                irs_tracking_id: Some(tracking_id.clone()),
                source: SIMULATION_SOURCE.to_string(),
                occurred_at,
            });

            if status == REJECTED_STATUS {
                break;
            }
            from_status = Some(status.to_string());
            occurred_at = occurred_at
                + Duration::days(1 + (next_rand(&mut rng_state) % 14) as i64)
                + Duration::hours((next_rand(&mut rng_state) % 24) as i64);
        }
    }

    events
}
