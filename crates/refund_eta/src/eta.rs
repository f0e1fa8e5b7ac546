//! Post-processing of raw model estimates.

/// Upper bound on a reported estimate, ten years in days.
pub const ETA_MAX_DAYS: i64 = 3650;

/// Rounds a raw estimate to whole days and clamps it to `[0, ETA_MAX_DAYS]`.
///
/// Non-finite estimates saturate through the cast: NaN becomes 0 and
/// +infinity clamps to the upper bound.
pub fn clamp_eta_days(raw: f64) -> i64 {
    (raw.round() as i64).clamp(0, ETA_MAX_DAYS)
}
