//! Repository functions for the refund status event table.

use chrono::{DateTime, Utc};
use refund_structs::{NewStatusEvent, StatusEvent};
use sqlx::PgPool;

/// Fetches the most recent status transitions, newest first.
///
/// Only the columns the training pipeline consumes are selected. The
/// `expected_amount` column is stored as NUMERIC and cast to float8 here so
/// it decodes straight into `f64`.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn fetch_status_events(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<StatusEvent>, sqlx::Error> {
    sqlx::query_as::<_, StatusEvent>(
        r#"
        SELECT
            user_id,
            tax_year,
            to_status AS status,
            expected_amount::float8 AS expected_amount,
            occurred_at
        FROM refund_status_event
        ORDER BY occurred_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Inserts multiple status transition events in a single statement.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn insert_status_events(
    pool: &PgPool,
    events: &[NewStatusEvent],
) -> Result<usize, sqlx::Error> {
    if events.is_empty() {
        return Ok(0);
    }

    let user_ids: Vec<i64> = events.iter().map(|e| e.user_id).collect();
    let tax_years: Vec<i32> = events.iter().map(|e| e.tax_year).collect();
    let from_statuses: Vec<Option<String>> =
        events.iter().map(|e| e.from_status.clone()).collect();
    let to_statuses: Vec<String> = events.iter().map(|e| e.to_status.clone()).collect();
    let amounts: Vec<Option<f64>> = events.iter().map(|e| e.expected_amount).collect();
    let tracking_ids: Vec<Option<String>> =
        events.iter().map(|e| e.irs_tracking_id.clone()).collect();
    let sources: Vec<String> = events.iter().map(|e| e.source.clone()).collect();
    let occurred_ats: Vec<DateTime<Utc>> = events.iter().map(|e| e.occurred_at).collect();

    let result = sqlx::query(
        r#"
        INSERT INTO refund_status_event
            (user_id, tax_year, from_status, to_status, expected_amount, irs_tracking_id, source, occurred_at)
        SELECT * FROM unnest(
            $1::bigint[], $2::int[], $3::text[], $4::text[],
            $5::float8[], $6::text[], $7::text[], $8::timestamptz[]
        )
        "#,
    )
    .bind(&user_ids)
    .bind(&tax_years)
    .bind(&from_statuses)
    .bind(&to_statuses)
    .bind(&amounts)
    .bind(&tracking_ids)
    .bind(&sources)
    .bind(&occurred_ats)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() as usize)
}

/// Counts all recorded status transition events.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn count_status_events(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM refund_status_event")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
