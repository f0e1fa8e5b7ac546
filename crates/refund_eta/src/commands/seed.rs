//! Seed command - inserts synthetic status histories for development.

use anyhow::{Context, Result};
use chrono::Utc;
use config::Config;
use database::{count_status_events, create_pool, insert_status_events};
use tracing::info;

use crate::seed::generate_events;

/// Runs the seed command.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn run(config: &Config, users: u32, tax_year: i32, seed: u64) -> Result<()> {
    info!(users, tax_year, seed, "Generating simulated refund histories");

    let pool = create_pool(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let events = generate_events(users, tax_year, seed, Utc::now());
    let inserted = insert_status_events(&pool, &events).await?;
    let total = count_status_events(&pool).await?;

    info!(inserted, total, "Seed complete");
    Ok(())
}
