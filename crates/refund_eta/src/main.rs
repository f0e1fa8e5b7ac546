//! Refund ETA Prediction Service
//!
//! Trains a gradient-boosted regressor on refund status transition history
//! and serves estimated days-until-available over HTTP.

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use database::{create_pool, run_migrations};
use tracing::info;
use tracing_subscriber::EnvFilter;

use refund_eta::commands;

/// Refund ETA Prediction Service
#[derive(Parser)]
#[command(name = "refund-eta")]
#[command(about = "Gradient-boosted ETA model for tax refund availability")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP prediction service
    Serve,

    /// Train a new model version from recorded status history
    Train,

    /// Predict days-to-available for a single refund status
    Predict {
        /// Current refund status code (e.g. "PROCESSING")
        #[arg(short, long)]
        status: String,

        /// Expected refund amount in dollars
        #[arg(short, long)]
        expected_amount: Option<f64>,
    },

    /// Insert synthetic status histories for local development
    Seed {
        /// Number of simulated filings
        #[arg(short, long, default_value = "200")]
        users: u32,

        /// Tax year for the generated filings
        #[arg(short, long, default_value = "2025")]
        tax_year: i32,

        /// Seed for the deterministic generator
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Run database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    match cli.command {
        Commands::Serve => {
            commands::serve::run(&config).await?;
        }
        Commands::Train => {
            commands::train::run(&config).await?;
        }
        Commands::Predict {
            status,
            expected_amount,
        } => {
            commands::predict::run(&config, &status, expected_amount).await?;
        }
        Commands::Seed {
            users,
            tax_year,
            seed,
        } => {
            commands::seed::run(&config, users, tax_year, seed).await?;
        }
        Commands::Migrate => {
            let pool = create_pool(&config.database_url).await?;
            run_migrations(&pool).await?;
            info!("Migrations completed successfully");
        }
    }

    Ok(())
}
