use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use object_store::local::LocalFileSystem;
use object_store::ObjectStore;

/// Default directory for model artifacts.
const DEFAULT_MODEL_BASE_PATH: &str = "./models";

/// Default listen address for the HTTP service.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default cap on rows pulled into one training run.
const DEFAULT_TRAINING_ROW_LIMIT: i64 = 200_000;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Base directory for persisted model artifacts
    pub model_base_path: PathBuf,

    /// Listen address for the HTTP service
    pub bind_addr: String,

    /// Maximum number of rows fetched for a training run
    pub training_row_limit: i64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `DATABASE_URL`: `PostgreSQL` connection string
    ///
    /// Optional environment variables:
    /// - `MODEL_BASE_PATH`: Base directory for model artifacts (default: `./models`)
    /// - `BIND_ADDR`: HTTP listen address (default: `0.0.0.0:8080`)
    /// - `TRAINING_ROW_LIMIT`: Row cap per training run (default: `200000`)
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or an
    /// optional one does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL environment variable not set")?;

        let model_base_path = std::env::var("MODEL_BASE_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_MODEL_BASE_PATH), PathBuf::from);

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let training_row_limit = match std::env::var("TRAINING_ROW_LIMIT") {
            Ok(raw) => raw
                .parse()
                .context("TRAINING_ROW_LIMIT must be an integer")?,
            Err(_) => DEFAULT_TRAINING_ROW_LIMIT,
        };

        Ok(Self {
            database_url,
            model_base_path,
            bind_addr,
            training_row_limit,
        })
    }

    /// Opens the local object store rooted at the model directory, creating
    /// the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or opened.
    pub fn open_model_store(&self) -> anyhow::Result<Arc<dyn ObjectStore>> {
        std::fs::create_dir_all(&self.model_base_path).with_context(|| {
            format!(
                "failed to create model directory {}",
                self.model_base_path.display()
            )
        })?;
        let store = LocalFileSystem::new_with_prefix(&self.model_base_path)
            .context("failed to open model directory as object store")?;
        Ok(Arc::new(store))
    }
}
