//! HTTP surface: health, model info, training and prediction endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use eta_model::{ArtifactStore, TrainError, MIN_TRAINING_ROWS};
use refund_structs::{FeatureRow, ModelMetadata};
use serde_json::json;
use tracing::{error, info};

use crate::api::{PredictRequest, PredictResponse};
use crate::eta::clamp_eta_days;
use crate::trainer::{run_training, EventSource};

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where training runs read status history from.
    pub events: Arc<dyn EventSource>,
    /// Where fitted pipelines are persisted and loaded.
    pub artifacts: ArtifactStore,
    /// Row cap applied to each training run.
    pub training_row_limit: i64,
}

/// Builds the service router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/model/info", get(model_info))
        .route("/train", post(train))
        .route("/predict", post(predict))
        .with_state(state)
}

/// Errors surfaced as HTTP responses by the handlers.
pub enum ApiError {
    /// No trained model exists yet.
    ModelNotTrained,
    /// A training run found too little usable history.
    InsufficientData { rows: usize },
    /// Data access, artifact IO or serialization failed.
    Internal(anyhow::Error),
}

impl From<TrainError> for ApiError {
    fn from(err: TrainError) -> Self {
        match err {
            TrainError::InsufficientData { rows } => Self::InsufficientData { rows },
            TrainError::Source(err) => Self::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::ModelNotTrained => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Model not trained yet. Call /train first.".to_string(),
            ),
            Self::InsufficientData { rows } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!(
                    "Not enough training data: {rows} usable rows, \
                     need >= {MIN_TRAINING_ROWS} with AVAILABLE outcomes"
                ),
            ),
            Self::Internal(err) => {
                error!("request failed: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

/// Reports the current model metadata, or the untrained placeholder.
async fn model_info(State(state): State<AppState>) -> Result<Json<ModelMetadata>, ApiError> {
    let meta = state
        .artifacts
        .load_metadata()
        .await
        .map_err(ApiError::Internal)?;
    Ok(Json(meta))
}

/// Runs a synchronous training pass and reports the new model metadata.
async fn train(State(state): State<AppState>) -> Result<Json<ModelMetadata>, ApiError> {
    let meta = run_training(
        state.events.as_ref(),
        &state.artifacts,
        state.training_row_limit,
    )
    .await?;
    Ok(Json(meta))
}

/// Predicts days-to-available for one refund.
async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    // Loaded per request so an estimate always comes from the newest
    // completed training run.
    let pipeline = state
        .artifacts
        .load()
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::ModelNotTrained)?;
    let meta = state
        .artifacts
        .load_metadata()
        .await
        .map_err(ApiError::Internal)?;

    let features = FeatureRow::at(
        request.status,
        request.expected_amount.unwrap_or(0.0),
        Utc::now(),
    );
    let eta_days = clamp_eta_days(pipeline.predict_row(&features));

    info!(
        user_id = request.user_id,
        tax_year = request.tax_year,
        status = %features.status,
        eta_days,
        "Prediction served"
    );

    Ok(Json(PredictResponse {
        eta_days,
        model_name: meta.model_name,
        model_version: meta.model_version,
        features,
    }))
}
