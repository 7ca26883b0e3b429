//! HTTP routes and handlers
//!
//! Thin adapters between the wire format and the scorer/policy pair; no
//! scoring logic lives here.

use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::info;

use commentguard_core::{CategoryScores, TOXICITY_LABELS};
use commentguard_policy::{assess, ToxicityLevel, BATCH_PREDICT_THRESHOLD, SINGLE_PREDICT_THRESHOLD};

use crate::state::AppState;

/// Hard cap on batch request size; larger payloads are rejected before
/// any item is scored.
pub const MAX_BATCH_SIZE: usize = 100;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics))
        .route("/api/stats", get(stats))
        .route("/api/predict", post(predict))
        .route("/api/batch-predict", post(batch_predict))
        .fallback(fallback)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn render_metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    success: bool,
    text: String,
    predictions: CategoryScores,
    is_toxic: bool,
    max_toxicity: f32,
    toxicity_level: ToxicityLevel,
    timestamp: String,
    demo_mode: bool,
}

#[derive(Debug, Deserialize)]
struct BatchPredictRequest {
    #[serde(default)]
    texts: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct BatchItem {
    text: String,
    predictions: CategoryScores,
    is_toxic: bool,
    max_toxicity: f32,
}

#[derive(Debug, Serialize)]
struct BatchPredictResponse {
    success: bool,
    count: usize,
    results: Vec<BatchItem>,
    timestamp: String,
}

/// Single-prediction endpoint
async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    metrics::counter!("commentguard_requests_total", "endpoint" => "predict").increment(1);

    let text = req
        .text
        .ok_or_else(|| ApiError::invalid_request("No text provided. Send JSON with a \"text\" field."))?;
    if text.trim().is_empty() {
        return Err(ApiError::invalid_request("Text cannot be empty."));
    }

    let start = Instant::now();
    let scores = state.scorer.predict(&text);
    metrics::histogram!("commentguard_scoring_latency_us")
        .record(start.elapsed().as_micros() as f64);

    let verdict = assess(&scores, SINGLE_PREDICT_THRESHOLD);
    Ok(Json(PredictResponse {
        success: true,
        text,
        predictions: scores,
        is_toxic: verdict.is_toxic,
        max_toxicity: verdict.max_toxicity,
        toxicity_level: verdict.toxicity_level,
        timestamp: Utc::now().to_rfc3339(),
        demo_mode: state.scorer.demo_mode(),
    }))
}

/// Batch endpoint: up to [`MAX_BATCH_SIZE`] texts, scored independently,
/// results in input order. Empty items are skipped, not errors; `count`
/// reflects scored items.
async fn batch_predict(
    State(state): State<AppState>,
    Json(req): Json<BatchPredictRequest>,
) -> Result<Json<BatchPredictResponse>, ApiError> {
    metrics::counter!("commentguard_requests_total", "endpoint" => "batch_predict").increment(1);

    let texts = req
        .texts
        .ok_or_else(|| ApiError::invalid_request("No texts provided. Send JSON with a \"texts\" array."))?;
    if texts.len() > MAX_BATCH_SIZE {
        return Err(ApiError::invalid_request(format!(
            "Maximum batch size is {MAX_BATCH_SIZE} texts."
        )));
    }

    let start = Instant::now();
    let results: Vec<BatchItem> = texts
        .into_iter()
        .filter(|text| !text.trim().is_empty())
        .map(|text| {
            let scores = state.scorer.predict(&text);
            let verdict = assess(&scores, BATCH_PREDICT_THRESHOLD);
            BatchItem {
                text,
                predictions: scores,
                is_toxic: verdict.is_toxic,
                max_toxicity: verdict.max_toxicity,
            }
        })
        .collect();
    metrics::histogram!("commentguard_scoring_latency_us")
        .record(start.elapsed().as_micros() as f64);

    info!(scored = results.len(), "batch prediction complete");
    Ok(Json(BatchPredictResponse {
        success: true,
        count: results.len(),
        results,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// Model and endpoint information
async fn stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    let demo_mode = state.scorer.demo_mode();
    Json(json!({
        "model_loaded": !demo_mode,
        "categories": TOXICITY_LABELS,
        "demo_mode": demo_mode,
        "endpoints": {
            "predict": "/api/predict",
            "batch_predict": "/api/batch-predict",
            "stats": "/api/stats",
        }
    }))
}

async fn fallback() -> ApiError {
    ApiError::NotFound
}

/// Error handling
#[derive(Debug)]
pub enum ApiError {
    InvalidRequest(String),
    NotFound,
}

impl ApiError {
    fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Endpoint not found".to_string()),
        };

        let body = json!({
            "success": false,
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
