// src/api.rs
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::error::FusionError;
use crate::fusion::{ConfidenceLevel, FusionParams};
use crate::pipeline::{AnalysisReport, PostAnalyzer};
use crate::request::PostText;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<PostAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: PostAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/analyze-post", post(analyze_post))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

// Convenience alias so tests can call `api::router(state)`.
pub fn router(state: AppState) -> Router {
    create_router(state)
}

#[derive(Debug, Deserialize)]
pub struct AnalyzePostReq {
    #[serde(default)]
    pub text: PostText,
    pub image_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeQuery {
    /// 0.90, 0.95 or 0.99; the configured level when absent.
    pub confidence: Option<f64>,
}

/// Request errors rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
}

impl From<FusionError> for ApiError {
    fn from(e: FusionError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

async fn analyze_post(
    State(state): State<AppState>,
    query: Result<Query<AnalyzeQuery>, QueryRejection>,
    body: Result<Json<AnalyzePostReq>, JsonRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    // Extractor rejections get the same JSON error body as our own checks.
    let Query(q) = query?;
    let Json(body) = body?;
    let mut params: FusionParams = state.analyzer.params();
    if let Some(level) = q.confidence {
        params.confidence = ConfidenceLevel::try_from(level).inspect_err(|e| {
            warn!(error = %e, "rejected confidence level");
        })?;
    }

    let report = state
        .analyzer
        .analyze_with(&body.text.joined(), &body.image_url, &params)
        .await;
    Ok(Json(report))
}
