//! HTTP request handlers for the verification service.
//!
//! Exposes verification, history, sources, and stats endpoints using axum.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use satya_domain::traits::{DocumentStore, LlmProvider, OcrProvider};
use satya_domain::{InputType, StoredVerification, VerificationStats};
use satya_pipeline::{
    PipelineError, SourceSummary, VerificationPipeline, VerificationReport, VerificationRequest,
    DEFAULT_HISTORY_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Shared application state
pub struct AppState<L, S>
where
    L: LlmProvider + OcrProvider,
    S: DocumentStore,
{
    /// The verification pipeline
    pub pipeline: Arc<VerificationPipeline<L, S>>,
}

impl<L, S> AppState<L, S>
where
    L: LlmProvider + OcrProvider,
    S: DocumentStore,
{
    /// Wrap a pipeline for sharing across handlers
    pub fn new(pipeline: VerificationPipeline<L, S>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

impl<L, S> Clone for AppState<L, S>
where
    L: LlmProvider + OcrProvider,
    S: DocumentStore,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

/// Verification request body
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// `text`, `url`, or `image`
    pub input_type: String,
    /// Raw text, a URL, or base64 image data
    pub content: String,
}

/// History query parameters
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of entries
    pub limit: Option<usize>,
}

/// Service metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiInfo {
    /// Greeting
    pub message: String,
    /// Crate version
    pub version: String,
    /// What the service does
    pub description: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Number of registered sources
    pub source_count: usize,
}

/// Recent verifications
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Stored verifications, newest first
    pub history: Vec<StoredVerification>,
    /// Number of entries returned
    pub count: usize,
}

/// Registered sources
#[derive(Debug, Serialize, Deserialize)]
pub struct SourcesResponse {
    /// Sources, most credible first
    pub sources: Vec<SourceSummary>,
    /// Number of sources
    pub count: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// The request could not be decoded
    BadRequest(String),
    /// The pipeline failed
    Pipeline(PipelineError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Pipeline(e) if e.is_input_error() => StatusCode::BAD_REQUEST,
            AppError::Pipeline(e) if e.is_upstream_error() => StatusCode::BAD_GATEWAY,
            AppError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(msg) => msg,
            AppError::Pipeline(e) => e.to_string(),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", message);
        } else {
            warn!(status = status.as_u16(), "{}", message);
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        AppError::Pipeline(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

/// GET /api/ - Service metadata
async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "SATYA fact-checking API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Multilingual claim verification against trusted Indian sources".to_string(),
    })
}

/// GET /health - Liveness check
async fn health_check<L, S>(State(state): State<AppState<L, S>>) -> Json<HealthCheckResponse>
where
    L: LlmProvider + OcrProvider + 'static,
    S: DocumentStore + 'static,
{
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        source_count: state.pipeline.registry().len(),
    })
}

/// POST /api/verify - Verify a submission
async fn verify<L, S>(
    State(state): State<AppState<L, S>>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerificationReport>, AppError>
where
    L: LlmProvider + OcrProvider + 'static,
    S: DocumentStore + 'static,
{
    let Json(body) = payload?;
    let input_type: InputType = body.input_type.parse().map_err(AppError::BadRequest)?;

    let report = state
        .pipeline
        .verify(VerificationRequest {
            input_type,
            content: body.content,
        })
        .await?;

    Ok(Json(report))
}

/// GET /api/history - Recent verifications
async fn history<L, S>(
    State(state): State<AppState<L, S>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, AppError>
where
    L: LlmProvider + OcrProvider + 'static,
    S: DocumentStore + 'static,
{
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let history = state.pipeline.history(limit).await?;

    Ok(Json(HistoryResponse {
        count: history.len(),
        history,
    }))
}

/// GET /api/sources - Registered sources
async fn sources<L, S>(State(state): State<AppState<L, S>>) -> Json<SourcesResponse>
where
    L: LlmProvider + OcrProvider + 'static,
    S: DocumentStore + 'static,
{
    let sources = state.pipeline.sources();
    Json(SourcesResponse {
        count: sources.len(),
        sources,
    })
}

/// GET /api/stats - Totals and verdict distribution
async fn stats<L, S>(
    State(state): State<AppState<L, S>>,
) -> Result<Json<VerificationStats>, AppError>
where
    L: LlmProvider + OcrProvider + 'static,
    S: DocumentStore + 'static,
{
    Ok(Json(state.pipeline.stats().await?))
}

/// Create the axum router with all routes
pub fn create_router<L, S>(state: AppState<L, S>) -> Router
where
    L: LlmProvider + OcrProvider + 'static,
    S: DocumentStore + 'static,
{
    Router::new()
        .route("/api/", get(api_info))
        .route("/api/verify", post(verify::<L, S>))
        .route("/api/history", get(history::<L, S>))
        .route("/api/sources", get(sources::<L, S>))
        .route("/api/stats", get(stats::<L, S>))
        .route("/health", get(health_check::<L, S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
