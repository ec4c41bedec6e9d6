//! HTTP request handlers for the server.
//!
//! Implements the analysis and health check endpoints using axum.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use termsense_analyzer::{AnalysisError, AnalysisService};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Analysis service, shared by all requests
    pub service: Arc<AnalysisService>,
}

impl AppState {
    /// Wrap a service for sharing across handlers
    pub fn new(service: AnalysisService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Analysis request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Document text; absent or null is treated as empty
    #[serde(default)]
    pub text: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Always "OK" while the process is serving
    pub status: String,
    /// Human-readable status
    pub message: String,
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
    /// Analysis failed
    Analysis(AnalysisError),
    /// Body was not a JSON object of the expected shape
    InvalidBody(JsonRejection),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Analysis(e) => status_for(e),
            AppError::InvalidBody(rejection) => rejection.status(),
        }
    }
}

/// HTTP status for an analysis failure
pub fn status_for(error: &AnalysisError) -> StatusCode {
    match error {
        AnalysisError::InvalidInput => StatusCode::BAD_REQUEST,
        AnalysisError::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
        AnalysisError::MissingCredentials => StatusCode::SERVICE_UNAVAILABLE,
        AnalysisError::UpstreamAuth
        | AnalysisError::UpstreamBadRequest(_)
        | AnalysisError::UpstreamUnknown { .. }
        | AnalysisError::MalformedUpstreamResponse(_)
        | AnalysisError::ResponseParse { .. } => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Analysis(e) => e.to_string(),
            AppError::InvalidBody(rejection) => rejection.body_text(),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        AppError::Analysis(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection)
    }
}

/// POST /api/analyze - Analyze document text
async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let text = request.text.unwrap_or_default();

    let request_id = Uuid::now_v7();
    let span = info_span!("analyze", %request_id, text_len = text.len());

    async move {
        match state.service.analyze(&text).await {
            Ok(result) => Ok(Json(result).into_response()),
            Err(e) => {
                error!(code = e.code(), "Analysis failed: {}", e.log_summary());
                Err(AppError::from(e))
            }
        }
    }
    .instrument(span)
    .await
}

/// GET /api/health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/api/analyze", post(analyze))
        .route("/api/health", get(health_check))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
