//! Integration tests for the HTTP server

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use termsense_analyzer::{
    canned_result, AnalysisService, AnalyzerConfig, MockAnalyzer, ProviderConfig,
};
use termsense_domain::CategorizedResult;
use termsense_server::handlers::{create_router, AppState, ErrorResponse, HealthCheckResponse};
use tower::ServiceExt; // for oneshot

const GEMINI_PATH: &str = "/models/gemini-2.0-flash:generateContent";

/// Router backed by the mock analyzer, with no simulated delay
fn mock_app() -> Router {
    let service = AnalysisService::mock(MockAnalyzer::new(Duration::ZERO));
    create_router(AppState::new(service))
}

/// Router backed by a Gemini provider pointed at `server`
fn gemini_app(server: &MockServer) -> Router {
    let mut provider = ProviderConfig::gemini("test-key");
    provider.base_url = Some(server.base_url());
    let service = AnalysisService::from_config(&AnalyzerConfig::with_provider(provider)).unwrap();
    create_router(AppState::new(service))
}

fn analyze_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

/// In-memory log sink for a scoped subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let response = mock_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthCheckResponse = body_json(response).await;
    assert_eq!(health.status, "OK");
    assert_eq!(health.message, "Server is running");
}

#[tokio::test]
async fn test_analyze_with_mock_backend() {
    let response = mock_app()
        .oneshot(analyze_request(r#"{"text": "By using this site you agree..."}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let result: CategorizedResult = body_json(response).await;
    assert_eq!(result, canned_result());
}

#[tokio::test]
async fn test_response_uses_category_keys() {
    let response = mock_app()
        .oneshot(analyze_request(r#"{"text": "Terms"}"#))
        .await
        .unwrap();

    let body: Value = body_json(response).await;
    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    for key in [
        "ThingsToKnow",
        "ImportantPoints",
        "Risks",
        "UserObligations",
        "UserRights",
        "OptionalNotes",
    ] {
        assert!(keys.contains(&key), "missing {}", key);
    }
    assert_eq!(keys.len(), 6);
}

#[tokio::test]
async fn test_empty_text_is_bad_request() {
    for body in [r#"{"text": ""}"#, r#"{"text": "   "}"#, r#"{}"#, r#"{"text": null}"#] {
        let response = mock_app().oneshot(analyze_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);

        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.error, "Text is required");
    }
}

#[tokio::test]
async fn test_missing_credentials_is_service_unavailable() {
    let config = AnalyzerConfig {
        allow_mock_fallback: false,
        ..AnalyzerConfig::default()
    };
    let app = create_router(AppState::new(AnalysisService::from_config(&config).unwrap()));

    let response = app.oneshot(analyze_request(r#"{"text": "Terms"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_live_analysis_through_provider() {
    let server = MockServer::start_async().await;
    let completion = json!({
        "ThingsToKnow": ["Subscription renews yearly"],
        "ImportantPoints": [],
        "Risks": ["Fees may change"],
        "UserObligations": [],
        "UserRights": [],
        "OptionalNotes": []
    })
    .to_string();
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GEMINI_PATH)
                .header("x-goog-api-key", "test-key");
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": format!("```json\n{}\n```", completion) }] } }]
            }));
        })
        .await;

    let response = gemini_app(&server)
        .oneshot(analyze_request(r#"{"text": "Your subscription renews yearly."}"#))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.status(), StatusCode::OK);

    let result: CategorizedResult = body_json(response).await;
    assert_eq!(result.things_to_know, vec!["Subscription renews yearly"]);
    assert_eq!(result.risks, vec!["Fees may change"]);
}

#[tokio::test]
async fn test_rate_limit_maps_to_429() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GEMINI_PATH);
            then.status(429)
                .json_body(json!({"error": {"message": "Resource exhausted"}}));
        })
        .await;

    let response = gemini_app(&server)
        .oneshot(analyze_request(r#"{"text": "Terms"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let error: ErrorResponse = body_json(response).await;
    assert_eq!(
        error.error,
        "Rate limit exceeded. Please try again in a few minutes."
    );
}

#[tokio::test]
async fn test_upstream_auth_failure_maps_to_502() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GEMINI_PATH);
            then.status(401)
                .json_body(json!({"error": {"message": "API key not valid"}}));
        })
        .await;

    let response = gemini_app(&server)
        .oneshot(analyze_request(r#"{"text": "Terms"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error: ErrorResponse = body_json(response).await;
    assert_eq!(error.error, "Authentication failed. Please check your API key.");
}

#[tokio::test]
async fn test_unparseable_completion_maps_to_502() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GEMINI_PATH);
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "I cannot summarize this." }] } }]
            }));
        })
        .await;

    let response = gemini_app(&server)
        .oneshot(analyze_request(r#"{"text": "Terms"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_failed_analysis_log_omits_completion_text() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::ERROR)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GEMINI_PATH);
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "CONFIDENTIAL-MODEL-OUTPUT, not json" }] } }]
            }));
        })
        .await;

    let response = gemini_app(&server)
        .oneshot(analyze_request(r#"{"text": "Terms"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let logged = logs.contents();
    assert!(logged.contains("Analysis failed"), "no error logged: {logged}");
    assert!(logged.contains("response_parse"));
    assert!(!logged.contains("CONFIDENTIAL-MODEL-OUTPUT"), "completion leaked: {logged}");

    // The client still gets the excerpt
    let error: ErrorResponse = body_json(response).await;
    assert!(error.error.contains("CONFIDENTIAL-MODEL-OUTPUT"));
}

#[tokio::test]
async fn test_cors_headers_present() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/health")
        .header("origin", "chrome-extension://abcdef")
        .body(Body::empty())
        .unwrap();

    let response = mock_app().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let request = Request::builder()
        .uri("/api/unknown")
        .body(Body::empty())
        .unwrap();

    let response = mock_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
