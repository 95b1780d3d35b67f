//! Integration tests for the HTTP service

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use satya_domain::SourceRegistry;
use satya_llm::MockProvider;
use satya_pipeline::{
    ContentFetcher, FetchError, FetchedPage, PipelineConfig, VerificationPipeline,
};
use satya_server::{
    cors_layer,
    handlers::{
        create_router, ApiInfo, AppState, ErrorResponse, HealthCheckResponse, HistoryResponse,
        SourcesResponse,
    },
};
use satya_store::SqliteStore;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

const CLAIM: &str = "The Reserve Bank kept the repo rate at 6.5 percent";
const ARTICLE: &str = "The Reserve Bank kept the repo rate at 6.5 percent in its June review.";

struct OfflineFetcher;

#[async_trait]
impl ContentFetcher for OfflineFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchedPage, FetchError> {
        Err(FetchError::Status(404))
    }
}

fn silent_llm() -> MockProvider {
    MockProvider::new(r#"{"stance": "silent", "relevant_text": ""}"#)
}

/// English article whose single claim PIB Fact Check supports
fn scripted_llm() -> MockProvider {
    script(silent_llm())
}

/// Append the standard script; fragments already on `llm` take precedence
fn script(mut llm: MockProvider) -> MockProvider {
    llm.add_response_containing("Identify the primary language", "English");
    llm.add_response_containing(
        "Extract all factual claims",
        format!(
            r#"{{"claims": [{{"claim_text": "{}", "claim_type": "factual", "entities": [{{"type": "organization", "value": "Reserve Bank"}}]}}]}}"#,
            CLAIM
        ),
    );
    llm.add_response_containing(
        format!("Claim: {}\nSource: PIB Fact Check (", CLAIM),
        r#"{"stance": "supports", "relevant_text": "The policy rate is unchanged."}"#,
    );
    llm.add_response_containing(
        "Write a clear explanation",
        r#"{"explanation": "PIB Fact Check confirms the rate decision."}"#,
    );
    llm
}

fn create_test_app(llm: MockProvider) -> Router {
    let pipeline = VerificationPipeline::new(
        llm,
        SqliteStore::new(":memory:").unwrap(),
        Arc::new(OfflineFetcher),
        SourceRegistry::builtin(),
        PipelineConfig::default(),
    )
    .unwrap();
    create_router(AppState::new(pipeline))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn verify_request(input_type: &str, content: &str) -> Request<Body> {
    post_json(
        "/api/verify",
        serde_json::json!({ "input_type": input_type, "content": content }).to_string(),
    )
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_api_info_endpoint() {
    let app = create_test_app(scripted_llm());

    let response = app.oneshot(get("/api/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let info: ApiInfo = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    assert!(!info.message.is_empty());
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_app(scripted_llm());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthCheckResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.source_count, 18);
}

#[tokio::test]
async fn test_verify_text() {
    let app = create_test_app(scripted_llm());

    let response = app.oneshot(verify_request("text", ARTICLE)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let result: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(result["detected_language"], "English");
    assert_eq!(result["original_text"], ARTICLE);
    assert!(result.get("persistence_error").is_none());

    let claims = result["claims"].as_array().unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0]["claim_text"], CLAIM);
    assert_eq!(claims[0]["verdict"], "TRUE");
    assert_eq!(claims[0]["confidence"], 100);
    assert_eq!(claims[0]["supporting_sources"][0]["source_name"], "PIB Fact Check");
    assert_eq!(
        claims[0]["explanation"],
        "PIB Fact Check confirms the rate decision."
    );
}

#[tokio::test]
async fn test_verify_then_history_and_stats() {
    let app = create_test_app(scripted_llm());

    let response = app
        .clone()
        .oneshot(verify_request("text", ARTICLE))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/history")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let history: HistoryResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(history.count, 1);
    assert_eq!(history.history[0].result.claims[0].claim_text, CLAIM);

    let response = app.oneshot(get("/api/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(stats["total_articles"], 1);
    assert_eq!(stats["total_claims"], 1);
    assert_eq!(stats["verdict_distribution"]["TRUE"], 1);
    assert_eq!(stats["verdict_distribution"]["FALSE"], 0);
    assert_eq!(stats["verdict_distribution"]["MISLEADING"], 0);
    assert_eq!(stats["verdict_distribution"]["UNVERIFIED"], 0);
}

#[tokio::test]
async fn test_empty_stats() {
    let app = create_test_app(scripted_llm());

    let response = app.oneshot(get("/api/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stats: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(stats["total_articles"], 0);
    assert_eq!(stats["total_claims"], 0);
    assert_eq!(stats["verdict_distribution"]["UNVERIFIED"], 0);
}

#[tokio::test]
async fn test_history_limit() {
    let app = create_test_app(scripted_llm());
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(verify_request("text", ARTICLE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(get("/api/history?limit=2")).await.unwrap();
    let history: HistoryResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(history.count, 2);
    assert_eq!(history.history.len(), 2);
    assert!(history.history[0].article.created_at >= history.history[1].article.created_at);

    let response = app.oneshot(get("/api/history?limit=1000")).await.unwrap();
    let history: HistoryResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(history.count, 3);
}

#[tokio::test]
async fn test_history_invalid_limit() {
    let app = create_test_app(scripted_llm());

    let response = app.oneshot(get("/api/history?limit=many")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(!error.error.is_empty());
}

#[tokio::test]
async fn test_sources_endpoint() {
    let app = create_test_app(scripted_llm());

    let response = app.oneshot(get("/api/sources")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let sources: SourcesResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(sources.count, 18);
    assert_eq!(sources.sources.len(), 18);
    assert!(sources
        .sources
        .windows(2)
        .all(|pair| pair[0].credibility >= pair[1].credibility));
    assert!(sources.sources.iter().all(|s| !s.reputation.is_empty()));
}

#[tokio::test]
async fn test_verify_empty_content() {
    let llm = scripted_llm();
    let app = create_test_app(llm.clone());

    let response = app.oneshot(verify_request("text", "   ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error.error, "Content is empty");
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_verify_content_too_short() {
    let app = create_test_app(scripted_llm());

    let response = app.oneshot(verify_request("text", "Hi there")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_verify_unknown_input_type() {
    let app = create_test_app(scripted_llm());

    let response = app.oneshot(verify_request("video", ARTICLE)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(error.error.contains("video"));
}

#[tokio::test]
async fn test_verify_malformed_json() {
    let app = create_test_app(scripted_llm());

    let response = app
        .oneshot(post_json("/api/verify", r#"{"input_type": "text""#.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(!error.error.is_empty());
}

#[tokio::test]
async fn test_verify_unreachable_url() {
    let app = create_test_app(scripted_llm());

    let response = app
        .oneshot(verify_request("url", "https://news.example.in/story"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_verify_translation_failure() {
    let mut llm = silent_llm();
    llm.add_response_containing("Identify the primary language", "Tamil");
    llm.add_error_containing("Translate the following");
    let app = create_test_app(script(llm));

    let response = app.clone().oneshot(verify_request("text", ARTICLE)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = app.oneshot(get("/api/stats")).await.unwrap();
    let stats: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(stats["total_articles"], 0);
}

#[tokio::test]
async fn test_verify_malformed_model_output() {
    let mut llm = silent_llm();
    llm.add_response_containing("Extract all factual claims", "I found two claims!");
    let app = create_test_app(script(llm));

    let response = app.oneshot(verify_request("text", ARTICLE)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app(scripted_llm());

    let response = app.oneshot(get("/api/nothing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allowed_origin() {
    let origin = "https://satya.example.in";
    let app = create_test_app(scripted_llm()).layer(cors_layer(&[origin.to_string()]).unwrap());

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        origin
    );

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .header(header::ORIGIN, "https://elsewhere.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_wildcard() {
    let app = create_test_app(scripted_llm()).layer(cors_layer(&["*".to_string()]).unwrap());

    let request = Request::builder()
        .method("GET")
        .uri("/api/")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
