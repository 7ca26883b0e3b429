//! API integration tests
//!
//! Drive the router directly with in-memory requests. No model pair is on
//! disk here, so scoring goes through the demo heuristic; the wire
//! format, validation, and threshold behavior are what these tests pin.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde_json::{json, Value};
use tower::ServiceExt;

use commentguard_server::{create_router, AppState, ServerConfig, MAX_BATCH_SIZE};

/// The Prometheus recorder is process-global; install it once for every
/// test in this binary.
fn metrics_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| PrometheusBuilder::new().install_recorder().unwrap())
        .clone()
}

/// Router backed by a demo-mode scorer (no model pair on disk)
fn demo_router() -> axum::Router {
    let config = ServerConfig {
        model_dir: Some("/nonexistent/commentguard/models".into()),
    };
    let state = AppState::new(&config, metrics_handle()).unwrap();
    create_router(state)
}

async fn post_json(router: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = demo_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_predict_hateful_text() {
    let (status, body) = post_json(demo_router(), "/api/predict", json!({"text": "I hate you"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["text"], json!("I hate you"));
    assert_eq!(body["demo_mode"], json!(true));

    // demo heuristic scores, in full
    let predictions = &body["predictions"];
    assert!((predictions["toxic"].as_f64().unwrap() - 0.80).abs() < 1e-6);
    assert!((predictions["identity_hate"].as_f64().unwrap() - 0.60).abs() < 1e-6);

    // 0.80 > 0.65, so the single-path flag trips
    assert_eq!(body["is_toxic"], json!(true));
    assert_eq!(body["toxicity_level"], json!("Highly Toxic"));
    assert!((body["max_toxicity"].as_f64().unwrap() - 0.80).abs() < 1e-6);
}

#[tokio::test]
async fn test_predict_friendly_text() {
    let (status, body) =
        post_json(demo_router(), "/api/predict", json!({"text": "Thank you so much!"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_toxic"], json!(false));
    assert_eq!(body["toxicity_level"], json!("Safe"));
    assert!((body["max_toxicity"].as_f64().unwrap() - 0.10).abs() < 1e-6);
}

#[tokio::test]
async fn test_predict_response_carries_all_six_categories_in_order() {
    // field order is a wire-format invariant; check the raw body, a
    // parsed Value re-sorts object keys
    let request = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"text": "hello"}).to_string()))
        .unwrap();
    let response = demo_router().oneshot(request).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let raw = String::from_utf8(bytes.to_vec()).unwrap();

    let mut last = 0;
    for label in ["toxic", "severe_toxic", "obscene", "threat", "insult", "identity_hate"] {
        let pos = raw.find(&format!("\"{label}\"")).unwrap();
        assert!(pos >= last, "{label} out of order in {raw}");
        last = pos;
    }
}

#[tokio::test]
async fn test_predict_missing_text_is_rejected() {
    let (status, body) = post_json(demo_router(), "/api/predict", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("text"));
}

#[tokio::test]
async fn test_predict_empty_text_is_rejected() {
    let (status, body) = post_json(demo_router(), "/api/predict", json!({"text": "   "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_batch_predict_scores_in_input_order() {
    let (status, body) = post_json(
        demo_router(),
        "/api/batch-predict",
        json!({"texts": ["I hate you", "Thank you so much!"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(2));

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["text"], json!("I hate you"));
    assert_eq!(results[0]["is_toxic"], json!(true));
    assert_eq!(results[1]["text"], json!("Thank you so much!"));
    assert_eq!(results[1]["is_toxic"], json!(false));
}

#[tokio::test]
async fn test_batch_predict_skips_empty_items() {
    let (status, body) = post_json(
        demo_router(),
        "/api/batch-predict",
        json!({"texts": ["I hate you", "", "   ", "Thank you"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(2));
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_batch_over_limit_is_rejected_before_scoring() {
    let texts: Vec<String> = (0..=MAX_BATCH_SIZE).map(|i| format!("text {i}")).collect();
    assert_eq!(texts.len(), 101);

    let (status, body) =
        post_json(demo_router(), "/api/batch-predict", json!({ "texts": texts })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("batch size"));
}

#[tokio::test]
async fn test_batch_missing_texts_is_rejected() {
    let (status, body) = post_json(demo_router(), "/api/batch-predict", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_batch_threshold_is_looser_than_single() {
    // demo scoring of "damn" peaks at obscene = 0.60: over the batch
    // threshold (0.50) but under the single one (0.65)
    let single = post_json(demo_router(), "/api/predict", json!({"text": "damn"})).await.1;
    let batch = post_json(demo_router(), "/api/batch-predict", json!({"texts": ["damn"]})).await.1;

    assert_eq!(single["is_toxic"], json!(false));
    assert_eq!(batch["results"][0]["is_toxic"], json!(true));
}

#[tokio::test]
async fn test_stats_reports_demo_mode() {
    let response = demo_router()
        .oneshot(Request::builder().uri("/api/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["model_loaded"], json!(false));
    assert_eq!(body["demo_mode"], json!(true));
    assert_eq!(body["categories"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = demo_router()
        .oneshot(Request::builder().uri("/api/unknown").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
