//! Integration tests for web-vitals ingestion.
//!
//! Covers the acknowledgement contract: plain `{ok}` bodies, status codes
//! per failure class, and the consent gate on page URLs.

#![allow(clippy::indexing_slicing)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};

use hemera_core::Environment;
use hemera_integration_tests::{
    expect_json, post_json, request_id_header, send, spawn_app, test_config, wait_for_events,
};

fn sample_metric() -> Value {
    json!({
        "name": "LCP",
        "value": 1824.5,
        "id": "v3-1712256398112-5839715422946",
        "label": "web-vital",
        "path": "/courses/rust-101",
    })
}

// =============================================================================
// Acceptance Tests
// =============================================================================

#[tokio::test]
async fn test_metric_accepted_in_production() {
    let app = spawn_app(test_config(Environment::Production));
    let response = post_json(&app.router, "/api/monitoring/vitals", &sample_metric()).await;

    assert!(request_id_header(&response).is_some());
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body, json!({"ok": true}));

    // Acceptance log, business event, and completion log all delivered
    let events = wait_for_events(&app.sink, 3).await;
    let business = events
        .iter()
        .find(|event| event.message == "Business event: web_vitals_metric")
        .expect("business event delivered");
    assert_eq!(business.payload["data"]["metric"], "LCP");
    assert_eq!(business.payload["data"]["value"], 1824.5);
    assert_eq!(business.payload["data"]["path"], "/courses/rust-101");
}

#[tokio::test]
async fn test_optional_fields_may_be_omitted() {
    let app = spawn_app(test_config(Environment::Production));
    let response = post_json(
        &app.router,
        "/api/monitoring/vitals",
        &json!({"name": "CLS", "value": 0.07}),
    )
    .await;

    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn test_unknown_fields_ignored() {
    let app = spawn_app(test_config(Environment::Production));
    let mut metric = sample_metric();
    metric["ts"] = json!(1_712_256_398_112_u64);
    metric["extra"] = json!({"nested": true});

    let response = post_json(&app.router, "/api/monitoring/vitals", &metric).await;
    expect_json(response, StatusCode::OK).await;
}

// =============================================================================
// Rejection Tests
// =============================================================================

#[tokio::test]
async fn test_non_json_content_type_rejected() {
    let app = spawn_app(test_config(Environment::Production));
    let request = Request::builder()
        .method("POST")
        .uri("/api/monitoring/vitals")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("name=LCP"))
        .expect("valid request");

    let response = send(&app.router, request).await;
    let body = expect_json(response, StatusCode::UNSUPPORTED_MEDIA_TYPE).await;
    assert_eq!(body, json!({"ok": false}));
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = spawn_app(test_config(Environment::Production));
    let request = Request::builder()
        .method("POST")
        .uri("/api/monitoring/vitals")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("valid request");

    let response = send(&app.router, request).await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body, json!({"ok": false}));
}

#[tokio::test]
async fn test_missing_name_rejected() {
    let app = spawn_app(test_config(Environment::Production));
    let response = post_json(
        &app.router,
        "/api/monitoring/vitals",
        &json!({"value": 120.0}),
    )
    .await;

    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body, json!({"ok": false}));
}

#[tokio::test]
async fn test_non_numeric_value_rejected() {
    let app = spawn_app(test_config(Environment::Production));
    let response = post_json(
        &app.router,
        "/api/monitoring/vitals",
        &json!({"name": "TTFB", "value": "fast"}),
    )
    .await;

    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body, json!({"ok": false}));
}

// =============================================================================
// Collection Gate Tests
// =============================================================================

#[tokio::test]
async fn test_disabled_outside_production() {
    let app = spawn_app(test_config(Environment::Development));
    let response = post_json(&app.router, "/api/monitoring/vitals", &sample_metric()).await;

    let body = expect_json(response, StatusCode::ACCEPTED).await;
    assert_eq!(body, json!({"ok": false, "reason": "disabled"}));

    // Only the completion log reaches the sink; the metric is not recorded
    let events = wait_for_events(&app.sink, 1).await;
    assert!(
        events
            .iter()
            .all(|event| event.message != "Business event: web_vitals_metric")
    );
}

#[tokio::test]
async fn test_disabled_when_flag_off() {
    let mut config = test_config(Environment::Production);
    config.web_vitals_enabled = false;
    let app = spawn_app(config);

    let response = post_json(&app.router, "/api/monitoring/vitals", &sample_metric()).await;
    let body = expect_json(response, StatusCode::ACCEPTED).await;
    assert_eq!(body, json!({"ok": false, "reason": "disabled"}));
}

#[tokio::test]
async fn test_validation_runs_before_gate() {
    // A bad payload is a 400 even where collection is disabled
    let app = spawn_app(test_config(Environment::Development));
    let response = post_json(
        &app.router,
        "/api/monitoring/vitals",
        &json!({"name": "", "value": 1.0}),
    )
    .await;

    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body, json!({"ok": false}));
}

// =============================================================================
// Consent Tests
// =============================================================================

#[tokio::test]
async fn test_href_stripped_without_consent() {
    let app = spawn_app(test_config(Environment::Production));
    let mut metric = sample_metric();
    metric["href"] = json!("https://hemera.academy/courses/rust-101?token=secret");

    let response = post_json(&app.router, "/api/monitoring/vitals", &metric).await;
    expect_json(response, StatusCode::OK).await;

    let events = wait_for_events(&app.sink, 3).await;
    let business = events
        .iter()
        .find(|event| event.message == "Business event: web_vitals_metric")
        .expect("business event delivered");
    assert_eq!(business.payload["data"]["href"], Value::Null);
}

#[tokio::test]
async fn test_href_kept_with_consent() {
    let mut config = test_config(Environment::Production);
    config.telemetry_consent = true;
    let app = spawn_app(config);

    let mut metric = sample_metric();
    metric["href"] = json!("https://hemera.academy/courses/rust-101");

    let response = post_json(&app.router, "/api/monitoring/vitals", &metric).await;
    expect_json(response, StatusCode::OK).await;

    let events = wait_for_events(&app.sink, 3).await;
    let business = events
        .iter()
        .find(|event| event.message == "Business event: web_vitals_metric")
        .expect("business event delivered");
    assert_eq!(
        business.payload["data"]["href"],
        json!("https://hemera.academy/courses/rust-101")
    );
}

// =============================================================================
// Preflight Tests
// =============================================================================

#[tokio::test]
async fn test_options_preflight() {
    let app = spawn_app(test_config(Environment::Production));
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/monitoring/vitals")
        .body(Body::empty())
        .expect("valid request");

    let response = send(&app.router, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers().get(header::ALLOW).map(|v| v.as_bytes()),
        Some(b"OPTIONS, POST".as_slice())
    );
}
