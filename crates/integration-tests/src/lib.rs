//! Integration tests for the Hemera Academy API.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p hemera-integration-tests
//! ```
//!
//! The suite drives the full router in process via `tower::ServiceExt`,
//! with reported events captured in a `MemorySink` instead of leaving the
//! machine. No external services are required.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use hemera_api::build_info::BuildInfo;
use hemera_api::config::ApiConfig;
use hemera_api::monitoring::{MemorySink, ReportEvent, Reporter, ReporterOptions};
use hemera_api::state::AppState;
use hemera_core::Environment;

/// A fully wired API under test.
///
/// Reported events land in `sink`; the delivery worker runs on the test
/// runtime and is detached when the test ends.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub sink: Arc<MemorySink>,
    pub worker: tokio::task::JoinHandle<()>,
}

/// Baseline configuration for tests: vitals collection on, reporting on,
/// no consent, no Sentry.
#[must_use]
pub fn test_config(environment: Environment) -> ApiConfig {
    ApiConfig {
        environment,
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://127.0.0.1:0".to_string(),
        web_vitals_enabled: true,
        error_reporting_disabled: false,
        telemetry_consent: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    }
}

/// Build the app with an in-memory report sink.
#[must_use]
pub fn spawn_app(config: ApiConfig) -> TestApp {
    let sink = Arc::new(MemorySink::default());
    let (reporter, worker) = Reporter::spawn(
        Arc::clone(&sink),
        ReporterOptions {
            disabled: config.error_reporting_disabled,
            pii_consent: config.telemetry_consent,
        },
    );
    let state = AppState::new(config, reporter, BuildInfo::resolve());
    TestApp {
        router: hemera_api::app(state.clone()),
        state,
        sink,
        worker,
    }
}

/// Send one request through the router.
pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

/// GET a path with no body.
pub async fn get(router: &Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("valid request");
    send(router, request).await
}

/// POST a JSON body to a path.
pub async fn post_json(router: &Router, path: &str, body: &Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request");
    send(router, request).await
}

/// Read a response body as JSON, asserting the expected status first.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes).expect("JSON body")
}

/// The `x-request-id` response header as a string.
#[must_use]
pub fn request_id_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

/// Wait until the sink has delivered at least `at_least` events.
///
/// Delivery is asynchronous; poll briefly rather than sleeping a fixed
/// amount.
pub async fn wait_for_events(sink: &MemorySink, at_least: usize) -> Vec<ReportEvent> {
    for _ in 0..400 {
        let events = sink.events();
        if events.len() >= at_least {
            return events;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    sink.events()
}
