//! Hemera Academy API - request correlation and observability service.
//!
//! This binary serves the JSON API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Canonical per-request correlation ids, never taken from the client
//! - Structured request logging mirrored to Sentry via a bounded queue
//! - Web-vitals ingestion gated on environment and consent
//!
//! # Observability
//!
//! - Sentry for error reporting (events flow through the reporter queue;
//!   the tracing bridge contributes breadcrumbs only)
//! - `TraceLayer` spans carrying method, uri, status, latency, request id

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use sentry::integrations::tracing as sentry_tracing;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hemera_api::build_info::BuildInfo;
use hemera_api::config::ApiConfig;
use hemera_api::monitoring::{Reporter, ReporterOptions, SentrySink};
use hemera_api::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ApiConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let environment = config
        .sentry_environment
        .clone()
        .unwrap_or_else(|| config.environment.as_str().to_string());

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(std::borrow::Cow::Owned(environment)),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
///
/// Everything becomes at most a breadcrumb: the reporter queue owns event
/// delivery, so the tracing bridge only supplies the trail leading up to
/// each reported event.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR
        | tracing::Level::WARN
        | tracing::Level::INFO
        | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ApiConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hemera_api=info,tower_http=debug".into());

    // Use JSON format on Fly.io for structured log parsing, text format locally
    let is_fly = std::env::var("FLY_APP_NAME").is_ok();
    let json_layer = is_fly.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_fly).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let build_info = BuildInfo::resolve();
    tracing::info!(
        version = %build_info.version,
        commit = build_info.short_sha.as_deref().unwrap_or("unknown"),
        environment = config.environment.as_str(),
        "Starting Hemera API"
    );

    // Background worker delivering queued reports to Sentry
    let (reporter, reporter_worker) = Reporter::spawn(
        SentrySink,
        ReporterOptions {
            disabled: config.error_reporting_disabled,
            pii_consent: config.telemetry_consent,
        },
    );

    // Build application state
    let state = AppState::new(config.clone(), reporter, build_info);

    // Build router
    let app = hemera_api::app(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                        request_id = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // The router (and with it every reporter handle) is gone once serve
    // returns; give the worker a moment to drain the queue.
    if tokio::time::timeout(Duration::from_secs(5), reporter_worker)
        .await
        .is_err()
    {
        tracing::warn!("Reporter queue did not drain before the shutdown deadline");
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
