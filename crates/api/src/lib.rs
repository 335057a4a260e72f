//! Hemera Academy API library.
//!
//! This crate provides the API functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Request Correlation
//!
//! Every request passing through [`app`] gets a freshly minted canonical
//! request id, a request-scoped structured logger, and completion logging
//! with latency. Error responses follow a single envelope with stable
//! machine-readable codes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod build_info;
pub mod config;
pub mod error;
pub mod middleware;
pub mod monitoring;
pub mod response;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;

use crate::state::AppState;

/// Build the API router with the correlation and security middleware
/// attached.
///
/// Observability layers that only make sense in a running binary (request
/// tracing, Sentry) are added in `main`; everything the HTTP contract
/// depends on lives here so tests exercise the same stack.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_context_middleware,
        ))
        .with_state(state)
}
