//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET     /api/health             - Health check with build provenance
//! POST    /api/monitoring/vitals  - Web-vitals ingestion
//! OPTIONS /api/monitoring/vitals  - Beacon preflight
//! GET     /api/demo/errors        - Error showcase (development only)
//! ```
//!
//! Unmatched paths get the standard `NOT_FOUND` error envelope.

pub mod demo;
pub mod health;
pub mod vitals;

use axum::{
    Router,
    routing::{get, post},
};

use hemera_core::ErrorCode;

use crate::error::ApiError;
use crate::monitoring::RequestLogger;
use crate::state::AppState;

/// Create the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .route(
            "/api/monitoring/vitals",
            post(vitals::ingest).options(vitals::preflight),
        )
        .route("/api/demo/errors", get(demo::errors))
        .fallback(not_found)
}

async fn not_found(logger: RequestLogger) -> ApiError {
    ApiError::new(ErrorCode::NotFound, "Resource not found")
        .with_request_id(logger.context().id.clone())
}
