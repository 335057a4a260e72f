//! Demo endpoint that triggers each error shape on demand.
//!
//! Only served in development. Lets a developer eyeball the envelope,
//! status mapping, and reporting pipeline for every error family without
//! breaking anything real.

use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;

use hemera_core::ErrorCode;

use crate::error::{ApiError, Result};
use crate::monitoring::{ReportContext, ReportLevel, RequestLogger};
use crate::response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DemoParams {
    #[serde(rename = "type")]
    kind: Option<String>,
}

const DEMO_TYPES: [&str; 6] = [
    "course-not-found",
    "payment-error",
    "database-error",
    "auth-error",
    "config-error",
    "standard-error",
];

/// `GET /api/demo/errors?type=...` - produce a sample error response.
pub async fn errors(
    State(state): State<AppState>,
    logger: RequestLogger,
    Query(params): Query<DemoParams>,
) -> Result<Response> {
    let request_id = logger.context().id.clone();

    if !state.environment().is_development() {
        return Err(ApiError::new(
            ErrorCode::Forbidden,
            "Demo endpoints are only available in development",
        )
        .with_request_id(request_id));
    }

    let Some(kind) = params.kind else {
        return Ok(response::success(
            json!({
                "message": "Error demo endpoint",
                "usage": "GET /api/demo/errors?type=<type>",
                "types": DEMO_TYPES,
            }),
            logger.context(),
        ));
    };

    logger.info("Triggering demo error", json!({"type": kind}));

    let environment = state.environment();
    let error = match kind.as_str() {
        "course-not-found" => ApiError::new(
            ErrorCode::NotFound,
            "Course not found: advanced-quantum-basketweaving",
        ),
        "payment-error" => ApiError::new(
            ErrorCode::PaymentFailed,
            "Payment declined by the payment provider",
        ),
        "database-error" => ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            .with_details(
                environment,
                json!({"pool": "primary", "waiters": 14}),
            ),
        "auth-error" => {
            // Reports with person fields attached so the consent-based
            // redaction path gets exercised end to end
            state.reporter().report(
                ReportLevel::Error,
                "Demo authentication failure",
                ReportContext::from_request(logger.context()).with_user(
                    Some("demo-user-1".to_string()),
                    Some("demo@hemera.academy".to_string()),
                ),
                json!({"type": "auth-error"}),
            );
            ApiError::new(ErrorCode::Unauthorized, "Session token has expired")
        }
        "config-error" => ApiError::new(
            ErrorCode::InternalError,
            "Server configuration is incomplete",
        )
        .with_details(environment, json!({"missingKey": "HEMERA_BASE_URL"})),
        "standard-error" => ApiError::new(ErrorCode::InternalError, "Something went wrong"),
        other => ApiError::new(
            ErrorCode::InvalidInput,
            format!("Unknown demo error type: {other}"),
        )
        .with_details(environment, json!({"types": DEMO_TYPES})),
    };

    Err(error.with_request_id(request_id))
}
