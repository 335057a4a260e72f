//! Health check endpoint.

use axum::extract::State;
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::monitoring::RequestLogger;
use crate::response;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthBody {
    status: &'static str,
    timestamp: DateTime<Utc>,
    environment: &'static str,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit_sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    short_sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    build_time: Option<String>,
}

/// `GET /api/health` - liveness probe with build provenance.
pub async fn health(State(state): State<AppState>, logger: RequestLogger) -> Response {
    let build = state.build_info();
    let body = HealthBody {
        status: "ok",
        timestamp: Utc::now(),
        environment: state.environment().as_str(),
        version: build.version.clone(),
        commit_sha: build.commit_sha.clone(),
        short_sha: build.short_sha.clone(),
        build_time: build.build_time.clone(),
    };

    logger.info(
        "Health check completed",
        serde_json::json!({
            "environment": body.environment,
            "version": body.version,
        }),
    );

    response::success(body, logger.context())
}
