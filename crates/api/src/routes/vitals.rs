//! Web-vitals ingestion endpoint.
//!
//! Accepts beacon submissions from pages. The response contract is a plain
//! acknowledgement body rather than the standard envelope, because callers
//! are fire-and-forget beacons that only ever look at the status code:
//!
//! - `415` - body is not declared as JSON
//! - `400 {"ok": false}` - malformed JSON or a payload that fails sanitizing
//! - `202 {"ok": false, "reason": "disabled"}` - collection is switched off
//! - `202 {"ok": false, "reason": "error"}` - accepted but not recorded
//! - `200 {"ok": true}` - metric recorded

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use hemera_core::RawVitalPayload;

use crate::middleware::REQUEST_ID_HEADER;
use crate::monitoring::RequestLogger;
use crate::state::AppState;

/// `POST /api/monitoring/vitals` - record one web-vitals metric.
pub async fn ingest(
    State(state): State<AppState>,
    logger: RequestLogger,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !is_json_content(&headers) {
        logger.warning(
            "Rejected vitals submission with unsupported content type",
            json!({
                "contentType": headers
                    .get(header::CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok()),
            }),
        );
        return ack(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            json!({"ok": false}),
            &logger,
        );
    }

    let Ok(payload) = serde_json::from_slice::<RawVitalPayload>(&body) else {
        logger.warning("Rejected malformed vitals payload", json!({}));
        return ack(StatusCode::BAD_REQUEST, json!({"ok": false}), &logger);
    };

    let Some(mut metric) = payload.sanitize() else {
        logger.warning("Rejected vitals payload failing validation", json!({}));
        return ack(StatusCode::BAD_REQUEST, json!({"ok": false}), &logger);
    };

    if !state.telemetry_gate().is_enabled() {
        return ack(
            StatusCode::ACCEPTED,
            json!({"ok": false, "reason": "disabled"}),
            &logger,
        );
    }

    // Page URLs can carry personal data; keep them only with consent
    if !state.config().telemetry_consent {
        metric.href = None;
    }

    logger.info(
        "Accepted web vitals metric",
        json!({
            "metric": metric.name,
            "value": metric.value,
        }),
    );

    let queued = logger.business_event(
        "web_vitals_metric",
        json!({
            "metric": metric.name,
            "value": metric.value,
            "id": metric.id,
            "label": metric.label,
            "path": metric.path,
            "href": metric.href,
            "navigationType": metric.navigation_type,
        }),
    );

    if queued {
        ack(StatusCode::OK, json!({"ok": true}), &logger)
    } else {
        ack(
            StatusCode::ACCEPTED,
            json!({"ok": false, "reason": "error"}),
            &logger,
        )
    }
}

/// `OPTIONS /api/monitoring/vitals` - preflight support for beacons.
pub async fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [(header::ALLOW, HeaderValue::from_static("OPTIONS, POST"))],
    )
        .into_response()
}

fn is_json_content(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            let mime = value.split(';').next().unwrap_or(value).trim();
            mime.eq_ignore_ascii_case("application/json")
        })
}

fn ack(status: StatusCode, body: Value, logger: &RequestLogger) -> Response {
    let mut response = (status, axum::Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(logger.context().id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
