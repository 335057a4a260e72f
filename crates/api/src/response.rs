//! Helpers for building enveloped success responses.

use axum::Json;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use hemera_core::{ApiEnvelope, RequestContext};

use crate::middleware::REQUEST_ID_HEADER;

/// Envelope `data` as a 200 response correlated to `context`.
pub fn success<T: Serialize>(data: T, context: &RequestContext) -> Response {
    with_status(StatusCode::OK, data, context)
}

/// Envelope `data` under an explicit status code.
///
/// The canonical request id is echoed both in `meta.requestId` and the
/// `x-request-id` response header.
pub fn with_status<T: Serialize>(status: StatusCode, data: T, context: &RequestContext) -> Response {
    let envelope = ApiEnvelope::success(data, Some(&context.id));
    let mut response = (status, Json(envelope)).into_response();
    if let Ok(value) = HeaderValue::from_str(context.id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
