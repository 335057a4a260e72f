//! Request correlation middleware.
//!
//! Every request gets a freshly minted canonical request id, no matter what
//! an upstream proxy sent: inbound `x-request-id`/`x-trace-id` values are
//! kept alongside as the external id but never become the canonical one, so
//! a client cannot spoof its way into another request's correlation trail.
//!
//! The canonical id is:
//! - Recorded in the current tracing span
//! - Added to the Sentry scope for error correlation
//! - Returned in the `x-request-id` response header
//!
//! The middleware also owns request completion logging, including the 5xx
//! error report and the slow-request warning.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::json;
use tracing::Span;

use hemera_core::RequestContext;

use crate::monitoring::RequestLogger;
use crate::state::AppState;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Secondary header consulted for an upstream correlation id.
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Middleware that builds the request's correlation context and logger.
///
/// Both are stored in request extensions for handlers to extract, and the
/// canonical id is echoed in the response headers for client visibility.
pub async fn request_context_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = build_context(&request);
    let canonical_id = context.id.clone();

    // Record in current span for structured logging
    Span::current().record("request_id", canonical_id.as_str());

    // Set in Sentry scope for error correlation
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", canonical_id.as_str());
    });

    let logger = RequestLogger::new(context.clone(), state.reporter().clone());
    request.extensions_mut().insert(context);
    request.extensions_mut().insert(logger.clone());

    let mut response = next.run(request).await;

    // The canonical id wins even if a handler set its own header value
    if let Ok(value) = HeaderValue::from_str(canonical_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let status = response.status();
    if status.is_server_error() {
        logger.error(
            "Request completed with server error",
            json!({"status": status.as_u16()}),
        );
    }
    logger.completion(status.as_u16());

    response
}

/// Extractor for the per-request logger stored by the middleware.
///
/// Falls back to a fresh logger with an unknown route when the middleware
/// did not run, so handlers never fail to extract.
impl FromRequestParts<AppState> for RequestLogger {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!(
                "request logger not found in request extensions - middleware may be misconfigured"
            );
            Self::new(RequestContext::new(None, None), state.reporter().clone())
        }))
    }
}

fn build_context(request: &Request) -> RequestContext {
    let headers = request.headers();
    RequestContext::new(Some(request.method().as_str()), Some(request.uri().path()))
        .with_external_id(external_id(headers))
        .with_client_info(header_value(headers, "user-agent"), client_ip(headers))
}

/// Correlation id supplied by an upstream proxy, if any.
fn external_id(headers: &HeaderMap) -> Option<String> {
    header_value(headers, REQUEST_ID_HEADER).or_else(|| header_value(headers, TRACE_ID_HEADER))
}

/// Client address as reported by the proxy chain.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for")
        .map(|forwarded| {
            forwarded
                .split(',')
                .next()
                .unwrap_or(&forwarded)
                .trim()
                .to_string()
        })
        .or_else(|| header_value(headers, "x-real-ip"))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}
