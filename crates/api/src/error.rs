//! Unified API error type.
//!
//! Every failed request is answered with the standard response envelope:
//! a stable machine-readable code from [`ErrorCode`], a human-readable
//! message, and (outside production) optional diagnostic details. Route
//! handlers should return `Result<T, ApiError>`.

use axum::Json;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use thiserror::Error;

use hemera_core::{ApiEnvelope, Environment, ErrorCode, RequestId};

use crate::middleware::REQUEST_ID_HEADER;

/// Application-level error for the API.
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    status: StatusCode,
    details: Option<Value>,
    request_id: Option<RequestId>,
}

impl ApiError {
    /// Create an error with the code's default HTTP status.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(code.default_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            code,
            message: message.into(),
            status,
            details: None,
            request_id: None,
        }
    }

    /// Override the HTTP status.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Attach the request's canonical id so the error response stays
    /// correlatable.
    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Attach diagnostic details. Details are held back in production so
    /// internals never reach clients there.
    #[must_use]
    pub fn with_details(mut self, environment: Environment, details: Value) -> Self {
        if !environment.is_production() {
            self.details = Some(details);
        }
        self
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let Self {
            code,
            message,
            status,
            details,
            request_id,
        } = self;

        if status.is_server_error() {
            tracing::error!(
                code = code.as_str(),
                status = status.as_u16(),
                error = %message,
                "Request failed"
            );
        }

        let envelope = ApiEnvelope::<()>::error(code, message, details, request_id.as_ref());
        let mut response = (status, Json(envelope)).into_response();
        if let Some(request_id) = request_id
            && let Ok(value) = HeaderValue::from_str(request_id.as_str())
        {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_follows_code() {
        assert_eq!(
            ApiError::new(ErrorCode::NotFound, "missing").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::new(ErrorCode::RateLimited, "slow down").status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_status_override() {
        let err = ApiError::new(ErrorCode::InvalidInput, "bad")
            .with_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_details_withheld_in_production() {
        let err = ApiError::new(ErrorCode::DatabaseError, "pool exhausted").with_details(
            Environment::Production,
            serde_json::json!({"pool": "primary"}),
        );
        assert!(err.details.is_none());

        let err = ApiError::new(ErrorCode::DatabaseError, "pool exhausted").with_details(
            Environment::Development,
            serde_json::json!({"pool": "primary"}),
        );
        assert!(err.details.is_some());
    }

    #[tokio::test]
    async fn test_response_is_enveloped() {
        let request_id = RequestId::generate();
        let response = ApiError::new(ErrorCode::NotFound, "Course not found")
            .with_request_id(request_id.clone())
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).unwrap(),
            request_id.as_str()
        );

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Course not found");
        assert_eq!(body["meta"]["requestId"], request_id.as_str());
    }

    #[tokio::test]
    async fn test_response_without_request_id_uses_placeholder() {
        let response = ApiError::new(ErrorCode::InternalError, "boom").into_response();
        assert!(response.headers().get(REQUEST_ID_HEADER).is_none());

        let body = body_json(response).await;
        assert_eq!(body["meta"]["requestId"], "unknown");
    }
}
