//! API response envelope.
//!
//! Every JSON endpoint responds with the same envelope shape so clients can
//! branch on `success` and correlate via `meta.requestId` without knowing
//! which route produced the body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error_code::ErrorCode;
use super::request::RequestId;

/// Version string stamped into [`ResponseMeta`].
pub const API_VERSION: &str = "1.0";

/// Placeholder used in `meta.requestId` when no context was available.
pub const UNKNOWN_REQUEST_ID: &str = "unknown";

/// Metadata attached to every API response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    /// Canonical request id, or [`UNKNOWN_REQUEST_ID`] when absent.
    pub request_id: String,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
    /// API contract version.
    pub version: String,
}

impl ResponseMeta {
    /// Build metadata for the current instant.
    ///
    /// Total: an absent request id becomes the [`UNKNOWN_REQUEST_ID`]
    /// placeholder rather than an error.
    #[must_use]
    pub fn new(request_id: Option<&RequestId>) -> Self {
        Self {
            request_id: request_id.map_or_else(
                || UNKNOWN_REQUEST_ID.to_string(),
                |id| id.as_str().to_string(),
            ),
            timestamp: Utc::now(),
            version: API_VERSION.to_string(),
        }
    }
}

/// Machine-readable failure payload carried by error envelopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Stable code from the error taxonomy.
    pub code: ErrorCode,
    /// Human-readable description, safe to show to callers.
    pub message: String,
    /// Extra debugging context. Attached only outside production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Standard JSON envelope for API responses.
///
/// Exactly one of `data` and `error` is populated, matching `success`.
///
/// ## Examples
///
/// ```
/// use hemera_core::{ApiEnvelope, RequestId};
///
/// let id = RequestId::generate();
/// let envelope = ApiEnvelope::success(vec![1, 2, 3], Some(&id));
/// assert!(envelope.success);
/// assert_eq!(envelope.meta.request_id, id.as_str());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload for successful responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Failure description for unsuccessful responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    /// Correlation and versioning metadata.
    pub meta: ResponseMeta,
}

impl<T> ApiEnvelope<T> {
    /// Build a success envelope around `data`.
    #[must_use]
    pub fn success(data: T, request_id: Option<&RequestId>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: ResponseMeta::new(request_id),
        }
    }

    /// Build an error envelope for `code`.
    ///
    /// Total like [`ApiEnvelope::success`]: no input combination fails.
    #[must_use]
    pub fn error(
        code: ErrorCode,
        message: impl Into<String>,
        details: Option<serde_json::Value>,
        request_id: Option<&RequestId>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code,
                message: message.into(),
                details,
            }),
            meta: ResponseMeta::new(request_id),
        }
    }
}
