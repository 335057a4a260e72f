//! Request identity and correlation context.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A canonical request identifier.
///
/// Minted server-side, exactly once per inbound request. Client-supplied
/// `X-Request-ID` headers are never promoted to a canonical id - they travel
/// separately as the external correlation id on [`RequestContext`], so a
/// spoofed inbound id can never pollute response headers or log streams.
///
/// ## Examples
///
/// ```
/// use hemera_core::RequestId;
///
/// let a = RequestId::generate();
/// let b = RequestId::generate();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Mint a fresh canonical id.
    ///
    /// Generation is total: UUID v4 has no failure path, so no fallback
    /// id scheme exists.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id, returning the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Correlation data for one in-flight request.
///
/// Built once by the correlation middleware and carried through request
/// extensions. Immutable for the life of the request: every log line,
/// report, and response envelope produced while handling the request reads
/// the same context.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Canonical id minted for this request.
    pub id: RequestId,
    /// Client-supplied correlation id, if any. Logged for cross-system
    /// correlation, never trusted as the canonical id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Uppercased HTTP method, or [`Self::UNKNOWN_METHOD`] when unavailable.
    pub method: String,
    /// Request path, or [`Self::UNKNOWN_PATH`] when unavailable.
    pub path: String,
    /// Client user agent, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Client address as reported by the proxy chain, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// When the context was built.
    pub timestamp: DateTime<Utc>,
}

impl RequestContext {
    /// Placeholder recorded when the HTTP method is unavailable.
    pub const UNKNOWN_METHOD: &'static str = "UNKNOWN";
    /// Placeholder recorded when the request path is unavailable.
    pub const UNKNOWN_PATH: &'static str = "unknown";

    /// Build a context around a freshly minted canonical id.
    ///
    /// Construction is total: missing or empty method/path values are
    /// coerced to placeholders rather than rejected.
    #[must_use]
    pub fn new(method: Option<&str>, path: Option<&str>) -> Self {
        Self::with_id(RequestId::generate(), method, path)
    }

    /// Build a context around an already minted canonical id.
    #[must_use]
    pub fn with_id(id: RequestId, method: Option<&str>, path: Option<&str>) -> Self {
        Self {
            id,
            external_id: None,
            method: method
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map_or_else(|| Self::UNKNOWN_METHOD.to_string(), str::to_uppercase),
            path: path
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map_or_else(|| Self::UNKNOWN_PATH.to_string(), ToString::to_string),
            user_agent: None,
            ip: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the client-supplied correlation id.
    #[must_use]
    pub fn with_external_id(mut self, external_id: Option<String>) -> Self {
        self.external_id = external_id;
        self
    }

    /// Attach client metadata (user agent, proxy-reported address).
    #[must_use]
    pub fn with_client_info(mut self, user_agent: Option<String>, ip: Option<String>) -> Self {
        self.user_agent = user_agent;
        self.ip = ip;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_is_uuid_shaped() {
        let id = RequestId::generate();
        assert_eq!(id.as_str().len(), 36);
        assert_eq!(id.as_str().matches('-').count(), 4);
    }

    #[test]
    fn test_context_carries_method_and_path() {
        let ctx = RequestContext::new(Some("get"), Some("/api/health"));
        assert_eq!(ctx.method, "GET");
        assert_eq!(ctx.path, "/api/health");
        assert!(ctx.external_id.is_none());
    }

    #[test]
    fn test_context_placeholders_for_missing_parts() {
        let ctx = RequestContext::new(None, None);
        assert_eq!(ctx.method, RequestContext::UNKNOWN_METHOD);
        assert_eq!(ctx.path, RequestContext::UNKNOWN_PATH);
    }

    #[test]
    fn test_context_placeholders_for_empty_parts() {
        let ctx = RequestContext::new(Some("  "), Some(""));
        assert_eq!(ctx.method, "UNKNOWN");
        assert_eq!(ctx.path, "unknown");
    }

    #[test]
    fn test_external_id_rides_along() {
        let ctx = RequestContext::new(Some("POST"), Some("/api/monitoring/vitals"))
            .with_external_id(Some("upstream-7".to_string()));
        assert_eq!(ctx.external_id.as_deref(), Some("upstream-7"));
        // The canonical id is minted, never copied from the external one
        assert_ne!(ctx.id.as_str(), "upstream-7");
    }

    #[test]
    fn test_serializes_camel_case() {
        let ctx = RequestContext::new(Some("GET"), Some("/courses"))
            .with_external_id(Some("abc".to_string()));
        let json = serde_json::to_value(&ctx).unwrap();
        assert!(json.get("externalId").is_some());
        assert!(json.get("external_id").is_none());
    }

    #[test]
    fn test_optional_fields_omitted_when_absent() {
        let ctx = RequestContext::new(Some("GET"), Some("/courses"));
        let json = serde_json::to_value(&ctx).unwrap();
        assert!(json.get("externalId").is_none());
        assert!(json.get("userAgent").is_none());
        assert!(json.get("ip").is_none());
    }
}
