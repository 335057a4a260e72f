//! Web vitals metric types.
//!
//! Browser performance metrics (Core Web Vitals) collected on public pages
//! and beaconed to `/api/monitoring/vitals`. The ingestion side accepts an
//! untyped payload and sanitizes it into [`WebVitalMetric`] before anything
//! downstream sees it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The five collected web-vitals metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VitalKind {
    /// Cumulative Layout Shift.
    Cls,
    /// First Contentful Paint.
    Fcp,
    /// Largest Contentful Paint.
    Lcp,
    /// Interaction to Next Paint.
    Inp,
    /// Time To First Byte.
    Ttfb,
}

impl VitalKind {
    /// Every collected metric kind, in subscription order.
    pub const ALL: [Self; 5] = [Self::Cls, Self::Fcp, Self::Lcp, Self::Inp, Self::Ttfb];

    /// The metric's wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cls => "CLS",
            Self::Fcp => "FCP",
            Self::Lcp => "LCP",
            Self::Inp => "INP",
            Self::Ttfb => "TTFB",
        }
    }
}

/// A sanitized web-vitals observation.
///
/// `name` and `value` are guaranteed present and well-typed; everything else
/// is optional context attached by the collecting page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebVitalMetric {
    /// Metric name (`CLS`, `FCP`, `LCP`, `INP`, `TTFB`).
    pub name: String,
    /// Observed value. Always finite.
    pub value: f64,
    /// Metric instance id from the collector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Collector rating label (`good`, `needs-improvement`, `poor`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Page path the metric was observed on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Full page URL. Forwarded to sinks only with telemetry consent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Navigation type reported by the collector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_type: Option<String>,
}

/// An untyped vitals payload as received from the beacon endpoint.
///
/// Every field is optional and untyped; [`RawVitalPayload::sanitize`] is the
/// only way to turn one into a usable metric. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVitalPayload {
    pub name: Option<Value>,
    pub value: Option<Value>,
    pub id: Option<Value>,
    pub label: Option<Value>,
    pub path: Option<Value>,
    pub href: Option<Value>,
    pub navigation_type: Option<Value>,
    /// Client-side send timestamp. Accepted and discarded.
    pub ts: Option<Value>,
}

impl RawVitalPayload {
    /// Validate and coerce the raw payload into a [`WebVitalMetric`].
    ///
    /// Returns `None` unless `name` is a non-empty string and `value` is a
    /// finite number. Optional fields survive only when they are strings;
    /// anything else is dropped silently.
    #[must_use]
    pub fn sanitize(&self) -> Option<WebVitalMetric> {
        let name = self
            .name
            .as_ref()
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())?;
        let value = self
            .value
            .as_ref()
            .and_then(Value::as_f64)
            .filter(|value| value.is_finite())?;

        Some(WebVitalMetric {
            name: name.to_string(),
            value,
            id: string_field(self.id.as_ref()),
            label: string_field(self.label.as_ref()),
            path: string_field(self.path.as_ref()),
            href: string_field(self.href.as_ref()),
            navigation_type: string_field(self.navigation_type.as_ref()),
        })
    }
}

fn string_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(ToString::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawVitalPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_sanitize_accepts_minimal_metric() {
        let metric = raw(json!({"name": "LCP", "value": 2400.5})).sanitize().unwrap();
        assert_eq!(metric.name, "LCP");
        assert!((metric.value - 2400.5).abs() < f64::EPSILON);
        assert!(metric.id.is_none());
    }

    #[test]
    fn test_sanitize_keeps_string_context_fields() {
        let metric = raw(json!({
            "name": "CLS",
            "value": 0.04,
            "id": "v3-123",
            "label": "good",
            "path": "/courses",
            "href": "https://hemera.academy/courses",
            "navigationType": "navigate",
        }))
        .sanitize()
        .unwrap();
        assert_eq!(metric.id.as_deref(), Some("v3-123"));
        assert_eq!(metric.label.as_deref(), Some("good"));
        assert_eq!(metric.path.as_deref(), Some("/courses"));
        assert_eq!(metric.href.as_deref(), Some("https://hemera.academy/courses"));
        assert_eq!(metric.navigation_type.as_deref(), Some("navigate"));
    }

    #[test]
    fn test_sanitize_rejects_missing_name() {
        assert!(raw(json!({"value": 1.0})).sanitize().is_none());
        assert!(raw(json!({"name": "", "value": 1.0})).sanitize().is_none());
        assert!(raw(json!({"name": 7, "value": 1.0})).sanitize().is_none());
    }

    #[test]
    fn test_sanitize_rejects_non_numeric_value() {
        assert!(raw(json!({"name": "FCP"})).sanitize().is_none());
        assert!(raw(json!({"name": "FCP", "value": "not-a-number"})).sanitize().is_none());
        assert!(raw(json!({"name": "FCP", "value": null})).sanitize().is_none());
    }

    #[test]
    fn test_sanitize_drops_mistyped_optional_fields() {
        let metric = raw(json!({"name": "INP", "value": 180.0, "id": 42, "label": true}))
            .sanitize()
            .unwrap();
        assert!(metric.id.is_none());
        assert!(metric.label.is_none());
    }

    #[test]
    fn test_sanitize_ignores_unknown_and_ts_fields() {
        let metric = raw(json!({"name": "TTFB", "value": 90.0, "ts": 1_700_000_000_000_u64, "extra": "x"}))
            .sanitize()
            .unwrap();
        assert_eq!(metric.name, "TTFB");
    }

    #[test]
    fn test_kind_wire_names() {
        for kind in VitalKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_metric_serializes_camel_case() {
        let metric = WebVitalMetric {
            name: "LCP".to_string(),
            value: 1800.0,
            id: None,
            label: None,
            path: Some("/".to_string()),
            href: None,
            navigation_type: Some("reload".to_string()),
        };
        let json = serde_json::to_value(&metric).unwrap();
        assert!(json.get("navigationType").is_some());
        assert!(json.get("href").is_none());
    }
}
