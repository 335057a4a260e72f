//! Request-scoped structured logger.
//!
//! Every log line carries the request's canonical id and an ISO-8601
//! timestamp inside the payload, is mirrored to the local `tracing`
//! subscriber, and is forwarded to the [`Reporter`] for external delivery.
//! Reporting failures never surface to callers.

use std::time::Instant;

use chrono::Utc;
use serde_json::{Value, json};

use hemera_core::RequestContext;

use super::reporter::{ReportContext, ReportLevel, Reporter};

/// Requests slower than this log an additional warning on completion.
const SLOW_REQUEST_THRESHOLD_MS: u64 = 2000;

/// Logger bound to a single request.
///
/// Clones share the request context and start time, so a handler and the
/// surrounding middleware agree on latency.
#[derive(Clone)]
pub struct RequestLogger {
    context: RequestContext,
    report_context: ReportContext,
    reporter: Reporter,
    started: Instant,
}

impl RequestLogger {
    #[must_use]
    pub fn new(context: RequestContext, reporter: Reporter) -> Self {
        let report_context = ReportContext::from_request(&context);
        Self {
            context,
            report_context,
            reporter,
            started: Instant::now(),
        }
    }

    /// The correlation context this logger was built from.
    #[must_use]
    pub const fn context(&self) -> &RequestContext {
        &self.context
    }

    pub fn info(&self, message: &str, payload: Value) {
        let payload = self.enrich(payload);
        tracing::info!(
            request_id = %self.context.id,
            payload = %payload,
            "{message}"
        );
        self.reporter
            .report(ReportLevel::Info, message, self.report_context.clone(), payload);
    }

    pub fn warning(&self, message: &str, payload: Value) {
        let payload = self.enrich(payload);
        tracing::warn!(
            request_id = %self.context.id,
            payload = %payload,
            "{message}"
        );
        self.reporter.report(
            ReportLevel::Warning,
            message,
            self.report_context.clone(),
            payload,
        );
    }

    pub fn error(&self, message: &str, payload: Value) {
        let payload = self.enrich(payload);
        tracing::error!(
            request_id = %self.context.id,
            payload = %payload,
            "{message}"
        );
        self.reporter
            .report(ReportLevel::Error, message, self.report_context.clone(), payload);
    }

    /// Highest severity. Reserved for faults that leave the process in a
    /// state not worth trusting.
    pub fn critical(&self, message: &str, payload: Value) {
        let payload = self.enrich(payload);
        tracing::error!(
            request_id = %self.context.id,
            payload = %payload,
            critical = true,
            "{message}"
        );
        self.reporter.report(
            ReportLevel::Critical,
            message,
            self.report_context.clone(),
            payload,
        );
    }

    /// Record a domain event and report whether it was queued for delivery.
    ///
    /// Callers that need to acknowledge durable intake (rather than just
    /// emit a log line) use the returned flag.
    pub fn business_event(&self, event_type: &str, payload: Value) -> bool {
        let payload = self.enrich(json!({
            "eventType": event_type,
            "data": payload,
        }));
        tracing::info!(
            request_id = %self.context.id,
            event_type,
            payload = %payload,
            "Business event"
        );
        self.reporter.report(
            ReportLevel::Info,
            format!("Business event: {event_type}"),
            self.report_context.clone(),
            payload,
        )
    }

    /// Log the request's completion with its latency, warning when the
    /// request was slow.
    pub fn completion(&self, status: u16) {
        let latency_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.info(
            "API request completed",
            json!({
                "route": self.context.path,
                "method": self.context.method,
                "status": status,
                "latencyMs": latency_ms,
            }),
        );
        if latency_ms > SLOW_REQUEST_THRESHOLD_MS {
            self.warning(
                "Slow API request",
                json!({
                    "route": self.context.path,
                    "method": self.context.method,
                    "latencyMs": latency_ms,
                    "thresholdMs": SLOW_REQUEST_THRESHOLD_MS,
                }),
            );
        }
    }

    fn enrich(&self, payload: Value) -> Value {
        let timestamp = Utc::now().to_rfc3339();
        match payload {
            Value::Object(mut map) => {
                map.insert("requestId".to_string(), Value::String(self.context.id.to_string()));
                map.insert("timestamp".to_string(), Value::String(timestamp));
                Value::Object(map)
            }
            other => json!({
                "data": other,
                "requestId": self.context.id.as_str(),
                "timestamp": timestamp,
            }),
        }
    }
}
