//! Bounded fire-and-forget pipeline for external error reporting.
//!
//! Events are queued onto a fixed-capacity channel and delivered by a
//! background worker, so a slow or unreachable monitoring endpoint can never
//! block a request or grow memory without bound. When the queue is full the
//! newest event is dropped and counted. The worker additionally enforces a
//! per-minute delivery cap toward the sink.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use hemera_core::RequestContext;

/// Maximum queued events awaiting delivery.
const QUEUE_CAPACITY: usize = 256;

/// Maximum events handed to the sink per rolling minute.
const MAX_EVENTS_PER_MINUTE: u32 = 60;

/// Severity of a reported event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl ReportLevel {
    /// Lowercase name used in log output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl From<ReportLevel> for sentry::Level {
    fn from(level: ReportLevel) -> Self {
        match level {
            ReportLevel::Debug => Self::Debug,
            ReportLevel::Info => Self::Info,
            ReportLevel::Warning => Self::Warning,
            ReportLevel::Error => Self::Error,
            ReportLevel::Critical => Self::Fatal,
        }
    }
}

/// Request and user context attached to a reported event.
///
/// The `user_id`/`user_email` fields are the person-identifying part; the
/// reporter strips them before enqueueing unless telemetry consent was
/// granted at startup.
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    pub request_id: Option<String>,
    pub route: Option<String>,
    pub method: Option<String>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
}

impl ReportContext {
    /// Build a report context from a request's correlation context.
    #[must_use]
    pub fn from_request(context: &RequestContext) -> Self {
        Self {
            request_id: Some(context.id.as_str().to_string()),
            route: Some(context.path.clone()),
            method: Some(context.method.clone()),
            user_agent: context.user_agent.clone(),
            ip: context.ip.clone(),
            user_id: None,
            user_email: None,
        }
    }

    /// Attach the acting user.
    #[must_use]
    pub fn with_user(mut self, user_id: Option<String>, user_email: Option<String>) -> Self {
        self.user_id = user_id;
        self.user_email = user_email;
        self
    }

    /// True when the context carries person-identifying fields.
    #[must_use]
    pub const fn has_person(&self) -> bool {
        self.user_id.is_some() || self.user_email.is_some()
    }

    fn redacted(mut self) -> Self {
        self.user_id = None;
        self.user_email = None;
        self
    }
}

/// A single event bound for the monitoring sink.
#[derive(Debug, Clone)]
pub struct ReportEvent {
    pub level: ReportLevel,
    pub message: String,
    pub context: ReportContext,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Destination for reported events.
///
/// Implementations own their failure handling: `deliver` must not panic and
/// has no way to surface errors to callers, keeping sink trouble out of the
/// request path.
pub trait EventSink: Send + Sync + 'static {
    fn deliver(&self, event: ReportEvent);
}

impl<S: EventSink> EventSink for Arc<S> {
    fn deliver(&self, event: ReportEvent) {
        (**self).deliver(event);
    }
}

/// Sink that forwards events to Sentry.
pub struct SentrySink;

impl EventSink for SentrySink {
    fn deliver(&self, event: ReportEvent) {
        let mut sentry_event = sentry::protocol::Event {
            message: Some(event.message),
            level: event.level.into(),
            timestamp: event.timestamp.into(),
            ..Default::default()
        };

        if let Some(request_id) = event.context.request_id {
            sentry_event.tags.insert("request_id".to_string(), request_id);
        }
        if let Some(route) = event.context.route {
            sentry_event.tags.insert("route".to_string(), route);
        }
        if let Some(method) = event.context.method {
            sentry_event.tags.insert("method".to_string(), method);
        }

        if event.context.user_id.is_some() || event.context.user_email.is_some() {
            sentry_event.user = Some(sentry::User {
                id: event.context.user_id,
                email: event.context.user_email,
                ..Default::default()
            });
        }

        sentry_event
            .extra
            .insert("payload".to_string(), event.payload);
        if let Some(user_agent) = event.context.user_agent {
            sentry_event
                .extra
                .insert("user_agent".to_string(), user_agent.into());
        }
        if let Some(ip) = event.context.ip {
            sentry_event.extra.insert("ip".to_string(), ip.into());
        }

        sentry::capture_event(sentry_event);
    }
}

/// Sink that buffers events in memory. Used by tests.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<ReportEvent>>,
}

impl MemorySink {
    /// Snapshot of every delivered event so far.
    #[must_use]
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for MemorySink {
    fn deliver(&self, event: ReportEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Behavior switches for [`Reporter::spawn`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReporterOptions {
    /// Kill-switch: skip sink delivery entirely, leaving only local logs.
    pub disabled: bool,
    /// Whether person-identifying fields may leave the process.
    pub pii_consent: bool,
}

/// Handle for enqueueing events toward the monitoring sink.
///
/// Cheap to clone; all clones feed the same bounded queue.
#[derive(Clone)]
pub struct Reporter {
    tx: mpsc::Sender<ReportEvent>,
    disabled: bool,
    pii_consent: bool,
    dropped: Arc<AtomicU64>,
}

impl Reporter {
    /// Start the delivery worker and return the reporter handle plus the
    /// worker task. The worker exits once every reporter clone is dropped
    /// and the queue is drained, so awaiting the handle after shutdown
    /// flushes remaining events.
    pub fn spawn<S: EventSink>(sink: S, options: ReporterOptions) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let worker = tokio::spawn(run_worker(rx, sink));
        (
            Self {
                tx,
                disabled: options.disabled,
                pii_consent: options.pii_consent,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            worker,
        )
    }

    /// Enqueue an event for delivery.
    ///
    /// Never blocks. Returns false only when the event was dropped because
    /// the queue is full (or the worker is gone); a disabled reporter counts
    /// as handled since skipping delivery is intentional. Without PII
    /// consent the context is redacted before the event enters the queue.
    pub fn report(
        &self,
        level: ReportLevel,
        message: impl Into<String>,
        context: ReportContext,
        payload: serde_json::Value,
    ) -> bool {
        let message = message.into();

        if self.disabled {
            tracing::debug!(
                level = level.as_str(),
                message = %message,
                "event reporting disabled, keeping event local"
            );
            return true;
        }

        let context = if self.pii_consent {
            context
        } else {
            context.redacted()
        };

        let event = ReportEvent {
            level,
            message,
            context,
            payload,
            timestamp: Utc::now(),
        };

        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event) | TrySendError::Closed(event)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::debug!(
                    message = %event.message,
                    dropped_total = dropped,
                    "report queue full, dropping event"
                );
                false
            }
        }
    }

    /// Number of events dropped due to queue backpressure.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

async fn run_worker<S: EventSink>(mut rx: mpsc::Receiver<ReportEvent>, sink: S) {
    let mut window_start = tokio::time::Instant::now();
    let mut delivered_in_window: u32 = 0;
    let mut capped: u64 = 0;

    while let Some(event) = rx.recv().await {
        let now = tokio::time::Instant::now();
        if now.duration_since(window_start) >= Duration::from_secs(60) {
            window_start = now;
            delivered_in_window = 0;
        }
        if delivered_in_window >= MAX_EVENTS_PER_MINUTE {
            capped += 1;
            tracing::debug!(
                message = %event.message,
                capped_total = capped,
                "per-minute report cap reached, dropping event"
            );
            continue;
        }
        delivered_in_window += 1;
        sink.deliver(event);
    }

    if capped > 0 {
        tracing::debug!(capped_total = capped, "reporter worker stopped");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context_with_person() -> ReportContext {
        ReportContext::default().with_user(
            Some("user-42".to_string()),
            Some("student@example.com".to_string()),
        )
    }

    fn unworkered(capacity: usize, options: ReporterOptions) -> (Reporter, mpsc::Receiver<ReportEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Reporter {
                tx,
                disabled: options.disabled,
                pii_consent: options.pii_consent,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    #[tokio::test]
    async fn test_report_enqueues_event() {
        let (reporter, mut rx) = unworkered(4, ReporterOptions::default());
        assert!(reporter.report(
            ReportLevel::Error,
            "database connection lost",
            ReportContext::default(),
            json!({"attempt": 3}),
        ));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.level, ReportLevel::Error);
        assert_eq!(event.message, "database connection lost");
        assert_eq!(event.payload, json!({"attempt": 3}));
    }

    #[tokio::test]
    async fn test_full_queue_drops_newest_and_counts() {
        let (reporter, mut rx) = unworkered(2, ReporterOptions::default());
        assert!(reporter.report(ReportLevel::Info, "one", ReportContext::default(), json!({})));
        assert!(reporter.report(ReportLevel::Info, "two", ReportContext::default(), json!({})));
        // Queue full: the newest event is the one that goes missing
        assert!(!reporter.report(ReportLevel::Info, "three", ReportContext::default(), json!({})));
        assert_eq!(reporter.dropped_events(), 1);

        assert_eq!(rx.try_recv().unwrap().message, "one");
        assert_eq!(rx.try_recv().unwrap().message, "two");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disabled_reporter_skips_queue() {
        let (reporter, mut rx) = unworkered(
            4,
            ReporterOptions {
                disabled: true,
                pii_consent: false,
            },
        );
        assert!(reporter.report(
            ReportLevel::Critical,
            "ignored",
            ReportContext::default(),
            json!({}),
        ));
        assert!(rx.try_recv().is_err());
        assert_eq!(reporter.dropped_events(), 0);
    }

    #[tokio::test]
    async fn test_person_fields_stripped_without_consent() {
        let (reporter, mut rx) = unworkered(4, ReporterOptions::default());
        reporter.report(
            ReportLevel::Error,
            "login failed",
            context_with_person(),
            json!({}),
        );

        let event = rx.try_recv().unwrap();
        assert!(!event.context.has_person());
        assert!(event.context.user_id.is_none());
        assert!(event.context.user_email.is_none());
    }

    #[tokio::test]
    async fn test_person_fields_kept_with_consent() {
        let (reporter, mut rx) = unworkered(
            4,
            ReporterOptions {
                disabled: false,
                pii_consent: true,
            },
        );
        reporter.report(
            ReportLevel::Error,
            "login failed",
            context_with_person(),
            json!({}),
        );

        let event = rx.try_recv().unwrap();
        assert!(event.context.has_person());
        assert_eq!(event.context.user_id.as_deref(), Some("user-42"));
    }

    #[tokio::test]
    async fn test_worker_delivers_to_sink() {
        let sink = Arc::new(MemorySink::default());
        let (reporter, worker) = Reporter::spawn(Arc::clone(&sink), ReporterOptions::default());

        reporter.report(
            ReportLevel::Warning,
            "slow request",
            ReportContext::default(),
            json!({"latencyMs": 2400}),
        );
        drop(reporter);
        worker.await.unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "slow request");
        assert_eq!(events[0].level, ReportLevel::Warning);
    }

    #[tokio::test]
    async fn test_worker_enforces_per_minute_cap() {
        let sink = Arc::new(MemorySink::default());
        let (tx, rx) = mpsc::channel(512);
        for n in 0..(MAX_EVENTS_PER_MINUTE + 15) {
            tx.try_send(ReportEvent {
                level: ReportLevel::Info,
                message: format!("event {n}"),
                context: ReportContext::default(),
                payload: json!({}),
                timestamp: Utc::now(),
            })
            .unwrap();
        }
        drop(tx);

        run_worker(rx, Arc::clone(&sink)).await;
        assert_eq!(sink.events().len(), MAX_EVENTS_PER_MINUTE as usize);
    }

    #[test]
    fn test_context_from_request_carries_correlation() {
        let request = RequestContext::new(Some("POST"), Some("/api/monitoring/vitals"));
        let context = ReportContext::from_request(&request);
        assert_eq!(context.request_id.as_deref(), Some(request.id.as_str()));
        assert_eq!(context.route.as_deref(), Some("/api/monitoring/vitals"));
        assert_eq!(context.method.as_deref(), Some("POST"));
        assert!(!context.has_person());
    }

    #[test]
    fn test_level_maps_to_sentry() {
        assert_eq!(sentry::Level::from(ReportLevel::Critical), sentry::Level::Fatal);
        assert_eq!(sentry::Level::from(ReportLevel::Warning), sentry::Level::Warning);
        assert_eq!(sentry::Level::from(ReportLevel::Debug), sentry::Level::Debug);
    }
}
