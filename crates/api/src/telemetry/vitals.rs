//! Web-vitals collection wiring.
//!
//! A [`VitalsSource`] is whatever produces performance metrics (in the
//! browser build that is the web-vitals library; in tests a fake). This
//! module subscribes to every metric kind once the [`TelemetryGate`] allows
//! it and forwards observed metrics to a sender, usually a
//! [`VitalsBeacon`](super::VitalsBeacon).

use hemera_core::{VitalKind, WebVitalMetric};

use super::gate::TelemetryGate;

/// Producer of web-vitals metrics.
pub trait VitalsSource {
    /// Register a handler for one metric kind. The source may invoke the
    /// handler any number of times, at any later point.
    fn observe(&self, kind: VitalKind, handler: Box<dyn FnMut(WebVitalMetric) + Send>);
}

/// Subscribe to all web-vital kinds and forward metrics to `sender`.
///
/// Returns false without subscribing to anything when the gate is closed,
/// the page path is private, or no source is available. Metrics that do not
/// carry their own path are stamped with the page path before forwarding.
pub fn init_web_vitals<S, F>(
    gate: &TelemetryGate,
    source: Option<&S>,
    path: Option<&str>,
    sender: F,
) -> bool
where
    S: VitalsSource + ?Sized,
    F: Fn(WebVitalMetric) + Clone + Send + 'static,
{
    if !gate.allows(path) {
        return false;
    }
    let Some(source) = source else {
        return false;
    };

    let page_path = path.map(ToString::to_string);
    for kind in VitalKind::ALL {
        let sender = sender.clone();
        let page_path = page_path.clone();
        source.observe(
            kind,
            Box::new(move |mut metric| {
                if metric.path.is_none() {
                    metric.path = page_path.clone();
                }
                sender(metric);
            }),
        );
    }
    true
}
