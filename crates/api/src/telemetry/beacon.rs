//! Fire-and-forget delivery of web-vitals metrics to the ingestion endpoint.

use std::sync::Arc;

use tokio::sync::Semaphore;
use url::Url;

use hemera_core::WebVitalMetric;

/// Maximum concurrent in-flight submissions. Further metrics are dropped
/// rather than queued.
const MAX_IN_FLIGHT: usize = 8;

const VITALS_PATH: &str = "/api/monitoring/vitals";

/// Posts metrics to `/api/monitoring/vitals` without waiting for the
/// response. A bounded permit pool caps concurrent submissions so a slow
/// endpoint sheds metrics instead of accumulating tasks.
#[derive(Clone)]
pub struct VitalsBeacon {
    client: reqwest::Client,
    endpoint: Url,
    permits: Arc<Semaphore>,
}

impl VitalsBeacon {
    /// Build a beacon targeting `base_url`.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(base_url)?.join(VITALS_PATH)?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            permits: Arc::new(Semaphore::new(MAX_IN_FLIGHT)),
        })
    }

    /// Submit one metric. Returns immediately; delivery happens on a
    /// background task. Metrics are dropped silently (with a debug log)
    /// when the in-flight cap is reached or the request fails.
    pub fn send(&self, metric: WebVitalMetric) {
        let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() else {
            tracing::debug!(metric = %metric.name, "vitals beacon saturated, dropping metric");
            return;
        };

        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        tokio::spawn(async move {
            let _permit = permit;
            if let Err(err) = client.post(endpoint).json(&metric).send().await {
                tracing::debug!(error = %err, "failed to submit web vital");
            }
        });
    }
}
