//! Application state shared across handlers.

use std::sync::Arc;

use hemera_core::Environment;

use crate::build_info::BuildInfo;
use crate::config::ApiConfig;
use crate::monitoring::Reporter;
use crate::telemetry::TelemetryGate;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the reporter handle and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    reporter: Reporter,
    telemetry_gate: TelemetryGate,
    build_info: BuildInfo,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The telemetry gate is derived from the configuration's environment
    /// and collection flag.
    #[must_use]
    pub fn new(config: ApiConfig, reporter: Reporter, build_info: BuildInfo) -> Self {
        let telemetry_gate = TelemetryGate::new(config.environment, config.web_vitals_enabled);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                reporter,
                telemetry_gate,
                build_info,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get the reporter handle for external error reporting.
    #[must_use]
    pub fn reporter(&self) -> &Reporter {
        &self.inner.reporter
    }

    /// Get the telemetry collection gate.
    #[must_use]
    pub fn telemetry_gate(&self) -> &TelemetryGate {
        &self.inner.telemetry_gate
    }

    /// Get the build metadata resolved at startup.
    #[must_use]
    pub fn build_info(&self) -> &BuildInfo {
        &self.inner.build_info
    }

    /// The deployment environment the server runs in.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.inner.config.environment
    }
}
