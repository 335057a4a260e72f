//! API service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; every one has a working default for local
//! development.
//!
//! - `HEMERA_ENV` - Deployment environment: `development`, `test`,
//!   `preview`, or `production` (default: development)
//! - `HEMERA_HOST` - Bind address (default: 127.0.0.1)
//! - `HEMERA_PORT` - Listen port (default: 3000)
//! - `HEMERA_BASE_URL` - Public base URL, used by the vitals beacon
//!   (default: derived from host and port)
//! - `HEMERA_ENABLE_WEB_VITALS` - Opt-in flag for web-vitals collection;
//!   `1` or `true` enables it (collection additionally requires the
//!   production environment)
//! - `HEMERA_ERROR_REPORTING_DISABLED` - Kill-switch for the external
//!   error-reporting sink; `1` or `true` disables delivery
//! - `HEMERA_TELEMETRY_CONSENT` - Explicit consent for attaching personal
//!   data (user id/email, page URLs) to telemetry; `1` or `true` grants it
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Environment label reported to Sentry
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};

use hemera_core::Environment;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API service configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Deployment environment classifier
    pub environment: Environment,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the service
    pub base_url: String,
    /// Whether web-vitals collection is opted in
    pub web_vitals_enabled: bool,
    /// Whether the external error-reporting sink is disabled
    pub error_reporting_disabled: bool,
    /// Whether telemetry may carry personal data
    pub telemetry_consent: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Environment label reported to Sentry
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed
    /// (unknown environment name, malformed host or port).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = get_env_or_default("HEMERA_ENV", "development")
            .parse::<Environment>()
            .map_err(|e| ConfigError::InvalidEnvVar("HEMERA_ENV".to_string(), e.to_string()))?;
        let host = get_env_or_default("HEMERA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HEMERA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("HEMERA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("HEMERA_PORT".to_string(), e.to_string()))?;
        let base_url =
            get_optional_env("HEMERA_BASE_URL").unwrap_or_else(|| format!("http://{host}:{port}"));

        let web_vitals_enabled = get_flag("HEMERA_ENABLE_WEB_VITALS");
        let error_reporting_disabled = get_flag("HEMERA_ERROR_REPORTING_DISABLED");
        let telemetry_consent = get_flag("HEMERA_TELEMETRY_CONSENT");

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            environment,
            host,
            port,
            base_url,
            web_vitals_enabled,
            error_reporting_disabled,
            telemetry_consent,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a boolean flag variable.
///
/// Only `1` and `true` (case-insensitive) count as set; anything else,
/// including an absent variable, reads as false.
fn get_flag(key: &str) -> bool {
    get_optional_env(key).is_some_and(|value| parse_flag(&value))
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
