//! Deployment environment classifier.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Environment`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum EnvironmentError {
    /// The input string is not a recognized environment name.
    #[error("unknown environment: {0:?} (expected development, test, preview, or production)")]
    Unknown(String),
}

/// The deployment environment a process runs in.
///
/// Every environment-conditional decision in the platform (telemetry gating,
/// error detail exposure, demo surfaces, log formatting) branches on this
/// classifier rather than re-reading raw environment variables at the call
/// site.
///
/// ## Examples
///
/// ```
/// use hemera_core::Environment;
///
/// let env: Environment = "production".parse().unwrap();
/// assert!(env.is_production());
///
/// // Unknown names are rejected rather than silently defaulted
/// assert!("staging".parse::<Environment>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development.
    #[default]
    Development,
    /// Automated test runs.
    Test,
    /// Deploy previews of unmerged changes.
    Preview,
    /// The live deployment.
    Production,
}

impl Environment {
    /// The canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Preview => "preview",
            Self::Production => "production",
        }
    }

    /// True only for the live deployment.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// True only for local development.
    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = EnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "preview" => Ok(Self::Preview),
            "production" => Ok(Self::Production),
            other => Err(EnvironmentError::Unknown(other.to_string())),
        }
    }
}
