//! Decides whether performance telemetry may be collected.

use hemera_core::Environment;

/// Path prefixes that never participate in telemetry collection.
const PRIVATE_PATH_PREFIXES: [&str; 5] = ["/auth", "/protected", "/admin", "/sign-in", "/sign-up"];

/// Gate evaluated before any web-vitals collection or ingestion.
///
/// Collection requires BOTH a production environment and the feature flag;
/// anything else (development, test, preview, flag off) keeps telemetry
/// dark. Path classification is the opposite way round: only a known
/// private prefix blocks collection, unknown or absent paths pass.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryGate {
    environment: Environment,
    collection_enabled: bool,
}

impl TelemetryGate {
    #[must_use]
    pub const fn new(environment: Environment, collection_enabled: bool) -> Self {
        Self {
            environment,
            collection_enabled,
        }
    }

    /// True only in production with the collection flag set.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.environment.is_production() && self.collection_enabled
    }

    /// True unless the path starts with a private prefix. `None` counts as
    /// public.
    #[must_use]
    pub fn is_public_path(path: Option<&str>) -> bool {
        path.is_none_or(|p| {
            !PRIVATE_PATH_PREFIXES
                .iter()
                .any(|prefix| p.starts_with(prefix))
        })
    }

    /// Combined check: collection enabled and the path is public.
    #[must_use]
    pub fn allows(&self, path: Option<&str>) -> bool {
        self.is_enabled() && Self::is_public_path(path)
    }
}
