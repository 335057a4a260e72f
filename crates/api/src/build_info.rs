//! Build and version metadata surfaced by the health endpoint.
//!
//! Resolution order follows deploy reality: explicit environment variables
//! (`GIT_SHA`, `SOURCE_COMMIT`, `BUILD_TIME`) win so a platform can inject
//! its own metadata, then the values the build script embedded at compile
//! time, then nothing.

use serde::Serialize;

/// Commit and build metadata for the running binary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// Crate version from the package manifest.
    pub version: String,
    /// Full commit sha, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    /// First seven characters of the commit sha.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_sha: Option<String>,
    /// UTC build timestamp, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_time: Option<String>,
}

impl BuildInfo {
    /// Resolve build metadata from the process environment and the values
    /// embedded at compile time.
    #[must_use]
    pub fn resolve() -> Self {
        Self::from_sources(
            std::env::var("GIT_SHA")
                .ok()
                .or_else(|| std::env::var("SOURCE_COMMIT").ok()),
            std::env::var("BUILD_TIME").ok(),
        )
    }

    fn from_sources(env_sha: Option<String>, env_build_time: Option<String>) -> Self {
        let commit_sha = non_empty(env_sha).or_else(|| non_empty_static(env!("HEMERA_BUILD_SHA")));
        let short_sha = commit_sha
            .as_ref()
            .map(|sha| sha.chars().take(7).collect::<String>());
        let build_time =
            non_empty(env_build_time).or_else(|| non_empty_static(env!("HEMERA_BUILD_TIME")));

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit_sha,
            short_sha,
            build_time,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_empty_static(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
