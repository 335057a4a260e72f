//! Build script for the API crate.
//!
//! Embeds the git commit and build timestamp so the health endpoint can
//! report them even when the deploy platform sets no build metadata
//! environment variables.

use std::process::Command;

fn main() {
    // Re-resolve the sha when the checked-out commit changes
    println!("cargo:rerun-if-changed=../../.git/HEAD");

    let sha = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|sha| sha.trim().to_string())
        .unwrap_or_default();
    println!("cargo:rustc-env=HEMERA_BUILD_SHA={sha}");

    let build_time = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    println!("cargo:rustc-env=HEMERA_BUILD_TIME={build_time}");
}
