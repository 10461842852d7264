//! Build script: embeds the crate version from `DEVUTILS_VERSION` or `git describe`.

use std::process::Command;

/// `DEVUTILS_VERSION` if the release workflow set it, else `git describe`.
/// A leading `v` is dropped to match crates.io version strings.
fn version() -> Option<String> {
    let raw = std::env::var("DEVUTILS_VERSION").ok().or_else(|| {
        let output = Command::new("git")
            .args(["describe", "--tags", "--always", "--dirty"])
            .output()
            .ok()
            .filter(|o| o.status.success())?;
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    })?;
    let version = raw.strip_prefix('v').unwrap_or(&raw).to_string();
    (!version.is_empty()).then_some(version)
}

fn main() {
    if let Some(version) = version() {
        println!("cargo:rustc-env=DEVUTILS_VERSION={version}");
    }
    // Reported by `version`, `status` and the log file header.
    if let Ok(target) = std::env::var("TARGET") {
        println!("cargo:rustc-env=DEVUTILS_TARGET={target}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=DEVUTILS_VERSION");
}
