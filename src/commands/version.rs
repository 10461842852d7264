//! `devutils version` and the crates.io update check.
use std::time::Duration;

use anyhow::{Context as _, Result};
use serde::Deserialize;

use crate::logging::Log;
use crate::version::is_newer_version;

/// Published crate name, used for the update check and the install hint.
pub const CRATE_NAME: &str = "devutils-cli";

const REGISTRY_URL: &str = "https://crates.io/api/v1/crates/devutils-cli";
const TIMEOUT: Duration = Duration::from_secs(5);

/// Version of this build: `DEVUTILS_VERSION` at compile time (release tag or
/// `git describe`), else the package version.
#[must_use]
pub fn current() -> &'static str {
    option_env!("DEVUTILS_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Target triple this binary was compiled for, recorded by the build script.
#[must_use]
pub fn target() -> &'static str {
    option_env!("DEVUTILS_TARGET").unwrap_or("unknown")
}

#[derive(Debug, Deserialize)]
struct CrateResponse {
    #[serde(rename = "crate")]
    krate: CrateInfo,
}

#[derive(Debug, Deserialize)]
struct CrateInfo {
    max_stable_version: Option<String>,
}

/// Latest stable version from a crates.io `/api/v1/crates/<name>` body.
#[must_use]
pub fn parse_latest(body: &str) -> Option<String> {
    serde_json::from_str::<CrateResponse>(body)
        .ok()?
        .krate
        .max_stable_version
        .filter(|v| !v.is_empty())
}

/// Query crates.io for the latest published version.
///
/// # Errors
///
/// Returns an error if the request fails, times out, or the response has no
/// stable version.
pub fn latest_version() -> Result<String> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(TIMEOUT))
        .build()
        .into();
    let body = agent
        .get(REGISTRY_URL)
        .header("User-Agent", concat!("devutils/", env!("CARGO_PKG_VERSION")))
        .call()
        .context("querying crates.io")?
        .body_mut()
        .read_to_string()
        .context("reading crates.io response")?;
    parse_latest(&body).context("crates.io response has no stable version")
}

/// Log whether a newer release exists.  Network failures only warn.
pub fn report_update(log: &dyn Log) {
    match latest_version() {
        Ok(latest) => log.info(&update_message(current(), &latest)),
        Err(e) => log.warn(&format!("could not check for updates: {e:#}")),
    }
}

/// Message shown after comparing this build against `latest`.
#[must_use]
pub fn update_message(current: &str, latest: &str) -> String {
    if is_newer_version(Some(current), latest) {
        format!("update available: {current} -> {latest} (run `cargo install {CRATE_NAME}`)")
    } else {
        format!("devutils is up to date ({latest})")
    }
}

/// Print the version and check for updates.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub fn run(log: &dyn Log) -> Result<()> {
    log.output(&format!("devutils {} ({})", current(), target()));
    report_update(log);
    Ok(())
}
