//! curl HTTP client.
use super::{InstallFn, InstallOutcome, Installer, install_native, install_package, install_windows};
use crate::context::Context;
use crate::error::InstallError;
use crate::packages::{PackageManager, PackageOptions};
use crate::platform::PlatformKind;
use crate::version::CURL;

const NAME: &str = "curl";

/// Installer for `curl`.
#[derive(Debug, Clone, Copy)]
pub struct Curl;

impl Installer for Curl {
    fn name(&self) -> &'static str {
        NAME
    }

    fn command(&self) -> &'static str {
        "curl"
    }

    fn description(&self) -> &'static str {
        "Command-line tool for transferring data with URLs"
    }

    fn handler(&self, kind: PlatformKind) -> Option<InstallFn> {
        match kind {
            PlatformKind::Macos => Some(install_macos),
            PlatformKind::Ubuntu
            | PlatformKind::Debian
            | PlatformKind::Raspbian
            | PlatformKind::Wsl
            | PlatformKind::AmazonLinux
            | PlatformKind::Rhel
            | PlatformKind::Fedora => Some(install_linux),
            PlatformKind::Windows | PlatformKind::GitBash => Some(install_windows_host),
            PlatformKind::Linux | PlatformKind::Unknown => None,
        }
    }
}

fn installed(ctx: &Context) -> Option<InstallOutcome> {
    super::present(ctx, NAME, "curl", &["--version"], &CURL)
}

fn verify(ctx: &Context) -> InstallOutcome {
    super::verify_command(ctx, NAME, "curl", &["--version"], &CURL)
}

fn install_macos(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    super::require_homebrew(ctx, NAME)?;
    install_package(ctx, NAME, PackageManager::Brew, "curl", PackageOptions::default())?;
    Ok(verify(ctx))
}

fn install_linux(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    install_native(ctx, NAME, "curl")?;
    Ok(verify(ctx))
}

fn install_windows_host(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    install_windows(ctx, NAME, "cURL.cURL", "curl")?;
    Ok(verify(ctx))
}
