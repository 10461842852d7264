//! tmux terminal multiplexer.
use super::{InstallFn, InstallOutcome, Installer, install_native, install_package};
use crate::context::Context;
use crate::error::InstallError;
use crate::packages::{PackageManager, PackageOptions};
use crate::platform::PlatformKind;
use crate::version::TMUX;

const NAME: &str = "tmux";

/// Installer for `tmux`.  There is no native Windows build.
#[derive(Debug, Clone, Copy)]
pub struct Tmux;

impl Installer for Tmux {
    fn name(&self) -> &'static str {
        NAME
    }

    fn command(&self) -> &'static str {
        "tmux"
    }

    fn description(&self) -> &'static str {
        "Terminal multiplexer"
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
            PlatformKind::Windows
            | PlatformKind::GitBash
            | PlatformKind::Linux
            | PlatformKind::Unknown => None,
        }
    }
}

fn installed(ctx: &Context) -> Option<InstallOutcome> {
    super::present(ctx, NAME, "tmux", &["-V"], &TMUX)
}

fn install_macos(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    super::require_homebrew(ctx, NAME)?;
    install_package(ctx, NAME, PackageManager::Brew, "tmux", PackageOptions::default())?;
    Ok(super::verify_command(ctx, NAME, "tmux", &["-V"], &TMUX))
}

fn install_linux(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    install_native(ctx, NAME, "tmux")?;
    Ok(super::verify_command(ctx, NAME, "tmux", &["-V"], &TMUX))
}
