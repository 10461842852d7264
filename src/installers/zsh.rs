//! Z shell.
use super::{InstallFn, InstallOutcome, Installer, install_native, install_package};
use crate::context::Context;
use crate::error::InstallError;
use crate::packages::{PackageManager, PackageOptions};
use crate::platform::PlatformKind;
use crate::version::ZSH;

const NAME: &str = "zsh";

/// Installer for `zsh`.
#[derive(Debug, Clone, Copy)]
pub struct Zsh;

impl Installer for Zsh {
    fn name(&self) -> &'static str {
        NAME
    }

    fn command(&self) -> &'static str {
        "zsh"
    }

    fn description(&self) -> &'static str {
        "Z shell"
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
    super::present(ctx, NAME, "zsh", &["--version"], &ZSH)
}

fn finish(ctx: &Context) -> InstallOutcome {
    let outcome = super::verify_command(ctx, NAME, "zsh", &["--version"], &ZSH);
    if outcome == InstallOutcome::Installed {
        ctx.log
            .info("make it your login shell with: chsh -s \"$(command -v zsh)\"");
    }
    outcome
}

fn install_macos(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    super::require_homebrew(ctx, NAME)?;
    install_package(ctx, NAME, PackageManager::Brew, "zsh", PackageOptions::default())?;
    Ok(finish(ctx))
}

fn install_linux(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    install_native(ctx, NAME, "zsh")?;
    Ok(finish(ctx))
}
