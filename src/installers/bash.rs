//! GNU Bash.
//!
//! macOS ships Bash 3.2; Homebrew provides a current release alongside it.
//! On Windows, Bash comes with Git for Windows and is not managed here.
use super::{InstallFn, InstallOutcome, Installer, install_native, install_package};
use crate::context::Context;
use crate::error::InstallError;
use crate::packages::{PackageManager, PackageOptions};
use crate::platform::PlatformKind;
use crate::version::BASH;

const NAME: &str = "bash";

/// Installer for `bash`.
#[derive(Debug, Clone, Copy)]
pub struct Bash;

impl Installer for Bash {
    fn name(&self) -> &'static str {
        NAME
    }

    fn command(&self) -> &'static str {
        "bash"
    }

    fn description(&self) -> &'static str {
        "GNU Bourne-Again shell"
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

fn verify(ctx: &Context) -> InstallOutcome {
    super::verify_command(ctx, NAME, "bash", &["--version"], &BASH)
}

fn install_macos(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if crate::packages::is_installed(ctx.executor.as_ref(), PackageManager::Brew, "bash") {
        let version = super::command_version(ctx, "bash", &["--version"], &BASH);
        return Ok(super::already_installed(ctx, NAME, version.as_deref()));
    }
    super::require_homebrew(ctx, NAME)?;
    install_package(ctx, NAME, PackageManager::Brew, "bash", PackageOptions::default())?;
    Ok(verify(ctx))
}

fn install_linux(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = super::present(ctx, NAME, "bash", &["--version"], &BASH) {
        return Ok(done);
    }
    install_native(ctx, NAME, "bash")?;
    Ok(verify(ctx))
}
