//! Git version control.
use super::{InstallFn, InstallOutcome, Installer, install_native, install_package, install_windows};
use crate::context::Context;
use crate::error::InstallError;
use crate::packages::{PackageManager, PackageOptions};
use crate::platform::PlatformKind;
use crate::version::GIT;

const NAME: &str = "git";

/// Installer for `git`.
#[derive(Debug, Clone, Copy)]
pub struct Git;

impl Installer for Git {
    fn name(&self) -> &'static str {
        NAME
    }

    fn command(&self) -> &'static str {
        "git"
    }

    fn description(&self) -> &'static str {
        "Distributed version control system"
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
    super::present(ctx, NAME, "git", &["--version"], &GIT)
}

fn verify(ctx: &Context) -> InstallOutcome {
    super::verify_command(ctx, NAME, "git", &["--version"], &GIT)
}

fn install_macos(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    // /usr/bin/git is a CLT shim that prompts when the tools are missing.
    if ctx.executor.which("git").is_some_and(|p| p.starts_with("/usr/bin"))
        && !super::xcode_clt::tools_present(ctx)
    {
        ctx.log.debug("git shim found without Command Line Tools");
    } else if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    super::require_homebrew(ctx, NAME)?;
    install_package(ctx, NAME, PackageManager::Brew, "git", PackageOptions::default())?;
    Ok(verify(ctx))
}

fn install_linux(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    install_native(ctx, NAME, "git")?;
    Ok(verify(ctx))
}

fn install_windows_host(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    install_windows(ctx, NAME, "Git.Git", "git")?;
    Ok(verify(ctx))
}
