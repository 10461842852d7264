//! Node.js LTS.
//!
//! Debian-family hosts get the NodeSource LTS repository so the installed
//! version is current rather than the distribution's frozen one.
use super::{InstallFn, InstallOutcome, Installer, install_native, install_package, install_windows};
use crate::context::Context;
use crate::error::InstallError;
use crate::packages::{PackageManager, PackageOptions};
use crate::platform::{PlatformKind, SystemPackageManager};
use crate::version::NODE;

const NAME: &str = "node";

const NODESOURCE_DEB: &str = "curl -fsSL https://deb.nodesource.com/setup_lts.x | sudo -E bash -";
const NODESOURCE_RPM: &str = "curl -fsSL https://rpm.nodesource.com/setup_lts.x | sudo bash -";

/// Installer for Node.js (and npm).
#[derive(Debug, Clone, Copy)]
pub struct Node;

impl Installer for Node {
    fn name(&self) -> &'static str {
        NAME
    }

    fn command(&self) -> &'static str {
        "node"
    }

    fn description(&self) -> &'static str {
        "Node.js LTS runtime with npm"
    }

    fn handler(&self, kind: PlatformKind) -> Option<InstallFn> {
        match kind {
            PlatformKind::Macos => Some(install_macos),
            PlatformKind::Ubuntu
            | PlatformKind::Debian
            | PlatformKind::Raspbian
            | PlatformKind::Wsl => Some(install_nodesource_deb),
            PlatformKind::AmazonLinux | PlatformKind::Rhel | PlatformKind::Fedora => {
                Some(install_rhel)
            }
            PlatformKind::Windows | PlatformKind::GitBash => Some(install_windows_host),
            PlatformKind::Linux | PlatformKind::Unknown => None,
        }
    }
}

fn installed(ctx: &Context) -> Option<InstallOutcome> {
    super::present(ctx, NAME, "node", &["--version"], &NODE)
}

fn verify(ctx: &Context) -> InstallOutcome {
    super::verify_command(ctx, NAME, "node", &["--version"], &NODE)
}

fn install_macos(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    super::require_homebrew(ctx, NAME)?;
    install_package(ctx, NAME, PackageManager::Brew, "node", PackageOptions::default())?;
    Ok(verify(ctx))
}

fn nodesource_setup(ctx: &Context, script: &str) -> Result<(), InstallError> {
    super::require_command(
        ctx,
        NAME,
        "curl",
        "curl",
        "run `devutils install curl` first",
    )?;
    ctx.log.info("adding the NodeSource LTS repository");
    super::setup_step(ctx, NAME, "NodeSource repository setup", "sh", &["-c", script])
}

fn install_nodesource_deb(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    nodesource_setup(ctx, NODESOURCE_DEB)?;
    // The setup script refreshes the APT index itself.
    install_package(ctx, NAME, PackageManager::Apt, "nodejs", PackageOptions::default())?;
    Ok(verify(ctx))
}

fn install_rhel(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    // Amazon Linux 2 ships no usable nodejs module; 2023 (dnf) does.
    if ctx.platform.kind == PlatformKind::AmazonLinux
        && ctx.platform.package_manager == Some(SystemPackageManager::Yum)
    {
        nodesource_setup(ctx, NODESOURCE_RPM)?;
        install_package(ctx, NAME, PackageManager::Yum, "nodejs", PackageOptions::default())?;
    } else {
        install_native(ctx, NAME, "nodejs")?;
    }
    Ok(verify(ctx))
}

fn install_windows_host(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    install_windows(ctx, NAME, "OpenJS.NodeJS.LTS", "nodejs-lts")?;
    Ok(verify(ctx))
}
