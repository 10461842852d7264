//! Homebrew package manager (macOS).
use std::path::{Path, PathBuf};

use super::{InstallFn, InstallOutcome, Installer};
use crate::context::Context;
use crate::error::InstallError;
use crate::platform::PlatformKind;
use crate::version::HOMEBREW;

const NAME: &str = "homebrew";

const INSTALL_SCRIPT: &str =
    "NONINTERACTIVE=1 /bin/bash -c \"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\"";

/// Install prefixes for Apple Silicon and Intel Macs.
const BREW_LOCATIONS: [&str; 2] = ["/opt/homebrew/bin/brew", "/usr/local/bin/brew"];

/// Installer for Homebrew.
#[derive(Debug, Clone, Copy)]
pub struct Homebrew;

impl Installer for Homebrew {
    fn name(&self) -> &'static str {
        NAME
    }

    fn command(&self) -> &'static str {
        "brew"
    }

    fn description(&self) -> &'static str {
        "The missing package manager for macOS"
    }

    fn handler(&self, kind: PlatformKind) -> Option<InstallFn> {
        match kind {
            PlatformKind::Macos => Some(install_macos),
            PlatformKind::Ubuntu
            | PlatformKind::Debian
            | PlatformKind::Raspbian
            | PlatformKind::AmazonLinux
            | PlatformKind::Rhel
            | PlatformKind::Fedora
            | PlatformKind::Wsl
            | PlatformKind::Windows
            | PlatformKind::GitBash
            | PlatformKind::Linux
            | PlatformKind::Unknown => None,
        }
    }

    fn is_installed(&self, ctx: &Context) -> bool {
        brew_path(ctx).is_some()
    }
}

/// Location of `brew`: on `PATH`, or in a standard prefix not yet on `PATH`.
fn brew_path(ctx: &Context) -> Option<PathBuf> {
    ctx.executor.which("brew").or_else(|| {
        BREW_LOCATIONS
            .iter()
            .map(Path::new)
            .find(|p| ctx.path_exists(p))
            .map(Path::to_path_buf)
    })
}

fn brew_version(ctx: &Context, brew: &Path) -> Option<String> {
    let program = brew.to_string_lossy();
    super::command_version(ctx, &program, &["--version"], &HOMEBREW)
}

fn install_macos(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(brew) = brew_path(ctx) {
        let version = brew_version(ctx, &brew);
        return Ok(super::already_installed(ctx, NAME, version.as_deref()));
    }

    super::require_command(
        ctx,
        NAME,
        "curl",
        "curl",
        "curl ships with macOS; reinstall the Command Line Tools with `devutils install xcode-clt`",
    )?;
    if !super::xcode_clt::tools_present(ctx) {
        ctx.log
            .warn("Command Line Tools not found; the Homebrew installer will request them");
    }

    ctx.log.info("running the official Homebrew install script");
    let result = ctx.executor.run_shell(INSTALL_SCRIPT)?;
    if !result.success {
        return Err(InstallError::CommandFailed {
            tool: NAME.to_string(),
            command: INSTALL_SCRIPT.to_string(),
            code: result.exit_code(),
            output: result.combined_output(),
        });
    }

    let Some(brew) = brew_path(ctx) else {
        ctx.log.warn(
            "Homebrew install script finished but brew was not found in /opt/homebrew or /usr/local",
        );
        return Ok(InstallOutcome::InstalledUnverified);
    };
    match brew_version(ctx, &brew) {
        Some(v) => ctx.log.info(&format!("homebrew installed ({v})")),
        None => ctx.log.info("homebrew installed"),
    }
    if ctx.executor.which("brew").is_none() {
        ctx.log.info(&format!(
            "add brew to your shell with: eval \"$({} shellenv)\"",
            brew.display()
        ));
    }
    Ok(InstallOutcome::Installed)
}
