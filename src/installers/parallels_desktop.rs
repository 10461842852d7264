//! Parallels Desktop (macOS).
use std::path::Path;

use super::{InstallFn, InstallOutcome, Installer, install_package};
use crate::context::Context;
use crate::error::InstallError;
use crate::packages::{PackageManager, PackageOptions};
use crate::platform::PlatformKind;
use crate::version::PARALLELS;

const NAME: &str = "parallels-desktop";
const APP: &str = "/Applications/Parallels Desktop.app";

/// Installer for Parallels Desktop.
#[derive(Debug, Clone, Copy)]
pub struct ParallelsDesktop;

impl Installer for ParallelsDesktop {
    fn name(&self) -> &'static str {
        NAME
    }

    fn command(&self) -> &'static str {
        "prlctl"
    }

    fn description(&self) -> &'static str {
        "Virtual machines for macOS"
    }

    fn requires_desktop(&self) -> bool {
        true
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
        ctx.path_exists(Path::new(APP)) || ctx.executor.command_exists("prlctl")
    }
}

fn install_macos(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if ParallelsDesktop.is_installed(ctx) {
        let version = super::command_version(ctx, "prlctl", &["--version"], &PARALLELS);
        return Ok(super::already_installed(ctx, NAME, version.as_deref()));
    }
    super::require_homebrew(ctx, NAME)?;
    install_package(ctx, NAME, PackageManager::Brew, "parallels", PackageOptions::cask())?;
    let outcome = super::verify_path(ctx, NAME, Path::new(APP));
    if outcome == InstallOutcome::Installed {
        ctx.log
            .info("launch Parallels Desktop once to finish setup and activate a license");
    }
    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::context::test_helpers::{context, context_with};
    use crate::exec::test_helpers::MockExecutor;
    use crate::installers::install;
    use crate::platform::probe::FakeProbe;
    use std::sync::Arc;

    #[test]
    fn present_app_reports_prlctl_version() {
        let mock = Arc::new(
            MockExecutor::new()
                .with_program("prlctl")
                .respond("prlctl --version", 0, "prlctl version 19.1.0 (54729)\n"),
        );
        let probe = FakeProbe::new("macos").with_file(APP, "");
        let (ctx, log) = context_with(PlatformKind::Macos, mock, probe);
        assert_eq!(
            install(&ParallelsDesktop, &ctx).unwrap(),
            InstallOutcome::AlreadyInstalled
        );
        assert!(log.contains("parallels-desktop is already installed (19.1.0)"));
    }

    #[test]
    fn macos_installs_parallels_cask() {
        let mock = Arc::new(
            MockExecutor::new()
                .with_program("brew")
                .respond("brew install --cask parallels", 0, ""),
        );
        let (ctx, _log) = context(PlatformKind::Macos, mock.clone());
        install(&ParallelsDesktop, &ctx).unwrap();
        assert_eq!(mock.count("brew install --cask parallels"), 1);
    }

    #[test]
    fn only_macos_is_supported() {
        for kind in PlatformKind::ALL {
            assert_eq!(
                ParallelsDesktop.handler(kind).is_some(),
                kind == PlatformKind::Macos,
                "{kind}"
            );
        }
    }
}
