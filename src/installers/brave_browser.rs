//! Brave Browser (desktop hosts only).
use std::path::{Path, PathBuf};

use super::{InstallFn, InstallOutcome, Installer, install_package, install_windows};
use crate::context::Context;
use crate::error::InstallError;
use crate::packages::{self, PackageManager, PackageOptions};
use crate::platform::PlatformKind;
use crate::version::BRAVE;

const NAME: &str = "brave-browser";

const MACOS_APP: &str = "/Applications/Brave Browser.app";
const WINDOWS_EXE: [&str; 4] = ["BraveSoftware", "Brave-Browser", "Application", "brave.exe"];

const APT_KEYRING: &str = "/usr/share/keyrings/brave-browser-archive-keyring.gpg";
const APT_KEY_URL: &str =
    "https://brave-browser-apt-release.s3.brave.com/brave-browser-archive-keyring.gpg";
const APT_SOURCES: &str = "/etc/apt/sources.list.d/brave-browser-release.list";
const APT_REPO: &str = "https://brave-browser-apt-release.s3.brave.com/";

const RPM_REPO_FILE: &str = "https://brave-browser-rpm-release.s3.brave.com/brave-browser.repo";
const RPM_KEY_URL: &str = "https://brave-browser-rpm-release.s3.brave.com/brave-core.asc";

/// Installer for the Brave web browser.
#[derive(Debug, Clone, Copy)]
pub struct BraveBrowser;

impl Installer for BraveBrowser {
    fn name(&self) -> &'static str {
        NAME
    }

    fn command(&self) -> &'static str {
        "brave-browser"
    }

    fn description(&self) -> &'static str {
        "Privacy-focused Chromium web browser"
    }

    fn requires_desktop(&self) -> bool {
        true
    }

    fn handler(&self, kind: PlatformKind) -> Option<InstallFn> {
        match kind {
            PlatformKind::Macos => Some(install_macos),
            PlatformKind::Ubuntu | PlatformKind::Debian | PlatformKind::Wsl => Some(install_apt),
            PlatformKind::Rhel | PlatformKind::Fedora => Some(install_rpm),
            PlatformKind::Windows | PlatformKind::GitBash => Some(install_windows_host),
            // No ARM builds in the APT repository; no Amazon Linux desktop.
            PlatformKind::Raspbian
            | PlatformKind::AmazonLinux
            | PlatformKind::Linux
            | PlatformKind::Unknown => None,
        }
    }

    fn is_installed(&self, ctx: &Context) -> bool {
        match ctx.platform.kind {
            PlatformKind::Macos => ctx.path_exists(Path::new(MACOS_APP)),
            PlatformKind::Windows | PlatformKind::GitBash => windows_exe(ctx).is_some(),
            PlatformKind::Ubuntu
            | PlatformKind::Debian
            | PlatformKind::Raspbian
            | PlatformKind::AmazonLinux
            | PlatformKind::Rhel
            | PlatformKind::Fedora
            | PlatformKind::Linux
            | PlatformKind::Wsl
            | PlatformKind::Unknown => ctx.executor.command_exists(self.command()),
        }
    }
}

/// Installed `brave.exe`, per-user install first.
fn windows_exe(ctx: &Context) -> Option<PathBuf> {
    ["LOCALAPPDATA", "ProgramFiles", "ProgramFiles(x86)"]
        .into_iter()
        .filter_map(|var| ctx.env(var))
        .map(|root| WINDOWS_EXE.iter().fold(PathBuf::from(root), |p, c| p.join(c)))
        .find(|p| ctx.path_exists(p))
}

fn installed(ctx: &Context) -> Option<InstallOutcome> {
    super::present(ctx, NAME, "brave-browser", &["--version"], &BRAVE)
}

fn verify(ctx: &Context) -> InstallOutcome {
    super::verify_command(ctx, NAME, "brave-browser", &["--version"], &BRAVE)
}

fn install_macos(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    let app = Path::new(MACOS_APP);
    if ctx.path_exists(app) {
        return Ok(super::already_installed(ctx, NAME, None));
    }
    super::require_homebrew(ctx, NAME)?;
    install_package(ctx, NAME, PackageManager::Brew, "brave-browser", PackageOptions::cask())?;
    Ok(super::verify_path(ctx, NAME, app))
}

fn install_apt(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    super::require_command(ctx, NAME, "curl", "curl", "run `devutils install curl` first")?;

    ctx.log.info("adding the Brave APT repository");
    super::setup_step(
        ctx,
        NAME,
        "keyring download",
        "sudo",
        &["curl", "-fsSLo", APT_KEYRING, APT_KEY_URL],
    )?;
    let entry = format!("deb [signed-by={APT_KEYRING}] {APT_REPO} stable main");
    let source = format!("echo \"{entry}\" | sudo tee {APT_SOURCES}");
    super::setup_step(ctx, NAME, "APT source registration", "sh", &["-c", &source])?;

    super::refresh_index(ctx, PackageManager::Apt)?;
    install_package(ctx, NAME, PackageManager::Apt, "brave-browser", PackageOptions::default())?;
    Ok(verify(ctx))
}

fn install_rpm(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if let Some(done) = installed(ctx) {
        return Ok(done);
    }
    ctx.log.info("adding the Brave RPM repository");
    let manager = match packages::preferred(&ctx.platform, ctx.executor.as_ref()) {
        Some(PackageManager::Yum) => {
            add_yum_repo(ctx)?;
            PackageManager::Yum
        }
        _ => {
            add_dnf_repo(ctx)?;
            PackageManager::Dnf
        }
    };
    super::setup_step(
        ctx,
        NAME,
        "signing key import",
        "sudo",
        &["rpm", "--import", RPM_KEY_URL],
    )?;

    install_package(ctx, NAME, manager, "brave-browser", PackageOptions::default())?;
    Ok(verify(ctx))
}

fn add_dnf_repo(ctx: &Context) -> Result<(), InstallError> {
    super::setup_step(
        ctx,
        NAME,
        "dnf-plugins-core install",
        "sudo",
        &["dnf", "install", "-y", "dnf-plugins-core"],
    )?;

    // dnf5 renamed `--add-repo`.
    let from_file = format!("--from-repofile={RPM_REPO_FILE}");
    let dnf5 = ctx
        .executor
        .run_unchecked("sudo", &["dnf", "config-manager", "addrepo", &from_file])?;
    if !dnf5.success {
        ctx.log.debug("dnf5 addrepo failed, trying dnf4 syntax");
        super::setup_step(
            ctx,
            NAME,
            "repository registration",
            "sudo",
            &["dnf", "config-manager", "--add-repo", RPM_REPO_FILE],
        )?;
    }
    Ok(())
}

/// Older RHEL hosts without dnf ship `yum-config-manager` in `yum-utils`.
fn add_yum_repo(ctx: &Context) -> Result<(), InstallError> {
    super::setup_step(
        ctx,
        NAME,
        "yum-utils install",
        "sudo",
        &["yum", "install", "-y", "yum-utils"],
    )?;
    super::setup_step(
        ctx,
        NAME,
        "repository registration",
        "sudo",
        &["yum-config-manager", "--add-repo", RPM_REPO_FILE],
    )
}

fn install_windows_host(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if windows_exe(ctx).is_some() {
        return Ok(super::already_installed(ctx, NAME, None));
    }
    install_windows(ctx, NAME, "Brave.Brave", "brave")?;
    match windows_exe(ctx) {
        Some(exe) => Ok(super::verify_path(ctx, NAME, &exe)),
        None => {
            ctx.log.warn(
                "brave-browser install finished but brave.exe was not found; open a new shell",
            );
            Ok(InstallOutcome::InstalledUnverified)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::context::test_helpers::{context, context_with};
    use crate::exec::test_helpers::MockExecutor;
    use crate::installers::install;
    use crate::platform::probe::FakeProbe;
    use crate::platform::{PlatformDescriptor, SystemPackageManager};
    use std::sync::Arc;

    fn desktop() -> FakeProbe {
        FakeProbe::linux().with_env("DISPLAY", ":0")
    }

    #[test]
    fn macos_app_bundle_counts_as_installed() {
        let mock = Arc::new(MockExecutor::new());
        let probe = FakeProbe::new("macos").with_file(MACOS_APP, "");
        let (ctx, log) = context_with(PlatformKind::Macos, mock.clone(), probe);
        assert!(BraveBrowser.is_installed(&ctx));
        assert_eq!(install(&BraveBrowser, &ctx).unwrap(), InstallOutcome::AlreadyInstalled);
        assert!(mock.calls().is_empty());
        assert!(log.contains("brave-browser is already installed"));
    }

    #[test]
    fn macos_installs_cask() {
        let mock = Arc::new(
            MockExecutor::new()
                .with_program("brew")
                .respond("brew install --cask brave-browser", 0, ""),
        );
        let (ctx, _log) = context_with(PlatformKind::Macos, mock.clone(), FakeProbe::new("macos"));
        // The fake probe never gains the bundle, so the result is unverified.
        assert_eq!(
            install(&BraveBrowser, &ctx).unwrap(),
            InstallOutcome::InstalledUnverified
        );
        assert_eq!(mock.count("brew install --cask brave-browser"), 1);
    }

    #[test]
    fn ubuntu_sets_up_repository_before_install() {
        let mock = Arc::new(
            MockExecutor::new()
                .with_program("curl")
                .respond("sudo curl -fsSLo", 0, "")
                .respond("sh -c echo", 0, "")
                .respond("sudo apt-get update", 0, "")
                .respond("sudo apt-get install -y brave-browser", 0, "")
                .provides("sudo apt-get install -y brave-browser", "brave-browser")
                .respond("brave-browser --version", 0, "Brave Browser 120.1.61.109\n"),
        );
        let (ctx, log) = context_with(PlatformKind::Ubuntu, mock.clone(), desktop());
        assert_eq!(install(&BraveBrowser, &ctx).unwrap(), InstallOutcome::Installed);
        let calls = mock.calls();
        assert!(calls[0].starts_with("sudo curl -fsSLo /usr/share/keyrings/"));
        assert!(calls[1].contains("signed-by="));
        assert_eq!(calls[2], "sudo apt-get update");
        assert!(log.contains("brave-browser installed (120.1.61.109)"));
    }

    #[test]
    fn keyring_failure_stops_before_install() {
        let mock = Arc::new(
            MockExecutor::new()
                .with_program("curl")
                .respond("sudo curl", 22, ""),
        );
        let (ctx, _log) = context_with(PlatformKind::Debian, mock.clone(), desktop());
        let err = install(&BraveBrowser, &ctx).unwrap_err();
        assert!(matches!(err, InstallError::RepositorySetup { .. }));
        assert_eq!(mock.count("sudo apt-get install"), 0);
    }

    #[test]
    fn fedora_falls_back_to_dnf4_add_repo() {
        let mock = Arc::new(
            MockExecutor::new()
                .respond("sudo dnf install -y dnf-plugins-core", 0, "")
                .respond("sudo dnf config-manager addrepo", 1, "")
                .respond("sudo dnf config-manager --add-repo", 0, "")
                .respond("sudo rpm --import", 0, "")
                .respond("sudo dnf install -y brave-browser", 0, ""),
        );
        let (ctx, _log) = context_with(PlatformKind::Fedora, mock.clone(), desktop());
        install(&BraveBrowser, &ctx).unwrap();
        assert_eq!(mock.count("sudo dnf config-manager --add-repo"), 1);
        assert_eq!(mock.count("sudo dnf install -y brave-browser"), 1);
    }

    #[test]
    fn rhel_with_yum_registers_repo_through_yum_config_manager() {
        let mock = Arc::new(
            MockExecutor::new()
                .respond("sudo yum install -y yum-utils", 0, "")
                .respond("sudo yum-config-manager --add-repo", 0, "")
                .respond("sudo rpm --import", 0, "")
                .respond("sudo yum install -y brave-browser", 0, ""),
        );
        let (mut ctx, _log) = context_with(PlatformKind::Rhel, mock.clone(), desktop());
        ctx.platform =
            PlatformDescriptor::new(PlatformKind::Rhel, Some(SystemPackageManager::Yum), None);
        install(&BraveBrowser, &ctx).unwrap();
        let calls = mock.calls();
        assert_eq!(calls[0], "sudo yum install -y yum-utils");
        assert_eq!(calls[1], format!("sudo yum-config-manager --add-repo {RPM_REPO_FILE}"));
        assert_eq!(mock.count("sudo yum install -y brave-browser"), 1);
        assert_eq!(mock.count("sudo dnf"), 0);
    }

    #[test]
    fn raspbian_and_amazon_linux_are_not_supported() {
        assert!(BraveBrowser.handler(PlatformKind::Raspbian).is_none());
        assert!(BraveBrowser.handler(PlatformKind::AmazonLinux).is_none());
        let (ctx, _log) = context(PlatformKind::Raspbian, Arc::new(MockExecutor::new()));
        assert_eq!(install(&BraveBrowser, &ctx).unwrap(), InstallOutcome::NotAvailable);
    }
}
