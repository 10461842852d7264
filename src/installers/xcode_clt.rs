//! Xcode Command Line Tools (macOS).
//!
//! Installs headlessly through `softwareupdate`: a placeholder file makes the
//! Command Line Tools appear in `softwareupdate -l`, the newest listed label
//! is installed with `softwareupdate -i`, and the GUI `xcode-select
//! --install` prompt is the fallback when no label is offered.
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use super::{InstallFn, InstallOutcome, Installer};
use crate::context::Context;
use crate::error::InstallError;
use crate::platform::PlatformKind;
use crate::version::XCODE_SELECT;

const NAME: &str = "xcode-clt";

const PLACEHOLDER: &str = "/tmp/.com.apple.dt.CommandLineTools.installondemand.in-progress";
const LIST_TIMEOUT: Duration = Duration::from_secs(2 * 60);
const INSTALL_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// `* Label: Command Line Tools for Xcode-15.1` (macOS 10.15+) or
/// `   * Command Line Tools (macOS Mojave version 10.14) for Xcode-10.3`.
static LABEL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\*\s*(?:Label:\s*)?(Command Line Tools[^\r\n]*?)\s*$").ok()
});

/// Installer for the Xcode Command Line Tools.
#[derive(Debug, Clone, Copy)]
pub struct XcodeClt;

impl Installer for XcodeClt {
    fn name(&self) -> &'static str {
        NAME
    }

    fn command(&self) -> &'static str {
        "xcode-select"
    }

    fn description(&self) -> &'static str {
        "Xcode Command Line Tools (compilers, git, make)"
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
        tools_present(ctx)
    }
}

/// Whether `xcode-select -p` points at an installed developer directory.
pub(crate) fn tools_present(ctx: &Context) -> bool {
    ctx.executor
        .run_unchecked("xcode-select", &["-p"])
        .is_ok_and(|r| r.success && !r.stdout.trim().is_empty())
}

/// Newest Command Line Tools label offered by `softwareupdate -l`.
pub(crate) fn latest_label(listing: &str) -> Option<String> {
    let re = LABEL.as_ref()?;
    re.captures_iter(listing)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .last()
}

fn install_macos(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    if tools_present(ctx) {
        let version = super::command_version(ctx, "xcode-select", &["--version"], &XCODE_SELECT);
        return Ok(super::already_installed(ctx, NAME, version.as_deref()));
    }

    ctx.executor.run_unchecked("touch", &[PLACEHOLDER])?;
    let outcome = install_from_catalog(ctx);
    ctx.executor.run_unchecked("rm", &["-f", PLACEHOLDER])?;
    outcome
}

fn install_from_catalog(ctx: &Context) -> Result<InstallOutcome, InstallError> {
    ctx.log.info("searching software updates for the Command Line Tools");
    let listing = ctx
        .executor
        .run_with_timeout("softwareupdate", &["-l"], LIST_TIMEOUT)?;

    let Some(label) = latest_label(&listing.combined_output()) else {
        ctx.log
            .warn("no Command Line Tools update offered, falling back to the installer dialog");
        super::run_step(ctx, NAME, "xcode-select", &["--install"])?;
        ctx.log
            .info("complete the installation in the dialog, then re-run this command");
        return Ok(InstallOutcome::InstalledUnverified);
    };

    ctx.log.info(&format!("installing {label}"));
    let result = ctx.executor.run_with_timeout(
        "softwareupdate",
        &["-i", &label, "--verbose"],
        INSTALL_TIMEOUT,
    )?;

    // softwareupdate can exit non-zero after a successful install.
    if tools_present(ctx) {
        if !result.success {
            ctx.log.debug(&format!(
                "softwareupdate exited {} but the tools are present",
                result.exit_code()
            ));
        }
        ctx.log.info("xcode-clt installed");
        return Ok(InstallOutcome::Installed);
    }
    if !result.success {
        return Err(InstallError::CommandFailed {
            tool: NAME.to_string(),
            command: format!("softwareupdate -i \"{label}\" --verbose"),
            code: result.exit_code(),
            output: result.combined_output(),
        });
    }
    ctx.log.warn(
        "softwareupdate finished but `xcode-select -p` reports no tools; \
         run `xcode-select --install`",
    );
    Ok(InstallOutcome::InstalledUnverified)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::context::test_helpers::context;
    use crate::exec::test_helpers::MockExecutor;
    use crate::installers::install;
    use std::sync::Arc;

    const LISTING_MODERN: &str = "Software Update Tool\n\n\
        Finding available software\n\
        Software Update found the following new or updated software:\n\
        * Label: Command Line Tools for Xcode-14.3\n\
        \tTitle: Command Line Tools for Xcode, Version: 14.3, Size: 711266KiB, Recommended: YES, \n\
        * Label: Command Line Tools for Xcode-15.1\n\
        \tTitle: Command Line Tools for Xcode, Version: 15.1, Size: 735444KiB, Recommended: YES, \n";

    const LISTING_LEGACY: &str = "Software Update found the following new or updated software:\n   \
        * Command Line Tools (macOS Mojave version 10.14) for Xcode-10.3\n\
        \tCommand Line Tools (macOS Mojave version 10.14) for Xcode (10.3), 199140K [recommended]\n";

    #[test]
    fn latest_label_picks_newest_modern_entry() {
        assert_eq!(
            latest_label(LISTING_MODERN).as_deref(),
            Some("Command Line Tools for Xcode-15.1")
        );
    }

    #[test]
    fn latest_label_handles_legacy_format() {
        assert_eq!(
            latest_label(LISTING_LEGACY).as_deref(),
            Some("Command Line Tools (macOS Mojave version 10.14) for Xcode-10.3")
        );
    }

    #[test]
    fn latest_label_none_when_not_offered() {
        assert_eq!(latest_label("No new software available.\n"), None);
    }

    #[test]
    fn present_tools_are_idempotent() {
        let mock = Arc::new(
            MockExecutor::new()
                .respond("xcode-select -p", 0, "/Library/Developer/CommandLineTools\n")
                .respond("xcode-select --version", 0, "xcode-select version 2397.\n"),
        );
        let (ctx, log) = context(PlatformKind::Macos, mock.clone());
        for _ in 0..2 {
            assert_eq!(install(&XcodeClt, &ctx).unwrap(), InstallOutcome::AlreadyInstalled);
        }
        assert_eq!(mock.count("softwareupdate"), 0);
        assert!(log.contains("xcode-clt is already installed (2397)"));
    }

    #[test]
    fn failed_install_without_tools_is_command_failed() {
        let mock = Arc::new(
            MockExecutor::new()
                .respond("touch", 0, "")
                .respond("rm -f", 0, "")
                .respond("softwareupdate -l", 0, LISTING_MODERN)
                .respond("softwareupdate -i", 1, ""),
        );
        let (ctx, _log) = context(PlatformKind::Macos, mock.clone());
        let err = install(&XcodeClt, &ctx).unwrap_err();
        assert!(matches!(err, InstallError::CommandFailed { .. }));
        assert_eq!(
            mock.count("softwareupdate -i Command Line Tools for Xcode-15.1 --verbose"),
            1
        );
        assert_eq!(mock.count("rm -f"), 1, "placeholder must be removed");
    }

    #[test]
    fn missing_label_falls_back_to_dialog() {
        let mock = Arc::new(
            MockExecutor::new()
                .respond("touch", 0, "")
                .respond("rm -f", 0, "")
                .respond("softwareupdate -l", 0, "No new software available.\n")
                .respond("xcode-select --install", 0, ""),
        );
        let (ctx, _log) = context(PlatformKind::Macos, mock.clone());
        assert_eq!(
            install(&XcodeClt, &ctx).unwrap(),
            InstallOutcome::InstalledUnverified
        );
        assert_eq!(mock.count("xcode-select --install"), 1);
    }
}
