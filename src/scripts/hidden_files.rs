//! `show-hidden-files` / `hide-hidden-files`: toggle hidden-file visibility
//! in the platform file manager.
use crate::context::Context;
use crate::error::ScriptError;
use crate::platform::PlatformKind;

/// Explorer setting (display only).
const EXPLORER_KEY: &str = r"HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced";

#[cfg(windows)]
const EXPLORER_SUBKEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced";

const GTK_SCHEMA: &str = "org.gtk.Settings.FileChooser";

const fn script_name(show: bool) -> &'static str {
    if show {
        "show-hidden-files"
    } else {
        "hide-hidden-files"
    }
}

/// Show (`true`) or hide (`false`) hidden files.
///
/// # Errors
///
/// Returns [`ScriptError::Unsupported`] on unknown platforms,
/// [`ScriptError::ToolMissing`] when `gsettings` is absent on Linux, and
/// [`ScriptError::CommandFailed`] if the setting cannot be written.
pub fn set_visible(ctx: &Context, show: bool) -> Result<(), ScriptError> {
    let script = script_name(show);
    match ctx.platform.kind {
        PlatformKind::Macos => finder(ctx, script, show),
        PlatformKind::Windows | PlatformKind::GitBash => explorer(script, show),
        PlatformKind::Ubuntu
        | PlatformKind::Debian
        | PlatformKind::Raspbian
        | PlatformKind::AmazonLinux
        | PlatformKind::Rhel
        | PlatformKind::Fedora
        | PlatformKind::Wsl
        | PlatformKind::Linux => gtk(ctx, script, show),
        PlatformKind::Unknown => Err(super::unsupported(script, ctx)),
    }?;
    ctx.log.info(if show {
        "hidden files are now visible"
    } else {
        "hidden files are now hidden"
    });
    Ok(())
}

fn finder(ctx: &Context, script: &'static str, show: bool) -> Result<(), ScriptError> {
    let value = if show { "true" } else { "false" };
    super::checked(
        ctx,
        script,
        "defaults",
        &["write", "com.apple.finder", "AppleShowAllFiles", "-bool", value],
    )?;
    // Finder rereads its defaults on restart; it may not be running.
    let restart = ctx.executor.run_unchecked("killall", &["Finder"])?;
    if !restart.success {
        ctx.log.debug("Finder was not running");
    }
    Ok(())
}

fn gtk(ctx: &Context, script: &'static str, show: bool) -> Result<(), ScriptError> {
    super::require_tool(ctx, script, "gsettings", "install your desktop's GLib tools")?;
    let value = if show { "true" } else { "false" };
    super::checked(ctx, script, "gsettings", &["set", GTK_SCHEMA, "show-hidden", value])?;
    Ok(())
}

/// Explorer's `Hidden` value: 1 shows hidden files, 2 hides them.
fn explorer(script: &'static str, show: bool) -> Result<(), ScriptError> {
    let value: u32 = if show { 1 } else { 2 };
    tracing::debug!("setting {EXPLORER_KEY}\\Hidden = {value}");
    #[cfg(windows)]
    {
        use winreg::RegKey;
        use winreg::enums::HKEY_CURRENT_USER;
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let (key, _) = hkcu
            .create_subkey(EXPLORER_SUBKEY)
            .map_err(super::io_error(script, std::path::Path::new(EXPLORER_KEY)))?;
        key.set_value("Hidden", &value)
            .map_err(super::io_error(script, std::path::Path::new(EXPLORER_KEY)))?;
        Ok(())
    }
    #[cfg(not(windows))]
    {
        Err(ScriptError::Unsupported {
            script,
            platform: "a non-Windows build".to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::context::test_helpers::context;
    use crate::exec::test_helpers::MockExecutor;
    use std::sync::Arc;

    #[test]
    fn macos_writes_finder_default_and_restarts() {
        let mock = Arc::new(
            MockExecutor::new()
                .respond("defaults write com.apple.finder AppleShowAllFiles", 0, "")
                .respond("killall Finder", 1, ""),
        );
        let (ctx, _log) = context(PlatformKind::Macos, mock.clone());
        set_visible(&ctx, true).unwrap();
        assert_eq!(
            mock.calls(),
            vec![
                "defaults write com.apple.finder AppleShowAllFiles -bool true",
                "killall Finder"
            ]
        );
    }

    #[test]
    fn linux_uses_gsettings() {
        let mock = Arc::new(
            MockExecutor::new()
                .with_program("gsettings")
                .respond("gsettings set", 0, ""),
        );
        let (ctx, log) = context(PlatformKind::Fedora, mock.clone());
        set_visible(&ctx, false).unwrap();
        assert_eq!(
            mock.calls(),
            vec!["gsettings set org.gtk.Settings.FileChooser show-hidden false"]
        );
        assert!(log.contains("hidden files are now hidden"));
    }

    #[test]
    fn linux_without_gsettings_is_tool_missing() {
        let (ctx, _log) = context(PlatformKind::Ubuntu, Arc::new(MockExecutor::new()));
        let err = set_visible(&ctx, true).unwrap_err();
        assert!(matches!(err, ScriptError::ToolMissing { tool: "gsettings", .. }));
    }

    #[test]
    fn unknown_platform_is_unsupported() {
        let (ctx, _log) = context(PlatformKind::Unknown, Arc::new(MockExecutor::new()));
        let err = set_visible(&ctx, false).unwrap_err();
        assert_eq!(err.to_string(), "hide-hidden-files is not available for unknown");
    }
}
