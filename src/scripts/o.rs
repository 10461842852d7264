//! `o`: open a file, folder or URL with the desktop's default handler.
use crate::context::Context;
use crate::error::ScriptError;
use crate::platform::PlatformKind;

const SCRIPT: &str = "o";

/// Open `target` (default: the working directory).
///
/// # Errors
///
/// Returns [`ScriptError::ToolMissing`] if no opener is installed and
/// [`ScriptError::CommandFailed`] if the opener rejects the target.
pub fn run(ctx: &Context, target: Option<&str>) -> Result<(), ScriptError> {
    let target = target.unwrap_or(".");
    match ctx.platform.kind {
        PlatformKind::Macos => {
            super::checked(ctx, SCRIPT, "open", &[target])?;
        }
        PlatformKind::Wsl => {
            if ctx.executor.command_exists("wslview") {
                super::checked(ctx, SCRIPT, "wslview", &[target])?;
            } else {
                // explorer.exe exits 1 even when it opened the target.
                ctx.executor.run_unchecked("explorer.exe", &[target])?;
            }
        }
        PlatformKind::Ubuntu
        | PlatformKind::Debian
        | PlatformKind::Raspbian
        | PlatformKind::AmazonLinux
        | PlatformKind::Rhel
        | PlatformKind::Fedora
        | PlatformKind::Linux => {
            super::require_tool(ctx, SCRIPT, "xdg-open", "install xdg-utils")?;
            super::checked(ctx, SCRIPT, "xdg-open", &[target])?;
        }
        PlatformKind::Windows | PlatformKind::GitBash => {
            // The empty string is `start`'s window title.
            super::checked(ctx, SCRIPT, "cmd", &["/C", "start", "", target])?;
        }
        PlatformKind::Unknown => return Err(super::unsupported(SCRIPT, ctx)),
    }
    ctx.log.debug(&format!("opened {target}"));
    Ok(())
}
