//! `empty-trash`: permanently delete the user's trash contents.
use std::fs;
use std::path::{Path, PathBuf};

use crate::context::Context;
use crate::error::ScriptError;
use crate::platform::PlatformKind;

const SCRIPT: &str = "empty-trash";
const CLEAR_RECYCLE_BIN: &str = "Clear-RecycleBin -Force -ErrorAction SilentlyContinue";

/// Empty the trash for the current platform.
///
/// Returns the number of entries removed; `None` on Windows, where the
/// Recycle Bin is emptied by PowerShell and reports no count.
///
/// # Errors
///
/// Returns [`ScriptError::Io`] when an entry cannot be removed (on macOS this
/// usually means the terminal lacks Full Disk Access) and
/// [`ScriptError::CommandFailed`] if `Clear-RecycleBin` fails.
pub fn run(ctx: &Context) -> Result<Option<usize>, ScriptError> {
    let removed = match ctx.platform.kind {
        PlatformKind::Macos => empty_dir(&ctx.home.join(".Trash"))?,
        PlatformKind::Ubuntu
        | PlatformKind::Debian
        | PlatformKind::Raspbian
        | PlatformKind::AmazonLinux
        | PlatformKind::Rhel
        | PlatformKind::Fedora
        | PlatformKind::Wsl
        | PlatformKind::Linux => {
            let trash = xdg_trash(ctx);
            empty_dir(&trash.join("files"))? + empty_dir(&trash.join("info"))?
        }
        PlatformKind::Windows | PlatformKind::GitBash => {
            let result = ctx.executor.run_powershell(CLEAR_RECYCLE_BIN)?;
            if !result.success {
                return Err(ScriptError::CommandFailed {
                    script: SCRIPT,
                    command: CLEAR_RECYCLE_BIN.to_string(),
                    stderr: result.stderr.trim().to_string(),
                });
            }
            ctx.log.info("Recycle Bin emptied");
            return Ok(None);
        }
        PlatformKind::Unknown => return Err(super::unsupported(SCRIPT, ctx)),
    };
    ctx.log.info(&format!("removed {removed} item(s) from the trash"));
    Ok(Some(removed))
}

/// `$XDG_DATA_HOME/Trash`, defaulting to `~/.local/share/Trash`.
fn xdg_trash(ctx: &Context) -> PathBuf {
    ctx.env("XDG_DATA_HOME")
        .map_or_else(|| ctx.home.join(".local").join("share"), PathBuf::from)
        .join("Trash")
}

/// Remove every entry inside `dir`, keeping `dir` itself.
fn empty_dir(dir: &Path) -> Result<usize, ScriptError> {
    if !dir.is_dir() {
        return Ok(0);
    }
    let mut removed = 0;
    for entry in fs::read_dir(dir).map_err(super::io_error(SCRIPT, dir))? {
        let path = entry.map_err(super::io_error(SCRIPT, dir))?.path();
        let meta = fs::symlink_metadata(&path).map_err(super::io_error(SCRIPT, &path))?;
        let result = if meta.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(super::io_error(SCRIPT, &path))?;
        removed += 1;
    }
    Ok(removed)
}
