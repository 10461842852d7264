//! Shell-replacement scripts.
//!
//! Each script is a small, self-contained operation exposed as its own
//! subcommand.  Scripts dispatch on [`PlatformKind`](crate::platform::PlatformKind)
//! only where the native mechanism differs (trash locations, Finder vs.
//! Explorer, `open` vs. `xdg-open`); everything else is portable Rust.
pub mod delete_files;
pub mod docker_clean;
pub mod empty_trash;
pub mod git_backup;
pub mod hidden_files;
pub mod ll;
pub mod ncu_update_all;
pub mod o;
pub mod org_by_date;
pub mod path;
pub mod s;

use std::path::{Path, PathBuf};

use crate::context::Context;
use crate::error::ScriptError;
use crate::exec::ExecResult;

/// Error for a platform the script has no implementation for.
pub(crate) fn unsupported(script: &'static str, ctx: &Context) -> ScriptError {
    ScriptError::Unsupported {
        script,
        platform: ctx.platform.kind.to_string(),
    }
}

/// Resolve the directory a script operates on (default: the working
/// directory) and make sure it exists.
pub(crate) fn target_dir(script: &'static str, dir: Option<&Path>) -> Result<PathBuf, ScriptError> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir().map_err(|source| ScriptError::Io {
            script,
            path: PathBuf::from("."),
            source,
        })?,
    };
    if !dir.is_dir() {
        return Err(ScriptError::InvalidPath {
            script,
            path: dir,
            reason: "not a directory",
        });
    }
    dunce::canonicalize(&dir).map_err(|source| ScriptError::Io {
        script,
        path: dir,
        source,
    })
}

/// Fail unless `tool` is on `PATH`.
pub(crate) fn require_tool(
    ctx: &Context,
    script: &'static str,
    tool: &'static str,
    hint: &'static str,
) -> Result<(), ScriptError> {
    if ctx.executor.command_exists(tool) {
        Ok(())
    } else {
        Err(ScriptError::ToolMissing { script, tool, hint })
    }
}

/// Run a command that must succeed.
pub(crate) fn checked(
    ctx: &Context,
    script: &'static str,
    program: &str,
    args: &[&str],
) -> Result<ExecResult, ScriptError> {
    let result = ctx.executor.run_unchecked(program, args)?;
    if result.success {
        return Ok(result);
    }
    Err(ScriptError::CommandFailed {
        script,
        command: std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" "),
        stderr: result.stderr.trim().to_string(),
    })
}

/// Map an I/O error on `path` into a [`ScriptError::Io`].
pub(crate) fn io_error(
    script: &'static str,
    path: &Path,
) -> impl FnOnce(std::io::Error) -> ScriptError {
    let path = path.to_path_buf();
    move |source| ScriptError::Io {
        script,
        path,
        source,
    }
}
