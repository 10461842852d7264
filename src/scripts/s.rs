//! `s`: search file contents recursively.
//!
//! Uses `grep -rn` where available; otherwise a portable walker prints
//! matches in the same `path:line:text` form.
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::context::Context;
use crate::error::ScriptError;
use crate::platform::PlatformKind;

const SCRIPT: &str = "s";
const USAGE: &str = "devutils s <pattern> [path]";

/// Search for `pattern` (an extended regex) under `dir`.
///
/// Returns matching lines as `path:line:text`; no match is not an error.
///
/// # Errors
///
/// Returns [`ScriptError::MissingArgument`] without a pattern,
/// [`ScriptError::InvalidPath`] for a bad directory or pattern, and
/// [`ScriptError::CommandFailed`] if `grep` reports an error.
pub fn run(
    ctx: &Context,
    pattern: Option<&str>,
    dir: Option<&Path>,
) -> Result<Vec<String>, ScriptError> {
    let Some(pattern) = pattern.filter(|p| !p.is_empty()) else {
        return Err(ScriptError::MissingArgument {
            script: SCRIPT,
            usage: USAGE,
        });
    };
    let dir = super::target_dir(SCRIPT, dir)?;
    let use_grep = match ctx.platform.kind {
        PlatformKind::Macos
        | PlatformKind::Ubuntu
        | PlatformKind::Debian
        | PlatformKind::Raspbian
        | PlatformKind::AmazonLinux
        | PlatformKind::Rhel
        | PlatformKind::Fedora
        | PlatformKind::Wsl
        | PlatformKind::GitBash
        | PlatformKind::Linux => ctx.executor.command_exists("grep"),
        PlatformKind::Windows | PlatformKind::Unknown => false,
    };
    if use_grep {
        grep(ctx, pattern, &dir)
    } else {
        search(pattern, &dir)
    }
}

fn grep(ctx: &Context, pattern: &str, dir: &Path) -> Result<Vec<String>, ScriptError> {
    let dir_arg = dir.to_string_lossy();
    let result = ctx
        .executor
        .run_unchecked("grep", &["-rnIE", "--color=never", "--", pattern, &dir_arg])?;
    // grep exits 1 when nothing matched and 2 on errors.
    match result.code {
        Some(0 | 1) => Ok(result.stdout.lines().map(str::to_string).collect()),
        _ => Err(ScriptError::CommandFailed {
            script: SCRIPT,
            command: format!("grep -rnIE {pattern} {dir_arg}"),
            stderr: result.stderr.trim().to_string(),
        }),
    }
}

/// Portable search: text files only, in path order.
///
/// # Errors
///
/// Returns [`ScriptError::InvalidPath`] if `pattern` is not a valid regex.
pub fn search(pattern: &str, dir: &Path) -> Result<Vec<String>, ScriptError> {
    let re = Regex::new(pattern).map_err(|_| ScriptError::InvalidPath {
        script: SCRIPT,
        path: PathBuf::from(pattern),
        reason: "invalid pattern",
    })?;
    let mut matches = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let Ok(bytes) = fs::read(entry.path()) else {
            continue;
        };
        // Binary files are skipped, like `grep -I`.
        if bytes.contains(&0) {
            continue;
        }
        let text = String::from_utf8_lossy(&bytes);
        for (n, line) in text.lines().enumerate() {
            if re.is_match(line) {
                matches.push(format!("{}:{}:{line}", entry.path().display(), n + 1));
            }
        }
    }
    Ok(matches)
}
