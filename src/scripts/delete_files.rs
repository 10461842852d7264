//! `delete-files`: recursively delete files matching a name glob.
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::context::Context;
use crate::error::ScriptError;

const SCRIPT: &str = "delete-files";

/// Pattern used when none is given.
pub const DEFAULT_PATTERN: &str = ".DS_Store";

/// Translate a `*`/`?` file-name glob into an anchored regex.
#[must_use]
pub fn glob_to_regex(glob: &str) -> String {
    let mut re = String::with_capacity(glob.len() + 2);
    re.push('^');
    for c in glob.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    re
}

/// Delete every file under `dir` whose name matches `pattern`.
///
/// Unreadable directories are logged and skipped.  Returns the deleted paths.
///
/// # Errors
///
/// Returns [`ScriptError::InvalidPath`] for a bad directory and
/// [`ScriptError::Io`] when a matching file cannot be removed.
pub fn run(
    ctx: &Context,
    pattern: Option<&str>,
    dir: Option<&Path>,
) -> Result<Vec<PathBuf>, ScriptError> {
    let dir = super::target_dir(SCRIPT, dir)?;
    let pattern = pattern.unwrap_or(DEFAULT_PATTERN);
    let matcher = Regex::new(&glob_to_regex(pattern)).map_err(|_| ScriptError::InvalidPath {
        script: SCRIPT,
        path: PathBuf::from(pattern),
        reason: "invalid pattern",
    })?;

    let mut deleted = Vec::new();
    for entry in WalkDir::new(&dir).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                ctx.log.warn(&format!("skipping: {e}"));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry.file_name().to_str().is_some_and(|n| matcher.is_match(n)) {
            continue;
        }
        fs::remove_file(entry.path()).map_err(super::io_error(SCRIPT, entry.path()))?;
        ctx.log.debug(&format!("deleted {}", entry.path().display()));
        deleted.push(entry.into_path());
    }

    ctx.log
        .info(&format!("deleted {} file(s) matching {pattern}", deleted.len()));
    Ok(deleted)
}
