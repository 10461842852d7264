//! `org-by-date`: file dated names into `YYYY/MM/DD/` folders.
//!
//! Only regular files directly inside the directory are considered.  A file
//! whose name contains `YYYY-MM-DD` is moved to `YYYY/MM/DD/<name>`; when
//! that target already exists the file is left where it is.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::context::Context;
use crate::error::ScriptError;

const SCRIPT: &str = "org-by-date";

static DATE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").ok());

/// What a run did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OrgReport {
    /// `(from, to)` for every moved file.
    pub moved: Vec<(PathBuf, PathBuf)>,
    /// Files left in place because the target already existed.
    pub skipped: Vec<PathBuf>,
}

/// Relative `YYYY/MM/DD` folder for the first date in `name`.
#[must_use]
pub fn date_folder(name: &str) -> Option<PathBuf> {
    let caps = DATE.as_ref()?.captures(name)?;
    let (year, month, day) = (caps.get(1)?, caps.get(2)?, caps.get(3)?);
    Some(
        [year.as_str(), month.as_str(), day.as_str()]
            .iter()
            .collect(),
    )
}

/// Organize the files in `dir` (default: the working directory).
///
/// # Errors
///
/// Returns [`ScriptError::InvalidPath`] if `dir` is not a directory and
/// [`ScriptError::Io`] if a folder cannot be created or a file moved.
pub fn run(ctx: &Context, dir: Option<&Path>) -> Result<OrgReport, ScriptError> {
    let dir = super::target_dir(SCRIPT, dir)?;
    let mut report = OrgReport::default();

    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .map_err(super::io_error(SCRIPT, &dir))?
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .map(|e| e.path())
        .collect();
    files.sort();

    for file in files {
        let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(folder) = date_folder(name) else {
            continue;
        };
        let folder = dir.join(folder);
        let target = folder.join(name);
        if target.exists() {
            ctx.log
                .warn(&format!("skipping {name}: {} already exists", target.display()));
            report.skipped.push(file);
            continue;
        }
        fs::create_dir_all(&folder).map_err(super::io_error(SCRIPT, &folder))?;
        fs::rename(&file, &target).map_err(super::io_error(SCRIPT, &file))?;
        ctx.log.debug(&format!("{} -> {}", file.display(), target.display()));
        report.moved.push((file, target));
    }

    ctx.log.info(&format!(
        "moved {} file(s), skipped {}",
        report.moved.len(),
        report.skipped.len()
    ));
    Ok(report)
}
