//! `git-backup`: timestamped zip archives of a mirror clone.
//!
//! The repository is cloned with `git clone --mirror` into a staging folder
//! inside the target, its `HEAD` commit is compared against the one recorded
//! in the newest existing archive, and a new
//! `<name>-YYYYMMDD-HHMMSS.zip` (mirror plus `README.md`) is written only when
//! the two differ.
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{Local, Utc};
use git2::Repository;
use regex::Regex;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::context::Context;
use crate::error::ScriptError;

const SCRIPT: &str = "git-backup";
const USAGE: &str = "devutils git-backup <target-folder> [repo-url]";
const README: &str = "README.md";

static HEAD_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^Head: ([0-9a-f]{40,64})\s*$").ok());

/// Result of a backup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// A new archive was written.
    Created(PathBuf),
    /// The newest archive already holds the current `HEAD`.
    Unchanged(PathBuf),
}

/// Back up `url` (default: `origin` of the repository containing the working
/// directory) into `target`.
///
/// # Errors
///
/// Returns [`ScriptError::MissingArgument`] without a target or resolvable
/// URL, [`ScriptError::ToolMissing`] without `git`,
/// [`ScriptError::CommandFailed`] if the clone fails, and
/// [`ScriptError::Git`]/[`ScriptError::Archive`]/[`ScriptError::Io`] for
/// repository and archive errors.
pub fn run(
    ctx: &Context,
    target: Option<&Path>,
    url: Option<&str>,
) -> Result<BackupOutcome, ScriptError> {
    let Some(target) = target else {
        return Err(ScriptError::MissingArgument {
            script: SCRIPT,
            usage: USAGE,
        });
    };
    let url = match url {
        Some(u) => u.to_string(),
        None => origin_url()?,
    };
    super::require_tool(ctx, SCRIPT, "git", "run `devutils install git` first")?;

    fs::create_dir_all(target).map_err(super::io_error(SCRIPT, target))?;
    let target = super::target_dir(SCRIPT, Some(target))?;
    let name = repo_name(&url);
    let staging = target.join(format!(".{name}.git.partial"));
    remove_staging(&staging)?;

    ctx.log.info(&format!("cloning {url}"));
    let staging_arg = staging.to_string_lossy();
    let cloned = super::checked(
        ctx,
        SCRIPT,
        "git",
        &["clone", "--mirror", "--quiet", &url, &staging_arg],
    );
    let outcome = cloned.and_then(|_| archive_mirror(ctx, &staging, &target, &name, &url));
    remove_staging(&staging)?;
    outcome
}

/// Archive an existing mirror clone unless the newest archive has the same
/// `HEAD`.
pub(crate) fn archive_mirror(
    ctx: &Context,
    mirror: &Path,
    target: &Path,
    name: &str,
    url: &str,
) -> Result<BackupOutcome, ScriptError> {
    let head = head_of(mirror)?;
    ctx.log.debug(&format!("{name} HEAD is {head}"));

    if let Some(previous) = newest_archive(target, name)?
        && archived_head(&previous)?.as_deref() == Some(head.as_str())
    {
        ctx.log.info(&format!(
            "no changes since {}, skipping",
            previous.display()
        ));
        return Ok(BackupOutcome::Unchanged(previous));
    }

    let file_name = format!("{name}-{}.zip", Local::now().format("%Y%m%d-%H%M%S"));
    let archive = target.join(&file_name);
    let readme = readme(name, url, &head, &file_name);
    write_archive(mirror, &archive, name, &readme)?;
    ctx.log.info(&format!("wrote {}", archive.display()));
    Ok(BackupOutcome::Created(archive))
}

/// `origin` URL of the repository containing the working directory.
fn origin_url() -> Result<String, ScriptError> {
    let missing = || ScriptError::MissingArgument {
        script: SCRIPT,
        usage: USAGE,
    };
    let repo = Repository::discover(".").map_err(|_| missing())?;
    let remote = repo.find_remote("origin").map_err(|_| missing())?;
    remote.url().map(str::to_string).ok_or_else(missing)
}

/// Repository name from a clone URL:
/// `git@github.com:me/tools.git` and `https://host/me/tools` both give `tools`.
#[must_use]
pub fn repo_name(url: &str) -> String {
    let trimmed = url.trim_end_matches(['/', '\\']);
    let last = trimmed
        .rsplit(['/', '\\', ':'])
        .next()
        .unwrap_or(trimmed);
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        "repository".to_string()
    } else {
        name.to_string()
    }
}

fn head_of(mirror: &Path) -> Result<String, ScriptError> {
    let git = |source| ScriptError::Git {
        script: SCRIPT,
        source,
    };
    let repo = Repository::open_bare(mirror).map_err(git)?;
    let commit = repo.head().and_then(|h| h.peel_to_commit()).map_err(git)?;
    Ok(commit.id().to_string())
}

/// Newest `<name>-YYYYMMDD-HHMMSS.zip` in `dir`.
fn newest_archive(dir: &Path, name: &str) -> Result<Option<PathBuf>, ScriptError> {
    let Ok(pattern) = Regex::new(&format!(r"^{}-\d{{8}}-\d{{6}}\.zip$", regex::escape(name))) else {
        return Ok(None);
    };
    let newest = fs::read_dir(dir)
        .map_err(super::io_error(SCRIPT, dir))?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| pattern.is_match(n))
        })
        .max();
    Ok(newest)
}

/// `HEAD` recorded in an archive's README, if any.
fn archived_head(archive: &Path) -> Result<Option<String>, ScriptError> {
    let zip_err = |source| ScriptError::Archive {
        script: SCRIPT,
        path: archive.to_path_buf(),
        source,
    };
    let file = File::open(archive).map_err(super::io_error(SCRIPT, archive))?;
    let mut zip = ZipArchive::new(file).map_err(zip_err)?;
    let mut text = String::new();
    match zip.by_name(README) {
        Ok(mut entry) => {
            entry
                .read_to_string(&mut text)
                .map_err(super::io_error(SCRIPT, archive))?;
        }
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(zip_err(e)),
    }
    Ok(HEAD_LINE
        .as_ref()
        .and_then(|re| re.captures(&text))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string()))
}

fn readme(name: &str, url: &str, head: &str, file_name: &str) -> String {
    format!(
        "# {name} backup\n\n\
         Source: {url}\n\
         Head: {head}\n\
         Created: {}\n\n\
         Restore with:\n\n\
         \x20   unzip {file_name}\n\
         \x20   git clone {name}.git {name}\n",
        Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ")
    )
}

/// Zip the mirror under `<name>.git/` plus a top-level README.
fn write_archive(
    mirror: &Path,
    archive: &Path,
    name: &str,
    readme: &str,
) -> Result<(), ScriptError> {
    let zip_err = |source| ScriptError::Archive {
        script: SCRIPT,
        path: archive.to_path_buf(),
        source,
    };
    let file = File::create(archive).map_err(super::io_error(SCRIPT, archive))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(README, options).map_err(zip_err)?;
    zip.write_all(readme.as_bytes())
        .map_err(super::io_error(SCRIPT, archive))?;

    for entry in WalkDir::new(mirror).sort_by_file_name() {
        let entry = entry.map_err(|e| ScriptError::Io {
            script: SCRIPT,
            path: mirror.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(mirror) else {
            continue;
        };
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        zip.start_file(format!("{name}.git/{rel}"), options)
            .map_err(zip_err)?;
        let mut src = File::open(entry.path()).map_err(super::io_error(SCRIPT, entry.path()))?;
        io::copy(&mut src, &mut zip).map_err(super::io_error(SCRIPT, entry.path()))?;
    }
    zip.finish().map_err(zip_err)?;
    Ok(())
}

fn remove_staging(staging: &Path) -> Result<(), ScriptError> {
    if staging.exists() {
        fs::remove_dir_all(staging).map_err(super::io_error(SCRIPT, staging))?;
    }
    Ok(())
}
