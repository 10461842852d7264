//! `ll`: long directory listing.
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::context::Context;
use crate::error::ScriptError;
use crate::platform::PlatformKind;

const SCRIPT: &str = "ll";

/// List `dir` (default: the working directory) in long form.
///
/// Unix-like hosts use `ls -lah`; Windows gets a portable listing with the
/// same columns that matter (type, size, modification time, name).
///
/// # Errors
///
/// Returns [`ScriptError::InvalidPath`] for a bad directory,
/// [`ScriptError::CommandFailed`] if `ls` fails, and [`ScriptError::Io`] if
/// the directory cannot be read.
pub fn run(ctx: &Context, dir: Option<&Path>) -> Result<Vec<String>, ScriptError> {
    let dir = super::target_dir(SCRIPT, dir)?;
    match ctx.platform.kind {
        PlatformKind::Macos
        | PlatformKind::Ubuntu
        | PlatformKind::Debian
        | PlatformKind::Raspbian
        | PlatformKind::AmazonLinux
        | PlatformKind::Rhel
        | PlatformKind::Fedora
        | PlatformKind::Wsl
        | PlatformKind::GitBash
        | PlatformKind::Linux
            if ctx.executor.command_exists("ls") =>
        {
            let dir_arg = dir.to_string_lossy();
            let result = super::checked(ctx, SCRIPT, "ls", &["-lah", &dir_arg])?;
            Ok(result.stdout.lines().map(str::to_string).collect())
        }
        PlatformKind::Macos
        | PlatformKind::Ubuntu
        | PlatformKind::Debian
        | PlatformKind::Raspbian
        | PlatformKind::AmazonLinux
        | PlatformKind::Rhel
        | PlatformKind::Fedora
        | PlatformKind::Wsl
        | PlatformKind::GitBash
        | PlatformKind::Linux
        | PlatformKind::Windows
        | PlatformKind::Unknown => listing(&dir),
    }
}

/// Portable listing, dot-files included, sorted by name.
///
/// # Errors
///
/// Returns [`ScriptError::Io`] if the directory cannot be read.
pub fn listing(dir: &Path) -> Result<Vec<String>, ScriptError> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(super::io_error(SCRIPT, dir))?
        .filter_map(Result::ok)
        .collect();
    entries.sort_by_key(fs::DirEntry::file_name);

    let mut lines = Vec::with_capacity(entries.len());
    for entry in entries {
        let path = entry.path();
        let meta = fs::symlink_metadata(&path).map_err(super::io_error(SCRIPT, &path))?;
        let kind = if meta.is_symlink() {
            'l'
        } else if meta.is_dir() {
            'd'
        } else {
            '-'
        };
        let modified = meta
            .modified()
            .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| "-".repeat(16));
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if meta.is_dir() {
            name.push('/');
        }
        lines.push(format!("{kind} {:>6} {modified} {name}", human_size(meta.len())));
    }
    Ok(lines)
}

/// `ls -h` style size: `512B`, `1.5K`, `12M`.
#[must_use]
pub fn human_size(bytes: u64) -> String {
    const UNITS: [char; 5] = ['K', 'M', 'G', 'T', 'P'];
    if bytes < 1024 {
        return format!("{bytes}B");
    }
    #[allow(clippy::cast_precision_loss)]
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 'K';
    for next in UNITS.iter().skip(1) {
        if size < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = *next;
    }
    if size < 10.0 {
        format!("{size:.1}{unit}")
    } else {
        format!("{size:.0}{unit}")
    }
}
