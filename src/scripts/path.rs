//! `path`: list `PATH` entries and flag the missing ones.
use std::fmt;
use std::path::PathBuf;

use crate::context::Context;

/// One `PATH` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    /// Directory as written in `PATH`.
    pub dir: PathBuf,
    /// Whether the directory exists.
    pub exists: bool,
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exists {
            write!(f, "  {}", self.dir.display())
        } else {
            write!(f, "✗ {} (missing)", self.dir.display())
        }
    }
}

/// `PATH` entries in search order; empty segments are dropped.
#[must_use]
pub fn entries(ctx: &Context) -> Vec<PathEntry> {
    let Some(path) = ctx.env("PATH") else {
        ctx.log.warn("PATH is not set");
        return Vec::new();
    };
    std::env::split_paths(&path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| PathEntry {
            exists: ctx.path_exists(&dir),
            dir,
        })
        .collect()
}
