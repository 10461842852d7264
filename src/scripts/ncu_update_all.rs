//! `ncu-update-all`: bump dependency ranges in every `package.json` below a
//! directory with `npm-check-updates`.
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::context::Context;
use crate::error::ScriptError;

const SCRIPT: &str = "ncu-update-all";

/// Directories under `root` that contain a `package.json`, excluding
/// anything inside `node_modules`.
#[must_use]
pub fn package_dirs(root: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != "node_modules")
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() == "package.json")
        .filter_map(|e| e.path().parent().map(Path::to_path_buf))
        .collect();
    dirs.sort();
    dirs
}

/// Run `ncu -u` in every package directory under `dir`.
///
/// A failing project is reported and skipped.  Returns the directories that
/// were updated.
///
/// # Errors
///
/// Returns [`ScriptError::ToolMissing`] when `ncu` is not installed.
pub fn run(ctx: &Context, dir: Option<&Path>) -> Result<Vec<PathBuf>, ScriptError> {
    let root = super::target_dir(SCRIPT, dir)?;
    super::require_tool(ctx, SCRIPT, "ncu", "npm install -g npm-check-updates")?;

    let mut updated = Vec::new();
    for project in package_dirs(&root) {
        ctx.log.stage(&project.display().to_string());
        let result = ctx.executor.run_in(&project, "ncu", &["-u"])?;
        if result.success {
            let out = result.stdout.trim();
            if !out.is_empty() {
                ctx.log.info(out);
            }
            updated.push(project);
        } else {
            ctx.log.warn(&format!(
                "ncu failed in {} (exit {}): {}",
                project.display(),
                result.exit_code(),
                result.stderr.trim()
            ));
        }
    }
    ctx.log
        .info(&format!("updated {} project(s); run npm install in each", updated.len()));
    Ok(updated)
}
