//! Dispatch for the shell-replacement scripts.
//!
//! Scripts log their own progress; listings (`path`, `s`, `ll`) go to stdout
//! so they can be piped.
use anyhow::Result;

use crate::cli::ScriptCommand;
use crate::context::Context;
use crate::scripts::{
    delete_files, docker_clean, empty_trash, git_backup, hidden_files, ll, ncu_update_all, o,
    org_by_date, path, s,
};

/// Run one script.
///
/// # Errors
///
/// Returns the script's [`ScriptError`](crate::error::ScriptError).
pub fn run(ctx: &Context, command: &ScriptCommand) -> Result<()> {
    match command {
        ScriptCommand::OrgByDate { path } => {
            org_by_date::run(ctx, path.as_deref())?;
        }
        ScriptCommand::DeleteFiles { pattern, path } => {
            delete_files::run(ctx, pattern.as_deref(), path.as_deref())?;
        }
        ScriptCommand::Path => {
            for entry in path::entries(ctx) {
                ctx.log.output(&entry.to_string());
            }
        }
        ScriptCommand::DockerClean { force } => {
            docker_clean::run(ctx, *force)?;
        }
        ScriptCommand::EmptyTrash => {
            empty_trash::run(ctx)?;
        }
        ScriptCommand::ShowHiddenFiles => hidden_files::set_visible(ctx, true)?,
        ScriptCommand::HideHiddenFiles => hidden_files::set_visible(ctx, false)?,
        ScriptCommand::GitBackup { target, repo_url } => {
            match git_backup::run(ctx, Some(target.as_path()), repo_url.as_deref())? {
                git_backup::BackupOutcome::Created(archive) => {
                    ctx.log.output(&archive.display().to_string());
                }
                git_backup::BackupOutcome::Unchanged(archive) => {
                    ctx.log
                        .info(&format!("latest archive: {}", archive.display()));
                }
            }
        }
        ScriptCommand::NcuUpdateAll { path } => {
            ncu_update_all::run(ctx, path.as_deref())?;
        }
        ScriptCommand::S { pattern, path } => {
            for line in s::run(ctx, Some(pattern), path.as_deref())? {
                ctx.log.output(&line);
            }
        }
        ScriptCommand::O { target } => o::run(ctx, target.as_deref())?,
        ScriptCommand::Ll { path } => {
            for line in ll::run(ctx, path.as_deref())? {
                ctx.log.output(&line);
            }
        }
    }
    Ok(())
}
