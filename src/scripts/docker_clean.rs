//! `docker-clean`: remove every container, image, volume and custom network.
use dialoguer::Confirm;

use crate::context::Context;
use crate::error::ScriptError;

const SCRIPT: &str = "docker-clean";

/// Wipe the local Docker state.
///
/// Without `force` the user is asked to confirm; a non-interactive session
/// without `force` does nothing.  Returns whether the cleanup ran.
///
/// # Errors
///
/// Returns [`ScriptError::ToolMissing`] without `docker`, and
/// [`ScriptError::CommandFailed`] if a removal step fails (for example when
/// the daemon is not running).
pub fn run(ctx: &Context, force: bool) -> Result<bool, ScriptError> {
    super::require_tool(ctx, SCRIPT, "docker", "install Docker Desktop or the docker engine")?;

    if !force {
        if !ctx.interactive {
            ctx.log
                .warn("not a terminal; pass --force to clean without confirmation");
            return Ok(false);
        }
        let confirmed = Confirm::new()
            .with_prompt("Remove ALL Docker containers, images, volumes and networks?")
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.log.info("cancelled");
            return Ok(false);
        }
    }

    remove_listed(ctx, "containers", &["ps", "-aq"], &["rm", "-f"])?;
    remove_listed(ctx, "images", &["images", "-aq"], &["rmi", "-f"])?;
    remove_listed(ctx, "volumes", &["volume", "ls", "-q"], &["volume", "rm", "-f"])?;
    // Built-in networks (bridge, host, none) are never pruned.
    super::checked(ctx, SCRIPT, "docker", &["network", "prune", "-f"])?;
    ctx.log.info("docker cleaned");
    Ok(true)
}

/// List ids with `list`, then remove them all with `remove`.
fn remove_listed(
    ctx: &Context,
    what: &str,
    list: &[&str],
    remove: &[&str],
) -> Result<(), ScriptError> {
    let listed = super::checked(ctx, SCRIPT, "docker", list)?;
    let mut ids: Vec<&str> = listed.stdout.split_whitespace().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        ctx.log.debug(&format!("no {what} to remove"));
        return Ok(());
    }
    ctx.log.info(&format!("removing {} {what}", ids.len()));
    let args: Vec<&str> = remove.iter().copied().chain(ids).collect();
    super::checked(ctx, SCRIPT, "docker", &args)?;
    Ok(())
}
