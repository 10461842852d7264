//! `devutils install <tool>` and `devutils install --list`.
use anyhow::{Result, bail};

use crate::cli::InstallOpts;
use crate::context::Context;
use crate::installers::{self, InstallOutcome};

/// One line per tool: name, description, and availability on this host.
#[must_use]
pub fn list_lines(ctx: &Context) -> Vec<String> {
    installers::all_tools()
        .iter()
        .map(|tool| {
            let note = if !installers::supports(tool.as_ref(), ctx.platform.kind) {
                format!(" (not available for {})", ctx.platform.kind)
            } else if !installers::is_eligible(tool.as_ref(), ctx) {
                " (requires a desktop)".to_string()
            } else {
                String::new()
            };
            format!("{:<18} {}{note}", tool.name(), tool.description())
        })
        .collect()
}

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the tool name is unknown or the installer fails; an
/// [`InstallError`](crate::error::InstallError) is preserved so `main` can
/// print its hint.
pub fn run(ctx: &Context, opts: &InstallOpts) -> Result<()> {
    let Some(name) = opts.tool.as_deref().filter(|_| !opts.list) else {
        for line in list_lines(ctx) {
            ctx.log.output(&line);
        }
        return Ok(());
    };
    let Some(tool) = installers::find_tool(name) else {
        let names: Vec<&str> = installers::all_tools().iter().map(|t| t.name()).collect();
        bail!("unknown tool: {name}\navailable: {}", names.join(", "));
    };

    ctx.log.stage(&format!("Installing {name}"));
    let outcome = installers::install(tool.as_ref(), ctx)?;
    if outcome == InstallOutcome::InstalledUnverified {
        ctx.log.warn(&format!(
            "{name} may need a new shell session before it is on your PATH"
        ));
    }
    ctx.log.debug(&format!("{name}: {outcome}"));
    Ok(())
}
