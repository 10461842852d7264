//! `devutils status`: what this machine looks like to devutils.
use anyhow::Result;

use super::version;
use crate::config;
use crate::context::Context;
use crate::installers::{self, Installer};
use crate::logging::ToolStatus;

/// Classify `tool` on the current host: installed, missing, or not available.
#[must_use]
pub fn tool_state(tool: &dyn Installer, ctx: &Context) -> ToolStatus {
    if tool.is_installed(ctx) {
        ToolStatus::AlreadyInstalled
    } else if installers::is_eligible(tool, ctx) {
        ToolStatus::Missing
    } else {
        ToolStatus::NotAvailable
    }
}

/// Log the platform, profile and tool table.
///
/// # Errors
///
/// Returns an error if `~/.devutils` exists but cannot be read or parsed.
pub fn report(ctx: &Context) -> Result<()> {
    ctx.log.stage("Platform");
    ctx.log.info(&format!("platform: {}", ctx.platform));
    ctx.log.info(&format!(
        "desktop: {}",
        if ctx.desktop_available() { "yes" } else { "no" }
    ));

    ctx.log.stage("Profile");
    let path = config::config_path(&ctx.home);
    match config::load(&path)? {
        Some(cfg) => {
            ctx.log
                .info(&format!("user: {} <{}>", cfg.user.name, cfg.user.email));
            if let Some(url) = &cfg.user.url {
                ctx.log.info(&format!("url: {url}"));
            }
            ctx.log.info(&format!("updated: {}", cfg.updated));
        }
        None => ctx
            .log
            .warn("not configured, run `devutils configure` to set your name and email"),
    }

    ctx.log.stage("Tools");
    for tool in installers::all_tools() {
        let state = tool_state(tool.as_ref(), ctx);
        ctx.log
            .info(&format!("{} {:<18} {state}", state.icon(), tool.name()));
    }
    Ok(())
}

/// Run the status command.
///
/// # Errors
///
/// Returns an error if the profile cannot be read.
pub fn run(ctx: &Context) -> Result<()> {
    report(ctx)?;
    ctx.log.stage("Version");
    ctx.log.info(&format!(
        "devutils {} ({})",
        version::current(),
        version::target()
    ));
    version::report_update(ctx.log.as_ref());
    Ok(())
}
