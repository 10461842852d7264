//! `devutils setup`: install the core toolchain in dependency order.
use anyhow::{Result, bail};
use dialoguer::Confirm;

use crate::cli::SetupOpts;
use crate::context::Context;
use crate::installers::{self, InstallOutcome, Installer};
use crate::logging::{Logger, ToolStatus};

/// Record the presence of each tool without installing anything.
pub fn check(ctx: &Context, tools: &[Box<dyn Installer>]) {
    for tool in tools {
        let tool = tool.as_ref();
        let status = if !installers::is_eligible(tool, ctx) {
            ToolStatus::NotAvailable
        } else if tool.is_installed(ctx) {
            ToolStatus::AlreadyInstalled
        } else {
            ToolStatus::Missing
        };
        ctx.log.record_tool(tool.name(), status, None);
    }
}

/// Tools that are eligible here but not yet installed.
#[must_use]
pub fn pending<'a>(ctx: &Context, tools: &'a [Box<dyn Installer>]) -> Vec<&'a dyn Installer> {
    tools
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| installers::is_eligible(*t, ctx) && !t.is_installed(ctx))
        .collect()
}

/// Install each tool in order, recording one summary entry per tool.
///
/// A failing tool does not stop the run; later tools that depend on it fail
/// with their own prerequisite error.
pub fn install_all(ctx: &Context, tools: &[Box<dyn Installer>]) {
    for tool in tools {
        let name = tool.name();
        ctx.log.stage(name);
        match installers::install(tool.as_ref(), ctx) {
            Ok(InstallOutcome::InstalledUnverified) => ctx.log.record_tool(
                name,
                ToolStatus::Unverified,
                Some("not found on PATH after install"),
            ),
            Ok(outcome) => ctx.log.record_tool(name, outcome.into(), None),
            Err(e) => {
                ctx.log.error(&e.to_string());
                ctx.log.info(&e.hint());
                ctx.log
                    .record_tool(name, ToolStatus::Failed, Some(&e.to_string()));
            }
        }
    }
}

fn confirmed(ctx: &Context, todo: &[&dyn Installer]) -> Result<bool> {
    let names: Vec<&str> = todo.iter().map(|t| t.name()).collect();
    ctx.log.info(&format!("will install: {}", names.join(", ")));
    Ok(Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()?)
}

/// Run the setup command.
///
/// # Errors
///
/// Returns an error if the confirmation prompt fails or any tool failed to
/// install.
pub fn run(ctx: &Context, log: &Logger, opts: &SetupOpts) -> Result<()> {
    ctx.log.stage(&format!("Setting up {}", ctx.platform));
    let tools = installers::setup_tools();

    if opts.check {
        check(ctx, &tools);
        log.print_summary();
        return Ok(());
    }

    let todo = pending(ctx, &tools);
    if todo.is_empty() {
        ctx.log.info("all tools are already installed");
    } else if ctx.interactive && !opts.force && !confirmed(ctx, &todo)? {
        ctx.log.info("setup cancelled");
        return Ok(());
    }

    install_all(ctx, &tools);
    log.print_summary();

    let failed = log.failure_count();
    if failed > 0 {
        bail!("{failed} tool(s) failed to install");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::context::test_helpers::context;
    use crate::exec::test_helpers::MockExecutor;
    use crate::installers::{curl::Curl, git::Git, tmux::Tmux, xcode_clt::XcodeClt};
    use crate::platform::PlatformKind;
    use std::sync::Arc;

    fn tools() -> Vec<Box<dyn Installer>> {
        vec![Box::new(XcodeClt), Box::new(Curl), Box::new(Git), Box::new(Tmux)]
    }

    #[test]
    fn check_records_without_installing() {
        let mock = Arc::new(MockExecutor::new().with_program("git"));
        let (ctx, log) = context(PlatformKind::Ubuntu, mock.clone());
        check(&ctx, &tools());
        let tools = log.tools();
        assert_eq!(tools.len(), 4);
        assert_eq!(tools[0], ("xcode-clt".to_string(), ToolStatus::NotAvailable));
        assert_eq!(tools[1], ("curl".to_string(), ToolStatus::Missing));
        assert_eq!(tools[2], ("git".to_string(), ToolStatus::AlreadyInstalled));
        assert_eq!(mock.count("sudo"), 0);
    }

    #[test]
    fn pending_skips_installed_and_ineligible() {
        let mock = Arc::new(MockExecutor::new().with_program("curl"));
        let (ctx, _log) = context(PlatformKind::Debian, mock);
        let all = tools();
        let names: Vec<&str> = pending(&ctx, &all).iter().map(|t| t.name()).collect();
        assert_eq!(names, ["git", "tmux"]);
    }

    #[test]
    fn install_all_maps_outcomes_and_continues_after_failure() {
        let mock = Arc::new(
            MockExecutor::new()
                .with_program("curl")
                .respond("curl --version", 0, "curl 8.5.0 (x86_64-pc-linux-gnu)\n")
                .respond("sudo apt-get update", 0, "")
                .respond("sudo apt-get install -y git", 100, "")
                .respond("sudo apt-get install -y tmux", 0, "")
                .provides("sudo apt-get install -y tmux", "tmux")
                .respond("tmux -V", 0, "tmux 3.4\n"),
        );
        let (ctx, log) = context(PlatformKind::Ubuntu, mock);
        install_all(&ctx, &tools());
        let statuses: Vec<ToolStatus> = log.tools().into_iter().map(|(_, s)| s).collect();
        assert_eq!(
            statuses,
            [
                ToolStatus::NotAvailable,
                ToolStatus::AlreadyInstalled,
                ToolStatus::Failed,
                ToolStatus::Installed,
            ]
        );
        assert!(log.contains("git: `sudo apt-get install -y git` failed (exit 100)"));
    }
}
