//! `devutils completion install|uninstall|script`.
use std::io;

use anyhow::{Result, bail};
use clap::CommandFactory as _;

use crate::cli::{Cli, CompletionAction};
use crate::completion::{self, CompletionChange, CompletionShell};
use crate::context::Context;

/// The shell to configure: the override, else the one named by `SHELL`.
///
/// # Errors
///
/// Returns an error when no override is given and `SHELL` is unset or names
/// an unsupported shell.
pub fn resolve_shell(ctx: &Context, shell: Option<CompletionShell>) -> Result<CompletionShell> {
    if let Some(shell) = shell {
        return Ok(shell);
    }
    let Some(value) = ctx.env("SHELL") else {
        bail!("SHELL is not set; pass --shell bash|zsh|fish");
    };
    match CompletionShell::from_shell_path(&value) {
        Some(shell) => Ok(shell),
        None => bail!("unsupported shell `{value}`; pass --shell bash|zsh|fish"),
    }
}

fn report(ctx: &Context, change: &CompletionChange) {
    match change {
        CompletionChange::Installed(rc) => {
            ctx.log
                .info(&format!("completion added to {}", rc.display()));
            ctx.log.info(&format!(
                "open a new shell or run `source {}` to enable it",
                rc.display()
            ));
        }
        CompletionChange::AlreadyInstalled(rc) => ctx
            .log
            .info(&format!("completion is already installed in {}", rc.display())),
        CompletionChange::Removed(rc) => ctx
            .log
            .info(&format!("completion removed from {}", rc.display())),
        CompletionChange::NotInstalled(rc) => ctx
            .log
            .info(&format!("completion is not installed in {}", rc.display())),
    }
}

/// Run the completion command.
///
/// # Errors
///
/// Returns an error if the shell cannot be determined or the rc file cannot
/// be read or written.
pub fn run(ctx: &Context, action: &CompletionAction) -> Result<()> {
    match action {
        CompletionAction::Install { shell } => {
            let shell = resolve_shell(ctx, *shell)?;
            let change = completion::install_completion(&ctx.home, shell)?;
            report(ctx, &change);
        }
        CompletionAction::Uninstall { shell } => {
            let shell = resolve_shell(ctx, *shell)?;
            let change = completion::uninstall_completion(&ctx.home, shell)?;
            report(ctx, &change);
        }
        CompletionAction::Script { shell } => {
            completion::generate_script(*shell, &mut Cli::command(), &mut io::stdout());
        }
    }
    Ok(())
}
