//! `devutils` binary: parse arguments, set up logging, dispatch.
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use devutils_cli::cli::{Cli, Command};
use devutils_cli::commands;
use devutils_cli::error::InstallError;
use devutils_cli::logging::{self, Log, Logger};

fn dispatch(command: &Command, logger: &Arc<Logger>) -> Result<()> {
    let log: Arc<dyn Log> = Arc::clone(logger) as Arc<dyn Log>;
    match command {
        Command::Version => commands::version::run(log.as_ref()),
        Command::Configure(opts) => {
            commands::configure::run(&commands::system_context(log)?, opts)
        }
        Command::Setup(opts) => {
            commands::setup::run(&commands::system_context(log)?, logger, opts)
        }
        Command::Status => commands::status::run(&commands::system_context(log)?),
        Command::Install(opts) => {
            commands::install::run(&commands::system_context(log)?, opts)
        }
        Command::Completion(opts) => {
            commands::completion::run(&commands::system_context(log)?, &opts.action)
        }
        Command::Script(script) => {
            commands::scripts::run(&commands::system_context(log)?, script)
        }
    }
}

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init_subscriber(args.verbose, args.command.log_name());
    let logger = Arc::new(Logger::new(args.command.log_name()));

    match dispatch(&args.command, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger.error(&format!("{e:#}"));
            if let Some(install) = e.downcast_ref::<InstallError>() {
                logger.info(&install.hint());
            }
            ExitCode::FAILURE
        }
    }
}
