//! Subcommand orchestration.
//!
//! Each module exposes a `run` function that takes a [`Context`] (or just a
//! logger, for commands that never touch the host) and returns
//! `anyhow::Result`; `main` maps the error to the exit status.
pub mod completion;
pub mod configure;
pub mod install;
pub mod scripts;
pub mod setup;
pub mod status;
pub mod version;

use std::sync::Arc;

use anyhow::Result;

use crate::context::Context;
use crate::exec::SystemExecutor;
use crate::logging::Log;

/// Detect the platform and build a context that runs real commands.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn system_context(log: Arc<dyn Log>) -> Result<Context> {
    Ok(Context::new(log, Arc::new(SystemExecutor))?)
}
