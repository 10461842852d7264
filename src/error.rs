//! Domain-specific error types for devutils.
//!
//! Internal modules return typed errors built with [`thiserror`], while the
//! command handlers at the CLI boundary convert them to [`anyhow::Error`] via
//! the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DevutilsError
//! ├── Config(ConfigError)   ~/.devutils load/save/validation, rc files
//! ├── Exec(ExecError)       spawning native tools
//! ├── Install(InstallError) installer prerequisites, repository setup, commands
//! └── Script(ScriptError)   shell-replacement script failures
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for devutils.
#[derive(Error, Debug)]
pub enum DevutilsError {
    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A native command could not be executed.
    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),

    /// A tool installation failed.
    #[error("Install error: {0}")]
    Install(#[from] InstallError),

    /// A shell-replacement script failed.
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),
}

/// Errors that arise from the developer profile config and rc files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither `HOME` nor `USERPROFILE` is set.
    #[error("cannot determine home directory: neither HOME nor USERPROFILE is set")]
    MissingHome,

    /// An I/O error occurred while reading or writing a file.
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path of the file being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid JSON for the expected schema.
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A field failed validation.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}

/// Errors that prevent a native command from producing a result.
///
/// A command that runs and exits non-zero is *not* an `ExecError` for the
/// unchecked executor methods; callers branch on
/// [`ExecResult::success`](crate::exec::ExecResult::success) instead.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The program is not on `PATH`.
    #[error("command not found: {program}")]
    NotFound {
        /// Program that was looked up.
        program: String,
    },

    /// The process could not be spawned or its output could not be read.
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The process did not finish within its timeout and was killed.
    #[error("{program} timed out after {seconds}s")]
    TimedOut {
        /// Program that was invoked.
        program: String,
        /// Timeout that elapsed, in seconds.
        seconds: u64,
    },

    /// The process exited non-zero (checked execution only).
    #[error("{program} failed (exit {code}): {stderr}")]
    Failed {
        /// Program that was invoked.
        program: String,
        /// Exit code, or `-1` when terminated by a signal.
        code: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

/// Errors that end an installer run in a failure state.
#[derive(Error, Debug)]
pub enum InstallError {
    /// A required package manager or helper tool is absent.
    #[error("{tool}: {prerequisite} is required but not installed")]
    PrerequisiteMissing {
        /// Tool being installed.
        tool: String,
        /// Missing prerequisite (e.g. `Homebrew`, `curl`).
        prerequisite: String,
        /// How to install the prerequisite.
        hint: String,
    },

    /// Repository, keyring or source-list setup failed.
    #[error("{tool}: repository setup failed: {reason}")]
    RepositorySetup {
        /// Tool being installed.
        tool: String,
        /// What went wrong.
        reason: String,
    },

    /// The install command itself exited non-zero.
    #[error("{tool}: `{command}` failed (exit {code})")]
    CommandFailed {
        /// Tool being installed.
        tool: String,
        /// Command line that failed.
        command: String,
        /// Exit code, or `-1` when unknown.
        code: i32,
        /// Combined stdout/stderr of the failed command.
        output: String,
    },

    /// A native command could not be spawned at all.
    #[error(transparent)]
    Exec(#[from] ExecError),
}

impl InstallError {
    /// Remediation text shown to the user alongside the error.
    #[must_use]
    pub fn hint(&self) -> String {
        match self {
            Self::PrerequisiteMissing { hint, .. } => hint.clone(),
            Self::RepositorySetup { tool, .. } => format!(
                "check your network connection and that sudo is available, then re-run `devutils install {tool}`"
            ),
            Self::CommandFailed { output, .. } => {
                let output = output.trim();
                if output.is_empty() {
                    "re-run the command manually to see the full output".to_string()
                } else {
                    format!("command output:\n{output}")
                }
            }
            Self::Exec(ExecError::NotFound { program }) => {
                format!("make sure `{program}` is installed and on your PATH")
            }
            Self::Exec(_) => "re-run with --verbose for more detail".to_string(),
        }
    }
}

/// Errors raised by the shell-replacement scripts.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// A required argument was not supplied.
    #[error("{script}: missing argument\nusage: {usage}")]
    MissingArgument {
        /// Script name.
        script: &'static str,
        /// Usage line.
        usage: &'static str,
    },

    /// The script has no implementation for the detected platform.
    #[error("{script} is not available for {platform}")]
    Unsupported {
        /// Script name.
        script: &'static str,
        /// Detected platform identifier.
        platform: String,
    },

    /// A path argument does not exist or is not of the expected kind.
    #[error("{script}: {reason}: {path}")]
    InvalidPath {
        /// Script name.
        script: &'static str,
        /// Offending path.
        path: PathBuf,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A native tool the script shells out to is not installed.
    #[error("{script}: {tool} is not installed ({hint})")]
    ToolMissing {
        /// Script name.
        script: &'static str,
        /// Missing tool.
        tool: &'static str,
        /// How to install it.
        hint: &'static str,
    },

    /// A native command exited non-zero.
    #[error("{script}: `{command}` failed: {stderr}")]
    CommandFailed {
        /// Script name.
        script: &'static str,
        /// Command line that failed.
        command: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// Filesystem error while the script manipulated files.
    #[error("{script}: {path}: {source}")]
    Io {
        /// Script name.
        script: &'static str,
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A git repository operation failed.
    #[error("{script}: git: {source}")]
    Git {
        /// Script name.
        script: &'static str,
        /// Underlying libgit2 error.
        source: git2::Error,
    },

    /// A zip archive could not be read or written.
    #[error("{script}: archive {path}: {source}")]
    Archive {
        /// Script name.
        script: &'static str,
        /// Archive path.
        path: PathBuf,
        /// Underlying zip error.
        source: zip::result::ZipError,
    },

    /// An interactive confirmation prompt failed.
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// A native command could not be spawned at all.
    #[error(transparent)]
    Exec(#[from] ExecError),
}
