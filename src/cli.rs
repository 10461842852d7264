//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::completion::CompletionShell;

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "devutils",
    about = "Developer machine bootstrap: tool installers and shell helpers",
    version = crate::commands::version::current()
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save your name, email and URL to ~/.devutils
    Configure(ConfigureOpts),
    /// Install the core developer toolchain for this platform
    Setup(SetupOpts),
    /// Show platform, profile, tool and version status
    Status,
    /// Print version information and check for updates
    Version,
    /// Install a single tool
    Install(InstallOpts),
    /// Manage shell completion
    Completion(CompletionOpts),
    /// Shell-replacement scripts, each its own top-level subcommand.
    #[command(flatten)]
    Script(ScriptCommand),
}

impl Command {
    /// Name used for the log file of this invocation.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::Setup(_) => "setup",
            Self::Status => "status",
            Self::Version => "version",
            Self::Install(_) => "install",
            Self::Completion(_) => "completion",
            Self::Script(_) => "script",
        }
    }
}

/// Options for the `configure` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigureOpts {
    /// Your full name
    #[arg(long)]
    pub name: Option<String>,

    /// Your email address
    #[arg(long)]
    pub email: Option<String>,

    /// Your personal or company URL
    #[arg(long)]
    pub url: Option<String>,

    /// Reconfigure even if a profile already exists
    #[arg(long)]
    pub force: bool,

    /// Print the current profile and exit
    #[arg(short, long, conflicts_with_all = ["name", "email", "url", "force"])]
    pub show: bool,
}

/// Options for the `setup` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct SetupOpts {
    /// Install without asking for confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Only report which tools are installed
    #[arg(long, conflicts_with = "force")]
    pub check: bool,
}

/// Options for the `install` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Tool to install (see --list)
    #[arg(required_unless_present = "list")]
    pub tool: Option<String>,

    /// List the installable tools
    #[arg(short, long, conflicts_with = "tool")]
    pub list: bool,
}

/// Options for the `completion` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CompletionOpts {
    /// What to do with the completion script.
    #[command(subcommand)]
    pub action: CompletionAction,
}

/// Shell completion actions.
#[derive(Subcommand, Debug, Clone)]
pub enum CompletionAction {
    /// Add completion to your shell's rc file
    Install {
        /// Shell to configure (default: from $SHELL)
        #[arg(long, value_enum)]
        shell: Option<CompletionShell>,
    },
    /// Remove completion from your shell's rc file
    Uninstall {
        /// Shell to configure (default: from $SHELL)
        #[arg(long, value_enum)]
        shell: Option<CompletionShell>,
    },
    /// Print the completion script for a shell
    Script {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Shell-replacement scripts.
#[derive(Subcommand, Debug, Clone)]
pub enum ScriptCommand {
    /// Move files named with a YYYY-MM-DD date into YYYY/MM/DD folders
    OrgByDate {
        /// Directory to organize (default: current directory)
        path: Option<PathBuf>,
    },
    /// Recursively delete files matching a name pattern
    DeleteFiles {
        /// File name glob, `*` and `?` supported (default: .DS_Store)
        pattern: Option<String>,
        /// Directory to clean (default: current directory)
        path: Option<PathBuf>,
    },
    /// List PATH entries and flag missing directories
    Path,
    /// Remove all Docker containers, images, volumes and networks
    DockerClean {
        /// Do not ask for confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Permanently delete the contents of the trash
    EmptyTrash,
    /// Show hidden files in the file manager
    ShowHiddenFiles,
    /// Hide hidden files in the file manager
    HideHiddenFiles,
    /// Archive a git repository into a timestamped zip
    GitBackup {
        /// Folder that receives the archives
        target: PathBuf,
        /// Repository to back up (default: origin of the current repository)
        repo_url: Option<String>,
    },
    /// Run `ncu -u` in every package.json directory
    NcuUpdateAll {
        /// Root directory (default: current directory)
        path: Option<PathBuf>,
    },
    /// Search file contents recursively
    S {
        /// Extended regular expression
        pattern: String,
        /// Directory to search (default: current directory)
        path: Option<PathBuf>,
    },
    /// Open a file, folder or URL with the default application
    O {
        /// What to open (default: current directory)
        target: Option<String>,
    },
    /// Long directory listing
    Ll {
        /// Directory to list (default: current directory)
        path: Option<PathBuf>,
    },
}
