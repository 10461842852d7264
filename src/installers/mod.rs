//! Per-tool installers dispatched on the detected platform.
//!
//! Every tool maps each [`PlatformKind`] to an optional install function with
//! an exhaustive `match`, so adding a platform variant forces a decision in
//! every installer.  Install functions follow the same sequence: presence
//! probe, prerequisite checks, repository setup, install command, and
//! post-install verification.
pub mod bash;
pub mod brave_browser;
pub mod curl;
pub mod git;
pub mod homebrew;
pub mod node;
pub mod parallels_desktop;
pub mod tmux;
pub mod xcode_clt;
pub mod zsh;

use std::fmt;
use std::path::Path;

use crate::context::Context;
use crate::error::InstallError;
use crate::exec::ExecResult;
use crate::logging::ToolStatus;
use crate::packages::{self, PackageManager, PackageOptions};
use crate::platform::PlatformKind;
use crate::version::VersionParser;

/// Platform-specific install function.
pub type InstallFn = fn(&Context) -> Result<InstallOutcome, InstallError>;

/// Terminal success states of an installer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The tool was already present; only probes ran.
    AlreadyInstalled,
    /// Installed and confirmed by a post-install probe.
    Installed,
    /// The install command succeeded but the tool could not be found afterwards.
    InstalledUnverified,
    /// No installer exists for this platform (or it needs a desktop).
    NotAvailable,
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AlreadyInstalled => "already installed",
            Self::Installed => "installed",
            Self::InstalledUnverified => "installed (unverified)",
            Self::NotAvailable => "not available",
        };
        f.write_str(s)
    }
}

impl From<InstallOutcome> for ToolStatus {
    fn from(outcome: InstallOutcome) -> Self {
        match outcome {
            InstallOutcome::AlreadyInstalled => Self::AlreadyInstalled,
            InstallOutcome::Installed => Self::Installed,
            InstallOutcome::InstalledUnverified => Self::Unverified,
            InstallOutcome::NotAvailable => Self::NotAvailable,
        }
    }
}

/// A tool devutils knows how to install.
pub trait Installer: Send + Sync {
    /// Name used on the command line (`devutils install <name>`).
    fn name(&self) -> &'static str;

    /// Binary probed to decide whether the tool is present.
    fn command(&self) -> &'static str;

    /// One-line description for `install --list`.
    fn description(&self) -> &'static str;

    /// GUI applications are only eligible where a desktop is available.
    fn requires_desktop(&self) -> bool {
        false
    }

    /// Install function for `kind`, or `None` if the platform is unsupported.
    fn handler(&self, kind: PlatformKind) -> Option<InstallFn>;

    /// Whether the tool is already present on this host.
    fn is_installed(&self, ctx: &Context) -> bool {
        ctx.executor.command_exists(self.command())
    }
}

/// Every installable tool, sorted by name.
#[must_use]
pub fn all_tools() -> Vec<Box<dyn Installer>> {
    vec![
        Box::new(bash::Bash),
        Box::new(brave_browser::BraveBrowser),
        Box::new(curl::Curl),
        Box::new(git::Git),
        Box::new(homebrew::Homebrew),
        Box::new(node::Node),
        Box::new(parallels_desktop::ParallelsDesktop),
        Box::new(tmux::Tmux),
        Box::new(xcode_clt::XcodeClt),
        Box::new(zsh::Zsh),
    ]
}

/// Tools installed by `devutils setup`, in install order.
///
/// Prerequisites come first: the Command Line Tools and Homebrew are needed
/// by every macOS installer.
#[must_use]
pub fn setup_tools() -> Vec<Box<dyn Installer>> {
    vec![
        Box::new(xcode_clt::XcodeClt),
        Box::new(homebrew::Homebrew),
        Box::new(curl::Curl),
        Box::new(git::Git),
        Box::new(zsh::Zsh),
        Box::new(tmux::Tmux),
        Box::new(node::Node),
    ]
}

/// Look up a tool by its command-line name.
#[must_use]
pub fn find_tool(name: &str) -> Option<Box<dyn Installer>> {
    all_tools().into_iter().find(|t| t.name() == name)
}

/// Whether `tool` has an install function for `kind`.
#[must_use]
pub fn supports(tool: &dyn Installer, kind: PlatformKind) -> bool {
    tool.handler(kind).is_some()
}

/// Whether `tool` can be installed here: the platform is supported and, for
/// GUI tools, a desktop session is available.
#[must_use]
pub fn is_eligible(tool: &dyn Installer, ctx: &Context) -> bool {
    supports(tool, ctx.platform.kind) && (!tool.requires_desktop() || ctx.desktop_available())
}

/// Install `tool` on the current platform.
///
/// An unsupported platform is not an error: it logs a warning and returns
/// [`InstallOutcome::NotAvailable`].
///
/// # Errors
///
/// Returns an [`InstallError`] when a prerequisite is missing, repository
/// setup fails, or the install command exits non-zero.
pub fn install(tool: &dyn Installer, ctx: &Context) -> Result<InstallOutcome, InstallError> {
    let kind = ctx.platform.kind;
    let Some(handler) = tool.handler(kind) else {
        ctx.log
            .warn(&format!("{} is not available for {kind}", tool.name()));
        return Ok(InstallOutcome::NotAvailable);
    };
    if tool.requires_desktop() && !ctx.desktop_available() {
        ctx.log.warn(&format!(
            "{} requires a desktop environment, none detected",
            tool.name()
        ));
        return Ok(InstallOutcome::NotAvailable);
    }
    ctx.log.debug(&format!("installing {} for {kind}", tool.name()));
    handler(ctx)
}

// ---------------------------------------------------------------------------
// Shared steps
// ---------------------------------------------------------------------------

/// Report an already-present tool, with its version when it can be read.
pub(crate) fn already_installed(
    ctx: &Context,
    tool: &str,
    version: Option<&str>,
) -> InstallOutcome {
    match version {
        Some(v) => ctx.log.info(&format!("{tool} is already installed ({v})")),
        None => ctx.log.info(&format!("{tool} is already installed")),
    }
    InstallOutcome::AlreadyInstalled
}

/// Version of `command` read from `command <args>` output.
pub(crate) fn command_version(
    ctx: &Context,
    command: &str,
    args: &[&str],
    parser: &VersionParser,
) -> Option<String> {
    parser.parse(&ctx.executor.capture(command, args))
}

/// Short-circuit when `command` is already on `PATH`.
pub(crate) fn present(
    ctx: &Context,
    tool: &str,
    command: &str,
    version_args: &[&str],
    parser: &VersionParser,
) -> Option<InstallOutcome> {
    ctx.executor.command_exists(command).then(|| {
        let version = command_version(ctx, command, version_args, parser);
        already_installed(ctx, tool, version.as_deref())
    })
}

/// Fail unless Homebrew is installed.
pub(crate) fn require_homebrew(ctx: &Context, tool: &str) -> Result<(), InstallError> {
    require_command(
        ctx,
        tool,
        "brew",
        "Homebrew",
        "run `devutils install homebrew` first",
    )
}

/// Fail unless Chocolatey is installed.
pub(crate) fn require_chocolatey(ctx: &Context, tool: &str) -> Result<(), InstallError> {
    require_command(
        ctx,
        tool,
        "choco",
        "Chocolatey",
        "install Chocolatey from https://chocolatey.org/install or install winget",
    )
}

/// Fail unless `program` is on `PATH`.
pub(crate) fn require_command(
    ctx: &Context,
    tool: &str,
    program: &str,
    prerequisite: &str,
    hint: &str,
) -> Result<(), InstallError> {
    if ctx.executor.command_exists(program) {
        return Ok(());
    }
    Err(InstallError::PrerequisiteMissing {
        tool: tool.to_string(),
        prerequisite: prerequisite.to_string(),
        hint: hint.to_string(),
    })
}

/// Install `package` with `manager`, failing on non-zero exit.
pub(crate) fn install_package(
    ctx: &Context,
    tool: &str,
    manager: PackageManager,
    package: &str,
    opts: PackageOptions,
) -> Result<(), InstallError> {
    ctx.log.info(&format!("installing {package} with {manager}"));
    let outcome = packages::install(ctx.executor.as_ref(), manager, package, opts)?;
    if outcome.success {
        return Ok(());
    }
    Err(InstallError::CommandFailed {
        tool: tool.to_string(),
        command: packages::install_command(manager, package, opts).to_string(),
        code: outcome.code.unwrap_or(-1),
        output: outcome.output,
    })
}

/// Install `package` through the platform's preferred system manager.
///
/// APT indexes are refreshed first; a failed refresh is only a warning.
pub(crate) fn install_native(ctx: &Context, tool: &str, package: &str) -> Result<(), InstallError> {
    let Some(manager) = packages::preferred(&ctx.platform, ctx.executor.as_ref()) else {
        return Err(InstallError::PrerequisiteMissing {
            tool: tool.to_string(),
            prerequisite: "a supported package manager".to_string(),
            hint: "install the tool with your distribution's package manager".to_string(),
        });
    };
    if manager == PackageManager::Apt {
        refresh_index(ctx, manager)?;
    }
    install_package(ctx, tool, manager, package, PackageOptions::default())
}

/// Refresh a package index, warning (not failing) when it does not succeed.
pub(crate) fn refresh_index(ctx: &Context, manager: PackageManager) -> Result<(), InstallError> {
    let outcome = packages::update(ctx.executor.as_ref(), manager)?;
    if !outcome.success {
        ctx.log
            .warn(&format!("{manager} index refresh failed, continuing"));
    }
    Ok(())
}

/// Install on Windows with winget when present, Chocolatey otherwise.
pub(crate) fn install_windows(
    ctx: &Context,
    tool: &str,
    winget_id: &str,
    choco_package: &str,
) -> Result<(), InstallError> {
    match packages::preferred(&ctx.platform, ctx.executor.as_ref()) {
        Some(PackageManager::Winget) => install_package(
            ctx,
            tool,
            PackageManager::Winget,
            winget_id,
            PackageOptions::default(),
        ),
        _ => {
            require_chocolatey(ctx, tool)?;
            install_package(
                ctx,
                tool,
                PackageManager::Choco,
                choco_package,
                PackageOptions::default(),
            )
        }
    }
}

/// Run a command that must succeed.
pub(crate) fn run_step(
    ctx: &Context,
    tool: &str,
    program: &str,
    args: &[&str],
) -> Result<ExecResult, InstallError> {
    let result = ctx.executor.run_unchecked(program, args)?;
    if result.success {
        return Ok(result);
    }
    Err(InstallError::CommandFailed {
        tool: tool.to_string(),
        command: std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" "),
        code: result.exit_code(),
        output: result.combined_output(),
    })
}

/// Run a repository/keyring setup command; failures become
/// [`InstallError::RepositorySetup`].
pub(crate) fn setup_step(
    ctx: &Context,
    tool: &str,
    what: &str,
    program: &str,
    args: &[&str],
) -> Result<(), InstallError> {
    let result = ctx.executor.run_unchecked(program, args)?;
    if result.success {
        ctx.log.debug(&format!("{tool}: {what} done"));
        return Ok(());
    }
    let detail = result.combined_output();
    Err(InstallError::RepositorySetup {
        tool: tool.to_string(),
        reason: if detail.is_empty() {
            what.to_string()
        } else {
            format!("{what}: {detail}")
        },
    })
}

/// Post-install check: re-probe for `command` and read its version.
pub(crate) fn verify_command(
    ctx: &Context,
    tool: &str,
    command: &str,
    version_args: &[&str],
    parser: &VersionParser,
) -> InstallOutcome {
    if !ctx.executor.command_exists(command) {
        ctx.log.warn(&format!(
            "{tool} was installed but `{command}` is not on PATH yet; open a new shell and run `{command} {}`",
            version_args.join(" ")
        ));
        return InstallOutcome::InstalledUnverified;
    }
    match command_version(ctx, command, version_args, parser) {
        Some(v) => ctx.log.info(&format!("{tool} installed ({v})")),
        None => ctx.log.info(&format!("{tool} installed")),
    }
    InstallOutcome::Installed
}

/// Post-install check for application bundles and other fixed paths.
pub(crate) fn verify_path(ctx: &Context, tool: &str, path: &Path) -> InstallOutcome {
    if ctx.path_exists(path) {
        ctx.log.info(&format!("{tool} installed at {}", path.display()));
        InstallOutcome::Installed
    } else {
        ctx.log.warn(&format!(
            "{tool} install finished but {} was not found; check the installer output",
            path.display()
        ));
        InstallOutcome::InstalledUnverified
    }
}
