//! Package manager abstraction.
//!
//! Maps abstract install/uninstall/update requests onto the command line of
//! a concrete package manager.  The command builders are pure so the exact
//! invocation can be unit-tested; the runners go through an [`Executor`].
use std::fmt;

use crate::error::ExecError;
use crate::exec::{ExecResult, Executor};
use crate::platform::{PlatformDescriptor, PlatformKind, SystemPackageManager};

/// Exit code `dnf`/`yum check-update` use to report pending updates.
const CHECK_UPDATE_AVAILABLE: i32 = 100;

/// Package managers devutils can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    /// Homebrew (macOS).
    Brew,
    /// `apt-get` (Debian family).
    Apt,
    /// `dnf` (Fedora, RHEL 8+, Amazon Linux 2023).
    Dnf,
    /// `yum` (older RHEL and Amazon Linux 2).
    Yum,
    /// Snap packages.
    Snap,
    /// Chocolatey (Windows).
    Choco,
    /// `winget` (Windows).
    Winget,
    /// npm packages.
    Npm,
    /// pip packages.
    Pip,
}

impl PackageManager {
    /// Binary probed on `PATH` to decide availability.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Brew => "brew",
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Snap => "snap",
            Self::Choco => "choco",
            Self::Winget => "winget",
            Self::Npm => "npm",
            Self::Pip => "pip3",
        }
    }

    /// System package managers need root.
    const fn needs_sudo(self) -> bool {
        matches!(self, Self::Apt | Self::Dnf | Self::Yum | Self::Snap)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Brew => "brew",
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Snap => "snap",
            Self::Choco => "choco",
            Self::Winget => "winget",
            Self::Npm => "npm",
            Self::Pip => "pip",
        };
        f.write_str(name)
    }
}

impl From<SystemPackageManager> for PackageManager {
    fn from(pm: SystemPackageManager) -> Self {
        match pm {
            SystemPackageManager::Brew => Self::Brew,
            SystemPackageManager::Apt => Self::Apt,
            SystemPackageManager::Dnf => Self::Dnf,
            SystemPackageManager::Yum => Self::Yum,
            SystemPackageManager::Choco => Self::Choco,
            SystemPackageManager::Winget => Self::Winget,
        }
    }
}

/// Modifiers for install/uninstall commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct PackageOptions {
    /// Homebrew cask (GUI application) rather than a formula.
    pub cask: bool,
    /// Snap `--classic` confinement.
    pub classic: bool,
    /// npm global install.
    pub global: bool,
    /// pip per-user install.
    pub user: bool,
}

impl PackageOptions {
    /// Options for a Homebrew cask.
    #[must_use]
    pub fn cask() -> Self {
        Self {
            cask: true,
            ..Self::default()
        }
    }
}

/// A fully-resolved native command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program to spawn (`sudo` for privileged managers).
    pub program: String,
    /// Arguments, including the manager binary when run through `sudo`.
    pub args: Vec<String>,
}

impl CommandLine {
    fn new(manager: PackageManager, args: &[&str]) -> Self {
        let mut full: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
        if manager.needs_sudo() {
            full.insert(0, manager.binary().to_string());
            Self {
                program: "sudo".to_string(),
                args: full,
            }
        } else {
            Self {
                program: manager.binary().to_string(),
                args: full,
            }
        }
    }

    /// Run through `executor` without failing on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error only when the program cannot be spawned.
    pub fn run(&self, executor: &dyn Executor) -> Result<ExecResult, ExecError> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        executor.run_unchecked(&self.program, &args)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of an install/uninstall/update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutcome {
    /// Whether the manager exited with status zero.
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    /// Combined stdout and stderr.
    pub output: String,
}

impl PackageOutcome {
    fn from_exec(result: &ExecResult) -> Self {
        Self {
            success: result.success,
            code: result.code,
            output: result.combined_output(),
        }
    }
}

/// Candidate system managers for a platform, in preference order.
const fn system_candidates(kind: PlatformKind) -> &'static [PackageManager] {
    match kind {
        PlatformKind::Macos => &[PackageManager::Brew],
        PlatformKind::Ubuntu
        | PlatformKind::Debian
        | PlatformKind::Raspbian
        | PlatformKind::Wsl => {
            &[PackageManager::Apt, PackageManager::Snap]
        }
        PlatformKind::AmazonLinux | PlatformKind::Rhel | PlatformKind::Fedora => {
            &[PackageManager::Dnf, PackageManager::Yum, PackageManager::Snap]
        }
        PlatformKind::Windows | PlatformKind::GitBash => {
            &[PackageManager::Winget, PackageManager::Choco]
        }
        PlatformKind::Linux => &[
            PackageManager::Apt,
            PackageManager::Dnf,
            PackageManager::Yum,
            PackageManager::Snap,
            PackageManager::Brew,
        ],
        PlatformKind::Unknown => &[],
    }
}

/// Package managers present on this host: the platform's native managers
/// followed by the universal ones (`npm`, `pip`).
#[must_use]
pub fn available(platform: &PlatformDescriptor, executor: &dyn Executor) -> Vec<PackageManager> {
    system_candidates(platform.kind)
        .iter()
        .chain(&[PackageManager::Npm, PackageManager::Pip])
        .copied()
        .filter(|pm| executor.command_exists(pm.binary()))
        .collect()
}

/// The manager installers should use by default on this platform.
///
/// Deterministic: RHEL-family hosts use the detector's dnf/yum choice, and
/// Windows prefers winget when it is installed.
#[must_use]
pub fn preferred(platform: &PlatformDescriptor, executor: &dyn Executor) -> Option<PackageManager> {
    match platform.kind {
        PlatformKind::Macos => Some(PackageManager::Brew),
        PlatformKind::Ubuntu
        | PlatformKind::Debian
        | PlatformKind::Raspbian
        | PlatformKind::Wsl => {
            Some(PackageManager::Apt)
        }
        PlatformKind::AmazonLinux | PlatformKind::Rhel | PlatformKind::Fedora => Some(
            platform
                .package_manager
                .map_or(PackageManager::Yum, PackageManager::from),
        ),
        PlatformKind::Windows | PlatformKind::GitBash => {
            if executor.command_exists(PackageManager::Winget.binary()) {
                Some(PackageManager::Winget)
            } else {
                Some(PackageManager::Choco)
            }
        }
        PlatformKind::Linux | PlatformKind::Unknown => None,
    }
}

/// Command line that installs `name`.
#[must_use]
pub fn install_command(manager: PackageManager, name: &str, opts: PackageOptions) -> CommandLine {
    match manager {
        PackageManager::Brew if opts.cask => {
            CommandLine::new(manager, &["install", "--cask", name])
        }
        PackageManager::Snap if opts.classic => {
            CommandLine::new(manager, &["install", name, "--classic"])
        }
        PackageManager::Npm if opts.global => CommandLine::new(manager, &["install", "-g", name]),
        PackageManager::Pip if opts.user => CommandLine::new(manager, &["install", "--user", name]),
        PackageManager::Apt | PackageManager::Dnf | PackageManager::Yum | PackageManager::Choco => {
            CommandLine::new(manager, &["install", "-y", name])
        }
        PackageManager::Winget => CommandLine::new(
            manager,
            &[
                "install",
                "--id",
                name,
                "-e",
                "--accept-package-agreements",
                "--accept-source-agreements",
            ],
        ),
        PackageManager::Brew | PackageManager::Snap | PackageManager::Npm | PackageManager::Pip => {
            CommandLine::new(manager, &["install", name])
        }
    }
}

/// Command line that removes `name`.
#[must_use]
pub fn uninstall_command(manager: PackageManager, name: &str, opts: PackageOptions) -> CommandLine {
    match manager {
        PackageManager::Brew if opts.cask => {
            CommandLine::new(manager, &["uninstall", "--cask", name])
        }
        PackageManager::Npm if opts.global => CommandLine::new(manager, &["uninstall", "-g", name]),
        PackageManager::Apt | PackageManager::Dnf | PackageManager::Yum => {
            CommandLine::new(manager, &["remove", "-y", name])
        }
        PackageManager::Snap => CommandLine::new(manager, &["remove", name]),
        PackageManager::Choco | PackageManager::Pip => {
            CommandLine::new(manager, &["uninstall", "-y", name])
        }
        PackageManager::Winget => CommandLine::new(manager, &["uninstall", "--id", name, "-e"]),
        PackageManager::Brew | PackageManager::Npm => {
            CommandLine::new(manager, &["uninstall", name])
        }
    }
}

/// Command line that refreshes the manager's package index.
#[must_use]
pub fn update_command(manager: PackageManager) -> CommandLine {
    match manager {
        PackageManager::Brew | PackageManager::Apt => CommandLine::new(manager, &["update"]),
        PackageManager::Dnf | PackageManager::Yum => CommandLine::new(manager, &["check-update"]),
        PackageManager::Snap => CommandLine::new(manager, &["refresh"]),
        PackageManager::Choco => CommandLine::new(manager, &["upgrade", "chocolatey", "-y"]),
        PackageManager::Winget => CommandLine::new(manager, &["source", "update"]),
        PackageManager::Npm => CommandLine::new(manager, &["update", "-g"]),
        PackageManager::Pip => CommandLine::new(manager, &["install", "--upgrade", "pip"]),
    }
}

/// Install `name` with `manager`.
///
/// # Errors
///
/// Returns an error only when the manager binary cannot be spawned; a failed
/// install is an `Ok` outcome with `success == false`.
pub fn install(
    executor: &dyn Executor,
    manager: PackageManager,
    name: &str,
    opts: PackageOptions,
) -> Result<PackageOutcome, ExecError> {
    let cmd = install_command(manager, name, opts);
    tracing::debug!("running {cmd}");
    cmd.run(executor).map(|r| PackageOutcome::from_exec(&r))
}

/// Remove `name` with `manager`.
///
/// # Errors
///
/// Same as [`install`].
pub fn uninstall(
    executor: &dyn Executor,
    manager: PackageManager,
    name: &str,
    opts: PackageOptions,
) -> Result<PackageOutcome, ExecError> {
    let cmd = uninstall_command(manager, name, opts);
    tracing::debug!("running {cmd}");
    cmd.run(executor).map(|r| PackageOutcome::from_exec(&r))
}

/// Refresh the package index of `manager`.
///
/// `dnf`/`yum check-update` exit with 100 when updates are pending, which is
/// reported as success.
///
/// # Errors
///
/// Same as [`install`].
pub fn update(
    executor: &dyn Executor,
    manager: PackageManager,
) -> Result<PackageOutcome, ExecError> {
    let cmd = update_command(manager);
    tracing::debug!("running {cmd}");
    let result = cmd.run(executor)?;
    let mut outcome = PackageOutcome::from_exec(&result);
    if matches!(manager, PackageManager::Dnf | PackageManager::Yum)
        && result.code == Some(CHECK_UPDATE_AVAILABLE)
    {
        outcome.success = true;
    }
    Ok(outcome)
}

/// Whether `name` is installed according to `manager`'s own database.
///
/// For winget, `name` is the package id.  Brew checks casks as well as
/// formulae.
#[must_use]
pub fn is_installed(executor: &dyn Executor, manager: PackageManager, name: &str) -> bool {
    let succeeded = |program: &str, args: &[&str]| {
        executor
            .run_unchecked(program, args)
            .is_ok_and(|r| r.success)
    };
    match manager {
        PackageManager::Brew => {
            succeeded("brew", &["list", name]) || succeeded("brew", &["list", "--cask", name])
        }
        PackageManager::Apt => succeeded("dpkg", &["-s", name]),
        PackageManager::Dnf | PackageManager::Yum => succeeded("rpm", &["-q", name]),
        PackageManager::Snap => succeeded("snap", &["list", name]),
        PackageManager::Choco => executor
            .run_unchecked("choco", &["list", "--local-only", "--exact", name])
            .is_ok_and(|r| r.success && r.stdout.to_lowercase().contains(&name.to_lowercase())),
        PackageManager::Winget => executor
            .run_unchecked("winget", &["list", "--id", name, "-e"])
            .is_ok_and(|r| r.success && r.stdout.contains(name)),
        PackageManager::Npm => succeeded("npm", &["ls", "-g", name]),
        PackageManager::Pip => succeeded("pip3", &["show", name]),
    }
}
