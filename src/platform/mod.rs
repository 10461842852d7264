//! Host platform detection.
//!
//! [`detect`] turns the ambient environment (OS family, environment
//! variables, distribution marker files) into a [`PlatformDescriptor`].  The
//! check order is load-bearing: WSL must be recognised before any Linux
//! distribution markers, and the RHEL family is recognised through
//! `/etc/system-release` as well because Amazon Linux 2023 does not ship
//! `/etc/redhat-release`.
pub mod probe;

use std::fmt;
use std::path::Path;

pub use probe::{HostProbe, SystemProbe};
use probe::env_set;

const OS_RELEASE: &str = "/etc/os-release";
const LSB_RELEASE: &str = "/etc/lsb-release";
const DEBIAN_VERSION: &str = "/etc/debian_version";
const REDHAT_RELEASE: &str = "/etc/redhat-release";
const SYSTEM_RELEASE: &str = "/etc/system-release";
const DNF_BINARY: &str = "/usr/bin/dnf";
const WSLG_MOUNT: &str = "/mnt/wslg";

/// Closed set of platforms devutils knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    /// macOS.
    Macos,
    /// Ubuntu and its flavours.
    Ubuntu,
    /// Debian.
    Debian,
    /// Raspberry Pi OS.
    Raspbian,
    /// Amazon Linux 2 or 2023.
    AmazonLinux,
    /// Red Hat Enterprise Linux and rebuilds (Rocky, Alma, CentOS).
    Rhel,
    /// Fedora.
    Fedora,
    /// Windows Subsystem for Linux.
    Wsl,
    /// Native Windows shell.
    Windows,
    /// Git Bash / MSYS on Windows.
    GitBash,
    /// Linux distribution devutils does not recognise.
    Linux,
    /// Anything else.
    Unknown,
}

impl PlatformKind {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Macos,
        Self::Ubuntu,
        Self::Debian,
        Self::Raspbian,
        Self::AmazonLinux,
        Self::Rhel,
        Self::Fedora,
        Self::Wsl,
        Self::Windows,
        Self::GitBash,
        Self::Linux,
        Self::Unknown,
    ];

    /// Stable identifier used in messages and config.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Macos => "macos",
            Self::Ubuntu => "ubuntu",
            Self::Debian => "debian",
            Self::Raspbian => "raspbian",
            Self::AmazonLinux => "amazon_linux",
            Self::Rhel => "rhel",
            Self::Fedora => "fedora",
            Self::Wsl => "wsl",
            Self::Windows => "windows",
            Self::GitBash => "gitbash",
            Self::Linux => "linux",
            Self::Unknown => "unknown",
        }
    }

    /// Debian-derived distributions using APT (WSL is treated as Ubuntu).
    #[must_use]
    pub const fn is_debian_family(self) -> bool {
        matches!(self, Self::Ubuntu | Self::Debian | Self::Raspbian | Self::Wsl)
    }

    /// Red Hat-derived distributions using DNF or YUM.
    #[must_use]
    pub const fn is_rhel_family(self) -> bool {
        matches!(self, Self::AmazonLinux | Self::Rhel | Self::Fedora)
    }

    /// Native Windows, including Git Bash.
    #[must_use]
    pub const fn is_windows_family(self) -> bool {
        matches!(self, Self::Windows | Self::GitBash)
    }

    /// Any Linux userspace, including WSL and unrecognised distributions.
    #[must_use]
    pub const fn is_linux(self) -> bool {
        self.is_debian_family() || self.is_rhel_family() || matches!(self, Self::Linux)
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native package manager chosen by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemPackageManager {
    /// Homebrew.
    Brew,
    /// `apt`.
    Apt,
    /// `dnf`.
    Dnf,
    /// `yum`, on hosts without dnf.
    Yum,
    /// Chocolatey.
    Choco,
    /// `winget`.
    Winget,
}

impl fmt::Display for SystemPackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Brew => "brew",
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Choco => "choco",
            Self::Winget => "winget",
        };
        f.write_str(name)
    }
}

/// Platform information for the current host.
///
/// Recomputed on every call to [`detect`]; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDescriptor {
    /// Detected platform.
    pub kind: PlatformKind,
    /// Native package manager, if the platform has one.
    pub package_manager: Option<SystemPackageManager>,
    /// Lower-case distribution ID from the release files (Linux and WSL only).
    pub distro: Option<String>,
}

impl PlatformDescriptor {
    /// Create a descriptor with explicit values (for tests and overrides).
    #[must_use]
    pub fn new(
        kind: PlatformKind,
        package_manager: Option<SystemPackageManager>,
        distro: Option<&str>,
    ) -> Self {
        Self {
            kind,
            package_manager,
            distro: distro.map(str::to_string),
        }
    }

    const fn unknown() -> Self {
        Self {
            kind: PlatformKind::Unknown,
            package_manager: None,
            distro: None,
        }
    }
}

impl fmt::Display for PlatformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(distro) = &self.distro
            && distro != self.kind.as_str()
        {
            write!(f, " ({distro})")?;
        }
        if let Some(pm) = self.package_manager {
            write!(f, " via {pm}")?;
        }
        Ok(())
    }
}

/// Detect the current host platform.
#[must_use]
pub fn detect_current() -> PlatformDescriptor {
    detect(&SystemProbe)
}

/// Detect the platform described by `probe`.
///
/// Never fails: anything unrecognised degrades to [`PlatformKind::Unknown`].
#[must_use]
pub fn detect(probe: &dyn HostProbe) -> PlatformDescriptor {
    match probe.os().as_str() {
        "macos" => PlatformDescriptor {
            kind: PlatformKind::Macos,
            package_manager: Some(SystemPackageManager::Brew),
            distro: None,
        },
        "windows" => detect_windows(probe),
        "linux" => detect_linux(probe),
        _ => PlatformDescriptor::unknown(),
    }
}

fn detect_windows(probe: &dyn HostProbe) -> PlatformDescriptor {
    if let Some(descriptor) = detect_wsl(probe) {
        return descriptor;
    }
    let kind = if env_set(probe, "MSYSTEM") {
        PlatformKind::GitBash
    } else {
        PlatformKind::Windows
    };
    PlatformDescriptor {
        kind,
        package_manager: Some(SystemPackageManager::Choco),
        distro: None,
    }
}

fn detect_wsl(probe: &dyn HostProbe) -> Option<PlatformDescriptor> {
    let name = probe.env("WSL_DISTRO_NAME").filter(|v| !v.trim().is_empty())?;
    let distro = distro_id(probe).unwrap_or_else(|| name.trim().to_lowercase());
    Some(PlatformDescriptor {
        kind: PlatformKind::Wsl,
        package_manager: Some(SystemPackageManager::Apt),
        distro: Some(distro),
    })
}

fn detect_linux(probe: &dyn HostProbe) -> PlatformDescriptor {
    if let Some(descriptor) = detect_wsl(probe) {
        return descriptor;
    }

    let distro = distro_id(probe);
    let id = distro.as_deref().unwrap_or_default();

    if probe.exists(Path::new(DEBIAN_VERSION)) {
        let kind = match id {
            "ubuntu" => PlatformKind::Ubuntu,
            "raspbian" => PlatformKind::Raspbian,
            _ => PlatformKind::Debian,
        };
        return PlatformDescriptor {
            kind,
            package_manager: Some(SystemPackageManager::Apt),
            distro,
        };
    }

    if probe.exists(Path::new(REDHAT_RELEASE)) || probe.exists(Path::new(SYSTEM_RELEASE)) {
        let kind = match id {
            "amzn" => PlatformKind::AmazonLinux,
            "fedora" => PlatformKind::Fedora,
            _ => PlatformKind::Rhel,
        };
        let package_manager = if probe.exists(Path::new(DNF_BINARY)) {
            SystemPackageManager::Dnf
        } else {
            SystemPackageManager::Yum
        };
        return PlatformDescriptor {
            kind,
            package_manager: Some(package_manager),
            distro,
        };
    }

    PlatformDescriptor {
        kind: PlatformKind::Linux,
        package_manager: None,
        distro,
    }
}

/// Distribution id from `/etc/os-release` (`ID=`), falling back to
/// `/etc/lsb-release` (`DISTRIB_ID=`).
fn distro_id(probe: &dyn HostProbe) -> Option<String> {
    probe
        .read_to_string(Path::new(OS_RELEASE))
        .and_then(|c| release_field(&c, "ID"))
        .or_else(|| {
            probe
                .read_to_string(Path::new(LSB_RELEASE))
                .and_then(|c| release_field(&c, "DISTRIB_ID"))
        })
}

/// Extract `KEY=value` from a release file, unquoted and lowercased.
fn release_field(contents: &str, key: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let (k, v) = line.trim().split_once('=')?;
        (k == key)
            .then(|| v.trim().trim_matches(|c| c == '"' || c == '\'').to_lowercase())
            .filter(|v| !v.is_empty())
    })
}

/// Whether GUI applications can be installed and launched.
#[must_use]
pub fn is_desktop_available(platform: &PlatformDescriptor, probe: &dyn HostProbe) -> bool {
    match platform.kind {
        PlatformKind::Macos | PlatformKind::Windows | PlatformKind::GitBash => true,
        PlatformKind::Unknown => false,
        PlatformKind::Ubuntu
        | PlatformKind::Debian
        | PlatformKind::Raspbian
        | PlatformKind::AmazonLinux
        | PlatformKind::Rhel
        | PlatformKind::Fedora
        | PlatformKind::Linux
        | PlatformKind::Wsl => {
            let session = probe
                .env("XDG_SESSION_TYPE")
                .is_some_and(|t| matches!(t.trim(), "x11" | "wayland"));
            env_set(probe, "WAYLAND_DISPLAY")
                || env_set(probe, "DISPLAY")
                || session
                || env_set(probe, "XDG_CURRENT_DESKTOP")
                || env_set(probe, "DESKTOP_SESSION")
                || (platform.kind == PlatformKind::Wsl && probe.exists(Path::new(WSLG_MOUNT)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::probe::{FakeProbe, MockHostProbe};
    use super::*;

    fn ubuntu() -> FakeProbe {
        FakeProbe::linux()
            .with_file(OS_RELEASE, "NAME=\"Ubuntu\"\nID=ubuntu\nID_LIKE=debian\n")
            .with_file(DEBIAN_VERSION, "bookworm/sid\n")
    }

    #[test]
    fn family_predicates_partition_kinds() {
        for kind in PlatformKind::ALL {
            let families = [kind.is_linux(), kind.is_windows_family(), kind == PlatformKind::Macos]
                .iter()
                .filter(|b| **b)
                .count();
            let expected = usize::from(kind != PlatformKind::Unknown);
            assert_eq!(families, expected, "{kind}");
        }
        assert!(PlatformKind::Wsl.is_linux());
        assert!(PlatformKind::GitBash.is_windows_family());
        assert!(!PlatformKind::Wsl.is_windows_family());
    }

    #[test]
    fn detect_current_returns_enumerated_kind() {
        let p = detect_current();
        assert!(PlatformKind::ALL.contains(&p.kind));
    }

    #[test]
    fn macos_uses_brew() {
        let p = detect(&FakeProbe::new("macos"));
        assert_eq!(p.kind, PlatformKind::Macos);
        assert_eq!(p.package_manager, Some(SystemPackageManager::Brew));
    }

    #[test]
    fn native_windows() {
        let p = detect(&FakeProbe::new("windows"));
        assert_eq!(p.kind, PlatformKind::Windows);
        assert_eq!(p.package_manager, Some(SystemPackageManager::Choco));
    }

    #[test]
    fn git_bash_on_windows() {
        let p = detect(&FakeProbe::new("windows").with_env("MSYSTEM", "MINGW64"));
        assert_eq!(p.kind, PlatformKind::GitBash);
        assert!(p.package_manager.is_some());
    }

    #[test]
    fn wsl_env_wins_on_windows() {
        let p = detect(
            &FakeProbe::new("windows")
                .with_env("WSL_DISTRO_NAME", "Ubuntu")
                .with_env("MSYSTEM", "MINGW64"),
        );
        assert_eq!(p.kind, PlatformKind::Wsl);
    }

    #[test]
    fn wsl_env_wins_over_linux_markers() {
        let p = detect(&ubuntu().with_env("WSL_DISTRO_NAME", "Ubuntu-22.04"));
        assert_eq!(p.kind, PlatformKind::Wsl);
        assert_eq!(p.package_manager, Some(SystemPackageManager::Apt));
        assert_eq!(p.distro.as_deref(), Some("ubuntu"));
    }

    #[test]
    fn wsl_without_os_release_uses_distro_name() {
        let p = detect(&FakeProbe::linux().with_env("WSL_DISTRO_NAME", "Debian"));
        assert_eq!(p.kind, PlatformKind::Wsl);
        assert_eq!(p.distro.as_deref(), Some("debian"));
    }

    #[test]
    fn ubuntu_detected() {
        let p = detect(&ubuntu());
        assert_eq!(p.kind, PlatformKind::Ubuntu);
        assert_eq!(p.package_manager, Some(SystemPackageManager::Apt));
        assert_eq!(p.distro.as_deref(), Some("ubuntu"));
    }

    #[test]
    fn raspbian_detected() {
        let p = detect(
            &FakeProbe::linux()
                .with_file(OS_RELEASE, "ID=raspbian\n")
                .with_file(DEBIAN_VERSION, "11.7\n"),
        );
        assert_eq!(p.kind, PlatformKind::Raspbian);
    }

    #[test]
    fn other_debian_derivative_is_debian() {
        let p = detect(
            &FakeProbe::linux()
                .with_file(OS_RELEASE, "ID=linuxmint\n")
                .with_file(DEBIAN_VERSION, "bookworm/sid\n"),
        );
        assert_eq!(p.kind, PlatformKind::Debian);
        assert_eq!(p.distro.as_deref(), Some("linuxmint"));
    }

    #[test]
    fn lsb_release_is_fallback_for_distro_id() {
        let p = detect(
            &FakeProbe::linux()
                .with_file(LSB_RELEASE, "DISTRIB_ID=Ubuntu\nDISTRIB_RELEASE=22.04\n")
                .with_file(DEBIAN_VERSION, "bookworm/sid\n"),
        );
        assert_eq!(p.kind, PlatformKind::Ubuntu);
    }

    #[test]
    fn amazon_linux_2023_uses_system_release() {
        let p = detect(
            &FakeProbe::linux()
                .with_file(OS_RELEASE, "NAME=\"Amazon Linux\"\nID=\"amzn\"\nVERSION_ID=\"2023\"\n")
                .with_file(SYSTEM_RELEASE, "Amazon Linux release 2023\n")
                .with_file(DNF_BINARY, ""),
        );
        assert_eq!(p.kind, PlatformKind::AmazonLinux);
        assert_eq!(p.package_manager, Some(SystemPackageManager::Dnf));
    }

    #[test]
    fn amazon_linux_2_uses_yum() {
        let p = detect(
            &FakeProbe::linux()
                .with_file(OS_RELEASE, "ID=\"amzn\"\nVERSION_ID=\"2\"\n")
                .with_file(SYSTEM_RELEASE, "Amazon Linux release 2\n"),
        );
        assert_eq!(p.kind, PlatformKind::AmazonLinux);
        assert_eq!(p.package_manager, Some(SystemPackageManager::Yum));
    }

    #[test]
    fn fedora_detected() {
        let p = detect(
            &FakeProbe::linux()
                .with_file(OS_RELEASE, "ID=fedora\n")
                .with_file(REDHAT_RELEASE, "Fedora release 40\n")
                .with_file(DNF_BINARY, ""),
        );
        assert_eq!(p.kind, PlatformKind::Fedora);
        assert_eq!(p.package_manager, Some(SystemPackageManager::Dnf));
    }

    #[test]
    fn rocky_is_rhel() {
        let p = detect(
            &FakeProbe::linux()
                .with_file(OS_RELEASE, "ID=\"rocky\"\n")
                .with_file(REDHAT_RELEASE, "Rocky Linux release 9.3\n")
                .with_file(DNF_BINARY, ""),
        );
        assert_eq!(p.kind, PlatformKind::Rhel);
    }

    #[test]
    fn unrecognised_linux_has_no_package_manager() {
        let p = detect(&FakeProbe::linux().with_file(OS_RELEASE, "ID=arch\n"));
        assert_eq!(p.kind, PlatformKind::Linux);
        assert_eq!(p.package_manager, None);
        assert_eq!(p.distro.as_deref(), Some("arch"));
    }

    #[test]
    fn other_os_is_unknown() {
        let p = detect(&FakeProbe::new("freebsd"));
        assert_eq!(p, PlatformDescriptor::unknown());
    }

    #[test]
    fn named_platforms_always_have_a_package_manager() {
        let probes = [
            FakeProbe::new("macos"),
            FakeProbe::new("windows"),
            FakeProbe::new("windows").with_env("MSYSTEM", "MINGW64"),
            FakeProbe::linux().with_env("WSL_DISTRO_NAME", "Ubuntu"),
            ubuntu(),
            FakeProbe::linux().with_file(SYSTEM_RELEASE, ""),
            FakeProbe::linux(),
            FakeProbe::new("haiku"),
        ];
        for probe in &probes {
            let p = detect(probe);
            let bare = matches!(p.kind, PlatformKind::Linux | PlatformKind::Unknown);
            assert_eq!(
                p.package_manager.is_none(),
                bare,
                "package manager invariant violated for {p:?}"
            );
        }
    }

    #[test]
    fn release_field_handles_quotes_and_case() {
        assert_eq!(
            release_field("NAME=x\nID=\"Ubuntu\"\n", "ID").as_deref(),
            Some("ubuntu")
        );
        assert_eq!(release_field("ID_LIKE=debian\n", "ID"), None);
        assert_eq!(release_field("ID=\n", "ID"), None);
    }

    #[test]
    fn kind_display_is_snake_case() {
        assert_eq!(PlatformKind::AmazonLinux.to_string(), "amazon_linux");
        assert_eq!(PlatformKind::GitBash.to_string(), "gitbash");
    }

    #[test]
    fn descriptor_display_includes_distro_and_manager() {
        let p = PlatformDescriptor::new(
            PlatformKind::Rhel,
            Some(SystemPackageManager::Dnf),
            Some("rocky"),
        );
        assert_eq!(p.to_string(), "rhel (rocky) via dnf");
    }

    // -----------------------------------------------------------------------
    // Desktop availability
    // -----------------------------------------------------------------------

    #[test]
    fn desktop_always_available_on_macos_and_windows() {
        let probe = FakeProbe::new("macos");
        for kind in [
            PlatformKind::Macos,
            PlatformKind::Windows,
            PlatformKind::GitBash,
        ] {
            let p = PlatformDescriptor::new(kind, None, None);
            assert!(is_desktop_available(&p, &probe), "{kind}");
        }
    }

    #[test]
    fn headless_linux_has_no_desktop() {
        let p = detect(&ubuntu());
        assert!(!is_desktop_available(&p, &ubuntu()));
    }

    #[test]
    fn linux_desktop_via_session_type() {
        let probe = ubuntu().with_env("XDG_SESSION_TYPE", "wayland");
        let p = detect(&probe);
        assert!(is_desktop_available(&p, &probe));
    }

    #[test]
    fn linux_tty_session_type_is_not_desktop() {
        let probe = ubuntu().with_env("XDG_SESSION_TYPE", "tty");
        let p = detect(&probe);
        assert!(!is_desktop_available(&p, &probe));
    }

    #[test]
    fn wslg_mount_enables_desktop_on_wsl() {
        let mut probe = MockHostProbe::new();
        probe.expect_env().returning(|_| None);
        probe
            .expect_exists()
            .returning(|path| path == Path::new(WSLG_MOUNT));
        let p = PlatformDescriptor::new(PlatformKind::Wsl, Some(SystemPackageManager::Apt), None);
        assert!(is_desktop_available(&p, &probe));
    }

    #[test]
    fn wslg_mount_is_ignored_outside_wsl() {
        let mut probe = MockHostProbe::new();
        probe.expect_env().returning(|_| None);
        probe.expect_exists().returning(|_| true);
        let p = PlatformDescriptor::new(
            PlatformKind::Ubuntu,
            Some(SystemPackageManager::Apt),
            None,
        );
        assert!(!is_desktop_available(&p, &probe));
    }

    #[test]
    fn unknown_platform_has_no_desktop() {
        let mut probe = MockHostProbe::new();
        probe.expect_env().never();
        let p = PlatformDescriptor::unknown();
        assert!(!is_desktop_available(&p, &probe));
    }
}
