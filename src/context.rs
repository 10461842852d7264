//! Shared per-run state handed to every installer, script and command.
//!
//! A [`Context`] bundles the detected platform, the command executor, the
//! host probe, the logger and the resolved home directory.  Tests build one
//! from fakes through [`test_helpers`].
use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ConfigError;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::{self, HostProbe, PlatformDescriptor};

/// Shared context for installers and scripts.
pub struct Context {
    /// Detected platform information.
    pub platform: PlatformDescriptor,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Environment and filesystem probe used for detection and path checks.
    pub probe: Arc<dyn HostProbe>,
    /// Logger for output and step recording.
    pub log: Arc<dyn Log>,
    /// User's home directory path.
    pub home: PathBuf,
    /// Whether stdin is a terminal (prompts are allowed).
    pub interactive: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("platform", &self.platform)
            .field("executor", &self.executor)
            .field("probe", &"<dyn HostProbe>")
            .field("log", &"<dyn Log>")
            .field("home", &self.home)
            .field("interactive", &self.interactive)
            .finish()
    }
}

impl Context {
    /// Detect the platform and build a context backed by the real system.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHome`] if the home directory cannot be
    /// determined.
    pub fn new(log: Arc<dyn Log>, executor: Arc<dyn Executor>) -> Result<Self, ConfigError> {
        let probe: Arc<dyn HostProbe> = Arc::new(platform::SystemProbe);
        let platform = platform::detect(probe.as_ref());
        log.debug(&format!("platform: {platform}"));
        Ok(Self {
            platform,
            executor,
            probe,
            log,
            home: home_dir()?,
            interactive: std::io::stdin().is_terminal(),
        })
    }

    /// Whether GUI applications can be installed on this host.
    #[must_use]
    pub fn desktop_available(&self) -> bool {
        platform::is_desktop_available(&self.platform, self.probe.as_ref())
    }

    /// Whether `path` exists, as seen through the host probe.
    #[must_use]
    pub fn path_exists(&self, path: &Path) -> bool {
        self.probe.exists(path)
    }

    /// Non-empty value of an environment variable.
    #[must_use]
    pub fn env(&self, name: &str) -> Option<String> {
        self.probe.env(name).filter(|v| !v.trim().is_empty())
    }
}

/// User's home directory: `HOME`, falling back to `USERPROFILE` (and the
/// reverse order on Windows).
///
/// # Errors
///
/// Returns [`ConfigError::MissingHome`] if neither variable is set.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    let (first, second) = if cfg!(target_os = "windows") {
        ("USERPROFILE", "HOME")
    } else {
        ("HOME", "USERPROFILE")
    };
    std::env::var(first)
        .or_else(|_| std::env::var(second))
        .ok()
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .ok_or(ConfigError::MissingHome)
}
