//! Host probing abstraction for platform detection.
//!
//! Detection reads environment variables and marker files through the
//! [`HostProbe`] trait so every platform branch can be unit-tested without
//! touching the real OS.  Production code uses [`SystemProbe`].
use std::path::Path;

/// Read-only view of the host used by the platform detector.
#[cfg_attr(test, mockall::automock)]
pub trait HostProbe: Send + Sync {
    /// Operating system family, as in [`std::env::consts::OS`]
    /// (`"macos"`, `"linux"`, `"windows"`, …).
    fn os(&self) -> String;

    /// Value of an environment variable, `None` when unset or not UTF-8.
    fn env(&self, name: &str) -> Option<String>;

    /// Returns `true` if `path` exists.
    fn exists(&self, path: &Path) -> bool;

    /// Contents of a text file, `None` when missing or unreadable.
    fn read_to_string(&self, path: &Path) -> Option<String>;
}

/// Returns `true` if the variable is set to a non-empty value.
pub fn env_set(probe: &dyn HostProbe, name: &str) -> bool {
    probe.env(name).is_some_and(|v| !v.trim().is_empty())
}

/// Production [`HostProbe`] that delegates to [`std::env`] and [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl HostProbe for SystemProbe {
    fn os(&self) -> String {
        std::env::consts::OS.to_string()
    }

    fn env(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }
}

/// In-memory [`HostProbe`] for unit tests.
///
/// ```ignore
/// let probe = FakeProbe::linux()
///     .with_file("/etc/os-release", "ID=ubuntu\n")
///     .with_file("/etc/debian_version", "12.0\n");
/// ```
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct FakeProbe {
    os: String,
    env: std::collections::HashMap<String, String>,
    files: std::collections::HashMap<std::path::PathBuf, String>,
}

#[cfg(test)]
impl FakeProbe {
    /// A probe reporting the given OS family with no env and no files.
    #[must_use]
    pub fn new(os: &str) -> Self {
        Self {
            os: os.to_string(),
            ..Self::default()
        }
    }

    /// Shorthand for `FakeProbe::new("linux")`.
    #[must_use]
    pub fn linux() -> Self {
        Self::new("linux")
    }

    /// Set an environment variable.
    #[must_use]
    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }

    /// Register a file (which also makes the path exist).
    #[must_use]
    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.files
            .insert(std::path::PathBuf::from(path), contents.to_string());
        self
    }
}

#[cfg(test)]
impl HostProbe for FakeProbe {
    fn os(&self) -> String {
        self.os.clone()
    }

    fn env(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> Option<String> {
        self.files.get(path).cloned()
    }
}
