//! Tool outcomes shown in run summaries, and the [`Log`] trait.
use std::fmt;
use std::str::FromStr;

/// Where a tool ended up after `setup` (or `setup --check`) looked at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    /// Installed during this run and verified.
    Installed,
    /// Present before the run started.
    AlreadyInstalled,
    /// The install command succeeded but the tool could not be found afterwards.
    Unverified,
    /// No installer for this platform, or a GUI tool without a desktop.
    NotAvailable,
    /// Installable here but not present (check mode only).
    Missing,
    /// The installer returned an error.
    Failed,
}

impl ToolStatus {
    /// Every status, in the order summary totals are listed.
    pub const ALL: [Self; 6] = [
        Self::Installed,
        Self::AlreadyInstalled,
        Self::Unverified,
        Self::NotAvailable,
        Self::Missing,
        Self::Failed,
    ];

    /// Lower-case label used in summaries and the log file.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::AlreadyInstalled => "already installed",
            Self::Unverified => "unverified",
            Self::NotAvailable => "n/a",
            Self::Missing => "missing",
            Self::Failed => "failed",
        }
    }

    /// Single-character marker printed before the tool name.
    #[must_use]
    pub const fn icon(self) -> char {
        match self {
            Self::Installed => '✓',
            Self::AlreadyInstalled => '○',
            Self::Unverified => '?',
            Self::NotAvailable => '·',
            Self::Missing => '-',
            Self::Failed => '✗',
        }
    }

    /// SGR color for console rendering.
    pub(super) const fn color(self) -> &'static str {
        match self {
            Self::Installed => "\x1b[32m",
            Self::AlreadyInstalled => "\x1b[37m",
            Self::Unverified | Self::Missing => "\x1b[33m",
            Self::NotAvailable => "\x1b[2m",
            Self::Failed => "\x1b[31m",
        }
    }

    /// Whether the run should exit non-zero because of this tool.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for a label that names no [`ToolStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool status `{0}`")]
pub struct UnknownToolStatus(pub String);

impl FromStr for ToolStatus {
    type Err = UnknownToolStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| UnknownToolStatus(s.to_string()))
    }
}

/// One line of the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolEntry {
    /// Tool name as used by `devutils install <tool>`.
    pub name: String,
    /// Final status of the tool.
    pub status: ToolStatus,
    /// Extra context such as the error message or the reason it was skipped.
    pub detail: Option<String>,
}

impl ToolEntry {
    /// Plain-text summary line, e.g. `✗ node: failed (exit 100)`.
    #[must_use]
    pub fn line(&self) -> String {
        let head = format!("{} {}: {}", self.status.icon(), self.name, self.status);
        match &self.detail {
            Some(detail) => format!("{head} ({detail})"),
            None => head,
        }
    }
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) is the production implementation;
/// installers and scripts only see this trait so tests can capture output.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Record a tool's outcome for the summary.
    fn record_tool(&self, name: &str, status: ToolStatus, detail: Option<&str>);
    /// Write a line of command output (a listing, a path, JSON) to stdout
    /// unadorned, so it can be piped.
    fn output(&self, line: &str);
}
