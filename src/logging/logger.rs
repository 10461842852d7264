//! Production [`Log`] implementation with a per-run tool summary.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{STAGE_TARGET, TOOL_TARGET};
use super::types::{Log, ToolEntry, ToolStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger that emits through [`tracing`] and remembers every tool outcome.
///
/// All messages also reach the persistent log file at
/// `$XDG_CACHE_HOME/devutils/<command>.log` (default
/// `~/.cache/devutils/<command>.log`) through the file layer installed by
/// [`init_subscriber`](super::init_subscriber), regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    tools: Mutex<Vec<ToolEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Stores the log file path for display in the run summary.  The file
    /// itself is created by [`init_subscriber`](super::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            tools: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded tool outcomes.
    #[must_use]
    pub fn tool_entries(&self) -> Vec<ToolEntry> {
        self.tools.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Write `line` to stdout as-is.
    #[allow(clippy::print_stdout)]
    pub fn output(&self, line: &str) {
        println!("{line}");
    }

    /// Record a tool's outcome for the summary.
    pub fn record_tool(&self, name: &str, status: ToolStatus, detail: Option<&str>) {
        tracing::debug!("{name}: {status}");
        if let Ok(mut guard) = self.tools.lock() {
            guard.push(ToolEntry {
                name: name.to_string(),
                status,
                detail: detail.map(String::from),
            });
        }
    }

    /// Number of tools that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tools.lock().map_or(0, |guard| {
            guard.iter().filter(|t| t.status.is_failure()).count()
        })
    }

    /// Print one line per recorded tool, then the totals.
    pub fn print_summary(&self) {
        let entries = self.tool_entries();
        if entries.is_empty() {
            return;
        }

        self.output("");
        self.stage("Summary");
        for entry in &entries {
            tracing::info!(
                target: TOOL_TARGET,
                tool = entry.name.as_str(),
                status = entry.status.label(),
                detail = entry.detail.as_deref().unwrap_or_default(),
            );
        }
        self.output("");
        self.info(&totals(&entries));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

/// `5 tools: 2 installed, 1 already installed, 1 n/a, 1 failed`; statuses
/// with no tools are left out.
fn totals(entries: &[ToolEntry]) -> String {
    let counts: Vec<String> = ToolStatus::ALL
        .into_iter()
        .filter_map(|status| {
            let n = entries.iter().filter(|e| e.status == status).count();
            (n > 0).then(|| format!("{n} {status}"))
        })
        .collect();
    format!("{} tools: {}", entries.len(), counts.join(", "))
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, output);

    fn record_tool(&self, name: &str, status: ToolStatus, detail: Option<&str>) {
        self.record_tool(name, status, detail);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    fn entry(name: &str, status: ToolStatus) -> ToolEntry {
        ToolEntry {
            name: name.to_string(),
            status,
            detail: None,
        }
    }

    #[test]
    fn logger_new() {
        let (log, _tmp, _guard) = isolated_logger();
        assert!(log.tool_entries().is_empty(), "expected no tools");
    }

    #[test]
    fn record_tool_with_detail() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_tool("tmux", ToolStatus::AlreadyInstalled, Some("3.4"));
        let tools = log.tool_entries();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "tmux");
        assert_eq!(tools[0].detail, Some("3.4".to_string()));
    }

    #[test]
    fn failure_count_returns_correct_count() {
        let (log, _tmp, _guard) = isolated_logger();
        assert_eq!(log.failure_count(), 0);
        log.record_tool("git", ToolStatus::Installed, None);
        log.record_tool("node", ToolStatus::Failed, Some("exit 100"));
        log.record_tool("zsh", ToolStatus::Failed, Some("exit 1"));
        log.record_tool("brave-browser", ToolStatus::NotAvailable, None);
        assert_eq!(log.failure_count(), 2);
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let (log, _tmp, _guard) = isolated_logger();
        let log_ref: &dyn Log = &log;
        log_ref.record_tool("via-trait", ToolStatus::Installed, None);
        assert_eq!(log.tool_entries().len(), 1);
    }

    #[test]
    fn totals_skip_empty_statuses() {
        let entries = [
            entry("git", ToolStatus::Installed),
            entry("curl", ToolStatus::AlreadyInstalled),
            entry("zsh", ToolStatus::Installed),
            entry("node", ToolStatus::Failed),
        ];
        assert_eq!(
            totals(&entries),
            "4 tools: 2 installed, 1 already installed, 1 failed"
        );
    }

    #[test]
    fn log_file_is_created() {
        let (log, _tmp, _guard) = isolated_logger();
        let path = log.log_path().expect("log path should exist");
        assert!(path.exists(), "log file should be created by the file layer");
    }

    #[test]
    fn log_file_header_names_build_and_command() {
        let (log, _tmp, _guard) = isolated_logger();
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        let header = contents.lines().nth(1).unwrap();
        assert!(header.starts_with(&format!(
            "devutils {} ({}) test ",
            crate::commands::version::current(),
            crate::commands::version::target()
        )));
    }

    #[test]
    fn debug_always_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("[debug]"));
        assert!(contents.contains(&marker));
    }

    #[test]
    fn warn_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("warn-marker-{}", std::process::id());
        log.warn(&marker);
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("[warn]"));
        assert!(contents.contains(&marker));
    }

    #[test]
    fn stage_written_to_file_with_arrow() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("stage-marker-{}", std::process::id());
        log.stage(&marker);
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains(&format!("==> {marker}")));
    }

    #[test]
    fn summary_writes_tool_outcomes_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_tool("curl", ToolStatus::Installed, None);
        log.record_tool("node", ToolStatus::Failed, Some("exit 100"));
        log.print_summary();
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("✓ curl: installed"));
        assert!(contents.contains("✗ node: failed (exit 100)"));
        assert!(contents.contains("2 tools: 1 installed, 1 failed"));
        assert!(!contents.contains('\x1b'));
    }
}
