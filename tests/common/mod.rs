// Shared helpers for integration tests.
//
// Integration tests only see the public API, so this module provides a
// fixed-environment probe and a capturing logger for building a `Context`
// rooted in a temporary home directory.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use devutils_cli::context::Context;
use devutils_cli::exec::SystemExecutor;
use devutils_cli::logging::{Log, ToolStatus};
use devutils_cli::platform::{HostProbe, PlatformDescriptor, PlatformKind};

/// Probe with a fixed environment; files are looked up on the real disk.
#[derive(Debug, Default)]
pub struct StaticProbe {
    pub env: HashMap<String, String>,
}

impl HostProbe for StaticProbe {
    fn os(&self) -> String {
        std::env::consts::OS.to_string()
    }

    fn env(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }
}

/// A [`Log`] that keeps messages in memory.
#[derive(Debug, Default)]
pub struct CapturingLog {
    messages: Mutex<Vec<String>>,
}

impl CapturingLog {
    fn push(&self, msg: &str) {
        if let Ok(mut guard) = self.messages.lock() {
            guard.push(msg.to_string());
        }
    }

    /// Whether any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages
            .lock()
            .map(|g| g.iter().any(|m| m.contains(needle)))
            .unwrap_or(false)
    }
}

impl Log for CapturingLog {
    fn stage(&self, msg: &str) {
        self.push(msg);
    }
    fn info(&self, msg: &str) {
        self.push(msg);
    }
    fn debug(&self, msg: &str) {
        self.push(msg);
    }
    fn warn(&self, msg: &str) {
        self.push(msg);
    }
    fn error(&self, msg: &str) {
        self.push(msg);
    }
    fn record_tool(&self, name: &str, status: ToolStatus, _detail: Option<&str>) {
        self.push(&format!("{name}: {status}"));
    }
    fn output(&self, line: &str) {
        self.push(line);
    }
}

/// An isolated home directory backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    pub home: tempfile::TempDir,
    pub log: Arc<CapturingLog>,
    pub ctx: Context,
}

impl IntegrationTestContext {
    /// Generic Linux host with the given environment and a fresh home.
    pub fn new(env: &[(&str, &str)]) -> Self {
        let home = tempfile::tempdir().expect("create temp dir");
        let log = Arc::new(CapturingLog::default());
        let probe = StaticProbe {
            env: env
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        };
        let ctx = Context {
            platform: PlatformDescriptor::new(PlatformKind::Linux, None, None),
            executor: Arc::new(SystemExecutor),
            probe: Arc::new(probe),
            log: Arc::clone(&log) as Arc<dyn Log>,
            home: home.path().to_path_buf(),
            interactive: false,
        };
        Self { home, log, ctx }
    }

    /// Path to the temporary home directory.
    pub fn home_path(&self) -> &Path {
        self.home.path()
    }
}
