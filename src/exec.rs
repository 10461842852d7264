//! Shell execution facade.
//!
//! Every higher layer invokes native tools through the [`Executor`] trait so
//! that installers and scripts can be unit-tested with a scripted mock.
//! Spawn-level failures are reported as [`ExecError`]; a command that runs
//! and exits non-zero is an `Ok` [`ExecResult`] with `success == false`.
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::ExecError;

/// Poll interval while waiting on a process with a timeout.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

impl ExecResult {
    /// Exit code, or `-1` when the process was terminated by a signal.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(-1)
    }

    /// Stdout followed by stderr, trimmed.
    #[must_use]
    pub fn combined_output(&self) -> String {
        let mut out = self.stdout.trim().to_string();
        let err = self.stderr.trim();
        if !err.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(err);
        }
        out
    }
}

/// Abstraction over native process execution.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command and capture its output without failing on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::NotFound`] if the program does not exist and
    /// [`ExecError::Spawn`] for any other spawn failure.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError>;

    /// Run a command in `dir` without failing on non-zero exit.
    ///
    /// # Errors
    ///
    /// Same as [`run_unchecked`](Self::run_unchecked).
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult, ExecError>;

    /// Locate `program` on `PATH`.
    fn which(&self, program: &str) -> Option<PathBuf>;

    /// Run a command, killing it if it does not finish within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::TimedOut`] when the deadline passes.
    fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<ExecResult, ExecError> {
        self.run_unchecked(program, args)
    }

    /// Run a command, handing each output line to a callback as it arrives.
    ///
    /// # Errors
    ///
    /// Same as [`run_unchecked`](Self::run_unchecked).
    fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        on_stdout: &mut dyn FnMut(&str),
        on_stderr: &mut dyn FnMut(&str),
    ) -> Result<ExecResult, ExecError> {
        let result = self.run_unchecked(program, args)?;
        result.stdout.lines().for_each(&mut *on_stdout);
        result.stderr.lines().for_each(&mut *on_stderr);
        Ok(result)
    }

    /// Run a command and fail on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Failed`] if the command exits non-zero, or any
    /// spawn error from [`run_unchecked`](Self::run_unchecked).
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        let result = self.run_unchecked(program, args)?;
        if result.success {
            Ok(result)
        } else {
            Err(ExecError::Failed {
                program: program.to_string(),
                code: result.exit_code(),
                stderr: result.stderr.trim().to_string(),
            })
        }
    }

    /// Run a pipeline through the platform shell (`sh -c` or `cmd /C`).
    ///
    /// # Errors
    ///
    /// Same as [`run_unchecked`](Self::run_unchecked).
    fn run_shell(&self, script: &str) -> Result<ExecResult, ExecError> {
        if cfg!(windows) {
            self.run_unchecked("cmd", &["/C", script])
        } else {
            self.run_unchecked("sh", &["-c", script])
        }
    }

    /// Run a PowerShell snippet non-interactively.
    ///
    /// # Errors
    ///
    /// Same as [`run_unchecked`](Self::run_unchecked).
    fn run_powershell(&self, script: &str) -> Result<ExecResult, ExecError> {
        self.run_unchecked(
            "powershell",
            &["-NoProfile", "-NonInteractive", "-Command", script],
        )
    }

    /// Whether `program` is on `PATH`.
    fn command_exists(&self, program: &str) -> bool {
        self.which(program).is_some()
    }

    /// Best-effort stdout of a command: empty on any failure.
    ///
    /// Only for probes (version strings, paths) where "no answer" and
    /// "failed" lead to the same decision.
    fn capture(&self, program: &str, args: &[&str]) -> String {
        match self.run_unchecked(program, args) {
            Ok(result) if result.success => result.stdout.trim().to_string(),
            _ => String::new(),
        }
    }
}

/// Production [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl SystemExecutor {
    /// Build a command, resolving the program through `PATH` first so that
    /// Windows shims such as `npm.cmd` are found.
    fn command(program: &str, args: &[&str]) -> Command {
        let resolved = which::which(program).unwrap_or_else(|_| PathBuf::from(program));
        let mut cmd = Command::new(resolved);
        cmd.args(args);
        cmd
    }

    fn spawn_error(program: &str, err: std::io::Error) -> ExecError {
        if err.kind() == std::io::ErrorKind::NotFound {
            ExecError::NotFound {
                program: program.to_string(),
            }
        } else {
            ExecError::Spawn {
                program: program.to_string(),
                source: err,
            }
        }
    }

    fn output(program: &str, mut cmd: Command) -> Result<ExecResult, ExecError> {
        cmd.output()
            .map(ExecResult::from)
            .map_err(|e| Self::spawn_error(program, e))
    }

    fn spawn_piped(program: &str, args: &[&str]) -> Result<Child, ExecError> {
        Self::command(program, args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Self::spawn_error(program, e))
    }
}

/// Drain a pipe on a background thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_string(&mut buf).ok();
        }
        buf
    })
}

/// A line read from one of the child's output streams.
enum StreamLine {
    Stdout(String),
    Stderr(String),
}

impl Executor for SystemExecutor {
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        Self::output(program, Self::command(program, args))
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        let mut cmd = Self::command(program, args);
        cmd.current_dir(dir);
        Self::output(program, cmd)
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<ExecResult, ExecError> {
        let mut child = Self::spawn_piped(program, args)?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let deadline = Instant::now() + timeout;

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    child.kill().ok();
                    child.wait().ok();
                    return Err(ExecError::TimedOut {
                        program: program.to_string(),
                        seconds: timeout.as_secs(),
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(Self::spawn_error(program, e)),
            }
        };

        Ok(ExecResult {
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
            success: status.success(),
            code: status.code(),
        })
    }

    fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        on_stdout: &mut dyn FnMut(&str),
        on_stderr: &mut dyn FnMut(&str),
    ) -> Result<ExecResult, ExecError> {
        let mut child = Self::spawn_piped(program, args)?;
        let (tx, rx) = mpsc::channel();

        let mut readers = Vec::new();
        if let Some(out) = child.stdout.take() {
            let tx = tx.clone();
            readers.push(thread::spawn(move || {
                for line in BufReader::new(out).lines().map_while(Result::ok) {
                    if tx.send(StreamLine::Stdout(line)).is_err() {
                        break;
                    }
                }
            }));
        }
        if let Some(err) = child.stderr.take() {
            let tx = tx.clone();
            readers.push(thread::spawn(move || {
                for line in BufReader::new(err).lines().map_while(Result::ok) {
                    if tx.send(StreamLine::Stderr(line)).is_err() {
                        break;
                    }
                }
            }));
        }
        drop(tx);

        let mut result = ExecResult::default();
        for line in rx {
            match line {
                StreamLine::Stdout(line) => {
                    on_stdout(&line);
                    result.stdout.push_str(&line);
                    result.stdout.push('\n');
                }
                StreamLine::Stderr(line) => {
                    on_stderr(&line);
                    result.stderr.push_str(&line);
                    result.stderr.push('\n');
                }
            }
        }
        for reader in readers {
            reader.join().ok();
        }

        let status = child.wait().map_err(|e| Self::spawn_error(program, e))?;
        result.success = status.success();
        result.code = status.code();
        Ok(result)
    }
}

/// Run a command with the system executor, allowing failure.
///
/// # Errors
///
/// Returns an error only when the process cannot be spawned.
pub fn run_unchecked(program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
    SystemExecutor.run_unchecked(program, args)
}

/// Locate a program on `PATH`.
#[must_use]
pub fn which(program: &str) -> Option<PathBuf> {
    SystemExecutor.which(program)
}

/// Check if a program is available on `PATH`.
#[must_use]
pub fn command_exists(program: &str) -> bool {
    SystemExecutor.command_exists(program)
}

/// Best-effort stdout of a command; empty string on any failure.
#[must_use]
pub fn capture(program: &str, args: &[&str]) -> String {
    SystemExecutor.capture(program, args)
}

/// Shared test helpers for executor-driven unit tests.
#[cfg(test)]
pub mod test_helpers {
    use super::{ExecResult, Executor};
    use crate::error::ExecError;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// A canned response for every command line starting with `prefix`.
    #[derive(Debug, Clone)]
    struct Rule {
        prefix: String,
        code: i32,
        stdout: String,
    }

    /// A scripted, recording executor.
    ///
    /// Command lines are matched against the configured prefixes in order;
    /// unmatched calls fail with exit code 1 and stderr `"unexpected call"`.
    /// [`provides`](Self::provides) makes a program appear on `PATH` once a
    /// matching command succeeds, which lets tests observe post-install
    /// verification.
    #[derive(Debug, Default)]
    pub struct MockExecutor {
        rules: Vec<Rule>,
        provides: Vec<(String, String)>,
        on_path: Mutex<HashSet<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockExecutor {
        /// An executor with no rules and nothing on `PATH`.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Make `program` resolvable through [`Executor::which`].
        #[must_use]
        pub fn with_program(self, program: &str) -> Self {
            if let Ok(mut guard) = self.on_path.lock() {
                guard.insert(program.to_string());
            }
            self
        }

        /// Answer command lines starting with `prefix`.
        #[must_use]
        pub fn respond(mut self, prefix: &str, code: i32, stdout: &str) -> Self {
            self.rules.push(Rule {
                prefix: prefix.to_string(),
                code,
                stdout: stdout.to_string(),
            });
            self
        }

        /// Once a command starting with `prefix` succeeds, `program` is on `PATH`.
        #[must_use]
        pub fn provides(mut self, prefix: &str, program: &str) -> Self {
            self.provides.push((prefix.to_string(), program.to_string()));
            self
        }

        /// Every command line issued so far.
        #[must_use]
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().map(|g| g.clone()).unwrap_or_default()
        }

        /// Number of recorded command lines starting with `prefix`.
        #[must_use]
        pub fn count(&self, prefix: &str) -> usize {
            self.calls()
                .iter()
                .filter(|c| c.starts_with(prefix))
                .count()
        }

        fn respond_to(&self, line: String) -> ExecResult {
            if let Ok(mut guard) = self.calls.lock() {
                guard.push(line.clone());
            }
            let Some(rule) = self.rules.iter().find(|r| line.starts_with(&r.prefix)) else {
                return ExecResult {
                    stdout: String::new(),
                    stderr: "unexpected call".to_string(),
                    success: false,
                    code: Some(1),
                };
            };
            if rule.code == 0 {
                for (prefix, program) in &self.provides {
                    if line.starts_with(prefix.as_str())
                        && let Ok(mut guard) = self.on_path.lock()
                    {
                        guard.insert(program.clone());
                    }
                }
            }
            ExecResult {
                stdout: rule.stdout.clone(),
                stderr: String::new(),
                success: rule.code == 0,
                code: Some(rule.code),
            }
        }
    }

    impl Executor for MockExecutor {
        fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
            let line = std::iter::once(program)
                .chain(args.iter().copied())
                .collect::<Vec<_>>()
                .join(" ");
            Ok(self.respond_to(line))
        }

        fn run_in(
            &self,
            _dir: &Path,
            program: &str,
            args: &[&str],
        ) -> Result<ExecResult, ExecError> {
            self.run_unchecked(program, args)
        }

        fn which(&self, program: &str) -> Option<PathBuf> {
            self.on_path
                .lock()
                .ok()
                .filter(|g| g.contains(program))
                .map(|_| PathBuf::from("/usr/bin").join(program))
        }
    }
}
