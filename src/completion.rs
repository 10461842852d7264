//! Shell completion integration.
//!
//! `completion install` appends a marker-delimited block to the rc file of
//! the user's shell; the block sources the script printed by
//! `devutils completion script <shell>`.  Detection and removal key off the
//! opening marker, so installing twice is a no-op.
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Opening line of the rc-file block.
pub const MARKER: &str = "# @fredlackey/devutils completion";

/// Closing line of the rc-file block.
pub const END_MARKER: &str = "# end @fredlackey/devutils completion";

const BIN_NAME: &str = "devutils";

/// Shells with rc-file integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CompletionShell {
    /// GNU Bash (`~/.bashrc`).
    Bash,
    /// Z shell (`~/.zshrc`).
    Zsh,
    /// fish (`~/.config/fish/config.fish`).
    Fish,
}

impl CompletionShell {
    /// Shell named by a `SHELL` value such as `/bin/zsh`.
    #[must_use]
    pub fn from_shell_path(shell: &str) -> Option<Self> {
        let name = Path::new(shell.trim()).file_name()?.to_str()?;
        match name.trim_end_matches(".exe") {
            "bash" => Some(Self::Bash),
            "zsh" => Some(Self::Zsh),
            "fish" => Some(Self::Fish),
            _ => None,
        }
    }

    /// The rc file this shell reads on startup.
    #[must_use]
    pub fn rc_file(self, home: &Path) -> PathBuf {
        match self {
            Self::Bash => home.join(".bashrc"),
            Self::Zsh => home.join(".zshrc"),
            Self::Fish => home.join(".config").join("fish").join("config.fish"),
        }
    }

    /// The `clap_complete` generator for this shell.
    #[must_use]
    pub const fn generator(self) -> clap_complete::Shell {
        match self {
            Self::Bash => clap_complete::Shell::Bash,
            Self::Zsh => clap_complete::Shell::Zsh,
            Self::Fish => clap_complete::Shell::Fish,
        }
    }

    fn snippet(self) -> String {
        match self {
            Self::Bash => format!("eval \"$({BIN_NAME} completion script bash)\""),
            Self::Zsh => format!(
                "(( $+functions[compdef] )) || {{ autoload -Uz compinit && compinit; }}\n\
                 eval \"$({BIN_NAME} completion script zsh)\""
            ),
            Self::Fish => format!("{BIN_NAME} completion script fish | source"),
        }
    }
}

impl fmt::Display for CompletionShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
        })
    }
}

/// What an install/uninstall call did to the rc file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionChange {
    /// The block was appended.
    Installed(PathBuf),
    /// The marker was already present; nothing was written.
    AlreadyInstalled(PathBuf),
    /// The block was removed.
    Removed(PathBuf),
    /// No marker was found; nothing was written.
    NotInstalled(PathBuf),
}

/// The complete rc-file block for `shell`.
#[must_use]
pub fn block(shell: CompletionShell) -> String {
    format!("{MARKER}\n{}\n{END_MARKER}\n", shell.snippet())
}

/// Append the completion block to the rc file of `shell`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the rc file cannot be read or written.
pub fn install_completion(
    home: &Path,
    shell: CompletionShell,
) -> Result<CompletionChange, ConfigError> {
    let rc = shell.rc_file(home);
    let current = read_rc(&rc)?;
    if current.contains(MARKER) {
        return Ok(CompletionChange::AlreadyInstalled(rc));
    }
    let mut text = current;
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    if !text.is_empty() {
        text.push('\n');
    }
    text.push_str(&block(shell));
    if let Some(parent) = rc.parent() {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    fs::write(&rc, text).map_err(io_error(&rc))?;
    Ok(CompletionChange::Installed(rc))
}

/// Remove the completion block from the rc file of `shell`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the rc file cannot be read or written.
pub fn uninstall_completion(
    home: &Path,
    shell: CompletionShell,
) -> Result<CompletionChange, ConfigError> {
    let rc = shell.rc_file(home);
    let current = read_rc(&rc)?;
    let Some(stripped) = remove_block(&current) else {
        return Ok(CompletionChange::NotInstalled(rc));
    };
    fs::write(&rc, stripped).map_err(io_error(&rc))?;
    Ok(CompletionChange::Removed(rc))
}

/// `text` without the completion block, or `None` if there is none.
///
/// A block without a closing marker is taken to be the marker line plus the
/// single line after it.  The blank separator line written by install is
/// removed along with the block.
#[must_use]
pub fn remove_block(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|l| l.trim() == MARKER)?;
    let end = lines
        .iter()
        .skip(start + 1)
        .position(|l| l.trim() == END_MARKER)
        .map_or(start + 1, |offset| start + 1 + offset);

    let before = lines.get(..start).unwrap_or_default();
    let before = match before.split_last() {
        Some((last, rest)) if last.trim().is_empty() => rest,
        _ => before,
    };
    let after = lines.get(end + 1..).unwrap_or_default();

    let mut out = before
        .iter()
        .chain(after)
        .copied()
        .collect::<Vec<_>>()
        .join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    Some(out)
}

/// Write the completion script for `shell` to `out`.
pub fn generate_script(shell: clap_complete::Shell, cmd: &mut clap::Command, out: &mut dyn Write) {
    clap_complete::generate(shell, cmd, BIN_NAME, out);
}

fn read_rc(rc: &Path) -> Result<String, ConfigError> {
    match fs::read_to_string(rc) {
        Ok(t) => Ok(t),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(ConfigError::Io {
            path: rc.to_path_buf(),
            source,
        }),
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ConfigError {
    let path = path.to_path_buf();
    move |source| ConfigError::Io { path, source }
}
