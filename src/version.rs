//! Version string extraction and comparison.
//!
//! Native tools report their version in free-form text.  Each tool gets one
//! [`VersionParser`] whose pattern documents the output format it expects;
//! the fixtures in the test module are real-world outputs of those commands.
use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

/// Extracts a version number from a tool's `--version` style output.
///
/// The pattern is compiled on first use and shared by every later call.
#[derive(Debug)]
pub struct VersionParser {
    /// Tool the pattern belongs to (for diagnostics).
    pub tool: &'static str,
    regex: LazyLock<Option<Regex>>,
}

impl VersionParser {
    /// Parser for `tool`; `compile` builds a regex with exactly one capture
    /// group holding the version.
    #[must_use]
    pub const fn new(tool: &'static str, compile: fn() -> Option<Regex>) -> Self {
        Self {
            tool,
            regex: LazyLock::new(compile),
        }
    }

    /// The compiled pattern, `None` if it failed to compile.
    #[must_use]
    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    /// First version found in `output`, or `None` if the format is not recognised.
    #[must_use]
    pub fn parse(&self, output: &str) -> Option<String> {
        self.regex()?
            .captures(output)?
            .get(1)
            .map(|m| m.as_str().trim_end_matches('.').to_string())
            .filter(|v| !v.is_empty())
    }
}

macro_rules! version_parser {
    ($tool:literal, $pattern:literal) => {
        VersionParser::new($tool, || Regex::new($pattern).ok())
    };
}

/// `git version 2.43.0`, `git version 2.39.3 (Apple Git-145)`,
/// `git version 2.45.1.windows.1`
pub static GIT: VersionParser = version_parser!("git", r"git version (\d+(?:\.\d+)+)");

/// `curl 8.4.0 (x86_64-apple-darwin23.0) libcurl/8.4.0 ...`
pub static CURL: VersionParser = version_parser!("curl", r"(?m)^curl (\d+(?:\.\d+)+)");

/// `tmux 3.4`, `tmux 3.3a`, `tmux next-3.5`
pub static TMUX: VersionParser =
    version_parser!("tmux", r"tmux (?:next-)?(\d+\.\d+[a-z]?)");

/// `zsh 5.9 (x86_64-apple-darwin23.0)`
pub static ZSH: VersionParser = version_parser!("zsh", r"zsh (\d+(?:\.\d+)+)");

/// `GNU bash, version 5.2.21(1)-release (x86_64-pc-linux-gnu)`
pub static BASH: VersionParser = version_parser!("bash", r"version (\d+(?:\.\d+)+)");

/// `v20.11.0`
pub static NODE: VersionParser = version_parser!("node", r"(?m)^v?(\d+\.\d+\.\d+)");

/// `Brave Browser 120.1.61.109`, `Brave 1.61.109`
pub static BRAVE: VersionParser =
    version_parser!("brave-browser", r"Brave(?:\s+Browser)?\s+([\d.]+)");

/// `Homebrew 4.2.4`, `Homebrew 4.2.4-52-g0ea6e43`
pub static HOMEBREW: VersionParser =
    version_parser!("homebrew", r"Homebrew (\d+(?:\.\d+)+)");

/// `prlctl version 19.1.0 (54729)`
pub static PARALLELS: VersionParser =
    version_parser!("parallels-desktop", r"prlctl version (\d+(?:\.\d+)+)");

/// `xcode-select version 2397.`
pub static XCODE_SELECT: VersionParser =
    version_parser!("xcode-clt", r"xcode-select version (\d+(?:\.\d+)*)");

/// Whether `latest` is strictly newer than `current`.
///
/// Components are compared numerically; a leading `v` is ignored and missing
/// components count as zero.  An unknown current version is never considered
/// outdated.
#[must_use]
pub fn is_newer_version(current: Option<&str>, latest: &str) -> bool {
    let Some(current) = current else {
        return false;
    };
    compare_versions(latest, current) == Ordering::Greater
}

fn compare_versions(a: &str, b: &str) -> Ordering {
    let a = components(a);
    let b = components(b);
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Numeric components of a dotted version; pre-release suffixes are dropped.
fn components(version: &str) -> Vec<u64> {
    let version = version.trim();
    let version = version.strip_prefix(['v', 'V']).unwrap_or(version);
    let core = version.split(['-', '+']).next().unwrap_or_default();
    core.split('.')
        .map(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn parsed(parser: &VersionParser, output: &str) -> Option<String> {
        parser.parse(output)
    }

    // -----------------------------------------------------------------------
    // Fixtures
    // -----------------------------------------------------------------------

    #[test]
    fn git_fixtures() {
        assert_eq!(parsed(&GIT, "git version 2.43.0\n").as_deref(), Some("2.43.0"));
        assert_eq!(
            parsed(&GIT, "git version 2.39.3 (Apple Git-145)\n").as_deref(),
            Some("2.39.3")
        );
        assert_eq!(
            parsed(&GIT, "git version 2.45.1.windows.1\n").as_deref(),
            Some("2.45.1")
        );
    }

    #[test]
    fn curl_fixture() {
        let out = "curl 8.4.0 (x86_64-apple-darwin23.0) libcurl/8.4.0 (SecureTransport) LibreSSL/3.3.6\n\
                   Release-Date: 2023-10-11\n";
        assert_eq!(parsed(&CURL, out).as_deref(), Some("8.4.0"));
    }

    #[test]
    fn tmux_fixtures() {
        assert_eq!(parsed(&TMUX, "tmux 3.4\n").as_deref(), Some("3.4"));
        assert_eq!(parsed(&TMUX, "tmux 3.3a\n").as_deref(), Some("3.3a"));
        assert_eq!(parsed(&TMUX, "tmux next-3.5\n").as_deref(), Some("3.5"));
    }

    #[test]
    fn zsh_fixture() {
        assert_eq!(
            parsed(&ZSH, "zsh 5.9 (x86_64-apple-darwin23.0)\n").as_deref(),
            Some("5.9")
        );
    }

    #[test]
    fn bash_fixture() {
        let out = "GNU bash, version 5.2.21(1)-release (x86_64-pc-linux-gnu)\n\
                   Copyright (C) 2022 Free Software Foundation, Inc.\n";
        assert_eq!(parsed(&BASH, out).as_deref(), Some("5.2.21"));
    }

    #[test]
    fn node_fixture() {
        assert_eq!(parsed(&NODE, "v20.11.0\n").as_deref(), Some("20.11.0"));
    }

    #[test]
    fn brave_fixtures() {
        assert_eq!(
            parsed(&BRAVE, "Brave Browser 120.1.61.109 \n").as_deref(),
            Some("120.1.61.109")
        );
        assert_eq!(parsed(&BRAVE, "Brave 1.61.109\n").as_deref(), Some("1.61.109"));
    }

    #[test]
    fn homebrew_fixture() {
        assert_eq!(
            parsed(&HOMEBREW, "Homebrew 4.2.4-52-g0ea6e43\n").as_deref(),
            Some("4.2.4")
        );
    }

    #[test]
    fn parallels_fixture() {
        assert_eq!(
            parsed(&PARALLELS, "prlctl version 19.1.0 (54729)\n").as_deref(),
            Some("19.1.0")
        );
    }

    #[test]
    fn xcode_select_fixture() {
        assert_eq!(
            parsed(&XCODE_SELECT, "xcode-select version 2397.\n").as_deref(),
            Some("2397")
        );
    }

    #[test]
    fn unrecognised_output_is_none() {
        assert_eq!(parsed(&GIT, "bash: git: command not found"), None);
        assert_eq!(parsed(&NODE, ""), None);
        assert_eq!(parsed(&BRAVE, "Chromium 120.0"), None);
    }

    #[test]
    fn all_patterns_compile() {
        for parser in [
            &GIT, &CURL, &TMUX, &ZSH, &BASH, &NODE, &BRAVE, &HOMEBREW, &PARALLELS,
            &XCODE_SELECT,
        ] {
            assert!(
                parser.regex().is_some(),
                "pattern for {} does not compile",
                parser.tool
            );
        }
    }

    #[test]
    fn regex_is_compiled_once_and_reused() {
        let first = GIT.regex().expect("git pattern");
        assert!(GIT.parse("git version 2.43.0").is_some());
        let second = GIT.regex().expect("git pattern");
        assert!(std::ptr::eq(first, second));
    }

    // -----------------------------------------------------------------------
    // is_newer_version
    // -----------------------------------------------------------------------

    #[test]
    fn newer_patch_is_newer() {
        assert!(is_newer_version(Some("1.2.3"), "1.2.4"));
    }

    #[test]
    fn older_is_not_newer() {
        assert!(!is_newer_version(Some("1.2.4"), "1.2.3"));
    }

    #[test]
    fn equal_is_not_newer() {
        assert!(!is_newer_version(Some("1.2.3"), "1.2.3"));
    }

    #[test]
    fn unknown_current_is_not_newer() {
        assert!(!is_newer_version(None, "1.0.0"));
    }

    #[test]
    fn comparison_is_numeric_not_lexical() {
        assert!(is_newer_version(Some("1.9.0"), "1.10.0"));
        assert!(!is_newer_version(Some("1.10.0"), "1.9.0"));
    }

    #[test]
    fn leading_v_and_missing_components() {
        assert!(!is_newer_version(Some("v1.2"), "1.2.0"));
        assert!(is_newer_version(Some("v1.2"), "v1.2.1"));
    }

    #[test]
    fn prerelease_suffix_is_ignored() {
        assert!(!is_newer_version(Some("0.3.0-dev"), "0.3.0"));
        assert!(is_newer_version(Some("0.2.9-12-gabcdef"), "0.3.0"));
    }
}
