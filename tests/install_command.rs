#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the installer catalog behind `install` and `setup`.

mod common;

use std::collections::HashSet;

use devutils_cli::installers::{self, InstallOutcome};
use devutils_cli::platform::PlatformKind;

// ---------------------------------------------------------------------------
// Snapshot: tool catalog
// ---------------------------------------------------------------------------

/// Any addition, removal or rename of a tool changes this snapshot.
#[test]
fn tool_names() {
    let names: Vec<&str> = installers::all_tools().iter().map(|t| t.name()).collect();
    insta::assert_snapshot!("tool_names", names.join("\n"));
}

// ---------------------------------------------------------------------------
// Structural invariants
// ---------------------------------------------------------------------------

#[test]
fn tool_names_are_unique() {
    let tools = installers::all_tools();
    let mut seen: HashSet<&str> = HashSet::new();
    for tool in &tools {
        assert!(seen.insert(tool.name()), "duplicate tool name: {}", tool.name());
    }
}

#[test]
fn every_tool_has_a_description() {
    for tool in installers::all_tools() {
        assert!(!tool.description().is_empty(), "{} has no description", tool.name());
        assert!(!tool.command().is_empty(), "{} has no probe command", tool.name());
    }
}

#[test]
fn setup_installs_prerequisites_first() {
    let names: Vec<&str> = installers::setup_tools().iter().map(|t| t.name()).collect();
    assert_eq!(names[0], "xcode-clt");
    assert_eq!(names[1], "homebrew");
    for name in &names {
        assert!(installers::find_tool(name).is_some(), "{name} not in catalog");
    }
}

#[test]
fn gui_tools_are_not_in_setup() {
    for tool in installers::setup_tools() {
        assert!(!tool.requires_desktop(), "{} needs a desktop", tool.name());
    }
}

#[test]
fn no_tool_supports_unknown_platform() {
    for tool in installers::all_tools() {
        assert!(
            !installers::supports(tool.as_ref(), PlatformKind::Unknown),
            "{} claims to support unknown platforms",
            tool.name()
        );
    }
}

#[test]
fn unsupported_platform_reports_not_available() {
    let env = common::IntegrationTestContext::new(&[]);
    let tool = installers::find_tool("xcode-clt").expect("xcode-clt is in the catalog");
    let outcome = installers::install(tool.as_ref(), &env.ctx).unwrap();
    assert_eq!(outcome, InstallOutcome::NotAvailable);
    assert!(env.log.contains("xcode-clt is not available for linux"));
}
