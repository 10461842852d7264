//! Developer machine bootstrap engine.
//!
//! Installs a curated set of developer tools on macOS, Debian-family,
//! RHEL-family and Windows hosts, and ships a handful of cross-platform
//! shell helpers.
//!
//! - **[`platform`]**: detect the host OS, distribution and package manager
//! - **[`exec`]** / **[`packages`]**: run native commands and package managers
//! - **[`installers`]**: one idempotent installer per tool
//! - **[`scripts`]**: shell-replacement helpers (`org-by-date`, `s`, `ll`, ...)
//! - **[`config`]** / **[`completion`]**: the `~/.devutils` profile and rc-file integration
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod installers;
pub mod logging;
pub mod packages;
pub mod platform;
pub mod scripts;
pub mod version;
