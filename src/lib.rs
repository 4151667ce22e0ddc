//! Shared library for `cwetree`
//! Contains the collapsible tree controller, dataset loading, CWE catalog import,
//! exports and the terminal front end used by the CLI.

pub mod core;
pub mod logger;
pub mod tui;

pub use crate::core::config;
pub use crate::core::error::{CweTreeError, Result};

/// Returns the current version of the `cwetree` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
