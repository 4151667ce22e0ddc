//! CLI command handlers for `cwetree`.
//!
//! Each command is implemented in its own submodule.

pub mod config;
pub mod export;
pub mod import;
pub mod view;

use cwetree::config::Config;
use cwetree::core::models::ViewId;
use cwetree::Result;

/// View named on the command line, or the configured default
pub fn resolve_view(requested: Option<&str>, config: &Config) -> Result<ViewId> {
    requested.map_or_else(|| Ok(config.default_view()), str::parse)
}
