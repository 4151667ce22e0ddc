//! CLI argument definitions for `cwetree`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use cwetree::config::ConfigOverrides;
use cwetree::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level` for
/// runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(Level::from(*self).as_str())
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `data_dir`, `label_length`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Browse a view as a collapsible tree in the terminal.
    ///
    /// Click or press Enter to expand and collapse, double click or press `o`
    /// to open the reference page, `v` cycles views, `s` shows settings.
    View {
        /// View to open: 699, 1000 or 1008 (defaults to config `default_view`)
        #[arg(long, value_name = "ID")]
        view: Option<String>,
    },
    /// Export a view as a static HTML page, Markdown outline or JSON dataset.
    Export {
        /// View to export: 699, 1000 or 1008 (defaults to config `default_view`)
        #[arg(long, value_name = "ID")]
        view: Option<String>,

        /// Export format: html, markdown (md) or json
        #[arg(short, long, value_name = "FORMAT", default_value = "html")]
        format: String,

        /// Output file path (optional; defaults to config `exports_dir`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Build a view dataset from a MITRE CWE view XML file.
    Import {
        /// Path to the view XML (e.g. `1000.xml`)
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// View the file describes: 699, 1000 or 1008
        #[arg(long, value_name = "ID")]
        view: String,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "cwetree",
    about = "Collapsible tree viewer for the CWE weakness views",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug", global = true)]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config dataset directory
    #[arg(long = "config-data-dir", value_name = "DIR")]
    pub config_data_dir: Option<PathBuf>,

    /// Override config dataset directory (short form)
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Override config export directory
    #[arg(long = "config-exports-dir", value_name = "DIR")]
    pub config_exports_dir: Option<PathBuf>,

    /// Override config export directory (short form)
    #[arg(long = "exports-dir", value_name = "DIR", global = true)]
    pub exports_dir: Option<PathBuf>,

    /// Maximum label length for this run
    #[arg(long, value_name = "CHARS", global = true)]
    pub label_length: Option<usize>,

    /// Horizontal spacing between depth levels for this run
    #[arg(long, value_name = "UNITS", global = true)]
    pub spacing: Option<f64>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--data-dir`) take precedence over long-form flags
    /// (e.g., `--config-data-dir`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            data_dir: path_string(self.data_dir.as_ref())
                .or_else(|| path_string(self.config_data_dir.as_ref())),
            exports_dir: path_string(self.exports_dir.as_ref())
                .or_else(|| path_string(self.config_exports_dir.as_ref())),
            label_length: self.label_length,
            spacing: self.spacing,
        }
    }
}
