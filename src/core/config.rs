//! Configuration module for `cwetree`

use crate::core::controller::ViewSettings;
use crate::core::models::ViewId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

const DIR_VARIABLE: &str = "$CWETREE";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the view datasets
    #[serde(default)]
    pub data_dir: String,
    /// Directory for exported trees
    #[serde(default)]
    pub exports_dir: String,
}

const fn default_label_length() -> usize {
    crate::core::controller::DEFAULT_LABEL_LENGTH
}

const fn default_spacing() -> f64 {
    crate::core::controller::DEFAULT_SPACING
}

#[allow(clippy::cast_possible_truncation)]
const fn default_transition_ms() -> u64 {
    crate::core::controller::DEFAULT_TRANSITION.as_millis() as u64
}

#[allow(clippy::cast_possible_truncation)]
const fn default_slow_transition_ms() -> u64 {
    crate::core::controller::DEFAULT_SLOW_TRANSITION.as_millis() as u64
}

/// Tree view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// View shown when none is given on the command line
    #[serde(default)]
    pub default_view: String,
    /// Maximum characters per label
    #[serde(default = "default_label_length")]
    pub label_length: usize,
    /// Horizontal distance between depth levels
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Normal transition length in milliseconds
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    /// Slow (modifier click) transition length in milliseconds
    #[serde(default = "default_slow_transition_ms")]
    pub slow_transition_ms: u64,
    /// Base URL of the reference pages
    #[serde(default)]
    pub reference_url: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_view: String::new(),
            label_length: default_label_length(),
            spacing: default_spacing(),
            transition_ms: default_transition_ms(),
            slow_transition_ms: default_slow_transition_ms(),
            reference_url: String::new(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Tree view settings
    #[serde(default)]
    pub view: ViewConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override dataset directory
    pub data_dir: Option<String>,
    /// Override export directory
    pub exports_dir: Option<String>,
    /// Override label length
    pub label_length: Option<usize>,
    /// Override horizontal spacing
    pub spacing: Option<f64>,
}

impl Config {
    /// Get the `$CWETREE` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/cwetree`
    /// - macOS: `~/Library/Application Support/cwetree`
    /// - Windows: `%APPDATA%\cwetree`
    #[must_use]
    pub fn get_cwetree_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cwetree")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only string fields that are empty here and non-empty in `defaults` are
    /// filled in; numeric view settings already carry serde defaults.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        for (field, default) in [
            (&mut self.logging.level, &defaults.logging.level),
            (&mut self.logging.file, &defaults.logging.file),
            (&mut self.paths.data_dir, &defaults.paths.data_dir),
            (&mut self.paths.exports_dir, &defaults.paths.exports_dir),
            (&mut self.view.default_view, &defaults.view.default_view),
            (&mut self.view.reference_url, &defaults.view.reference_url),
        ] {
            if field.is_empty() && !default.is_empty() {
                field.clone_from(default);
                changed = true;
            }
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Only non-`None` values replace config values; nothing is persisted.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(data_dir) = &overrides.data_dir {
            self.paths.data_dir.clone_from(data_dir);
        }
        if let Some(exports_dir) = &overrides.exports_dir {
            self.paths.exports_dir.clone_from(exports_dir);
        }

        if let Some(label_length) = overrides.label_length {
            self.view.label_length = label_length;
        }
        if let Some(spacing) = overrides.spacing {
            self.view.spacing = spacing;
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, inside
    /// [`get_cwetree_dir`](Self::get_cwetree_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_cwetree_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$CWETREE` to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_cwetree_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// `$CWETREE` is expanded in path-like values. Missing fields fall back to
    /// their serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.data_dir = Self::expand_variables(&config.paths.data_dir);
        config.paths.exports_dir = Self::expand_variables(&config.paths.exports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the compiled-in default configuration cannot be parsed.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create it from defaults on first run
    ///
    /// Fields added since the file was written are merged in from the defaults
    /// and the file is rewritten. Any read or parse failure yields the defaults.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Keys are bare field names (`level`, `data_dir`, `label_length`, ...);
    /// dashes are accepted in place of underscores.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key.replace('-', "_").as_str() {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "data_dir" => Some(self.paths.data_dir.clone()),
            "exports_dir" => Some(self.paths.exports_dir.clone()),
            "default_view" => Some(self.view.default_view.clone()),
            "label_length" => Some(self.view.label_length.to_string()),
            "spacing" => Some(self.view.spacing.to_string()),
            "transition_ms" => Some(self.view.transition_ms.to_string()),
            "slow_transition_ms" => Some(self.view.slow_transition_ms.to_string()),
            "reference_url" => Some(self.view.reference_url.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Call [`save()`](Config::save) to persist the change.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value does not parse
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        fn number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| format!("Invalid numeric value for '{key}': '{value}'"))
        }

        match key.replace('-', "_").as_str() {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "data_dir" => self.paths.data_dir = value.to_string(),
            "exports_dir" => self.paths.exports_dir = value.to_string(),
            "default_view" => {
                let view = ViewId::lookup(value)
                    .ok_or_else(|| format!("Unknown view '{value}' (expected 699, 1000 or 1008)"))?;
                self.view.default_view = view.id().to_string();
            }
            "label_length" => self.view.label_length = number(key, value)?,
            "spacing" => self.view.spacing = number(key, value)?,
            "transition_ms" => self.view.transition_ms = number(key, value)?,
            "slow_transition_ms" => self.view.slow_transition_ms = number(key, value)?,
            "reference_url" => self.view.reference_url = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset a single configuration value to its default
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "data_dir" => self.paths.data_dir.clone_from(&defaults.paths.data_dir),
            "exports_dir" => self
                .paths
                .exports_dir
                .clone_from(&defaults.paths.exports_dir),
            "default_view" => self
                .view
                .default_view
                .clone_from(&defaults.view.default_view),
            "label_length" => self.view.label_length = defaults.view.label_length,
            "spacing" => self.view.spacing = defaults.view.spacing,
            "transition_ms" => self.view.transition_ms = defaults.view.transition_ms,
            "slow_transition_ms" => {
                self.view.slow_transition_ms = defaults.view.slow_transition_ms;
            }
            "reference_url" => self
                .view
                .reference_url
                .clone_from(&defaults.view.reference_url),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Delete the config file so the next [`load()`](Config::load) recreates it
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// View to show when none is requested; unknown ids fall back to 699
    #[must_use]
    pub fn default_view(&self) -> ViewId {
        ViewId::lookup(&self.view.default_view).unwrap_or(ViewId::Development)
    }

    /// Controller settings derived from the `[view]` section, sanitized
    #[must_use]
    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            label_length: self.view.label_length,
            spacing: self.view.spacing,
            transition: Duration::from_millis(self.view.transition_ms),
            slow_transition: Duration::from_millis(self.view.slow_transition_ms),
            reference_url: self.view.reference_url.clone(),
            ..ViewSettings::default()
        }
        .sanitized()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  data_dir = \"{}\"", self.paths.data_dir)?;
        writeln!(f, "  exports_dir = \"{}\"", self.paths.exports_dir)?;

        writeln!(f, "\n[view]")?;
        writeln!(f, "  default_view = \"{}\"", self.view.default_view)?;
        writeln!(f, "  label_length = {}", self.view.label_length)?;
        writeln!(f, "  spacing = {}", self.view.spacing)?;
        writeln!(f, "  transition_ms = {}", self.view.transition_ms)?;
        writeln!(f, "  slow_transition_ms = {}", self.view.slow_transition_ms)?;
        writeln!(f, "  reference_url = \"{}\"", self.view.reference_url)?;

        Ok(())
    }
}
