//! Configuration file support for dartbind.
//!
//! dartbind supports two configuration file locations:
//! - Global: `~/.dartbind/config.toml` - User-wide defaults
//! - Project: `.dartbind/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both. Relative paths are resolved against the
//! working directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::bindings::dart::{DEFAULT_BOOTSTRAP, DEFAULT_CLASS_NAME, DEFAULT_CONFIG_FIELD};
use crate::bindings::parser::DEFAULT_PREFIX;

/// Default Zig source scanned for exports.
pub const DEFAULT_INPUT: &str = "src/main.zig";

/// Default formatter executable.
pub const DEFAULT_FORMATTER: &str = "dart";

/// dartbind configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation settings
    pub generate: GenerateConfig,

    /// Formatter settings
    pub format: FormatConfig,
}

/// Generation-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Zig source file to scan
    pub input: Option<PathBuf>,

    /// Where to write the bindings (stdout when unset)
    pub output: Option<PathBuf>,

    /// Namespace prefix of exported symbols (e.g. "rr")
    pub prefix: Option<String>,

    /// Name of the generated state class
    pub class_name: Option<String>,

    /// Name of the configuration string field
    pub config_field: Option<String>,

    /// Bootstrap export suffix (e.g. "start" for `rr_start`)
    pub bootstrap: Option<String>,
}

/// Formatter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Run the formatter on generated code
    pub enabled: Option<bool>,

    /// Formatter executable (invoked as `<command> format <file>`)
    pub command: Option<String>,

    /// Fail the run when formatting fails, instead of emitting unformatted code
    pub required: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let g = other.generate;
        if g.input.is_some() {
            self.generate.input = g.input;
        }
        if g.output.is_some() {
            self.generate.output = g.output;
        }
        if g.prefix.is_some() {
            self.generate.prefix = g.prefix;
        }
        if g.class_name.is_some() {
            self.generate.class_name = g.class_name;
        }
        if g.config_field.is_some() {
            self.generate.config_field = g.config_field;
        }
        if g.bootstrap.is_some() {
            self.generate.bootstrap = g.bootstrap;
        }

        let f = other.format;
        if f.enabled.is_some() {
            self.format.enabled = f.enabled;
        }
        if f.command.is_some() {
            self.format.command = f.command;
        }
        if f.required.is_some() {
            self.format.required = f.required;
        }
    }

    /// Zig source to scan.
    pub fn input(&self) -> PathBuf {
        self.generate
            .input
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT))
    }

    /// Namespace prefix.
    pub fn prefix(&self) -> &str {
        self.generate.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }

    /// State class name.
    pub fn class_name(&self) -> &str {
        self.generate
            .class_name
            .as_deref()
            .unwrap_or(DEFAULT_CLASS_NAME)
    }

    /// Configuration string field name.
    pub fn config_field(&self) -> &str {
        self.generate
            .config_field
            .as_deref()
            .unwrap_or(DEFAULT_CONFIG_FIELD)
    }

    /// Bootstrap export suffix.
    pub fn bootstrap(&self) -> &str {
        self.generate.bootstrap.as_deref().unwrap_or(DEFAULT_BOOTSTRAP)
    }

    /// Whether to run the formatter.
    pub fn format_enabled(&self) -> bool {
        self.format.enabled.unwrap_or(true)
    }

    /// Formatter executable.
    pub fn formatter(&self) -> &str {
        self.format.command.as_deref().unwrap_or(DEFAULT_FORMATTER)
    }

    /// Whether a formatter failure aborts the run.
    pub fn format_required(&self) -> bool {
        self.format.required.unwrap_or(true)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.dartbind/config.toml)
/// 2. Global config (~/.dartbind/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global dartbind config directory (~/.dartbind).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".dartbind"))
}

/// Get the global config path (~/.dartbind/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.dartbind/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".dartbind").join("config.toml")
}
