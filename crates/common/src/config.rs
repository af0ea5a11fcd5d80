//! # Shell Configuration
//!
//! Settings for the workspace shell: lifecycle orchestration tuning and
//! logging output.
//!
//! ## Configuration Loading
//!
//! Configuration is loaded from multiple sources in order of precedence:
//! 1. Environment variables (QUANTUM_*)
//! 2. Configuration files (explicit path, `QUANTUM_CONFIG`, quantum.toml,
//!    .quantum/quantum.toml)
//! 3. Built-in defaults

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use quantum_lifecycle::{parse_timeout_ms, LifecycleConfig, TIMEOUT_WARNING_ENV};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const CONFIG_ENV: &str = "QUANTUM_CONFIG";
pub const SHOW_LOADER_ENV: &str = "QUANTUM_SHOW_LOADER";
pub const LIFECYCLE_LOGGING_ENV: &str = "QUANTUM_LIFECYCLE_LOGGING";
pub const LOG_LEVEL_ENV: &str = "QUANTUM_LOG_LEVEL";

/// Top-level configuration of the workspace shell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Lifecycle orchestration settings
    pub lifecycle: LifecycleConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when neither `--log-level` nor `RUST_LOG` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Emit JSON lines instead of human readable output.
    pub json: bool,
}

/// Errors that can occur while loading the shell configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Raised when the configuration file cannot be read.
    #[error("failed to read shell config at {path:?}")]
    Io {
        /// Path that failed to load
        path: PathBuf,
        /// Source I/O error
        #[source]
        source: std::io::Error,
    },

    /// Raised when the configuration file cannot be parsed as TOML.
    #[error("failed to parse shell config at {path:?}")]
    Parse {
        /// Path that failed to parse
        path: PathBuf,
        /// Underlying TOML parser error
        #[source]
        source: toml::de::Error,
    },
}

impl ShellConfig {
    /// Loads configuration from the given path, applying environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;

        let mut config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path_ref.to_path_buf(),
            source,
        })?;

        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from standard sources (path override, env, defaults).
    pub fn from_sources(path_override: Option<PathBuf>) -> Self {
        if let Some(path) = Self::discover_config_path(path_override) {
            match Self::load_from_path(&path) {
                Ok(config) => return config,
                Err(err) => warn!("Ignoring shell config: {}", err),
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Serializes the effective configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Applies environment variable overrides using the `QUANTUM_*` namespace.
    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var(TIMEOUT_WARNING_ENV) {
            self.lifecycle.timeout_warning_ms = parse_timeout_ms(&value);
        }

        if let Ok(value) = env::var(SHOW_LOADER_ENV) {
            if let Some(flag) = parse_flag(&value) {
                self.lifecycle.show_loader = flag;
            }
        }

        if let Ok(value) = env::var(LIFECYCLE_LOGGING_ENV) {
            if let Some(flag) = parse_flag(&value) {
                self.lifecycle.enable_logging = flag;
            }
        }

        if let Ok(value) = env::var(LOG_LEVEL_ENV) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                self.logging.level = Some(trimmed.to_string());
            }
        }
    }

    /// Discovers the configuration path to use.
    fn discover_config_path(path_override: Option<PathBuf>) -> Option<PathBuf> {
        if let Some(path) = path_override {
            return Some(path);
        }

        if let Ok(from_env) = env::var(CONFIG_ENV) {
            let trimmed = from_env.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }

        let candidates = [
            PathBuf::from("quantum.toml"),
            Path::new(".quantum").join("quantum.toml"),
        ];

        candidates.into_iter().find(|candidate| candidate.exists())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
