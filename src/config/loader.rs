//! Configuration file loading with precedence handling.

use crate::model::SentinelError;
use crate::sentinel::SentinelConfig;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "INFINISCROLL_CONFIG";

/// Environment variable overriding the `debug` setting.
pub const DEBUG_ENV: &str = "INFINISCROLL_DEBUG";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// Values parsed but do not form a usable controller configuration.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] SentinelError),
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/infiniscroll/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Quiet interval after the last scroll event, in milliseconds.
    #[serde(default)]
    pub debounce_ms: Option<u64>,

    /// Percentage of the scrollable distance that triggers a load.
    #[serde(default)]
    pub percent: Option<f64>,

    /// Emit a diagnostics record for every check.
    #[serde(default)]
    pub debug: Option<bool>,

    /// Items appended by each simulated page load.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Simulated page load latency, in milliseconds.
    #[serde(default)]
    pub latency_ms: Option<u64>,

    /// Fail every Nth simulated load (0 disables failures).
    #[serde(default)]
    pub fail_every: Option<usize>,

    /// Stop producing items once the feed holds this many.
    #[serde(default)]
    pub max_items: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Debounce interval in milliseconds.
    pub debounce_ms: u64,
    /// Load threshold percentage, validated by [`ResolvedConfig::sentinel_config`].
    pub percent: f64,
    /// Diagnostics mode.
    pub debug: bool,
    /// Items per simulated page.
    pub page_size: usize,
    /// Simulated load latency in milliseconds.
    pub latency_ms: u64,
    /// Fail every Nth load, 0 for never.
    pub fail_every: usize,
    /// Feed size cap.
    pub max_items: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            percent: 100.0,
            debug: false,
            page_size: 20,
            latency_ms: 400,
            fail_every: 0,
            max_items: 200,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Build the controller settings, validating the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `percent` is outside `(0, 100]`.
    pub fn sentinel_config(&self) -> Result<SentinelConfig, ConfigError> {
        Ok(SentinelConfig::from_raw(
            self.debounce_ms,
            self.percent,
            self.debug,
        )?)
    }
}

/// Flags the user set explicitly on the command line.
///
/// `None` leaves the lower-precedence value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    /// `--debounce-ms`
    pub debounce_ms: Option<u64>,
    /// `--percent`
    pub percent: Option<f64>,
    /// `--debug`
    pub debug: Option<bool>,
    /// `--page-size`
    pub page_size: Option<usize>,
    /// `--latency-ms`
    pub latency_ms: Option<u64>,
    /// `--fail-every`
    pub fail_every: Option<usize>,
    /// `--max-items`
    pub max_items: Option<usize>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/infiniscroll/infiniscroll.log` on Unix-like systems,
/// or the platform equivalent elsewhere.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("infiniscroll").join("infiniscroll.log")
    } else {
        PathBuf::from("infiniscroll.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/infiniscroll/config.toml` on Unix, appropriate path on other
/// platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("infiniscroll").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `INFINISCROLL_CONFIG` environment variable
/// 3. Default path `~/.config/infiniscroll/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed, or
/// if `INFINISCROLL_CONFIG` is set to an empty or non-unicode value.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    match std::env::var(CONFIG_ENV) {
        Ok(env_path) if env_path.trim().is_empty() => {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV} is empty")));
        }
        Ok(env_path) => return load_config_file(PathBuf::from(env_path)),
        Err(std::env::VarError::NotUnicode(raw)) => {
            return Err(ConfigError::InvalidPath(raw.to_string_lossy().into_owned()));
        }
        Err(std::env::VarError::NotPresent) => {}
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `INFINISCROLL_DEBUG`: `1`/`true`/`yes`/`on` enable diagnostics,
///   `0`/`false`/`no`/`off` disable them. Other values are ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(value) = std::env::var(DEBUG_ENV) {
        if let Some(debug) = parse_flag(&value) {
            config.debug = debug;
        }
    }

    config
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        debounce_ms: config.debounce_ms.unwrap_or(defaults.debounce_ms),
        percent: config.percent.unwrap_or(defaults.percent),
        debug: config.debug.unwrap_or(defaults.debug),
        page_size: config.page_size.unwrap_or(defaults.page_size),
        latency_ms: config.latency_ms.unwrap_or(defaults.latency_ms),
        fail_every: config.fail_every.unwrap_or(defaults.fail_every),
        max_items: config.max_items.unwrap_or(defaults.max_items),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(debounce_ms) = cli.debounce_ms {
        config.debounce_ms = debounce_ms;
    }
    if let Some(percent) = cli.percent {
        config.percent = percent;
    }
    if let Some(debug) = cli.debug {
        config.debug = debug;
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if let Some(latency_ms) = cli.latency_ms {
        config.latency_ms = latency_ms;
    }
    if let Some(fail_every) = cli.fail_every {
        config.fail_every = fail_every;
    }
    if let Some(max_items) = cli.max_items {
        config.max_items = max_items;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
