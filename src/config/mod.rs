//! Configuration for the `infiniscroll` binary.
//!
//! The library core only needs a [`SentinelConfig`](crate::sentinel::SentinelConfig);
//! this module resolves one (plus the demo feed settings) from defaults, a TOML
//! file, environment variables and CLI flags.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, CliOverrides, ConfigError,
    ConfigFile, ResolvedConfig,
};
