//! Error types for infiniscroll.
//!
//! This module defines the error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error of the demo binary
//!   - [`SentinelError`] - Invalid controller settings (threshold out of range)
//!   - [`ConfigError`] - Config file read/parse failures
//!   - [`LoggingError`] - Tracing subscriber initialisation failures
//!   - `std::io::Error` - Terminal/TUI failures
//! - [`LoadError`] - Failure reported by a load-more callback
//!
//! # Error Recovery Strategy
//!
//! The load-more controller never lets an error escape. Degenerate geometry is a
//! defined edge case, operations on an unbound controller are no-ops, and a
//! failed load is logged and discarded: the controller returns to idle exactly
//! as it would after a successful load. Surfacing a failed load to the user is
//! the job of whoever produced the failing future.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use thiserror::Error;

/// Top-level error of the demo binary.
///
/// Domain-specific errors convert into `AppError` via `From`, so `main` can use
/// `?` throughout.
#[derive(Debug, Error)]
pub enum AppError {
    /// Controller settings were rejected.
    ///
    /// **Recovery**: Report the offending value and exit. Settings come from the
    /// config file or the CLI, so the user can fix them.
    #[error("Invalid controller settings: {0}")]
    Sentinel(#[from] SentinelError),

    /// The config file exists but could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal or TUI rendering error.
    ///
    /// Failures in the crossterm/ratatui layer. This is a **fatal error** - the
    /// terminal is restored and the error is written to stderr.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Invalid settings for a load-more controller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SentinelError {
    /// The percent threshold must lie in `(0, 100]`.
    ///
    /// NaN is rejected as well: a NaN threshold would make `reached_bottom`
    /// permanently false, silently disabling loading.
    ///
    /// # Examples
    ///
    /// ```
    /// use infiniscroll::model::error::SentinelError;
    ///
    /// let err = SentinelError::ThresholdOutOfRange(120.0);
    /// assert!(err.to_string().contains("120"));
    /// ```
    #[error("Percent threshold {0} is outside the valid range (0, 100]")]
    ThresholdOutOfRange(f64),
}

/// Failure of a load-more callback.
///
/// Only ever observed by the controller, which logs it at `warn` level and
/// discards it. The message is the callback's own error rendered with `Display`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The callback's future resolved to an error.
    #[error("load-more callback failed: {0}")]
    Failed(String),
}

impl LoadError {
    /// Build a `Failed` error from anything displayable.
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        Self::Failed(reason.to_string())
    }
}
