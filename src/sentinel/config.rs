//! Controller settings.

use super::debounce::DEFAULT_DEBOUNCE;
use crate::model::{SentinelError, Threshold};
use std::time::Duration;

/// Settings for a [`LoadMoreController`](super::LoadMoreController).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentinelConfig {
    /// Quiet time after the last scroll event before a check runs.
    pub debounce: Duration,
    /// Percentage of the scrollable distance that counts as "reached bottom".
    pub threshold: Threshold,
    /// Send every check to the diagnostics sink.
    pub debug: bool,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            threshold: Threshold::END,
            debug: false,
        }
    }
}

impl SentinelConfig {
    /// Build settings from raw values, validating the threshold.
    pub fn from_raw(debounce_ms: u64, percent: f64, debug: bool) -> Result<Self, SentinelError> {
        Ok(Self {
            debounce: Duration::from_millis(debounce_ms),
            threshold: Threshold::new(percent)?,
            debug,
        })
    }
}
