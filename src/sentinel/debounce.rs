//! Trailing-edge coalescing of scroll bursts into a single check.
//!
//! The controller only talks to the [`Debounce`] trait, so the scheduling
//! primitive can be swapped: [`TrailingDebouncer`] waits for a wall-clock quiet
//! interval, [`FrameDebouncer`] waits for a number of quiet host ticks (the
//! terminal equivalent of waiting for animation frames).

use std::time::{Duration, Instant};

/// Default quiet interval before a debounced check fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// A swappable debounce primitive.
///
/// Exactly one check fires per quiet period regardless of how many
/// notifications arrived during it.
pub trait Debounce {
    /// Schedule a check after the quiet period, replacing any pending one.
    fn notify(&mut self, now: Instant);

    /// Drop any pending check.
    fn cancel(&mut self);

    /// Consume the pending check if it is due at `now`.
    fn fire_due(&mut self, now: Instant) -> bool;

    /// When the pending check becomes due, if the primitive is time based.
    fn deadline(&self) -> Option<Instant>;

    /// Whether a check is scheduled.
    fn is_pending(&self) -> bool;
}

/// Wall-clock trailing debouncer.
#[derive(Debug, Clone)]
pub struct TrailingDebouncer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl TrailingDebouncer {
    /// Create a debouncer with the given quiet interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Configured quiet interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for TrailingDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debounce for TrailingDebouncer {
    fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Tick-counting debouncer.
///
/// Fires on the `quiet_ticks`-th call to [`Debounce::fire_due`] after the last
/// notification. Has no deadline; the host must keep ticking.
#[derive(Debug, Clone)]
pub struct FrameDebouncer {
    quiet_ticks: u32,
    remaining: Option<u32>,
}

impl FrameDebouncer {
    /// Create a debouncer that waits `quiet_ticks` ticks (at least one).
    pub fn new(quiet_ticks: u32) -> Self {
        Self {
            quiet_ticks: quiet_ticks.max(1),
            remaining: None,
        }
    }
}

impl Debounce for FrameDebouncer {
    fn notify(&mut self, _now: Instant) {
        self.remaining = Some(self.quiet_ticks);
    }

    fn cancel(&mut self) {
        self.remaining = None;
    }

    fn fire_due(&mut self, _now: Instant) -> bool {
        match self.remaining {
            Some(1) => {
                self.remaining = None;
                true
            }
            Some(n) => {
                self.remaining = Some(n - 1);
                false
            }
            None => false,
        }
    }

    fn deadline(&self) -> Option<Instant> {
        None
    }

    fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }
}
