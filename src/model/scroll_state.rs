//! Scroll geometry and the derived scroll-state snapshot.

use super::error::SentinelError;
use serde::Serialize;
use std::fmt;

/// Raw measurements of a scrollable container.
///
/// All values are in the host's length unit (pixels, terminal rows, ...).
/// The calculator never mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollGeometry {
    /// Total height of the content, including the part scrolled out of view.
    pub scroll_height: f64,
    /// Distance the content is currently scrolled from the top.
    pub scroll_top: f64,
    /// Height of the visible viewport.
    pub client_height: f64,
}

impl ScrollGeometry {
    /// Create a geometry snapshot.
    pub fn new(scroll_height: f64, scroll_top: f64, client_height: f64) -> Self {
        Self {
            scroll_height,
            scroll_top,
            client_height,
        }
    }
}

/// Percentage of the scrollable distance at which "reached bottom" becomes true.
///
/// Valid range is `(0, 100]`. Defaults to 100 (the very end).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Threshold(f64);

impl Threshold {
    /// Threshold that only fires at the very end of the content.
    pub const END: Threshold = Threshold(100.0);

    /// Create a threshold, rejecting values outside `(0, 100]` and NaN.
    pub fn new(percent: f64) -> Result<Self, SentinelError> {
        if percent > 0.0 && percent <= 100.0 {
            Ok(Self(percent))
        } else {
            Err(SentinelError::ThresholdOutOfRange(percent))
        }
    }

    /// Raw percentage value.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::END
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Snapshot of where a container is scrolled relative to its end.
///
/// Recomputed on demand from a [`ScrollGeometry`]; never updated in place.
///
/// # Fully visible content
/// When `bottom == 0` there is nothing to scroll. `percent_scrolled` is then
/// NaN and `reached_bottom` is false, because every comparison against NaN is
/// false. Callers that want to load more for content that fits the viewport
/// must do so explicitly (see `LoadMoreController::load_more`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollState {
    /// Whether the content overflows the viewport.
    pub is_scrollable: bool,
    /// Total content height.
    pub scroll_height: f64,
    /// Viewport height.
    pub client_height: f64,
    /// Current scroll offset.
    pub scroll_top: f64,
    /// Maximum scroll distance: `scroll_height - client_height`.
    pub bottom: f64,
    /// Configured threshold.
    pub percent_threshold: Threshold,
    /// Rounded percentage of `bottom` travelled. NaN when `bottom == 0`.
    pub percent_scrolled: f64,
    /// `percent_scrolled >= percent_threshold`.
    pub reached_bottom: bool,
}

impl ScrollState {
    /// Compute the scroll state for `geometry` against `threshold`.
    ///
    /// Pure: no side effects, no clamping of pathological input.
    pub fn compute(geometry: ScrollGeometry, threshold: Threshold) -> Self {
        let ScrollGeometry {
            scroll_height,
            scroll_top,
            client_height,
        } = geometry;

        let bottom = scroll_height - client_height;
        let percent_scrolled = if bottom == 0.0 {
            f64::NAN
        } else {
            round_half_up(scroll_top / bottom * 100.0)
        };

        Self {
            is_scrollable: scroll_height > client_height,
            scroll_height,
            client_height,
            scroll_top,
            bottom,
            percent_threshold: threshold,
            percent_scrolled,
            reached_bottom: percent_scrolled >= threshold.get(),
        }
    }

    /// True when the content fits the viewport exactly (`bottom == 0`).
    pub fn is_fully_visible(&self) -> bool {
        self.bottom == 0.0
    }
}

/// Round to the nearest integer, ties toward positive infinity.
///
/// `f64::round` breaks ties away from zero, which differs for negative halves.
fn round_half_up(value: f64) -> f64 {
    let rounded = value.round();
    if value - rounded == 0.5 {
        rounded + 1.0
    } else {
        rounded
    }
}
