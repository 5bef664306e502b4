//! Optional diagnostics output for scroll checks.
//!
//! Sinks only observe; nothing they do feeds back into the controller.

use crate::model::ScrollState;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, warn};

/// Which path produced a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Debounced check after scrolling; may start a load.
    Debounced,
    /// Immediate re-check after mount or load settlement; only refreshes
    /// `is_scrollable`.
    Scrollable,
}

/// One check's full result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CheckReport {
    /// Path that ran the check.
    pub kind: CheckKind,
    /// Computed state.
    #[serde(flatten)]
    pub state: ScrollState,
    /// Whether a load was warranted. Only set for debounced checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_load_more: Option<bool>,
}

/// Receives a report after every check when `debug` is enabled.
pub trait DiagnosticsSink {
    /// Record one check.
    fn record(&mut self, report: &CheckReport);
}

impl<F: FnMut(&CheckReport)> DiagnosticsSink for F {
    fn record(&mut self, report: &CheckReport) {
        (self)(report)
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticsSink for NoopSink {
    fn record(&mut self, _report: &CheckReport) {}
}

/// Emits each report as a `debug!` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&mut self, report: &CheckReport) {
        let state = &report.state;
        debug!(
            kind = ?report.kind,
            is_scrollable = state.is_scrollable,
            scroll_height = state.scroll_height,
            client_height = state.client_height,
            scroll_top = state.scroll_top,
            bottom = state.bottom,
            percent = state.percent_threshold.get(),
            percent_scrolled = state.percent_scrolled,
            reached_bottom = state.reached_bottom,
            should_load_more = ?report.should_load_more,
            "Scroll check"
        );
    }
}

/// Writes each report as one JSON object per line.
///
/// Write failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticsSink for JsonLinesSink<W> {
    fn record(&mut self, report: &CheckReport) {
        let written = serde_json::to_writer(&mut self.writer, report)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(error) = written {
            warn!(%error, "Failed to write scroll diagnostics");
        }
    }
}
