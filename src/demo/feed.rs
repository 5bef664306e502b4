//! The scrollable feed pane.
//!
//! One row is one scroll unit, so `scroll_height` is the item count and
//! `client_height` is the number of rows the pane shows.

use crate::model::ScrollGeometry;
use crate::sentinel::{ListenerId, ScrollTarget};

/// Feed contents plus the pane's viewport.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    items: Vec<String>,
    offset: usize,
    viewport: usize,
    capacity: usize,
    listeners: Vec<ListenerId>,
    last_failure: Option<String>,
}

impl Feed {
    /// Empty feed that stops growing at `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Number of items loaded so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no items are loaded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item cap.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once the feed holds `capacity` items.
    pub fn is_exhausted(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Index of the first visible row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Rows the pane can show.
    pub fn viewport(&self) -> usize {
        self.viewport
    }

    /// The rows currently on screen.
    pub fn visible(&self) -> &[String] {
        let end = (self.offset + self.viewport).min(self.items.len());
        &self.items[self.offset.min(end)..end]
    }

    /// Append a page. Appending never moves the viewport and clears any
    /// recorded failure.
    pub fn append(&mut self, page: impl IntoIterator<Item = String>) {
        let room = self.capacity.saturating_sub(self.items.len());
        self.items.extend(page.into_iter().take(room));
        self.last_failure = None;
    }

    /// Remember why the last load failed, for the status line.
    pub fn record_failure(&mut self, reason: impl Into<String>) {
        self.last_failure = Some(reason.into());
    }

    /// Reason for the most recent failed load, if the feed has not grown since.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Resize the viewport. Returns the listeners to notify when the offset had
    /// to be clamped.
    pub fn set_viewport(&mut self, rows: usize) -> Vec<ListenerId> {
        self.viewport = rows;
        let offset = self.offset;
        self.move_to(offset)
    }

    /// Scroll by `delta` rows. Returns the listeners to notify, empty when the
    /// offset did not change.
    pub fn scroll_by(&mut self, delta: isize) -> Vec<ListenerId> {
        let target = self.offset.saturating_add_signed(delta);
        self.move_to(target)
    }

    /// Scroll to the first row.
    pub fn scroll_to_top(&mut self) -> Vec<ListenerId> {
        self.move_to(0)
    }

    /// Scroll so the last row sits at the bottom of the pane.
    pub fn scroll_to_bottom(&mut self) -> Vec<ListenerId> {
        self.move_to(usize::MAX)
    }

    fn max_offset(&self) -> usize {
        self.items.len().saturating_sub(self.viewport)
    }

    fn move_to(&mut self, offset: usize) -> Vec<ListenerId> {
        let clamped = offset.min(self.max_offset());
        if clamped == self.offset {
            return Vec::new();
        }
        self.offset = clamped;
        self.listeners.clone()
    }
}

impl ScrollTarget for Feed {
    fn geometry(&self) -> ScrollGeometry {
        ScrollGeometry::new(
            self.items.len() as f64,
            self.offset as f64,
            self.viewport as f64,
        )
    }

    fn add_scroll_listener(&mut self, listener: ListenerId) {
        self.listeners.push(listener);
    }

    fn remove_scroll_listener(&mut self, listener: ListenerId) {
        self.listeners.retain(|l| *l != listener);
    }
}
