//! Contract between the controller and the host's scrollable container.

use crate::model::ScrollGeometry;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Identity of one listener registration.
///
/// A fresh id is issued on every bind, so an event tagged with an old id can
/// be recognised as coming from a target that is no longer bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// What kind of scroll source a target is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetKind {
    /// A scrollable element; its own geometry is authoritative.
    #[default]
    Element,
    /// A whole document. Scroll events are reported against the document but
    /// geometry must be read from its root scrolling element.
    Document,
}

/// A scrollable container supplied by the host.
///
/// The host routes raw scroll events for the registered [`ListenerId`] to
/// `LoadMoreController::handle_scroll`. At most one listener is registered on
/// a target at a time.
pub trait ScrollTarget {
    /// Element or document.
    fn kind(&self) -> TargetKind {
        TargetKind::Element
    }

    /// Current geometry of this target itself.
    fn geometry(&self) -> ScrollGeometry;

    /// Geometry of the document's root scrolling element.
    ///
    /// Only consulted for [`TargetKind::Document`] targets.
    fn root_geometry(&self) -> ScrollGeometry {
        self.geometry()
    }

    /// Start delivering scroll events tagged with `listener`.
    fn add_scroll_listener(&mut self, listener: ListenerId);

    /// Stop delivering scroll events tagged with `listener`.
    fn remove_scroll_listener(&mut self, listener: ListenerId);
}

impl<T: ScrollTarget + ?Sized> ScrollTarget for Box<T> {
    fn kind(&self) -> TargetKind {
        (**self).kind()
    }

    fn geometry(&self) -> ScrollGeometry {
        (**self).geometry()
    }

    fn root_geometry(&self) -> ScrollGeometry {
        (**self).root_geometry()
    }

    fn add_scroll_listener(&mut self, listener: ListenerId) {
        (**self).add_scroll_listener(listener)
    }

    fn remove_scroll_listener(&mut self, listener: ListenerId) {
        (**self).remove_scroll_listener(listener)
    }
}

// Shared targets: the host keeps a handle to scroll the pane while the
// controller holds the binding.
impl<T: ScrollTarget + ?Sized> ScrollTarget for Rc<RefCell<T>> {
    fn kind(&self) -> TargetKind {
        self.borrow().kind()
    }

    fn geometry(&self) -> ScrollGeometry {
        self.borrow().geometry()
    }

    fn root_geometry(&self) -> ScrollGeometry {
        self.borrow().root_geometry()
    }

    fn add_scroll_listener(&mut self, listener: ListenerId) {
        self.borrow_mut().add_scroll_listener(listener)
    }

    fn remove_scroll_listener(&mut self, listener: ListenerId) {
        self.borrow_mut().remove_scroll_listener(listener)
    }
}
