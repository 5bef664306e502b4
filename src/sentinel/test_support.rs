//! Shared fakes for sentinel unit tests.

use super::loader::{LoadFuture, LoadMore};
use super::target::{ListenerId, ScrollTarget, TargetKind};
use crate::model::{LoadError, ScrollGeometry};
use futures::channel::oneshot;
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Default)]
struct FakeInner {
    kind: TargetKind,
    root: ScrollGeometry,
    listeners: Vec<ListenerId>,
}

/// Scroll target whose clones share state, so tests can inspect a target
/// after handing it to the controller.
#[derive(Debug, Clone, Default)]
pub struct FakeTarget(Rc<RefCell<FakeInner>>);

impl FakeTarget {
    pub fn element(scroll_height: f64, client_height: f64) -> Self {
        Self::with_kind(TargetKind::Element, scroll_height, client_height)
    }

    /// Document whose own geometry is all zeros; only its root is meaningful.
    pub fn document(scroll_height: f64, client_height: f64) -> Self {
        Self::with_kind(TargetKind::Document, scroll_height, client_height)
    }

    fn with_kind(kind: TargetKind, scroll_height: f64, client_height: f64) -> Self {
        Self(Rc::new(RefCell::new(FakeInner {
            kind,
            root: ScrollGeometry::new(scroll_height, 0.0, client_height),
            listeners: Vec::new(),
        })))
    }

    pub fn set_scroll_top(&self, scroll_top: f64) {
        self.0.borrow_mut().root.scroll_top = scroll_top;
    }

    pub fn set_scroll_height(&self, scroll_height: f64) {
        self.0.borrow_mut().root.scroll_height = scroll_height;
    }

    pub fn listeners(&self) -> Vec<ListenerId> {
        self.0.borrow().listeners.clone()
    }
}

impl ScrollTarget for FakeTarget {
    fn kind(&self) -> TargetKind {
        self.0.borrow().kind
    }

    fn geometry(&self) -> ScrollGeometry {
        let inner = self.0.borrow();
        match inner.kind {
            TargetKind::Element => inner.root,
            TargetKind::Document => ScrollGeometry::default(),
        }
    }

    fn root_geometry(&self) -> ScrollGeometry {
        self.0.borrow().root
    }

    fn add_scroll_listener(&mut self, listener: ListenerId) {
        self.0.borrow_mut().listeners.push(listener);
    }

    fn remove_scroll_listener(&mut self, listener: ListenerId) {
        self.0.borrow_mut().listeners.retain(|l| *l != listener);
    }
}

/// Loader whose futures stay pending until the test resolves them.
#[derive(Debug, Clone, Default)]
pub struct ManualLoader {
    calls: Rc<Cell<usize>>,
    pending: Rc<RefCell<Vec<oneshot::Sender<Result<(), LoadError>>>>>,
}

impl ManualLoader {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Resolve the oldest outstanding load.
    pub fn resolve(&self, outcome: Result<(), LoadError>) {
        let sender = self.pending.borrow_mut().remove(0);
        let _ = sender.send(outcome);
    }
}

impl LoadMore for ManualLoader {
    fn load_more(&mut self) -> LoadFuture {
        self.calls.set(self.calls.get() + 1);
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push(tx);
        rx.map(|outcome| outcome.unwrap_or_else(|_| Err(LoadError::failed("dropped"))))
            .boxed_local()
    }
}
