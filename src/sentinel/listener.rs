//! Binding of the scroll-event listener to a single target.

use super::target::{ListenerId, ScrollTarget, TargetKind};
use crate::model::ScrollGeometry;
use tracing::debug;

/// Owns the currently bound scroll target and its listener registration.
///
/// The manager is the only writer of the binding. It makes no scrollability
/// decisions; it only answers whether an incoming event belongs to the current
/// binding and where to read geometry from.
#[derive(Debug)]
pub struct ListenerManager<T> {
    bound: Option<Binding<T>>,
    next_id: u64,
}

#[derive(Debug)]
struct Binding<T> {
    target: T,
    listener: ListenerId,
}

impl<T> Default for ListenerManager<T> {
    fn default() -> Self {
        Self {
            bound: None,
            next_id: 1,
        }
    }
}

impl<T: ScrollTarget> ListenerManager<T> {
    /// Create a manager with nothing bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `target`, unbinding any previous target first.
    ///
    /// Returns the previously bound target with its listener already removed.
    pub fn bind(&mut self, target: T) -> Option<T> {
        let previous = self.unbind();

        let listener = ListenerId::new(self.next_id);
        self.next_id += 1;

        let mut target = target;
        target.add_scroll_listener(listener);
        debug!(%listener, kind = ?target.kind(), "Scroll listener attached");

        self.bound = Some(Binding { target, listener });
        previous
    }

    /// Detach the listener and release the target.
    ///
    /// Idempotent: returns `None` when nothing is bound.
    pub fn unbind(&mut self) -> Option<T> {
        let Binding {
            mut target,
            listener,
        } = self.bound.take()?;

        target.remove_scroll_listener(listener);
        debug!(%listener, "Scroll listener detached");
        Some(target)
    }

    /// Whether an event tagged with `listener` belongs to the current binding.
    pub fn accepts(&self, listener: ListenerId) -> bool {
        self.bound
            .as_ref()
            .is_some_and(|binding| binding.listener == listener)
    }

    /// Geometry of the bound target, resolving documents to their root element.
    ///
    /// `None` when nothing is bound.
    pub fn geometry(&self) -> Option<ScrollGeometry> {
        let target = &self.bound.as_ref()?.target;
        Some(match target.kind() {
            TargetKind::Document => target.root_geometry(),
            TargetKind::Element => target.geometry(),
        })
    }

    /// Whether a target is bound.
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Listener id of the current binding.
    pub fn listener_id(&self) -> Option<ListenerId> {
        self.bound.as_ref().map(|binding| binding.listener)
    }

    /// The bound target.
    pub fn target(&self) -> Option<&T> {
        self.bound.as_ref().map(|binding| &binding.target)
    }

    /// The bound target, mutably (e.g. for the host to scroll it).
    pub fn target_mut(&mut self) -> Option<&mut T> {
        self.bound.as_mut().map(|binding| &mut binding.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentinel::test_support::FakeTarget;

    #[test]
    fn bind_attaches_a_listener() {
        let mut manager = ListenerManager::new();
        let target = FakeTarget::element(1000.0, 500.0);
        manager.bind(target.clone());

        let id = manager.listener_id().expect("bound");
        assert_eq!(target.listeners(), vec![id]);
        assert!(manager.accepts(id));
    }

    #[test]
    fn rebinding_detaches_the_previous_target_first() {
        let mut manager = ListenerManager::new();
        let old = FakeTarget::element(1000.0, 500.0);
        let new = FakeTarget::element(2000.0, 500.0);

        manager.bind(old.clone());
        let old_id = manager.listener_id().expect("bound");

        let returned = manager.bind(new.clone());
        let new_id = manager.listener_id().expect("bound");

        assert!(returned.is_some(), "previous target should be handed back");
        assert!(old.listeners().is_empty(), "old target must lose its listener");
        assert_eq!(new.listeners(), vec![new_id]);
        assert_ne!(old_id, new_id);
        assert!(!manager.accepts(old_id), "events from old target are stale");
        assert!(manager.accepts(new_id));
    }

    #[test]
    fn unbind_is_idempotent() {
        let mut manager: ListenerManager<FakeTarget> = ListenerManager::new();
        assert!(manager.unbind().is_none());
        assert!(manager.unbind().is_none());
        assert!(!manager.is_bound());
        assert!(manager.geometry().is_none());
    }

    #[test]
    fn unbind_removes_listener_and_returns_target() {
        let mut manager = ListenerManager::new();
        let target = FakeTarget::element(1000.0, 500.0);
        manager.bind(target.clone());
        let id = manager.listener_id().expect("bound");

        assert!(manager.unbind().is_some());
        assert!(target.listeners().is_empty());
        assert!(!manager.accepts(id));
        assert!(manager.unbind().is_none());
    }

    #[test]
    fn document_target_reads_root_geometry() {
        let mut manager = ListenerManager::new();
        let document = FakeTarget::document(1000.0, 500.0);
        document.set_scroll_top(500.0);
        manager.bind(document);

        let geometry = manager.geometry().expect("bound");
        assert_eq!(geometry.scroll_height, 1000.0);
        assert_eq!(geometry.client_height, 500.0);
        assert_eq!(geometry.scroll_top, 500.0);
    }

    #[test]
    fn listener_ids_are_never_reused() {
        let mut manager = ListenerManager::new();
        let target = FakeTarget::element(1000.0, 500.0);
        manager.bind(target.clone());
        let first = manager.listener_id().expect("bound");
        manager.unbind();
        manager.bind(target);
        let second = manager.listener_id().expect("bound");
        assert!(second > first);
    }
}
