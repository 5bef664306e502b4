//! Load-more state machine.
//!
//! # States
//! - `Idle` (initial): a debounced check that reached the bottom starts a load.
//! - `Loading`: exactly one load future is in flight; reached-bottom checks are
//!   ignored until it settles.
//!
//! # Re-checks
//! Mount and every settlement schedule an immediate scrollability re-check.
//! Scheduled re-checks coalesce and run on the next [`after_render`] (or at
//! the end of [`tick`]). They refresh `is_scrollable` only and never start a
//! load, even when the content is still at the threshold. A page that does
//! not change the scrollable height therefore cannot trigger runaway loads;
//! the next load needs another scroll.
//!
//! [`after_render`]: LoadMoreController::after_render
//! [`tick`]: LoadMoreController::tick

use super::config::SentinelConfig;
use super::debounce::{Debounce, TrailingDebouncer};
use super::diagnostics::{CheckKind, CheckReport, DiagnosticsSink, NoopSink, TracingSink};
use super::listener::ListenerManager;
use super::loader::{LoadFuture, LoadMore};
use super::target::{ListenerId, ScrollTarget};
use crate::model::{LoadError, ScrollState};
use std::fmt;
use std::task::{ready, Context, Poll};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Snapshot of the two observable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    /// A load is in flight.
    pub is_loading: bool,
    /// The bound container's content overflows its viewport.
    pub is_scrollable: bool,
}

/// A flag transition, delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagChange {
    /// `is_loading` changed to the given value.
    Loading(bool),
    /// `is_scrollable` changed to the given value.
    Scrollable(bool),
}

/// Handle returned by [`LoadMoreController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Returned when an in-flight load settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSettled {
    /// 1-based sequence number of the load that settled.
    pub sequence: u64,
}

enum LoadPhase {
    Idle,
    Loading(LoadFuture),
}

type Observer = Box<dyn FnMut(FlagChange)>;

/// Decides when to ask for more content and tracks whether it is waiting.
///
/// Single-threaded and event driven: the host feeds it scroll events,
/// clock ticks and render notifications, and polls the in-flight load.
/// Nothing it does can fail; operations without a bound target are no-ops.
pub struct LoadMoreController<T> {
    config: SentinelConfig,
    listener: ListenerManager<T>,
    debouncer: Box<dyn Debounce>,
    loader: Box<dyn LoadMore>,
    diagnostics: Box<dyn DiagnosticsSink>,
    phase: LoadPhase,
    is_scrollable: bool,
    recheck_scheduled: bool,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
    loads_started: u64,
}

impl<T: ScrollTarget> LoadMoreController<T> {
    /// Create an idle, unbound controller.
    ///
    /// Uses a [`TrailingDebouncer`] with the configured interval. Diagnostics
    /// go to a [`TracingSink`] when `config.debug` is set.
    pub fn new(loader: impl LoadMore + 'static, config: SentinelConfig) -> Self {
        let diagnostics: Box<dyn DiagnosticsSink> = if config.debug {
            Box::new(TracingSink)
        } else {
            Box::new(NoopSink)
        };

        Self {
            config,
            listener: ListenerManager::new(),
            debouncer: Box::new(TrailingDebouncer::new(config.debounce)),
            loader: Box::new(loader),
            diagnostics,
            phase: LoadPhase::Idle,
            is_scrollable: false,
            recheck_scheduled: false,
            observers: Vec::new(),
            next_subscription: 1,
            loads_started: 0,
        }
    }

    /// Replace the debounce primitive.
    pub fn with_debouncer(mut self, debouncer: impl Debounce + 'static) -> Self {
        self.debouncer = Box::new(debouncer);
        self
    }

    /// Replace the diagnostics sink. It is still only used when `debug` is set.
    pub fn with_diagnostics(mut self, sink: impl DiagnosticsSink + 'static) -> Self {
        self.diagnostics = Box::new(sink);
        self
    }

    // ===== Lifecycle =====

    /// Mount on `target`: bind it and schedule a scrollability re-check.
    ///
    /// Returns the previously bound target, if any.
    pub fn start(&mut self, target: T) -> Option<T> {
        let previous = self.bind(target);
        info!(listener = ?self.listener.listener_id(), "Load-more controller started");
        self.schedule_recheck();
        previous
    }

    /// Switch to a new scroll source without mount semantics.
    pub fn retarget(&mut self, target: T) -> Option<T> {
        self.bind(target)
    }

    /// Tear down: unbind the target, cancel the pending check and drop any
    /// scheduled re-check.
    ///
    /// An in-flight load is not cancelled; keep polling it to settlement.
    /// Idempotent.
    pub fn stop(&mut self) -> Option<T> {
        self.debouncer.cancel();
        self.recheck_scheduled = false;
        let target = self.listener.unbind();
        if target.is_some() {
            info!("Load-more controller stopped");
        }
        target
    }

    fn bind(&mut self, target: T) -> Option<T> {
        self.debouncer.cancel();
        self.listener.bind(target)
    }

    // ===== Events =====

    /// Feed a raw scroll event. Events from stale listeners are dropped.
    ///
    /// Returns whether the event was accepted.
    pub fn handle_scroll(&mut self, listener: ListenerId, now: Instant) -> bool {
        if !self.listener.accepts(listener) {
            trace!(%listener, "Dropped scroll event from stale listener");
            return false;
        }
        self.debouncer.notify(now);
        true
    }

    /// Advance time: run the debounced check if it is due, then flush any
    /// scheduled re-check.
    ///
    /// Returns whether a debounced check ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        let fired = self.debouncer.fire_due(now);
        if fired {
            self.check_should_load_more();
        }
        self.after_render();
        fired
    }

    /// Run the scheduled scrollability re-check, if any.
    pub fn after_render(&mut self) {
        if std::mem::take(&mut self.recheck_scheduled) {
            self.check_scrollable();
        }
    }

    /// Start a load regardless of scroll position, e.g. from a "load more"
    /// button. Ignored while a load is in flight.
    ///
    /// Returns whether a load was started.
    pub fn load_more(&mut self) -> bool {
        if self.is_loading() {
            debug!("Manual load ignored; a load is already in flight");
            return false;
        }
        self.begin_load();
        true
    }

    // ===== In-flight load =====

    /// Poll the in-flight load. Settles the controller when it completes.
    ///
    /// Returns `Pending` while idle, so only poll while [`is_loading`] holds.
    ///
    /// [`is_loading`]: LoadMoreController::is_loading
    pub fn poll_load(&mut self, cx: &mut Context<'_>) -> Poll<LoadSettled> {
        let LoadPhase::Loading(future) = &mut self.phase else {
            return Poll::Pending;
        };
        let outcome = ready!(future.as_mut().poll(cx));
        Poll::Ready(self.settle(outcome))
    }

    /// Poll the in-flight load once without a waker, for hosts that poll on a
    /// timer instead of running an executor.
    pub fn try_settle(&mut self) -> Option<LoadSettled> {
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        match self.poll_load(&mut cx) {
            Poll::Ready(settled) => Some(settled),
            Poll::Pending => None,
        }
    }

    fn begin_load(&mut self) {
        self.loads_started += 1;
        let future = self.loader.load_more();
        self.phase = LoadPhase::Loading(future);
        info!(sequence = self.loads_started, "Load started");
        self.emit(FlagChange::Loading(true));
    }

    fn settle(&mut self, outcome: Result<(), LoadError>) -> LoadSettled {
        self.phase = LoadPhase::Idle;
        let sequence = self.loads_started;
        match outcome {
            Ok(()) => info!(sequence, "Load settled"),
            Err(error) => warn!(sequence, %error, "Load failed; returning to idle"),
        }
        self.emit(FlagChange::Loading(false));
        self.schedule_recheck();
        LoadSettled { sequence }
    }

    // ===== Checks =====

    fn check_should_load_more(&mut self) {
        let Some(state) = self.scroll_state() else {
            return;
        };
        let should_load_more = state.reached_bottom && !self.is_loading();
        self.report(CheckKind::Debounced, state, Some(should_load_more));

        if should_load_more {
            self.begin_load();
        } else if state.reached_bottom {
            debug!("Reached bottom while loading; check ignored");
        }
    }

    fn check_scrollable(&mut self) {
        let Some(state) = self.scroll_state() else {
            return;
        };
        self.report(CheckKind::Scrollable, state, None);
        self.set_scrollable(state.is_scrollable);
    }

    fn schedule_recheck(&mut self) {
        self.recheck_scheduled = true;
    }

    fn report(&mut self, kind: CheckKind, state: ScrollState, should_load_more: Option<bool>) {
        if self.config.debug {
            self.diagnostics.record(&CheckReport {
                kind,
                state,
                should_load_more,
            });
        }
    }

    // ===== Observation =====

    /// Register a callback for flag transitions.
    pub fn subscribe(&mut self, observer: impl FnMut(FlagChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn set_scrollable(&mut self, is_scrollable: bool) {
        if self.is_scrollable != is_scrollable {
            self.is_scrollable = is_scrollable;
            self.emit(FlagChange::Scrollable(is_scrollable));
        }
    }

    fn emit(&mut self, change: FlagChange) {
        debug!(?change, "Flag changed");
        for (_, observer) in &mut self.observers {
            observer(change);
        }
    }

    // ===== Accessors =====

    /// A load is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::Loading(_))
    }

    /// The bound container overflowed its viewport at the last re-check.
    pub fn is_scrollable(&self) -> bool {
        self.is_scrollable
    }

    /// Both flags at once.
    pub fn flags(&self) -> Flags {
        Flags {
            is_loading: self.is_loading(),
            is_scrollable: self.is_scrollable,
        }
    }

    /// Current scroll state of the bound target, computed on demand.
    pub fn scroll_state(&self) -> Option<ScrollState> {
        self.listener
            .geometry()
            .map(|geometry| ScrollState::compute(geometry, self.config.threshold))
    }

    /// When the pending debounced check becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Whether a debounced check is pending.
    pub fn has_pending_check(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Whether a scrollability re-check is waiting for the next render.
    pub fn has_scheduled_recheck(&self) -> bool {
        self.recheck_scheduled
    }

    /// Whether a target is bound.
    pub fn is_bound(&self) -> bool {
        self.listener.is_bound()
    }

    /// Listener id of the current binding.
    pub fn listener_id(&self) -> Option<ListenerId> {
        self.listener.listener_id()
    }

    /// The bound target.
    pub fn target(&self) -> Option<&T> {
        self.listener.target()
    }

    /// The bound target, mutably.
    pub fn target_mut(&mut self) -> Option<&mut T> {
        self.listener.target_mut()
    }

    /// Number of loads started so far.
    pub fn loads_started(&self) -> u64 {
        self.loads_started
    }

    /// Active settings.
    pub fn config(&self) -> &SentinelConfig {
        &self.config
    }
}

impl<T: fmt::Debug> fmt::Debug for LoadMoreController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadMoreController")
            .field("config", &self.config)
            .field("listener", &self.listener)
            .field("is_loading", &matches!(self.phase, LoadPhase::Loading(_)))
            .field("is_scrollable", &self.is_scrollable)
            .field("recheck_scheduled", &self.recheck_scheduled)
            .field("observers", &self.observers.len())
            .field("loads_started", &self.loads_started)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
