//! Load-more sentinel: the pure core.
//!
//! Control flow:
//! - the host delivers raw scroll events to [`LoadMoreController::handle_scroll`]
//! - the [`ListenerManager`] drops events from stale bindings and forwards the
//!   rest to the [`Debounce`] primitive
//! - once the quiet interval has elapsed, [`LoadMoreController::tick`] computes a
//!   [`ScrollState`](crate::model::ScrollState) and starts a load when the
//!   threshold is reached and no load is in flight
//! - mount and load settlement schedule an immediate scrollability re-check
//!
//! No I/O happens here. The async shell lives in [`crate::driver`].

pub mod config;
pub mod controller;
pub mod debounce;
pub mod diagnostics;
pub mod listener;
pub mod loader;
pub mod target;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::SentinelConfig;
pub use controller::{FlagChange, Flags, LoadMoreController, LoadSettled, SubscriptionId};
pub use debounce::{Debounce, FrameDebouncer, TrailingDebouncer, DEFAULT_DEBOUNCE};
pub use diagnostics::{
    CheckKind, CheckReport, DiagnosticsSink, JsonLinesSink, NoopSink, TracingSink,
};
pub use listener::ListenerManager;
pub use loader::{LoadFuture, LoadMore, NoopLoader};
pub use target::{ListenerId, ScrollTarget, TargetKind};
