//! infiniscroll
//!
//! Threshold-triggered "load more" controller for scrollable containers.
//!
//! Pure Core / Impure Shell: [`sentinel`] and [`model`] do no I/O and take time
//! as an argument; [`driver`] runs a controller on tokio, and [`demo`] hosts one
//! in a terminal feed.

pub mod config;
pub mod demo;
pub mod driver;
pub mod logging;
pub mod model;
pub mod sentinel;

pub use driver::{drive, HostEvent};
pub use model::{ScrollGeometry, ScrollState, Threshold};
pub use sentinel::{LoadMore, LoadMoreController, ScrollTarget, SentinelConfig};
