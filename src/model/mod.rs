//! Domain value types.
//!
//! Everything in here is plain data: geometry measurements, the derived
//! scroll state, and the error taxonomy.

pub mod error;
pub mod scroll_state;

pub use error::{AppError, LoadError, SentinelError};
pub use scroll_state::{ScrollGeometry, ScrollState, Threshold};
