//! Terminal demo host (impure shell).
//!
//! A ratatui feed pane that implements [`ScrollTarget`](crate::sentinel::ScrollTarget),
//! a simulated paginated backend, and a polling event loop that drives a
//! [`LoadMoreController`](crate::sentinel::LoadMoreController).

mod app;
pub mod feed;
pub mod pages;
pub mod render;

pub use app::{DemoApp, SharedFeed};
pub use feed::Feed;
pub use pages::{FeedConfig, PageLoader};

use crate::model::AppError;
use crate::sentinel::SentinelConfig;
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

/// Set up the terminal, run the demo, and restore the terminal.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(feed_config: FeedConfig, sentinel: SentinelConfig) -> Result<(), AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = stdout.execute(EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }

    let result = Terminal::new(CrosstermBackend::new(stdout))
        .map_err(AppError::from)
        .and_then(|terminal| DemoApp::new(terminal, feed_config, sentinel))
        .and_then(|mut app| app.run());

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Disable raw mode and leave the alternate screen.
fn restore_terminal() -> Result<(), AppError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
