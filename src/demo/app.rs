//! The demo application and its event loop (impure shell).

use super::feed::Feed;
use super::pages::{FeedConfig, PageLoader};
use super::render::{feed_rows, render};
use crate::model::AppError;
use crate::sentinel::{ListenerId, LoadMore, LoadMoreController, SentinelConfig};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::cell::RefCell;
use std::io::Stdout;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Longest wait for terminal input while idle.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Wait for terminal input while a load is in flight, so settlement is
/// noticed promptly.
const LOAD_POLL: Duration = Duration::from_millis(30);

/// The shared feed handle the controller binds to.
pub type SharedFeed = Rc<RefCell<Feed>>;

/// Terminal host for a [`LoadMoreController`].
///
/// Generic over backend to support testing with `TestBackend`.
pub struct DemoApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    feed: SharedFeed,
    controller: LoadMoreController<SharedFeed>,
}

impl DemoApp<CrosstermBackend<Stdout>> {
    /// Run the main event loop until the user quits.
    pub fn run(&mut self) -> Result<(), AppError> {
        self.pump(Instant::now())?;

        loop {
            let timeout = self.poll_timeout(Instant::now());
            if event::poll(timeout)? {
                let now = Instant::now();
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key, now) {
                            info!("Quit requested");
                            return Ok(());
                        }
                    }
                    Event::Resize(width, height) => self.handle_resize(width, height, now),
                    _ => {}
                }
            }
            self.pump(Instant::now())?;
        }
    }
}

impl<B> DemoApp<B>
where
    B: Backend,
{
    /// Demo backed by the simulated page loader.
    pub fn new(
        terminal: Terminal<B>,
        feed_config: FeedConfig,
        sentinel: SentinelConfig,
    ) -> Result<Self, AppError> {
        let feed = Rc::new(RefCell::new(Feed::new(feed_config.max_items)));
        let loader = PageLoader::new(Rc::clone(&feed), feed_config);
        Self::with_loader(terminal, feed, loader, sentinel)
    }

    /// Demo with a caller-supplied loader that appends into `feed`.
    ///
    /// Sizes the feed viewport from the terminal, then mounts the controller.
    pub fn with_loader(
        terminal: Terminal<B>,
        feed: SharedFeed,
        loader: impl LoadMore + 'static,
        sentinel: SentinelConfig,
    ) -> Result<Self, AppError> {
        let size = terminal.size()?;
        feed.borrow_mut()
            .set_viewport(feed_rows(Rect::new(0, 0, size.width, size.height)));

        let mut controller = LoadMoreController::new(loader, sentinel);
        controller.start(Rc::clone(&feed));

        Ok(Self {
            terminal,
            feed,
            controller,
        })
    }

    /// The shared feed.
    pub fn feed(&self) -> &SharedFeed {
        &self.feed
    }

    /// The controller driving the feed.
    pub fn controller(&self) -> &LoadMoreController<SharedFeed> {
        &self.controller
    }

    /// The terminal, for inspecting the test backend.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// One frame of work: fire due checks, settle a finished load, draw, then
    /// run the post-render re-check. Redraws if the re-check flipped a flag.
    pub fn pump(&mut self, now: Instant) -> Result<(), AppError> {
        self.controller.tick(now);
        if let Some(settled) = self.controller.try_settle() {
            debug!(sequence = settled.sequence, "Load settled");
        }
        self.draw()?;

        let before = self.controller.flags();
        self.controller.after_render();
        if self.controller.flags() != before {
            self.draw()?;
        }
        Ok(())
    }

    /// How long the loop may block on terminal input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let cap = if self.controller.is_loading() {
            LOAD_POLL
        } else {
            IDLE_POLL
        };
        self.controller
            .next_deadline()
            .map_or(cap, |deadline| cap.min(deadline.saturating_duration_since(now)))
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let page = self.feed.borrow().viewport().max(1) as isize;
        let notified = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('j') | KeyCode::Down => self.feed.borrow_mut().scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.feed.borrow_mut().scroll_by(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.feed.borrow_mut().scroll_by(page),
            KeyCode::PageUp => self.feed.borrow_mut().scroll_by(-page),
            KeyCode::Char('g') | KeyCode::Home => self.feed.borrow_mut().scroll_to_top(),
            KeyCode::Char('G') | KeyCode::End => self.feed.borrow_mut().scroll_to_bottom(),
            KeyCode::Char('l') => {
                self.controller.load_more();
                Vec::new()
            }
            _ => Vec::new(),
        };
        self.dispatch_scroll(notified, now);
        false
    }

    /// Resize the feed viewport to match a new terminal size.
    pub fn handle_resize(&mut self, width: u16, height: u16, now: Instant) {
        let rows = feed_rows(Rect::new(0, 0, width, height));
        let notified = self.feed.borrow_mut().set_viewport(rows);
        self.dispatch_scroll(notified, now);
    }

    fn dispatch_scroll(&mut self, listeners: Vec<ListenerId>, now: Instant) {
        for listener in listeners {
            self.controller.handle_scroll(listener, now);
        }
    }

    fn draw(&mut self) -> Result<(), AppError> {
        let feed = self.feed.borrow();
        let flags = self.controller.flags();
        self.terminal.draw(|frame| render(frame, &feed, flags))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
