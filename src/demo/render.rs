//! Frame rendering for the demo.

use super::feed::Feed;
use crate::sentinel::Flags;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Status shown while a load is in flight.
pub const LOADING: &str = "loading...";

/// Hint shown when the feed fits without scrolling, so scroll can never
/// trigger a load.
pub const NOT_SCROLLABLE_HINT: &str = "feed fits on screen - press l to load more";

/// Shown once the feed has reached its cap.
pub const END_OF_FEED: &str = "end of feed";

/// Key help shown when nothing else needs saying.
pub const KEY_HELP: &str = "j/k scroll  PgUp/PgDn page  g/G top/bottom  l load  q quit";

/// Split the frame into the feed pane and a one-row status line.
pub fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Rows of content the feed pane shows inside its border.
pub fn feed_rows(area: Rect) -> usize {
    usize::from(split(area).0.height.saturating_sub(2))
}

/// Text for the status line. Loading wins, then failures, then the end of
/// the feed, then the not-scrollable hint.
pub fn status_text(feed: &Feed, flags: Flags) -> String {
    if flags.is_loading {
        LOADING.to_string()
    } else if let Some(reason) = feed.last_failure() {
        format!("{reason} - press l to retry")
    } else if feed.is_exhausted() {
        END_OF_FEED.to_string()
    } else if !flags.is_scrollable {
        NOT_SCROLLABLE_HINT.to_string()
    } else {
        KEY_HELP.to_string()
    }
}

/// Draw the feed pane and status line.
pub fn render(frame: &mut Frame, feed: &Feed, flags: Flags) {
    let (pane, status) = split(frame.area());

    let title = format!(" Feed ({}/{}) ", feed.len(), feed.capacity());
    let lines: Vec<Line> = feed
        .visible()
        .iter()
        .map(|item| Line::from(item.as_str()))
        .collect();
    let body = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(body, pane);

    let style = if flags.is_loading {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if feed.last_failure().is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(status_text(feed, flags)).style(style), status);
}
