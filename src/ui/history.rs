//! Conversion history panel

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::cache::Clock;
use crate::data::RateSource;
use crate::session::HISTORY_DISPLAY_LIMIT;

/// Renders the most recent conversions, newest first
pub fn render<S: RateSource, C: Clock>(frame: &mut Frame, app: &App<S, C>, area: Rect) {
    let history = app.session.history();

    let lines: Vec<Line> = if history.is_empty() {
        vec![Line::from(Span::styled(
            "No conversions yet.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        history
            .recent(HISTORY_DISPLAY_LIMIT)
            .map(|record| Line::from(format!(" - {}", record)))
            .collect()
    };

    let title = if history.len() > HISTORY_DISPLAY_LIMIT {
        format!(
            " 🕒 Conversion History (latest {} of {}) ",
            HISTORY_DISPLAY_LIMIT,
            history.len()
        )
    } else {
        " 🕒 Conversion History ".to_string()
    };

    let block = Block::default().title(title).borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
