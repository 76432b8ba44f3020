//! UI rendering module for unitconv
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod converter;
pub mod help_overlay;
pub mod history;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, PendingAction};
use crate::cache::Clock;
use crate::data::{Category, RateSource};

pub use help_overlay::render as render_help_overlay;

/// Renders the whole converter screen
///
/// Layout, top to bottom: title, form, result panel, history, key hints.
/// The help overlay is drawn on top when enabled.
pub fn render<S: RateSource, C: Clock>(frame: &mut Frame, app: &App<S, C>) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "🔄 Unit Converter",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Convert between different units easily!",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    converter::render_form(frame, app, chunks[1]);
    converter::render_result(frame, app, chunks[2]);
    history::render(frame, app, chunks[3]);
    frame.render_widget(footer(app), chunks[4]);

    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Key hints, or a status line while an action is running
fn footer<S: RateSource, C: Clock>(app: &App<S, C>) -> Paragraph<'static> {
    let hint_style = Style::default().fg(Color::DarkGray);

    let text = match app.pending {
        Some(PendingAction::RefreshRates) => "Fetching currency rates...".to_string(),
        Some(PendingAction::Convert(_)) if app.category() == Category::Currency => {
            "Fetching currency rates...".to_string()
        }
        _ => {
            let mut hints = String::from("Tab: field  ↑↓: change  Enter: convert  c: clear");
            if app.category() == Category::Currency {
                hints.push_str("  r: refresh rates");
            }
            hints.push_str("  ?: help  q: quit");
            hints
        }
    };

    Paragraph::new(Line::from(Span::styled(text, hint_style)))
}
