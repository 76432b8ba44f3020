//! Converter form rendering
//!
//! Renders the category and unit selectors, the value field, and the result
//! panel with the formula line and any notices from the last action.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Field, Notice};
use crate::cache::Clock;
use crate::data::RateSource;

/// Placeholder shown in an empty value field
const VALUE_PLACEHOLDER: &str = "0.00";

/// Renders the selectors and value field
pub fn render_form<S: RateSource, C: Clock>(frame: &mut Frame, app: &App<S, C>, area: Rect) {
    let category = app.category();

    let lines = vec![
        selector_line("Category", category.name(), app.focus == Field::Category),
        selector_line("From", app.from_unit(), app.focus == Field::From),
        selector_line("To", app.to_unit(), app.focus == Field::To),
        value_line(&app.value_input, app.focus == Field::Value),
    ];

    let block = Block::default()
        .title(format!(" {} Conversion ", category.name()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the formula, note and notices for the last action
pub fn render_result<S: RateSource, C: Clock>(frame: &mut Frame, app: &App<S, C>, area: Rect) {
    let mut lines = Vec::new();

    if let Some(conversion) = &app.last_conversion {
        lines.push(Line::from(conversion.formula.to_string()));
        if let Some(note) = conversion.note {
            lines.push(Line::from(Span::styled(
                format!("Note: {}", note),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    for notice in &app.notices {
        lines.push(notice_line(notice));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Press Enter to convert",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default().title(" Result ").borders(Borders::ALL);

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// A selector row, e.g. `  Category  ◀ Distance ▶`
fn selector_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let (marker, value_style) = if focused {
        (
            ">",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (" ", Style::default())
    };

    Line::from(vec![
        Span::styled(format!("{} {:<10}", marker, label), Style::default().fg(Color::Cyan)),
        Span::styled(format!("◀ {} ▶", value), value_style),
    ])
}

fn value_line(input: &str, focused: bool) -> Line<'static> {
    let marker = if focused { ">" } else { " " };
    let value = if input.is_empty() {
        Span::styled(VALUE_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            input.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )
    };

    let mut spans = vec![
        Span::styled(format!("{} {:<10}", marker, "Value"), Style::default().fg(Color::Cyan)),
        value,
    ];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

fn notice_line(notice: &Notice) -> Line<'static> {
    let color = match notice {
        Notice::Success(_) => Color::Green,
        Notice::Info(_) => Color::Cyan,
        Notice::Error(_) => Color::Red,
    };
    Line::from(Span::styled(
        notice.text().to_string(),
        Style::default().fg(color),
    ))
}
