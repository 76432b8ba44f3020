//! Application state management for unitconv
//!
//! This module contains the interactive converter state: the focused field,
//! selector positions, the value being typed, and actions waiting on the rate
//! source. Network-bound actions are queued by [`App::handle_key`] and run by
//! [`App::run_pending`] so key handling itself stays synchronous.

use chrono::{DateTime, Local, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use thiserror::Error;

use crate::cache::{Clock, RateCache, RateOrigin, SystemClock};
use crate::cli::StartupConfig;
use crate::data::{Category, RateSource, RatesClient};
use crate::session::{Conversion, Session};

/// Errors in the value field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("Value must be non-negative")]
    Negative,
}

/// Parses the value field; an empty field reads as zero
pub fn parse_value(input: &str) -> Result<f64, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(InputError::NotANumber(trimmed.to_string()));
    }
    if value < 0.0 {
        return Err(InputError::Negative);
    }
    Ok(value)
}

/// Form field that currently has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category,
    From,
    To,
    Value,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Category => Field::From,
            Field::From => Field::To,
            Field::To => Field::Value,
            Field::Value => Field::Category,
        }
    }

    fn prev(self) -> Self {
        match self {
            Field::Category => Field::Value,
            Field::From => Field::Category,
            Field::To => Field::From,
            Field::Value => Field::To,
        }
    }
}

/// Action waiting for [`App::run_pending`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PendingAction {
    Convert(f64),
    RefreshRates,
}

/// A message shown under the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(s) | Notice::Info(s) | Notice::Error(s) => s,
        }
    }
}

/// Main application struct managing state and data
pub struct App<S = RatesClient, C = SystemClock> {
    /// Per-session conversion context
    pub session: Session<S, C>,
    /// Index into [`Category::ALL`]
    pub category_index: usize,
    /// Index of the source unit in the category's unit list
    pub from_index: usize,
    /// Index of the target unit in the category's unit list
    pub to_index: usize,
    /// Raw text of the value field
    pub value_input: String,
    /// Field receiving selector keys
    pub focus: Field,
    /// Result of the most recent successful conversion
    pub last_conversion: Option<Conversion>,
    /// Messages from the last action
    pub notices: Vec<Notice>,
    /// Action queued for the event loop
    pub pending: Option<PendingAction>,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
}

impl App<RatesClient, SystemClock> {
    /// Creates a new App from startup configuration, fetching rates over HTTP
    pub fn from_config(config: &StartupConfig) -> Self {
        let cache = RateCache::new(RatesClient::with_url(config.rates_url.clone()))
            .with_ttl(config.rate_ttl);
        let mut app = Self::new(Session::new(cache));
        app.select(config.category, config.from, config.to);
        app
    }
}

impl<S: RateSource, C: Clock> App<S, C> {
    /// Creates a new App instance around a session, starting on Distance
    pub fn new(session: Session<S, C>) -> Self {
        Self {
            session,
            category_index: 0,
            from_index: 0,
            to_index: 1,
            value_input: String::new(),
            focus: Field::Category,
            last_conversion: None,
            notices: Vec::new(),
            pending: None,
            show_help: false,
            should_quit: false,
        }
    }

    /// Selects a category and units by name; unknown units fall back to the
    /// category's first two units
    pub fn select(&mut self, category: Category, from: &str, to: &str) {
        self.category_index = category.index();
        let units = category.units();
        self.from_index = units.iter().position(|u| *u == from).unwrap_or(0);
        self.to_index = units
            .iter()
            .position(|u| *u == to)
            .unwrap_or(1.min(units.len() - 1));
    }

    /// The selected category
    pub fn category(&self) -> Category {
        Category::ALL[self.category_index % Category::ALL.len()]
    }

    /// The selected source unit
    pub fn from_unit(&self) -> &'static str {
        let units = self.category().units();
        units[self.from_index % units.len()]
    }

    /// The selected target unit
    pub fn to_unit(&self) -> &'static str {
        let units = self.category().units();
        units[self.to_index % units.len()]
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `Tab` / `Shift-Tab`: Move focus between category, from, to, value
    /// - `Up`/`k`, `Down`/`j`: Change the focused selector
    /// - `0`-`9`, `.`: Edit the value; `Backspace` deletes
    /// - `Enter`: Convert
    /// - `c`: Clear history
    /// - `r`: Refresh currency rates (Currency only)
    /// - `?`: Toggle help
    /// - `q` or `Esc`: Quit
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(false);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(true);
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.focus = Field::Value;
                self.value_input.push(c);
            }
            KeyCode::Char('.') => {
                self.focus = Field::Value;
                if !self.value_input.contains('.') {
                    self.value_input.push('.');
                }
            }
            KeyCode::Char('-') => {
                self.notices = vec![Notice::Error(InputError::Negative.to_string())];
            }
            KeyCode::Backspace => {
                self.value_input.pop();
            }
            KeyCode::Enter => {
                self.request_convert();
            }
            KeyCode::Char('c') => {
                self.clear_history();
            }
            KeyCode::Char('r') => {
                if self.category() == Category::Currency {
                    self.pending = Some(PendingAction::RefreshRates);
                } else {
                    self.notices = vec![Notice::Info(
                        "Rate refresh is only available for Currency".to_string(),
                    )];
                }
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    /// Runs the queued action, if any
    pub async fn run_pending(&mut self) {
        match self.pending.take() {
            Some(PendingAction::Convert(value)) => self.convert(value).await,
            Some(PendingAction::RefreshRates) => self.refresh_rates().await,
            None => {}
        }
    }

    /// Validates the value field and queues a conversion
    fn request_convert(&mut self) {
        match parse_value(&self.value_input) {
            Ok(value) => self.pending = Some(PendingAction::Convert(value)),
            Err(e) => {
                self.last_conversion = None;
                self.notices = vec![Notice::Error(e.to_string())];
            }
        }
    }

    async fn convert(&mut self, value: f64) {
        let category = self.category();
        let (from, to) = (self.from_unit(), self.to_unit());
        let outcome = self.session.convert(category, from, to, value).await;

        self.notices.clear();
        if category == Category::Currency {
            if let Some(error) = self.session.rate_error() {
                self.notices
                    .push(Notice::Error(format!("Error fetching currency rates: {}", error)));
            }
        }

        match outcome {
            Ok(conversion) => {
                self.notices.push(Notice::Success(conversion.summary.clone()));
                self.last_conversion = Some(conversion);
            }
            Err(e) => {
                self.notices
                    .push(Notice::Error(format!("Conversion failed: {}", e)));
                self.last_conversion = None;
            }
        }
    }

    async fn refresh_rates(&mut self) {
        let snapshot = self.session.refresh_rates().await;
        let notice = match &snapshot.origin {
            RateOrigin::Fetched | RateOrigin::Cached => {
                Notice::Success("Currency rates updated!".to_string())
            }
            RateOrigin::Retained(error) => {
                let fetched_at = self
                    .session
                    .rate_cache()
                    .fetched_at()
                    .map(format_fetch_time)
                    .unwrap_or_default();
                Notice::Error(format!(
                    "Error fetching currency rates: {}. Keeping rates from {}",
                    error, fetched_at
                ))
            }
            RateOrigin::Unavailable(error) => {
                Notice::Error(format!("Error fetching currency rates: {}", error))
            }
        };
        self.notices = vec![notice];
    }

    fn clear_history(&mut self) {
        if self.session.history().is_empty() {
            self.notices = vec![Notice::Info("No conversions yet.".to_string())];
            return;
        }
        self.session.clear_history();
        self.notices = vec![Notice::Success("Conversion history cleared!".to_string())];
    }

    /// Moves the focused selector, wrapping at both ends
    fn move_selection(&mut self, forward: bool) {
        match self.focus {
            Field::Category => {
                self.category_index = step(self.category_index, Category::ALL.len(), forward);
                // Unit lists differ between categories
                let units = self.category().units();
                self.from_index = 0;
                self.to_index = 1.min(units.len() - 1);
                self.last_conversion = None;
                self.notices.clear();
            }
            Field::From => {
                let count = self.category().units().len();
                self.from_index = step(self.from_index, count, forward);
            }
            Field::To => {
                let count = self.category().units().len();
                self.to_index = step(self.to_index, count, forward);
            }
            Field::Value => {}
        }
    }
}

fn step(index: usize, count: usize, forward: bool) -> usize {
    if count == 0 {
        return 0;
    }
    if forward {
        (index + 1) % count
    } else if index == 0 {
        count - 1
    } else {
        index - 1
    }
}

fn format_fetch_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}
