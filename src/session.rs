//! Per-session conversion context
//!
//! A [`Session`] owns everything one interactive user accumulates: the rate
//! cache and the conversion history. Create one per session and drop it at the
//! end; nothing here is global.

use std::fmt;

use crate::cache::{Clock, RateCache, RateSnapshot, SystemClock};
use crate::convert::formula::{history_line, summary_line};
use crate::convert::{self, ConvertError, Formula};
use crate::data::{Category, RateSource, RatesClient};

/// Number of history entries shown to the user
pub const HISTORY_DISPLAY_LIMIT: usize = 10;

/// Note shown under currency conversions
pub const CURRENCY_NOTE: &str = "Currency rates are fetched in real-time";

/// One completed conversion, as stored in the history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRecord(String);

impl ConversionRecord {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered list of completed conversions
///
/// Unbounded for the session; only the display is capped.
#[derive(Debug, Clone, Default)]
pub struct History {
    records: Vec<ConversionRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record
    pub fn push(&mut self, record: ConversionRecord) {
        self.records.push(record);
    }

    /// Most recent records first, at most `limit` of them
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &ConversionRecord> {
        self.records.iter().rev().take(limit)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// The outcome of a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub category: Category,
    pub from: String,
    pub to: String,
    pub value: f64,
    /// Unrounded result
    pub result: f64,
    /// One-unit conversion shown in the formula
    pub factor: f64,
    pub formula: Formula,
    /// e.g. `2.0 Kilograms is equal to 2000.00 Grams`
    pub summary: String,
    /// Extra line for the category, if any
    pub note: Option<&'static str>,
}

/// Conversion context for a single interactive session
pub struct Session<S = RatesClient, C = SystemClock> {
    rates: RateCache<S, C>,
    history: History,
    rate_error: Option<String>,
}

impl<S: RateSource, C: Clock> Session<S, C> {
    /// Creates a session with an empty history
    pub fn new(rates: RateCache<S, C>) -> Self {
        Self {
            rates,
            history: History::new(),
            rate_error: None,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Clears the conversion history
    pub fn clear_history(&mut self) {
        tracing::debug!(entries = self.history.len(), "clearing history");
        self.history.clear();
    }

    pub fn rate_cache(&self) -> &RateCache<S, C> {
        &self.rates
    }

    /// The error from the most recent failed rate fetch, if the latest
    /// attempt failed
    pub fn rate_error(&self) -> Option<&str> {
        self.rate_error.as_deref()
    }

    /// Converts a value and appends the result to the history
    ///
    /// Rates are only requested for [`Category::Currency`].
    ///
    /// # Returns
    /// * `Ok(Conversion)` with the result, formula, and summary line
    /// * `Err(ConvertError)` if a unit is unknown or a rate is unavailable;
    ///   nothing is added to the history
    pub async fn convert(
        &mut self,
        category: Category,
        from: &str,
        to: &str,
        value: f64,
    ) -> Result<Conversion, ConvertError> {
        let snapshot = match category {
            Category::Currency => Some(self.fetch_rates(false).await),
            _ => None,
        };
        let rates = snapshot.as_ref().map(|s| s.rates.as_ref());

        let outcome = convert::convert(category, from, to, value, rates).and_then(|result| {
            let factor = convert::conversion_factor(category, from, to, rates)?;
            Ok((result, factor))
        });
        let (result, factor) = match outcome {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(%category, from, to, error = %e, "conversion failed");
                return Err(e);
            }
        };

        self.history.push(ConversionRecord(history_line(from, to, value, result)));
        tracing::debug!(%category, from, to, value, result, "converted");

        Ok(Conversion {
            category,
            from: from.to_string(),
            to: to.to_string(),
            value,
            result,
            factor,
            formula: Formula::new(category, from, to, value, result, factor),
            summary: summary_line(from, to, value, result),
            note: (category == Category::Currency).then_some(CURRENCY_NOTE),
        })
    }

    /// Re-fetches currency rates regardless of the validity window
    pub async fn refresh_rates(&mut self) -> RateSnapshot {
        self.fetch_rates(true).await
    }

    async fn fetch_rates(&mut self, force: bool) -> RateSnapshot {
        let snapshot = if force {
            self.rates.force_refresh().await
        } else {
            self.rates.get_rates().await
        };
        self.rate_error = snapshot.error().map(str::to_string);
        snapshot
    }
}
