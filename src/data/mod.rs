//! Core data models for the unit converter
//!
//! This module contains the measurement categories, their static unit
//! definitions, and the currency rate table fed by the remote rate source.

pub mod rates;
pub mod units;

pub use rates::{RateFetchError, RateSource, RatesClient};
pub use units::{all_categories, CategoryDef, UnitRule};

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

/// Currency codes offered in the currency unit selectors
pub const CURRENCY_CODES: [&str; 7] = ["USD", "EUR", "INR", "JPY", "GBP", "AUD", "PKR"];

/// A measurement category the user can convert within
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Distance,
    Temperature,
    Weight,
    Pressure,
    Currency,
    Time,
    Volume,
    Area,
    Speed,
    Data,
}

impl Category {
    /// All categories in selector order
    pub const ALL: [Category; 10] = [
        Category::Distance,
        Category::Temperature,
        Category::Weight,
        Category::Pressure,
        Category::Currency,
        Category::Time,
        Category::Volume,
        Category::Area,
        Category::Speed,
        Category::Data,
    ];

    /// Display name of the category
    pub fn name(self) -> &'static str {
        self.definition().name
    }

    /// Static definition (units, conversion rule, icon) for this category
    pub fn definition(self) -> &'static CategoryDef {
        units::definition(self)
    }

    /// Unit names offered for this category, in selector order
    pub fn units(self) -> &'static [&'static str] {
        self.definition().units
    }

    /// Position of this category in [`Category::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parses a category name, ignoring case
    ///
    /// # Returns
    /// * `Some(Category)` if the name matches a category
    /// * `None` otherwise
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Currency code to value-per-USD mapping
///
/// Replaced wholesale on every successful fetch and never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RateTable(HashMap<String, f64>);

impl RateTable {
    /// Creates an empty rate table
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rate for a currency code, if present
    pub fn get(&self, code: &str) -> Option<f64> {
        self.0.get(code).copied()
    }

    /// Number of currencies in the table
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the offered currency codes missing from this table
    pub fn missing_codes(&self) -> Vec<&'static str> {
        CURRENCY_CODES
            .into_iter()
            .filter(|code| !self.0.contains_key(*code))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
