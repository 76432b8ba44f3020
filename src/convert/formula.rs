//! Display formatting for conversions
//!
//! Results are shown with 2 decimals and multiplicative factors with 4.
//! Input values are echoed the way they were entered, keeping one decimal
//! place for whole numbers (`1.0`, not `1`). Very large and very small
//! magnitudes switch to a signed two-digit exponent (`1e+16`, `1e-05`).

use std::fmt;

use crate::data::{Category, UnitRule};

/// Values at or above this magnitude are echoed in exponent form
const LARGE_EXPONENT_THRESHOLD: f64 = 1e16;

/// Nonzero values below this magnitude are echoed in exponent form
const SMALL_EXPONENT_THRESHOLD: f64 = 1e-4;

/// Formats an input value for echoing in formulas and history
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude >= LARGE_EXPONENT_THRESHOLD
        || (magnitude != 0.0 && magnitude < SMALL_EXPONENT_THRESHOLD)
    {
        exponent_form(value)
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Shortest mantissa with an explicitly signed exponent of at least two digits
fn exponent_form(value: f64) -> String {
    let plain = format!("{:e}", value);
    let Some((mantissa, exponent)) = plain.split_once('e') else {
        return plain;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return plain;
    };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exponent.abs())
}

/// A rendered formula line for one conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    /// Category icon
    pub icon: &'static str,
    /// The expression, e.g. `1.0 Kilometers × 1000.0000 = 1000.00 Meters`
    pub expression: String,
}

impl Formula {
    /// Builds the formula for a completed conversion
    ///
    /// `factor` is the one-unit conversion and is ignored for temperature,
    /// which shows its affine expression instead.
    pub fn new(
        category: Category,
        from: &str,
        to: &str,
        value: f64,
        result: f64,
        factor: f64,
    ) -> Self {
        let def = category.definition();
        let expression = match def.rule {
            UnitRule::Temperature => temperature_expression(from, to, value, result),
            UnitRule::Ratio(_) | UnitRule::Currency => format!(
                "{} {} × {:.4} = {:.2} {}",
                format_value(value),
                from,
                factor,
                result,
                to
            ),
        };

        Self {
            icon: def.icon,
            expression,
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Formula: {}", self.icon, self.expression)
    }
}

fn temperature_expression(from: &str, to: &str, value: f64, result: f64) -> String {
    let value = format_value(value);
    match (from, to) {
        ("Celsius", "Fahrenheit") => format!("({}°C × 9/5) + 32 = {:.2}°F", value, result),
        ("Fahrenheit", "Celsius") => format!("({}°F - 32) × 5/9 = {:.2}°C", value, result),
        _ => format!("{}°{} = {:.2}°{}", value, from, result, to),
    }
}

/// The headline shown after a successful conversion
pub fn summary_line(from: &str, to: &str, value: f64, result: f64) -> String {
    format!(
        "{} {} is equal to {:.2} {}",
        format_value(value),
        from,
        result,
        to
    )
}

/// The compact line stored in the conversion history
pub fn history_line(from: &str, to: &str, value: f64, result: f64) -> String {
    format!("{} {} → {:.2} {}", format_value(value), from, result, to)
}
