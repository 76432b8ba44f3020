//! Conversion engine
//!
//! Maps `(category, from, to, value)` to a converted value. The category's
//! [`UnitRule`] selects the converter, so adding a category is a table entry in
//! [`crate::data::units`] rather than a new branch here.

pub mod formula;

pub use formula::{format_value, Formula};

use thiserror::Error;

use crate::data::{Category, RateTable, UnitRule};

/// Errors that can occur during a conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// Unit is not defined for the category
    #[error("Unknown unit '{unit}' for {category}")]
    UnknownUnit { category: Category, unit: String },

    /// No usable exchange rate for the currency code
    #[error("Exchange rate unavailable for {0}")]
    RateUnavailable(String),
}

/// Converts `value` from one unit to another within a category
///
/// `rates` is only consulted for [`Category::Currency`]; pass `None` for the
/// other categories.
///
/// # Returns
/// * `Ok(f64)` - The converted value, unrounded
/// * `Err(ConvertError::UnknownUnit)` - If either unit is not part of the category
/// * `Err(ConvertError::RateUnavailable)` - If a currency rate is missing or unusable
pub fn convert(
    category: Category,
    from: &str,
    to: &str,
    value: f64,
    rates: Option<&RateTable>,
) -> Result<f64, ConvertError> {
    match category.definition().rule {
        UnitRule::Ratio(_) => ratio_convert(category, from, to, value),
        UnitRule::Temperature => temperature_convert(from, to, value),
        UnitRule::Currency => match rates {
            Some(rates) => currency_convert(from, to, value, rates),
            None => Err(ConvertError::RateUnavailable(from.to_string())),
        },
    }
}

/// The multiplier applied to one `from` unit, as shown in the formula line
pub fn conversion_factor(
    category: Category,
    from: &str,
    to: &str,
    rates: Option<&RateTable>,
) -> Result<f64, ConvertError> {
    convert(category, from, to, 1.0, rates)
}

/// Converts within a ratio category: `value * factor(from) / factor(to)`
pub fn ratio_convert(
    category: Category,
    from: &str,
    to: &str,
    value: f64,
) -> Result<f64, ConvertError> {
    let rule = category.definition().rule;
    let from_factor = rule.factor(from).ok_or_else(|| unknown(category, from))?;
    let to_factor = rule.factor(to).ok_or_else(|| unknown(category, to))?;

    if from == to {
        return Ok(value);
    }
    Ok(value * from_factor / to_factor)
}

/// Converts between Celsius and Fahrenheit
///
/// Any pairing other than C→F or F→C is the identity.
pub fn temperature_convert(from: &str, to: &str, value: f64) -> Result<f64, ConvertError> {
    let units = Category::Temperature.units();
    for unit in [from, to] {
        if !units.contains(&unit) {
            return Err(unknown(Category::Temperature, unit));
        }
    }

    let result = match (from, to) {
        ("Celsius", "Fahrenheit") => value * 9.0 / 5.0 + 32.0,
        ("Fahrenheit", "Celsius") => (value - 32.0) * 5.0 / 9.0,
        _ => value,
    };
    Ok(result)
}

/// Converts between currencies: `value * rate(to) / rate(from)`
///
/// Rates are value-per-USD, so any code present in the table can be used.
pub fn currency_convert(
    from: &str,
    to: &str,
    value: f64,
    rates: &RateTable,
) -> Result<f64, ConvertError> {
    let from_rate = usable_rate(rates, from)?;
    let to_rate = usable_rate(rates, to)?;

    if from == to {
        return Ok(value);
    }
    Ok(value * to_rate / from_rate)
}

/// Rates must be positive and finite to divide by
fn usable_rate(rates: &RateTable, code: &str) -> Result<f64, ConvertError> {
    rates
        .get(code)
        .filter(|rate| rate.is_finite() && *rate > 0.0)
        .ok_or_else(|| ConvertError::RateUnavailable(code.to_string()))
}

fn unknown(category: Category, unit: &str) -> ConvertError {
    ConvertError::UnknownUnit {
        category,
        unit: unit.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn sample_rates() -> RateTable {
        [
            ("USD", 1.0),
            ("EUR", 0.9),
            ("INR", 83.12),
            ("JPY", 149.7),
            ("GBP", 0.79),
            ("AUD", 1.52),
            ("PKR", 278.4),
        ]
        .into_iter()
        .collect()
    }

    fn ratio_categories() -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| matches!(c.definition().rule, UnitRule::Ratio(_)))
            .collect()
    }

    #[test]
    fn test_distance_kilometers_to_meters() {
        let result = convert(Category::Distance, "Kilometers", "Meters", 1.0, None).unwrap();
        assert_eq!(result, 1000.0);
    }

    #[test]
    fn test_weight_kilograms_to_grams() {
        let result = convert(Category::Weight, "Kilograms", "Grams", 2.0, None).unwrap();
        assert_eq!(result, 2000.0);
    }

    #[test]
    fn test_temperature_celsius_to_fahrenheit() {
        assert_eq!(temperature_convert("Celsius", "Fahrenheit", 0.0).unwrap(), 32.0);
        assert_eq!(temperature_convert("Celsius", "Fahrenheit", 100.0).unwrap(), 212.0);
    }

    #[test]
    fn test_temperature_fahrenheit_to_celsius() {
        assert_eq!(temperature_convert("Fahrenheit", "Celsius", 32.0).unwrap(), 0.0);
        assert_eq!(temperature_convert("Fahrenheit", "Celsius", 212.0).unwrap(), 100.0);
    }

    #[test]
    fn test_temperature_same_unit_is_identity() {
        assert_eq!(temperature_convert("Celsius", "Celsius", 37.5).unwrap(), 37.5);
        assert_eq!(
            temperature_convert("Fahrenheit", "Fahrenheit", -40.0).unwrap(),
            -40.0
        );
    }

    #[test]
    fn test_temperature_rejects_kelvin() {
        let err = temperature_convert("Kelvin", "Celsius", 300.0).unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnknownUnit {
                category: Category::Temperature,
                unit: "Kelvin".to_string()
            }
        );
    }

    #[test]
    fn test_data_gigabytes_to_bytes() {
        let result = convert(Category::Data, "Gigabytes", "Bytes", 1.0, None).unwrap();
        assert_eq!(result, 1_073_741_824.0);
    }

    #[test]
    fn test_currency_usd_to_eur() {
        let rates: RateTable = [("USD", 1.0), ("EUR", 0.9)].into_iter().collect();
        let result = convert(Category::Currency, "USD", "EUR", 10.0, Some(&rates)).unwrap();
        assert_eq!(result, 9.0);
    }

    #[test]
    fn test_currency_cross_rate() {
        let rates = sample_rates();
        let result = currency_convert("EUR", "GBP", 90.0, &rates).unwrap();
        assert!((result - 79.0).abs() < EPSILON);
    }

    #[test]
    fn test_currency_missing_code_is_rate_unavailable() {
        let rates: RateTable = [("USD", 1.0)].into_iter().collect();
        let err = convert(Category::Currency, "USD", "PKR", 5.0, Some(&rates)).unwrap_err();
        assert_eq!(err, ConvertError::RateUnavailable("PKR".to_string()));
    }

    #[test]
    fn test_currency_empty_table_is_rate_unavailable() {
        let err = convert(Category::Currency, "USD", "EUR", 5.0, Some(&RateTable::new()))
            .unwrap_err();
        assert_eq!(err, ConvertError::RateUnavailable("USD".to_string()));
    }

    #[test]
    fn test_currency_without_table_is_rate_unavailable() {
        let err = convert(Category::Currency, "GBP", "EUR", 5.0, None).unwrap_err();
        assert!(matches!(err, ConvertError::RateUnavailable(_)));
    }

    #[test]
    fn test_currency_zero_rate_is_rate_unavailable() {
        let rates: RateTable = [("USD", 1.0), ("EUR", 0.0)].into_iter().collect();
        let err = currency_convert("EUR", "USD", 5.0, &rates).unwrap_err();
        assert_eq!(err, ConvertError::RateUnavailable("EUR".to_string()));
    }

    #[test]
    fn test_unknown_unit() {
        let err = convert(Category::Distance, "Meters", "Parsecs", 5.0, None).unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnknownUnit {
                category: Category::Distance,
                unit: "Parsecs".to_string()
            }
        );
        assert!(err.to_string().contains("Parsecs"));
    }

    #[test]
    fn test_unknown_source_unit() {
        let err = convert(Category::Speed, "Furlongs per fortnight", "Knots", 1.0, None)
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnknownUnit { .. }));
    }

    #[test]
    fn test_unit_from_other_category_is_unknown() {
        let err = convert(Category::Weight, "Meters", "Grams", 1.0, None).unwrap_err();
        assert!(matches!(err, ConvertError::UnknownUnit { category: Category::Weight, .. }));
    }

    #[test]
    fn test_identity_law_for_every_category_and_unit() {
        let rates = sample_rates();
        for category in Category::ALL {
            for unit in category.units() {
                for x in [0.0, 1.0, 12.34, 98_765.4321] {
                    let result = convert(category, unit, unit, x, Some(&rates)).unwrap();
                    assert_eq!(result, x, "{} {} should be identity", category, unit);
                }
            }
        }
    }

    #[test]
    fn test_round_trip_law_for_ratio_categories() {
        for category in ratio_categories() {
            for from in category.units() {
                for to in category.units() {
                    for x in [0.5, 1.0, 42.0, 1234.5678] {
                        let there = convert(category, to, from, x, None).unwrap();
                        let back = convert(category, from, to, there, None).unwrap();
                        assert!(
                            ((back - x) / x).abs() < EPSILON,
                            "{}: {} -> {} -> {} gave {}",
                            category,
                            to,
                            from,
                            to,
                            back
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_conversion_factor_is_one_unit_conversion() {
        let factor = conversion_factor(Category::Time, "Hours", "Minutes", None).unwrap();
        assert_eq!(factor, 60.0);

        let rates = sample_rates();
        let factor = conversion_factor(Category::Currency, "USD", "INR", Some(&rates)).unwrap();
        assert!((factor - 83.12).abs() < EPSILON);
    }

    #[test]
    fn test_ratio_conversions_against_known_values() {
        let cases = [
            (Category::Distance, "Miles", "Kilometers", 1.0, 1.60934),
            (Category::Distance, "Feet", "Inches", 1.0, 12.0),
            (Category::Pressure, "Atmospheres", "Kilopascals", 1.0, 101.325),
            (Category::Time, "Weeks", "Days", 2.0, 14.0),
            (Category::Volume, "Cubic Meters", "Liters", 1.0, 1000.0),
            (Category::Area, "Square Kilometers", "Hectares", 1.0, 100.0),
            (Category::Speed, "Knots", "Meters per second", 1.0, 0.514444),
            (Category::Data, "Terabytes", "Gigabytes", 1.0, 1024.0),
        ];

        for (category, from, to, value, expected) in cases {
            let result = convert(category, from, to, value, None).unwrap();
            assert!(
                (result - expected).abs() < 1e-6,
                "{} {} -> {}: expected {}, got {}",
                category,
                from,
                to,
                expected,
                result
            );
        }
    }
}
