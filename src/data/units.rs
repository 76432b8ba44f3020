//! Static unit definitions for every category
//!
//! Each category maps to a conversion rule. Ratio categories carry a table of
//! factors relative to the category's base unit (the entry with factor 1).

use super::{Category, CURRENCY_CODES};

/// How values are converted within a category
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitRule {
    /// `value * factor(from) / factor(to)` against a fixed factor table
    Ratio(&'static [(&'static str, f64)]),
    /// Celsius/Fahrenheit affine transform
    Temperature,
    /// `value * rate(to) / rate(from)` against a fetched rate table
    Currency,
}

impl UnitRule {
    /// Looks up a unit's factor in a ratio table
    ///
    /// Returns `None` for non-ratio rules or units absent from the table.
    pub fn factor(&self, unit: &str) -> Option<f64> {
        match self {
            UnitRule::Ratio(table) => table
                .iter()
                .find(|(name, _)| *name == unit)
                .map(|(_, factor)| *factor),
            UnitRule::Temperature | UnitRule::Currency => None,
        }
    }
}

/// Static definition of a category
#[derive(Debug, Clone, Copy)]
pub struct CategoryDef {
    pub category: Category,
    /// Display name
    pub name: &'static str,
    /// Icon prefixed to the formula line
    pub icon: &'static str,
    /// Units offered in the selectors, in display order
    pub units: &'static [&'static str],
    pub rule: UnitRule,
}

const DISTANCE: &[(&str, f64)] = &[
    ("Meters", 1.0),
    ("Kilometers", 1000.0),
    ("Feet", 0.3048),
    ("Miles", 1609.34),
    ("Yards", 0.9144),
    ("Inches", 0.0254),
];

const WEIGHT: &[(&str, f64)] = &[
    ("Kilograms", 1.0),
    ("Grams", 0.001),
    ("Pounds", 0.453592),
    ("Ounces", 0.0283495),
    ("Stones", 6.35029),
];

const PRESSURE: &[(&str, f64)] = &[
    ("Pascals", 1.0),
    ("Hectopascals", 100.0),
    ("Kilopascals", 1000.0),
    ("Bar", 100_000.0),
    ("Atmospheres", 101_325.0),
];

// A month is taken as 30.4167 days.
const TIME: &[(&str, f64)] = &[
    ("Seconds", 1.0),
    ("Minutes", 60.0),
    ("Hours", 3600.0),
    ("Days", 86_400.0),
    ("Weeks", 604_800.0),
    ("Months", 2_628_000.0),
];

const VOLUME: &[(&str, f64)] = &[
    ("Liters", 1.0),
    ("Milliliters", 0.001),
    ("Gallons", 3.78541),
    ("Cups", 0.236588),
    ("Cubic Meters", 1000.0),
];

const AREA: &[(&str, f64)] = &[
    ("Square Meters", 1.0),
    ("Square Kilometers", 1e6),
    ("Acres", 4046.86),
    ("Hectares", 10_000.0),
];

const SPEED: &[(&str, f64)] = &[
    ("Meters per second", 1.0),
    ("Kilometers per hour", 0.277778),
    ("Miles per hour", 0.44704),
    ("Knots", 0.514444),
];

// Binary multiples
const DATA: &[(&str, f64)] = &[
    ("Bytes", 1.0),
    ("Kilobytes", 1024.0),
    ("Megabytes", 1_048_576.0),
    ("Gigabytes", 1_073_741_824.0),
    ("Terabytes", 1_099_511_627_776.0),
];

/// Static array of all category definitions, indexed by `Category as usize`
pub static CATEGORIES: [CategoryDef; 10] = [
    CategoryDef {
        category: Category::Distance,
        name: "Distance",
        icon: "📏",
        units: &["Meters", "Kilometers", "Feet", "Miles", "Yards", "Inches"],
        rule: UnitRule::Ratio(DISTANCE),
    },
    CategoryDef {
        category: Category::Temperature,
        name: "Temperature",
        icon: "🌡️",
        units: &["Celsius", "Fahrenheit"],
        rule: UnitRule::Temperature,
    },
    CategoryDef {
        category: Category::Weight,
        name: "Weight",
        icon: "⚖️",
        units: &["Kilograms", "Grams", "Pounds", "Ounces", "Stones"],
        rule: UnitRule::Ratio(WEIGHT),
    },
    CategoryDef {
        category: Category::Pressure,
        name: "Pressure",
        icon: "🛠️",
        units: &["Pascals", "Hectopascals", "Kilopascals", "Bar", "Atmospheres"],
        rule: UnitRule::Ratio(PRESSURE),
    },
    CategoryDef {
        category: Category::Currency,
        name: "Currency",
        icon: "💱",
        units: &CURRENCY_CODES,
        rule: UnitRule::Currency,
    },
    CategoryDef {
        category: Category::Time,
        name: "Time",
        icon: "⏳",
        units: &["Seconds", "Minutes", "Hours", "Days", "Weeks", "Months"],
        rule: UnitRule::Ratio(TIME),
    },
    CategoryDef {
        category: Category::Volume,
        name: "Volume",
        icon: "🧪",
        units: &["Liters", "Milliliters", "Gallons", "Cups", "Cubic Meters"],
        rule: UnitRule::Ratio(VOLUME),
    },
    CategoryDef {
        category: Category::Area,
        name: "Area",
        icon: "📐",
        units: &["Square Meters", "Square Kilometers", "Acres", "Hectares"],
        rule: UnitRule::Ratio(AREA),
    },
    CategoryDef {
        category: Category::Speed,
        name: "Speed",
        icon: "🚀",
        units: &[
            "Meters per second",
            "Kilometers per hour",
            "Miles per hour",
            "Knots",
        ],
        rule: UnitRule::Ratio(SPEED),
    },
    CategoryDef {
        category: Category::Data,
        name: "Data",
        icon: "💾",
        units: &["Bytes", "Kilobytes", "Megabytes", "Gigabytes", "Terabytes"],
        rule: UnitRule::Ratio(DATA),
    },
];

/// Returns a reference to all category definitions
pub fn all_categories() -> &'static [CategoryDef] {
    &CATEGORIES
}

/// Looks up the definition of a category
pub fn definition(category: Category) -> &'static CategoryDef {
    &CATEGORIES[category as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_are_indexed_by_category() {
        for category in Category::ALL {
            assert_eq!(definition(category).category, category);
        }
        assert_eq!(all_categories().len(), Category::ALL.len());
    }

    #[test]
    fn test_ratio_tables_cover_selector_units() {
        for def in all_categories() {
            if let UnitRule::Ratio(table) = def.rule {
                assert_eq!(table.len(), def.units.len(), "{}", def.name);
                for unit in def.units {
                    assert!(
                        def.rule.factor(unit).is_some(),
                        "{} is missing a factor for {}",
                        def.name,
                        unit
                    );
                }
            }
        }
    }

    #[test]
    fn test_each_ratio_table_has_a_base_unit() {
        for def in all_categories() {
            if let UnitRule::Ratio(table) = def.rule {
                let bases = table.iter().filter(|(_, f)| *f == 1.0).count();
                assert_eq!(bases, 1, "{} should have exactly one base unit", def.name);
                assert_eq!(table[0].1, 1.0, "{} base unit should come first", def.name);
            }
        }
    }

    #[test]
    fn test_factor_lookup() {
        let rule = definition(Category::Distance).rule;
        assert_eq!(rule.factor("Kilometers"), Some(1000.0));
        assert_eq!(rule.factor("Parsecs"), None);
        assert_eq!(UnitRule::Temperature.factor("Celsius"), None);
        assert_eq!(UnitRule::Currency.factor("USD"), None);
    }

    #[test]
    fn test_data_factors_are_binary_multiples() {
        let rule = definition(Category::Data).rule;
        assert_eq!(rule.factor("Kilobytes"), Some(1024f64));
        assert_eq!(rule.factor("Megabytes"), Some(1024f64.powi(2)));
        assert_eq!(rule.factor("Gigabytes"), Some(1024f64.powi(3)));
        assert_eq!(rule.factor("Terabytes"), Some(1024f64.powi(4)));
    }

    #[test]
    fn test_temperature_units() {
        assert_eq!(Category::Temperature.units(), &["Celsius", "Fahrenheit"]);
    }
}
