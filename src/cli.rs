//! Command-line interface parsing for unitconv
//!
//! This module handles parsing of CLI arguments using clap. Without `--value`
//! the interactive converter starts (optionally preselecting a category and
//! units); with `--value` a single conversion is printed and the program exits.

use chrono::Duration;
use clap::Parser;
use thiserror::Error;

use crate::cache::DEFAULT_RATE_TTL_SECS;
use crate::data::rates::DEFAULT_RATES_URL;
use crate::data::Category;
use crate::logging::{LogFormat, LoggingConfig};

/// Longest accepted rate validity window (one year)
pub const MAX_RATE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Error types for CLI argument parsing
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// The specified category name is not recognized
    #[error("Invalid category: '{0}'. Valid categories: distance, temperature, weight, pressure, currency, time, volume, area, speed, data")]
    InvalidCategory(String),

    /// The unit is not offered for the category
    #[error("Invalid unit '{unit}' for {category}. Valid units: {valid}")]
    InvalidUnit {
        category: Category,
        unit: String,
        valid: String,
    },

    /// Units or a value were given without a category
    #[error("--from, --to and --value require --category")]
    MissingCategory,

    /// The value is negative or not finite
    #[error("Invalid value: {0}. Value must be a non-negative number")]
    InvalidValue(f64),

    /// The rate validity window is zero or too large to represent
    #[error("Invalid rate TTL: must be between 1 and {} seconds", MAX_RATE_TTL_SECS)]
    InvalidRateTtl,
}

/// unitconv - Convert between units of distance, temperature, currency and more
#[derive(Parser, Debug)]
#[command(name = "unitconv")]
#[command(about = "Interactive unit converter with live currency rates")]
#[command(version)]
pub struct Cli {
    /// Category to start in (e.g. distance, currency, data)
    #[arg(long, short, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Source unit (e.g. Kilometers, USD)
    #[arg(long, value_name = "UNIT")]
    pub from: Option<String>,

    /// Target unit (e.g. Meters, EUR)
    #[arg(long, value_name = "UNIT")]
    pub to: Option<String>,

    /// Convert this value, print the result and exit
    ///
    /// Examples:
    ///   unitconv -c distance --from Kilometers --to Meters --value 1
    ///   unitconv -c currency --from USD --to EUR --value 10
    #[arg(long, value_name = "VALUE")]
    pub value: Option<f64>,

    /// Endpoint returning USD-based rates as {"rates": {...}}
    #[arg(long, value_name = "URL", default_value = DEFAULT_RATES_URL)]
    pub rates_url: String,

    /// Seconds a fetched rate table stays valid
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_RATE_TTL_SECS as u64)]
    pub rate_ttl: u64,

    /// Log level filter; RUST_LOG overrides it
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    /// Category selected at startup
    pub category: Category,
    /// Source unit selected at startup
    pub from: &'static str,
    /// Target unit selected at startup
    pub to: &'static str,
    /// Value for a one-shot conversion; `None` starts the interactive UI
    pub value: Option<f64>,
    pub rates_url: String,
    pub rate_ttl: Duration,
    pub logging: LoggingConfig,
}

impl Default for StartupConfig {
    fn default() -> Self {
        let category = Category::Distance;
        let (from, to) = default_units(category);
        Self {
            category,
            from,
            to,
            value: None,
            rates_url: DEFAULT_RATES_URL.to_string(),
            rate_ttl: Duration::seconds(DEFAULT_RATE_TTL_SECS),
            logging: LoggingConfig::default(),
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if a category, unit, value or TTL is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let category = match &cli.category {
            Some(name) => parse_category_arg(name)?,
            None if cli.from.is_some() || cli.to.is_some() || cli.value.is_some() => {
                return Err(CliError::MissingCategory);
            }
            None => Category::Distance,
        };

        let (default_from, default_to) = default_units(category);
        let from = match &cli.from {
            Some(unit) => parse_unit_arg(category, unit)?,
            None => default_from,
        };
        let to = match &cli.to {
            Some(unit) => parse_unit_arg(category, unit)?,
            None => default_to,
        };

        if let Some(value) = cli.value {
            if !value.is_finite() || value < 0.0 {
                return Err(CliError::InvalidValue(value));
            }
        }

        let rate_ttl = parse_rate_ttl(cli.rate_ttl)?;

        Ok(StartupConfig {
            category,
            from,
            to,
            value: cli.value,
            rates_url: cli.rates_url.clone(),
            rate_ttl,
            logging: LoggingConfig {
                level: cli.log_level.clone(),
                format: cli.log_format,
            },
        })
    }

    /// Whether this run converts once and exits
    pub fn is_one_shot(&self) -> bool {
        self.value.is_some()
    }
}

/// Parses a category argument, ignoring case
pub fn parse_category_arg(s: &str) -> Result<Category, CliError> {
    Category::from_name(s).ok_or_else(|| CliError::InvalidCategory(s.to_string()))
}

/// Resolves a unit argument to the category's canonical unit name, ignoring case
pub fn parse_unit_arg(category: Category, s: &str) -> Result<&'static str, CliError> {
    category
        .units()
        .iter()
        .copied()
        .find(|unit| unit.eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| CliError::InvalidUnit {
            category,
            unit: s.to_string(),
            valid: category.units().join(", "),
        })
}

/// Converts the TTL flag into the cache's validity window
pub fn parse_rate_ttl(secs: u64) -> Result<Duration, CliError> {
    if secs == 0 || secs > MAX_RATE_TTL_SECS {
        return Err(CliError::InvalidRateTtl);
    }
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or(CliError::InvalidRateTtl)
}

/// The first two units of a category
fn default_units(category: Category) -> (&'static str, &'static str) {
    let units = category.units();
    (units[0], units[1.min(units.len() - 1)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_arg() {
        assert_eq!(parse_category_arg("distance").unwrap(), Category::Distance);
        assert_eq!(parse_category_arg("Currency").unwrap(), Category::Currency);
        assert_eq!(parse_category_arg("DATA").unwrap(), Category::Data);
    }

    #[test]
    fn test_parse_category_arg_invalid() {
        let err = parse_category_arg("luminosity").unwrap_err();
        assert!(err.to_string().contains("Invalid category"));
        assert!(err.to_string().contains("luminosity"));
    }

    #[test]
    fn test_parse_unit_arg_resolves_canonical_name() {
        assert_eq!(
            parse_unit_arg(Category::Distance, "kilometers").unwrap(),
            "Kilometers"
        );
        assert_eq!(
            parse_unit_arg(Category::Speed, "miles per hour").unwrap(),
            "Miles per hour"
        );
        assert_eq!(parse_unit_arg(Category::Currency, "eur").unwrap(), "EUR");
    }

    #[test]
    fn test_parse_unit_arg_invalid() {
        let err = parse_unit_arg(Category::Distance, "Parsecs").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Parsecs"));
        assert!(message.contains("Meters, Kilometers"));
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["unitconv"]);
        assert!(cli.category.is_none());
        assert!(cli.value.is_none());
        assert_eq!(cli.rates_url, DEFAULT_RATES_URL);
        assert_eq!(cli.rate_ttl, 600);
    }

    #[test]
    fn test_startup_config_from_cli_no_args() {
        let cli = Cli::parse_from(["unitconv"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config, StartupConfig::default());
        assert!(!config.is_one_shot());
        assert_eq!(config.from, "Meters");
        assert_eq!(config.to, "Kilometers");
    }

    #[test]
    fn test_startup_config_category_defaults_units() {
        let cli = Cli::parse_from(["unitconv", "--category", "temperature"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.category, Category::Temperature);
        assert_eq!(config.from, "Celsius");
        assert_eq!(config.to, "Fahrenheit");
    }

    #[test]
    fn test_startup_config_one_shot() {
        let cli = Cli::parse_from([
            "unitconv", "-c", "data", "--from", "gigabytes", "--to", "bytes", "--value", "1",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert!(config.is_one_shot());
        assert_eq!(config.category, Category::Data);
        assert_eq!(config.from, "Gigabytes");
        assert_eq!(config.to, "Bytes");
        assert_eq!(config.value, Some(1.0));
    }

    #[test]
    fn test_startup_config_units_without_category() {
        let cli = Cli::parse_from(["unitconv", "--from", "Meters"]);
        assert_eq!(
            StartupConfig::from_cli(&cli).unwrap_err(),
            CliError::MissingCategory
        );
    }

    #[test]
    fn test_startup_config_unit_from_other_category() {
        let cli = Cli::parse_from(["unitconv", "-c", "weight", "--to", "Meters"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidUnit { .. })
        ));
    }

    #[test]
    fn test_startup_config_rejects_non_finite_value() {
        let cli = Cli::parse_from(["unitconv", "-c", "distance", "--value", "NaN"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_startup_config_rate_settings() {
        let cli = Cli::parse_from([
            "unitconv",
            "--rates-url",
            "http://localhost:8080/rates",
            "--rate-ttl",
            "120",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.rates_url, "http://localhost:8080/rates");
        assert_eq!(config.rate_ttl, Duration::seconds(120));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_startup_config_rejects_zero_ttl() {
        let cli = Cli::parse_from(["unitconv", "--rate-ttl", "0"]);
        assert_eq!(
            StartupConfig::from_cli(&cli).unwrap_err(),
            CliError::InvalidRateTtl
        );
    }

    #[test]
    fn test_startup_config_rejects_out_of_range_ttl() {
        for ttl in ["10000000000000000", "18446744073709551615"] {
            let cli = Cli::parse_from([
                "unitconv",
                "-c",
                "distance",
                "--value",
                "1",
                "--rate-ttl",
                ttl,
            ]);
            assert_eq!(
                StartupConfig::from_cli(&cli).unwrap_err(),
                CliError::InvalidRateTtl
            );
        }
    }

    #[test]
    fn test_parse_rate_ttl_bounds() {
        assert_eq!(parse_rate_ttl(1).unwrap(), Duration::seconds(1));
        assert_eq!(
            parse_rate_ttl(MAX_RATE_TTL_SECS).unwrap(),
            Duration::seconds(MAX_RATE_TTL_SECS as i64)
        );
        assert_eq!(
            parse_rate_ttl(MAX_RATE_TTL_SECS + 1).unwrap_err(),
            CliError::InvalidRateTtl
        );
    }
}
