//! Budget and display configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/cardwatch/config.toml) when it exists
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::aggregate::{DEFAULT_MERCHANT_WINDOW_DAYS, DEFAULT_RECENT_COUNT};
use crate::cycle::{BillingCycle, DEFAULT_CYCLE_START_DAY};
use crate::error::{Error, Result};
use crate::session::DisplayCurrency;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/cardwatch.toml");

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Budget per billing cycle, in USD
    pub monthly_budget: f64,
    pub cycle_start_day: u32,
    pub recent_count: usize,
    pub merchant_window_days: i64,
    pub currency: DisplayCurrency,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monthly_budget: 3000.0,
            cycle_start_day: DEFAULT_CYCLE_START_DAY,
            recent_count: DEFAULT_RECENT_COUNT,
            merchant_window_days: DEFAULT_MERCHANT_WINDOW_DAYS,
            currency: DisplayCurrency::Usd,
        }
    }
}

impl Config {
    /// Load config, preferring `path`, then the data-dir override, then defaults
    ///
    /// An explicit `path` that does not exist is an error; a missing data-dir
    /// override is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(default_path) => {
                    debug!("Loading config override from {}", default_path.display());
                    fs::read_to_string(&default_path).map_err(|e| {
                        Error::Config(format!("Failed to read {}: {}", default_path.display(), e))
                    })?
                }
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }

    /// The billing cycle described by `cycle_start_day`
    pub fn billing_cycle(&self) -> Result<BillingCycle> {
        BillingCycle::new(self.cycle_start_day)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("cardwatch").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    budget: Option<RawBudget>,
    display: Option<RawDisplay>,
}

#[derive(Debug, Deserialize)]
struct RawBudget {
    monthly: Option<f64>,
    cycle_start_day: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    recent_count: Option<usize>,
    merchant_window_days: Option<i64>,
    currency: Option<String>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(budget) = raw.budget {
        if let Some(monthly) = budget.monthly {
            if !monthly.is_finite() || monthly <= 0.0 {
                return Err(Error::Config(format!(
                    "budget.monthly must be positive, got {}",
                    monthly
                )));
            }
            config.monthly_budget = monthly;
        }
        if let Some(day) = budget.cycle_start_day {
            // Validate now rather than on first use
            BillingCycle::new(day).map_err(|e| Error::Config(e.to_string()))?;
            config.cycle_start_day = day;
        }
    }

    if let Some(display) = raw.display {
        if let Some(count) = display.recent_count {
            config.recent_count = count;
        }
        if let Some(days) = display.merchant_window_days {
            if days < 0 {
                return Err(Error::Config(format!(
                    "display.merchant_window_days must not be negative, got {}",
                    days
                )));
            }
            config.merchant_window_days = days;
        }
        if let Some(currency) = display.currency {
            config.currency = currency.parse().map_err(Error::Config)?;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config(
            r#"
            [budget]
            monthly = 1200.5

            [display]
            currency = "cny"
            "#,
        )
        .unwrap();

        assert_eq!(config.monthly_budget, 1200.5);
        assert_eq!(config.currency, DisplayCurrency::Cny);
        assert_eq!(config.cycle_start_day, 10);
        assert_eq!(config.recent_count, 3);
        assert_eq!(config.merchant_window_days, 30);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = parse_config("[budget\nmonthly = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_values() {
        assert!(parse_config("[budget]\ncycle_start_day = 31").is_err());
        assert!(parse_config("[budget]\nmonthly = -5.0").is_err());
        assert!(parse_config("[display]\ncurrency = \"eur\"").is_err());
        assert!(parse_config("[display]\nmerchant_window_days = -1").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[budget]\ncycle_start_day = 1").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.cycle_start_day, 1);
        assert_eq!(config.billing_cycle().unwrap().start_day(), 1);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/cardwatch.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
