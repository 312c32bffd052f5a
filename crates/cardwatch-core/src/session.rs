//! Display session state and the dashboard snapshot
//!
//! A `Session` holds what a front end needs between refreshes: the currency it
//! shows amounts in, the budget, and the last store revision it rendered.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::Aggregator;
use crate::db::{Database, PLACEHOLDER_RATE};
use crate::error::Result;

/// Currency amounts are displayed in; storage is always USD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayCurrency {
    #[default]
    Usd,
    Cny,
}

impl DisplayCurrency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "usd",
            Self::Cny => "cny",
        }
    }

    /// ISO code for labels
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Cny => "CNY",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Usd => Self::Cny,
            Self::Cny => Self::Usd,
        }
    }
}

impl std::str::FromStr for DisplayCurrency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "usd" => Ok(Self::Usd),
            "cny" | "rmb" => Ok(Self::Cny),
            _ => Err(format!("Unknown display currency: {}", s)),
        }
    }
}

impl std::fmt::Display for DisplayCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One row of the recent list, amount in the display currency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardLine {
    pub date: String,
    pub merchant: String,
    pub amount: f64,
    pub category: String,
}

/// Everything the budget screen shows, in the display currency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub currency: DisplayCurrency,
    /// Multiplier applied to USD amounts (1.0 for USD)
    pub rate: f64,
    pub cycle_start: NaiveDate,
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    /// Share of the budget spent this cycle, capped at 100
    pub used_percent: f64,
    pub recent: Vec<DashboardLine>,
}

/// Explicit display state for one interactive session
#[derive(Debug, Clone)]
pub struct Session {
    currency: DisplayCurrency,
    budget: f64,
    last_revision: Option<i64>,
}

impl Session {
    pub fn new(budget: f64, currency: DisplayCurrency) -> Self {
        Self {
            currency,
            budget,
            last_revision: None,
        }
    }

    pub fn currency(&self) -> DisplayCurrency {
        self.currency
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Switch between USD and CNY, returning the new currency
    pub fn toggle_currency(&mut self) -> DisplayCurrency {
        self.currency = self.currency.toggled();
        self.currency
    }

    /// Whether the store gained records since the last poll
    ///
    /// The first poll against a non-empty store reports a change.
    pub fn poll_changed(&mut self, db: &Database) -> Result<bool> {
        let latest = db.latest_revision()?;
        if latest != self.last_revision {
            self.last_revision = latest;
            return Ok(true);
        }
        Ok(false)
    }

    /// Multiplier from stored USD to the display currency
    pub fn conversion_rate(&self, db: &Database) -> Result<f64> {
        Ok(match self.currency {
            DisplayCurrency::Usd => 1.0,
            DisplayCurrency::Cny => db
                .latest_exchange_rate()?
                .map(|sample| sample.rate)
                .unwrap_or(PLACEHOLDER_RATE),
        })
    }

    /// Build the budget screen for the aggregator's "today"
    pub fn dashboard(&self, agg: &Aggregator, recent_count: usize) -> Result<Dashboard> {
        let rate = self.conversion_rate(agg.database())?;
        let spent = agg.expenses_since_cycle_start()?;

        let used_percent = if self.budget > 0.0 {
            (spent / self.budget * 100.0).min(100.0)
        } else {
            0.0
        };

        let recent = agg
            .recent_transactions(recent_count)?
            .into_iter()
            .map(|tx| DashboardLine {
                date: tx.date,
                merchant: tx.merchant,
                amount: round_cents(tx.amount * rate),
                category: tx.category,
            })
            .collect();

        Ok(Dashboard {
            currency: self.currency,
            rate,
            cycle_start: agg.cycle_start(),
            budget: round_cents(self.budget * rate),
            spent: round_cents(spent * rate),
            remaining: round_cents((self.budget - spent) * rate),
            used_percent: round_cents(used_percent),
            recent,
        })
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
