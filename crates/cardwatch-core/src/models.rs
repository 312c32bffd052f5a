//! Domain models for cardwatch

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How the bank reported the charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionType {
    /// A settled purchase (`消费`)
    #[default]
    Consumption,
    /// A hold placed on the card (`预授权`)
    PreAuthorization,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consumption => "consumption",
            Self::PreAuthorization => "pre-authorization",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "consumption" => Ok(Self::Consumption),
            "pre-authorization" | "preauthorization" => Ok(Self::PreAuthorization),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction extracted from notification text, before it is stored
///
/// `date` is kept as the normalized `YYYY-MM-DD` text from the notification.
/// The parser does not validate the calendar, so use [`calendar_date`] when a
/// real date is needed.
///
/// [`calendar_date`]: TransactionRecord::calendar_date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: String,
    pub merchant: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
}

impl TransactionRecord {
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// A stored transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: String,
    pub merchant: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
}

impl Transaction {
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn is_categorized(&self) -> bool {
        !self.category.is_empty()
    }
}

/// A calendar month, e.g. `2024-03`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// SQL LIKE pattern matching every date string in this month
    pub(crate) fn like_pattern(&self) -> String {
        format!("{}-%", self)
    }
}

impl std::str::FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("Expected YYYY-MM, got: {}", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid year in: {}", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("Invalid month in: {}", s))?;
        Self::new(year, month).ok_or_else(|| format!("Month out of range in: {}", s))
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Outcome of a bulk insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsertSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Spend at one merchant within a window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantSpend {
    /// Lower-cased merchant name
    pub merchant: String,
    pub total: f64,
    pub count: i64,
}

/// A stored USD→CNY exchange rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateSample {
    pub id: i64,
    pub rate: f64,
    pub recorded_at: DateTime<Utc>,
}
