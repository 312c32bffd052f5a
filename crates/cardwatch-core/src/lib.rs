//! cardwatch Core Library
//!
//! Turns bank card notifications into a budget:
//! - Notification parser for the `YYYY年MM月DD日 ... 在<merchant><verb>USD<amount>元` template
//! - SQLite record store with duplicate suppression
//! - Billing-cycle windows anchored on a day of the month
//! - Aggregation queries for recent, monthly, cycle-to-date and per-merchant spend
//! - Display session with currency toggle and change polling
//! - TOML configuration with embedded defaults

pub mod aggregate;
pub mod config;
pub mod cycle;
pub mod db;
pub mod error;
pub mod models;
pub mod parser;
pub mod session;

pub use aggregate::Aggregator;
pub use config::Config;
pub use cycle::{cycle_start, BillingCycle};
pub use db::Database;
pub use error::{Error, Result};
pub use models::{
    ExchangeRateSample, InsertSummary, MerchantSpend, Transaction, TransactionRecord,
    TransactionType, YearMonth,
};
pub use parser::parse;
pub use session::{Dashboard, DashboardLine, DisplayCurrency, Session};
