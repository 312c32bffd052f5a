//! Budget aggregation over the record store
//!
//! Every query here is read-only and resolves empty windows to zero or an
//! empty list.

use chrono::{Duration, Local, NaiveDate};
use tracing::debug;

use crate::cycle::BillingCycle;
use crate::db::Database;
use crate::error::Result;
use crate::models::{MerchantSpend, Transaction, YearMonth};

/// Default number of transactions in the recency list
pub const DEFAULT_RECENT_COUNT: usize = 3;

/// Default lookback for the merchant summary
pub const DEFAULT_MERCHANT_WINDOW_DAYS: i64 = 30;

/// Read-only budget queries relative to a fixed "today"
pub struct Aggregator<'a> {
    db: &'a Database,
    today: NaiveDate,
    cycle: BillingCycle,
}

impl<'a> Aggregator<'a> {
    /// Aggregate relative to the local calendar date
    pub fn new(db: &'a Database) -> Self {
        Self::with_today(db, Local::now().date_naive())
    }

    pub fn with_today(db: &'a Database, today: NaiveDate) -> Self {
        Self {
            db,
            today,
            cycle: BillingCycle::default(),
        }
    }

    pub fn with_cycle(mut self, cycle: BillingCycle) -> Self {
        self.cycle = cycle;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn cycle(&self) -> BillingCycle {
        self.cycle
    }

    pub fn database(&self) -> &Database {
        self.db
    }

    /// First day of the current billing cycle
    pub fn cycle_start(&self) -> NaiveDate {
        self.cycle.start_for(self.today)
    }

    pub fn recent_transactions(&self, n: usize) -> Result<Vec<Transaction>> {
        self.db.recent(n)
    }

    pub fn expenses_this_calendar_month(&self) -> Result<f64> {
        self.db.sum_for_month(YearMonth::of(self.today))
    }

    /// Cycle-to-date spend
    pub fn expenses_since_cycle_start(&self) -> Result<f64> {
        self.db.sum_in_range(self.cycle_start(), None)
    }

    pub fn transactions_since_cycle_start(&self) -> Result<Vec<Transaction>> {
        self.db.list_since(self.cycle_start())
    }

    /// Per-merchant spend over the last `window_days`, biggest spender first
    ///
    /// Merchants are compared case-insensitively. Equal totals keep the order
    /// in which the merchants first appear in the store. A window reaching back
    /// past the earliest representable date covers the whole store.
    pub fn merchant_spend_summary(&self, window_days: i64) -> Result<Vec<MerchantSpend>> {
        let since = Duration::try_days(window_days)
            .and_then(|window| self.today.checked_sub_signed(window))
            .unwrap_or(NaiveDate::MIN);

        let mut summary = Vec::new();
        for merchant in self.db.distinct_merchants_since(since)? {
            let (total, count) = self.db.merchant_totals_since(&merchant, since)?;
            summary.push(MerchantSpend {
                merchant,
                total,
                count,
            });
        }

        summary.sort_by(|a, b| b.total.total_cmp(&a.total));
        debug!("Summarized {} merchants since {}", summary.len(), since);
        Ok(summary)
    }
}
