//! Billing-cycle windows
//!
//! A billing cycle starts on a fixed day of the month (the 10th unless
//! configured otherwise) and runs until the day before the same day of the
//! next month.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default first day of a billing cycle
pub const DEFAULT_CYCLE_START_DAY: u32 = 10;

/// Start of the cycle containing `today`, using the default start day
pub fn cycle_start(today: NaiveDate) -> NaiveDate {
    BillingCycle::default().start_for(today)
}

/// A monthly billing cycle anchored on `start_day`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingCycle {
    start_day: u32,
}

impl Default for BillingCycle {
    fn default() -> Self {
        Self {
            start_day: DEFAULT_CYCLE_START_DAY,
        }
    }
}

impl BillingCycle {
    /// Days above 28 would not exist in every month
    pub fn new(start_day: u32) -> Result<Self> {
        if !(1..=28).contains(&start_day) {
            return Err(Error::InvalidData(format!(
                "Billing cycle start day must be between 1 and 28, got {}",
                start_day
            )));
        }
        Ok(Self { start_day })
    }

    pub fn start_day(&self) -> u32 {
        self.start_day
    }

    /// First day of the cycle that contains `today`
    ///
    /// Before the start day we are still in the cycle that began last month,
    /// which rolls back into December of the previous year in January.
    pub fn start_for(&self, today: NaiveDate) -> NaiveDate {
        let anchor = if today.day() < self.start_day {
            today - Months::new(1)
        } else {
            today
        };
        self.on_day(anchor)
    }

    /// First day of the cycle after the one containing `today`
    pub fn next_start(&self, today: NaiveDate) -> NaiveDate {
        self.start_for(today) + Months::new(1)
    }

    fn on_day(&self, date: NaiveDate) -> NaiveDate {
        // start_day <= 28, so this day exists in every month
        NaiveDate::from_ymd_opt(date.year(), date.month(), self.start_day).unwrap_or(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cycle_start_before_tenth_rolls_back_a_year() {
        assert_eq!(cycle_start(date(2024, 1, 5)), date(2023, 12, 10));
    }

    #[test]
    fn test_cycle_start_after_tenth() {
        assert_eq!(cycle_start(date(2024, 1, 15)), date(2024, 1, 10));
    }

    #[test]
    fn test_cycle_start_on_tenth() {
        assert_eq!(cycle_start(date(2024, 3, 10)), date(2024, 3, 10));
    }

    #[test]
    fn test_cycle_start_end_of_month() {
        assert_eq!(cycle_start(date(2024, 3, 31)), date(2024, 3, 10));
        assert_eq!(cycle_start(date(2024, 3, 9)), date(2024, 2, 10));
    }

    #[test]
    fn test_custom_start_day() {
        let cycle = BillingCycle::new(1).unwrap();
        assert_eq!(cycle.start_for(date(2024, 5, 1)), date(2024, 5, 1));
        assert_eq!(cycle.start_for(date(2024, 5, 31)), date(2024, 5, 1));

        let cycle = BillingCycle::new(25).unwrap();
        assert_eq!(cycle.start_for(date(2024, 3, 24)), date(2024, 2, 25));
    }

    #[test]
    fn test_next_start() {
        let cycle = BillingCycle::default();
        assert_eq!(cycle.next_start(date(2024, 12, 20)), date(2025, 1, 10));
        assert_eq!(cycle.next_start(date(2024, 1, 5)), date(2024, 1, 10));
    }

    #[test]
    fn test_invalid_start_day() {
        assert!(BillingCycle::new(0).is_err());
        assert!(BillingCycle::new(29).is_err());
    }
}
