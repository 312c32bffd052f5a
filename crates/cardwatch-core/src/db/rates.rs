//! Exchange rate samples

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::ExchangeRateSample;

impl Database {
    /// Append a USD→CNY rate sample stamped with the current time
    pub fn store_exchange_rate(&self, rate: f64) -> Result<i64> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Exchange rate must be positive, got {}",
                rate
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO exchange_rates (rate, recorded_at) VALUES (?, ?)",
            params![rate, Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// The most recently stored rate sample
    pub fn latest_exchange_rate(&self) -> Result<Option<ExchangeRateSample>> {
        let conn = self.conn()?;
        let sample = conn
            .query_row(
                "SELECT id, rate, recorded_at FROM exchange_rates ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    let recorded_at: String = row.get(2)?;
                    Ok(ExchangeRateSample {
                        id: row.get(0)?,
                        rate: row.get(1)?,
                        recorded_at: parse_datetime(&recorded_at),
                    })
                },
            )
            .optional()?;
        Ok(sample)
    }
}
