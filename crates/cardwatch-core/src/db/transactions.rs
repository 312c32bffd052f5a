//! Transaction operations

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::Database;
use crate::error::Result;
use crate::models::{InsertSummary, Transaction, TransactionRecord, YearMonth};

const TRANSACTION_COLUMNS: &str = "id, date, merchant, amount, type, category";

/// Generate the dedup hash for a record
///
/// Two records with the same (date, merchant, amount) hash the same.
pub(crate) fn generate_hash(date: &str, merchant: &str, amount: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.as_bytes());
    hasher.update([0u8]);
    hasher.update(merchant.as_bytes());
    hasher.update([0u8]);
    hasher.update(amount.to_be_bytes());
    hex::encode(hasher.finalize())
}

/// Insert on an existing connection, returning false for a duplicate
fn insert_on(conn: &Connection, record: &TransactionRecord) -> Result<bool> {
    let import_hash = generate_hash(&record.date, &record.merchant, record.amount);

    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM transactions WHERE import_hash = ?",
            params![import_hash],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(existing_id) = existing {
        debug!(
            "Skipping duplicate {} {} {:.2} (matches #{})",
            record.date, record.merchant, record.amount, existing_id
        );
        return Ok(false);
    }

    conn.execute(
        r#"
        INSERT INTO transactions (date, merchant, amount, category, type, import_hash)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
        params![
            record.date,
            record.merchant,
            record.amount,
            record.category,
            record.transaction_type.as_str(),
            import_hash,
        ],
    )?;

    Ok(true)
}

impl Database {
    /// Insert a record unless one with the same (date, merchant, amount) exists
    ///
    /// Returns whether a row was written.
    pub fn insert_if_absent(&self, record: &TransactionRecord) -> Result<bool> {
        let conn = self.conn()?;
        insert_on(&conn, record)
    }

    /// Insert a batch of candidates in one SQLite transaction
    ///
    /// Duplicates, whether already stored or repeated inside the batch, are
    /// counted as skipped.
    pub fn insert_all(&self, records: &[TransactionRecord]) -> Result<InsertSummary> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let mut summary = InsertSummary::default();
        for record in records {
            if insert_on(&tx, record)? {
                summary.inserted += 1;
            } else {
                summary.skipped += 1;
            }
        }

        tx.commit()?;
        info!(
            "Stored {} transactions ({} duplicates skipped)",
            summary.inserted, summary.skipped
        );
        Ok(summary)
    }

    /// The `n` most recently inserted transactions, newest first
    ///
    /// Recency follows insertion order rather than the notification date.
    pub fn recent(&self, n: usize) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions ORDER BY id DESC LIMIT ?",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![n as i64], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Sum of amounts with `start <= date < end`; a missing `end` is unbounded
    pub fn sum_in_range(&self, start: NaiveDate, end: Option<NaiveDate>) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE date >= ?1 AND (?2 IS NULL OR date < ?2)
            "#,
            params![start.to_string(), end.map(|d| d.to_string())],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Sum of amounts for every transaction dated in `month`
    pub fn sum_for_month(&self, month: YearMonth) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE date LIKE ?",
            params![month.like_pattern()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// All transactions dated on or after `since`, in storage order
    pub fn list_since(&self, since: NaiveDate) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE date >= ? ORDER BY id",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![since.to_string()], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Lower-cased merchants with activity on or after `since`, first seen first
    pub fn distinct_merchants_since(&self, since: NaiveDate) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT LOWER(merchant)
            FROM transactions
            WHERE date >= ?
            GROUP BY LOWER(merchant)
            ORDER BY MIN(id)
            "#,
        )?;

        let merchants = stmt
            .query_map(params![since.to_string()], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(merchants)
    }

    /// Total and count for one lower-cased merchant on or after `since`
    pub fn merchant_totals_since(&self, merchant: &str, since: NaiveDate) -> Result<(f64, i64)> {
        let conn = self.conn()?;
        let totals: (f64, i64) = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0), COUNT(*)
            FROM transactions
            WHERE LOWER(merchant) = ? AND date >= ?
            "#,
            params![merchant, since.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(totals)
    }

    /// Set the category on every transaction whose merchant matches exactly
    pub fn category_update(&self, merchant: &str, category: &str) -> Result<usize> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE transactions SET category = ? WHERE merchant = ?",
            params![category, merchant],
        )?;
        info!(
            "Categorized {} transactions from {} as {}",
            updated, merchant, category
        );
        Ok(updated)
    }

    /// Merchants that still have uncategorized transactions, first seen first
    pub fn uncategorized_merchants(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT merchant
            FROM transactions
            WHERE category = ''
            GROUP BY merchant
            ORDER BY MIN(id)
            "#,
        )?;

        let merchants = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(merchants)
    }

    /// Count stored transactions
    pub fn transaction_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Highest transaction id, which moves whenever a record is inserted
    pub fn latest_revision(&self) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let revision: Option<i64> =
            conn.query_row("SELECT MAX(id) FROM transactions", [], |row| row.get(0))?;
        Ok(revision)
    }

    /// Helper to convert a row selected with `TRANSACTION_COLUMNS`
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let type_str: String = row.get(4)?;
        let transaction_type = type_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, e.into())
        })?;
        Ok(Transaction {
            id: row.get(0)?,
            date: row.get(1)?,
            merchant: row.get(2)?,
            amount: row.get(3)?,
            transaction_type,
            category: row.get(5)?,
        })
    }
}
