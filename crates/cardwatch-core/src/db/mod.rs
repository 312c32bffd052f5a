//! Record store: SQLite access with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `transactions` - Dedup insert, recency, range sums, categorization
//! - `rates` - Exchange rate samples
//!
//! Every operation checks out its own connection from the pool and hands it
//! back when the guard drops, on success and error paths alike.

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::info;

use crate::error::Result;

mod rates;
mod transactions;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Rate written into an empty exchange_rates table so conversions always have a sample
pub const PLACEHOLDER_RATE: f64 = 7.0;
const PLACEHOLDER_RATE_AT: &str = "2002-09-12 15:30:54";

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) the database at `path` and bring the schema up to date
    pub fn open(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(4).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because every pooled
    /// connection to `:memory:` would see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "cardwatch_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::open(&path.to_string_lossy())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the writer
            -- Note: creates -wal and -shm sidecar files alongside the database
            PRAGMA journal_mode = WAL;

            -- Synchronous NORMAL: commits survive application crashes
            PRAGMA synchronous = NORMAL;

            -- Transactions parsed from bank notifications
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,                      -- YYYY-MM-DD, not calendar-validated
                merchant TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                category TEXT NOT NULL DEFAULT '',
                type TEXT NOT NULL DEFAULT 'consumption', -- consumption, pre-authorization
                import_hash TEXT NOT NULL UNIQUE,        -- sha256 of (date, merchant, amount)
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
            CREATE INDEX IF NOT EXISTS idx_transactions_merchant ON transactions(merchant);

            -- USD to CNY exchange rate samples, newest wins
            CREATE TABLE IF NOT EXISTS exchange_rates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                rate REAL NOT NULL,
                recorded_at DATETIME NOT NULL
            );
            "#,
        )?;

        let rate_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM exchange_rates", [], |row| row.get(0))?;
        if rate_count == 0 {
            conn.execute(
                "INSERT INTO exchange_rates (rate, recorded_at) VALUES (?, ?)",
                params![PLACEHOLDER_RATE, PLACEHOLDER_RATE_AT],
            )?;
        }

        info!("Database schema initialized");
        Ok(())
    }
}
