//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `print_json` - Shared `--json` output
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use cardwatch_core::Database;
use serde::Serialize;

/// Open the database, creating and migrating it if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::open(path_str).context("Failed to open database")
}

/// Print any serializable value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let count = db
        .transaction_count()
        .context("Failed to count transactions")?;

    println!("✅ Database ready ({} transactions)", count);
    println!();
    println!("Next steps:");
    println!("  1. Import notifications: cardwatch import --file sms.txt");
    println!("  2. Check your budget:    cardwatch dashboard");

    Ok(())
}
