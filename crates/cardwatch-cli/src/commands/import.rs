//! Notification import command

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use cardwatch_core::{parse, Database};
use tracing::debug;

use super::print_json;

/// Gather notification text from `--file`, `--text`, or stdin
pub fn read_input(file: Option<&Path>, text: Option<String>) -> Result<String> {
    if let Some(file) = file {
        return fs::read_to_string(file)
            .with_context(|| format!("Failed to read file: {}", file.display()));
    }
    if let Some(text) = text {
        return Ok(text);
    }

    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read notifications from stdin")?;
    Ok(buf)
}

/// Parse `input` and store every new transaction
pub fn cmd_import(db: &Database, input: &str, json: bool) -> Result<()> {
    let candidates = parse(input).context("Failed to parse notification text")?;
    let summary = db
        .insert_all(&candidates)
        .context("Failed to store transactions")?;

    debug!("Parsed {} candidate transactions", candidates.len());

    if json {
        return print_json(&summary);
    }

    if candidates.is_empty() {
        println!("No card notifications found in input.");
        return Ok(());
    }

    println!("📥 Found {} transactions", candidates.len());
    println!("   ✅ {} new", summary.inserted);
    if summary.skipped > 0 {
        println!("   ⏭️  {} already recorded", summary.skipped);
    }

    Ok(())
}
