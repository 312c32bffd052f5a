//! Exchange rate commands

use anyhow::{Context, Result};
use cardwatch_core::Database;

use super::print_json;

pub fn cmd_rate_show(db: &Database, json: bool) -> Result<()> {
    let latest = db
        .latest_exchange_rate()
        .context("Failed to load exchange rate")?;

    if json {
        return print_json(&latest);
    }

    match latest {
        Some(sample) => println!(
            "💱 1 USD = {:.4} CNY (recorded {})",
            sample.rate,
            sample.recorded_at.format("%Y-%m-%d %H:%M:%S")
        ),
        None => println!("No exchange rate recorded. Set one with: cardwatch rate set 7.2"),
    }

    Ok(())
}

pub fn cmd_rate_set(db: &Database, rate: f64) -> Result<()> {
    db.store_exchange_rate(rate)
        .context("Failed to store exchange rate")?;
    println!("✅ Exchange rate set: 1 USD = {:.4} CNY", rate);
    Ok(())
}
