//! cardwatch CLI - Budget tracker fed by bank card notifications
//!
//! Usage:
//!   cardwatch init                  Initialize database
//!   cardwatch import --file sms.txt Import notifications (or --text, or stdin)
//!   cardwatch dashboard             Budget for the current billing cycle
//!   cardwatch watch --interval 5    Refresh the dashboard on new transactions

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use cardwatch_core::{Config, DisplayCurrency};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    let currency: DisplayCurrency = match cli.currency.as_deref() {
        Some(code) => code.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => config.currency,
    };

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Import { file, text } => {
            let db = commands::open_db(&cli.db)?;
            let input = commands::read_input(file.as_deref(), text)?;
            commands::cmd_import(&db, &input, cli.json)
        }
        Commands::Recent { limit } => {
            let db = commands::open_db(&cli.db)?;
            let limit = limit.unwrap_or(config.recent_count);
            commands::cmd_recent(&db, limit, cli.json)
        }
        Commands::Dashboard => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_dashboard(&db, &config, currency, cli.json)
        }
        Commands::Cycle => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_cycle(&db, &config, cli.json)
        }
        Commands::Merchants { days } => {
            let db = commands::open_db(&cli.db)?;
            let days = days.unwrap_or(config.merchant_window_days);
            commands::cmd_merchants(&db, &config, days, cli.json)
        }
        Commands::Categorize { merchant, category } => {
            let db = commands::open_db(&cli.db)?;
            match (merchant, category) {
                (Some(merchant), Some(category)) => {
                    commands::cmd_categorize(&db, &merchant, &category)
                }
                _ => commands::cmd_uncategorized(&db, cli.json),
            }
        }
        Commands::Rate { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(RateAction::Show) => commands::cmd_rate_show(&db, cli.json),
                Some(RateAction::Set { rate }) => commands::cmd_rate_set(&db, rate),
            }
        }
        Commands::Watch { interval } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_watch(&db, &config, currency, interval)
        }
    }
}
