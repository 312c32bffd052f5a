//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// cardwatch - Track card spending against a monthly budget
#[derive(Parser)]
#[command(name = "cardwatch")]
#[command(about = "Budget tracker fed by bank card notifications", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "cardwatch.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to the data-dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Display currency: usd or cny (overrides config)
    #[arg(long, global = true)]
    pub currency: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import card notifications (reads stdin when neither --file nor --text is given)
    Import {
        /// File containing notification text
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Notification text passed inline
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Show the most recently recorded transactions
    Recent {
        /// Number of transactions (defaults to display.recent_count)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show budget, spend and remaining for the current billing cycle
    Dashboard,

    /// List transactions in the current billing cycle with totals
    Cycle,

    /// Per-merchant spend over a trailing window, largest first
    Merchants {
        /// Window length in days (defaults to display.merchant_window_days)
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// List uncategorized merchants, or assign a category to one
    Categorize {
        /// Merchant name, matched exactly
        #[arg(short, long, requires = "category")]
        merchant: Option<String>,

        /// Category to assign
        #[arg(short, long, requires = "merchant")]
        category: Option<String>,
    },

    /// Manage the USD to CNY exchange rate
    Rate {
        #[command(subcommand)]
        action: Option<RateAction>,
    },

    /// Re-render the dashboard whenever new transactions arrive
    Watch {
        /// Poll interval in seconds
        #[arg(short, long, default_value = "5")]
        interval: u64,
    },
}

#[derive(Subcommand)]
pub enum RateAction {
    /// Show the latest exchange rate (default)
    Show,

    /// Record a new exchange rate sample
    Set {
        /// CNY per USD
        rate: f64,
    },
}
