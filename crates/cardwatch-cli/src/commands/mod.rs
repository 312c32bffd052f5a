//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, print_json)
//! - `import` - Notification import from a file, inline text or stdin
//! - `transactions` - Recent list and categorization
//! - `reports` - Dashboard, billing cycle and merchant reports
//! - `rates` - Exchange rate samples
//! - `watch` - Dashboard refresh loop

pub mod core;
pub mod import;
pub mod rates;
pub mod reports;
pub mod transactions;
pub mod watch;

// Re-export command functions for main.rs
pub use core::*;
pub use import::*;
pub use rates::*;
pub use reports::*;
pub use transactions::*;
pub use watch::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
