//! Dashboard refresh loop
//!
//! Typing `c` and Enter while watching flips the display between USD and CNY.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use cardwatch_core::{Config, Database, DisplayCurrency, Session};
use tracing::{debug, info};

use super::reports::{aggregator, render_dashboard};

fn render(db: &Database, config: &Config, session: &Session) -> Result<()> {
    // Rebuild per render so "today" follows the wall clock across midnight
    let agg = aggregator(db, config)?;
    let dashboard = session
        .dashboard(&agg, config.recent_count)
        .context("Failed to build dashboard")?;
    render_dashboard(&dashboard);
    Ok(())
}

/// Render the dashboard if the store changed since the last poll
///
/// Returns whether a render happened.
pub fn refresh_if_changed(db: &Database, config: &Config, session: &mut Session) -> Result<bool> {
    if !session
        .poll_changed(db)
        .context("Failed to check for new transactions")?
    {
        return Ok(false);
    }

    render(db, config, session)?;
    Ok(true)
}

/// Apply one line of keyboard input; `c` toggles the display currency
///
/// Returns whether the line was a recognized command.
pub fn handle_input(
    db: &Database,
    config: &Config,
    session: &mut Session,
    line: &str,
) -> Result<bool> {
    if !line.trim().eq_ignore_ascii_case("c") {
        return Ok(false);
    }

    let currency = session.toggle_currency();
    debug!("Display currency switched to {}", currency);
    render(db, config, session)?;
    Ok(true)
}

pub fn cmd_watch(
    db: &Database,
    config: &Config,
    currency: DisplayCurrency,
    interval_secs: u64,
) -> Result<()> {
    if interval_secs == 0 {
        anyhow::bail!("--interval must be at least 1 second");
    }

    let mut session = Session::new(config.monthly_budget, currency);
    info!(
        "Watching {} every {}s (c + Enter toggles USD/CNY, Ctrl-C to stop)",
        db.path(),
        interval_secs
    );

    // Always draw once, even on an empty store
    session.poll_changed(db).context("Failed to read store revision")?;
    render(db, config, &session)?;

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let interval = Duration::from_secs(interval_secs);
    let mut input_open = true;
    loop {
        if input_open {
            match rx.recv_timeout(interval) {
                Ok(line) => {
                    handle_input(db, config, &mut session, &line)?;
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("Input closed, polling only");
                    input_open = false;
                    continue;
                }
            }
        } else {
            thread::sleep(interval);
        }

        if refresh_if_changed(db, config, &mut session)? {
            debug!("Dashboard refreshed");
        }
    }
}
