//! Report command implementations (dashboard, cycle, merchants)

use anyhow::{Context, Result};
use cardwatch_core::{
    Aggregator, Config, Dashboard, Database, DisplayCurrency, Session, Transaction,
};
use chrono::NaiveDate;
use serde::Serialize;

use super::transactions::print_transaction_rows;
use super::{print_json, truncate};

/// Build an aggregator for today using the configured billing cycle
pub fn aggregator<'a>(db: &'a Database, config: &Config) -> Result<Aggregator<'a>> {
    let cycle = config
        .billing_cycle()
        .context("Invalid billing cycle in config")?;
    Ok(Aggregator::new(db).with_cycle(cycle))
}

pub fn cmd_dashboard(
    db: &Database,
    config: &Config,
    currency: DisplayCurrency,
    json: bool,
) -> Result<()> {
    let agg = aggregator(db, config)?;
    let session = Session::new(config.monthly_budget, currency);
    let dashboard = session
        .dashboard(&agg, config.recent_count)
        .context("Failed to build dashboard")?;

    if json {
        return print_json(&dashboard);
    }

    render_dashboard(&dashboard);
    Ok(())
}

pub fn render_dashboard(dashboard: &Dashboard) {
    let code = dashboard.currency.code();

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│          💳 cardwatch Dashboard          │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Cycle since:   {}", dashboard.cycle_start);
    println!("  Budget:        {:>10.2} {}", dashboard.budget, code);
    println!("  Spent:         {:>10.2} {}", dashboard.spent, code);
    println!("  Remaining:     {:>10.2} {}", dashboard.remaining, code);
    println!("  Used:          {:>9.1}%", dashboard.used_percent);
    if dashboard.currency == DisplayCurrency::Cny {
        println!("  Rate:          {:>10.4} CNY/USD", dashboard.rate);
    }
    println!();

    if dashboard.recent.is_empty() {
        println!("  No transactions yet.");
        return;
    }

    println!("  Recent:");
    for line in &dashboard.recent {
        let category = if line.category.is_empty() {
            String::new()
        } else {
            format!(" [{}]", line.category)
        };
        println!(
            "   {} │ {:>10.2} │ {}{}",
            line.date,
            line.amount,
            truncate(&line.merchant, 30),
            category
        );
    }
}

#[derive(Serialize)]
struct CycleReport<'a> {
    cycle_start: NaiveDate,
    next_cycle_start: NaiveDate,
    cycle_total: f64,
    month_total: f64,
    transactions: &'a [Transaction],
}

pub fn cmd_cycle(db: &Database, config: &Config, json: bool) -> Result<()> {
    let agg = aggregator(db, config)?;
    let transactions = agg
        .transactions_since_cycle_start()
        .context("Failed to list cycle transactions")?;
    let cycle_total = agg
        .expenses_since_cycle_start()
        .context("Failed to sum cycle spend")?;
    let month_total = agg
        .expenses_this_calendar_month()
        .context("Failed to sum monthly spend")?;

    let report = CycleReport {
        cycle_start: agg.cycle_start(),
        next_cycle_start: agg.cycle().next_start(agg.today()),
        cycle_total,
        month_total,
        transactions: &transactions,
    };

    if json {
        return print_json(&report);
    }

    println!();
    println!("🗓️  Billing Cycle");
    println!(
        "   Period: {} to {} (exclusive)",
        report.cycle_start, report.next_cycle_start
    );
    println!("   ─────────────────────────────────────────────────────────────");

    if transactions.is_empty() {
        println!("   No spending this cycle.");
    } else {
        print_transaction_rows(&transactions);
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Cycle to date:  {:>10.2} USD", report.cycle_total);
    println!("   Calendar month: {:>10.2} USD", report.month_total);

    Ok(())
}

pub fn cmd_merchants(db: &Database, config: &Config, days: i64, json: bool) -> Result<()> {
    if days < 0 {
        anyhow::bail!("--days must not be negative");
    }

    let agg = aggregator(db, config)?;
    let summary = agg
        .merchant_spend_summary(days)
        .context("Failed to summarize merchant spend")?;

    if json {
        return print_json(&summary);
    }

    println!();
    println!("🏪 Top Merchants (last {} days)", days);
    println!("   ─────────────────────────────────────────────────────────────");

    if summary.is_empty() {
        println!("   No spending found.");
        return Ok(());
    }

    println!(
        "   {:3} │ {:30} │ {:>10} │ {:>5}",
        "#", "Merchant", "Amount", "Count"
    );
    println!("   ────┼────────────────────────────────┼────────────┼───────");

    for (i, merchant) in summary.iter().enumerate() {
        println!(
            "   {:>3} │ {:30} │ {:>10.2} │ {:>5}",
            i + 1,
            truncate(&merchant.merchant, 30),
            merchant.total,
            merchant.count
        );
    }

    Ok(())
}
