//! Transaction command implementations (recent, categorize)

use anyhow::{Context, Result};
use cardwatch_core::{Database, Transaction, TransactionType};

use super::{print_json, truncate};

pub fn cmd_recent(db: &Database, limit: usize, json: bool) -> Result<()> {
    let transactions = db
        .recent(limit)
        .context("Failed to load recent transactions")?;

    if json {
        return print_json(&transactions);
    }

    if transactions.is_empty() {
        println!("No transactions found. Import some with:");
        println!("  cardwatch import --file sms.txt");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");
    print_transaction_rows(&transactions);

    Ok(())
}

/// Table rows shared by the recent and cycle listings
pub fn print_transaction_rows(transactions: &[Transaction]) {
    for tx in transactions {
        let kind = match tx.transaction_type {
            TransactionType::Consumption => "",
            TransactionType::PreAuthorization => " (hold)",
        };
        let category = if tx.is_categorized() {
            format!(" [{}]", tx.category)
        } else {
            String::new()
        };

        println!(
            "   {} │ {:>10.2} │ {}{}{}",
            tx.date,
            tx.amount,
            truncate(&tx.merchant, 30),
            kind,
            category
        );
    }
}

pub fn cmd_uncategorized(db: &Database, json: bool) -> Result<()> {
    let merchants = db
        .uncategorized_merchants()
        .context("Failed to list uncategorized merchants")?;

    if json {
        return print_json(&merchants);
    }

    if merchants.is_empty() {
        println!("All merchants are categorized.");
        return Ok(());
    }

    println!();
    println!("🏷️  Uncategorized Merchants ({})", merchants.len());
    println!("   ─────────────────────────────");
    for merchant in &merchants {
        println!("   {}", merchant);
    }
    println!();
    println!("Assign one with: cardwatch categorize --merchant NAME --category CATEGORY");

    Ok(())
}

pub fn cmd_categorize(db: &Database, merchant: &str, category: &str) -> Result<()> {
    let category = category.trim();
    if category.is_empty() {
        anyhow::bail!("Category must not be empty");
    }

    let updated = db
        .category_update(merchant, category)
        .context("Failed to update category")?;

    if updated == 0 {
        println!("No transactions found for merchant '{}'", merchant);
    } else {
        println!(
            "✅ Categorized {} transactions from '{}' as {}",
            updated, merchant, category
        );
    }

    Ok(())
}
