//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use cardwatch_core::{Config, Database, DisplayCurrency, Session, TransactionRecord};
use chrono::{Duration, Local};

use crate::commands::{self, truncate};

const BATCH: &str = "2024年03月10日您尾号1234的信用卡在Starbucks消费USD6.50元。\n\
                     2024年03月11日您尾号1234的信用卡在Hilton预授权USD150.00元。\n\
                     2024年03月12日您尾号1234的信用卡在Starbucks消费USD5.25元。";

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

/// Insert a transaction dated `days_ago` days before today
fn insert_recent(db: &Database, merchant: &str, amount: f64, days_ago: i64) {
    let date = Local::now().date_naive() - Duration::days(days_ago);
    let record = TransactionRecord {
        date: date.format("%Y-%m-%d").to_string(),
        merchant: merchant.to_string(),
        amount,
        transaction_type: Default::default(),
        category: String::new(),
    };
    db.insert_if_absent(&record).unwrap();
}

// ========== Core Command Tests ==========

#[test]
fn test_open_db_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cardwatch.db");

    let db = commands::open_db(&path).unwrap();
    assert!(path.exists());
    assert_eq!(db.transaction_count().unwrap(), 0);
}

#[test]
fn test_cmd_init() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cardwatch.db");

    assert!(commands::cmd_init(&path).is_ok());
    // Running init twice is harmless
    assert!(commands::cmd_init(&path).is_ok());
}

// ========== Import Command Tests ==========

#[test]
fn test_read_input_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", BATCH).unwrap();

    let input = commands::read_input(Some(file.path()), None).unwrap();
    assert_eq!(input, BATCH);
}

#[test]
fn test_read_input_inline_text() {
    let input = commands::read_input(None, Some("hello".to_string())).unwrap();
    assert_eq!(input, "hello");
}

#[test]
fn test_read_input_missing_file() {
    let err = commands::read_input(Some(std::path::Path::new("/nonexistent/sms.txt")), None)
        .unwrap_err();
    assert!(err.to_string().contains("Failed to read file"));
}

#[test]
fn test_cmd_import_stores_and_dedups() {
    let db = setup_test_db();

    commands::cmd_import(&db, BATCH, false).unwrap();
    assert_eq!(db.transaction_count().unwrap(), 3);

    commands::cmd_import(&db, BATCH, true).unwrap();
    assert_eq!(db.transaction_count().unwrap(), 3);
}

#[test]
fn test_cmd_import_no_matches() {
    let db = setup_test_db();
    commands::cmd_import(&db, "nothing to see here", false).unwrap();
    assert_eq!(db.transaction_count().unwrap(), 0);
}

#[test]
fn test_cmd_import_unknown_verb_aborts() {
    let db = setup_test_db();
    let text = format!("{}\n2024年03月13日您尾号1234的卡在Starbucks退款USD5.25元", BATCH);

    let err = commands::cmd_import(&db, &text, false).unwrap_err();
    assert!(err.to_string().contains("Failed to parse notification text"));
    assert_eq!(db.transaction_count().unwrap(), 0);
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_recent() {
    let db = setup_test_db();
    assert!(commands::cmd_recent(&db, 3, false).is_ok());

    commands::cmd_import(&db, BATCH, false).unwrap();
    assert!(commands::cmd_recent(&db, 3, false).is_ok());
    assert!(commands::cmd_recent(&db, 3, true).is_ok());
}

#[test]
fn test_cmd_categorize() {
    let db = setup_test_db();
    commands::cmd_import(&db, BATCH, false).unwrap();

    assert!(commands::cmd_uncategorized(&db, false).is_ok());

    commands::cmd_categorize(&db, "Starbucks", "Coffee").unwrap();
    assert_eq!(db.uncategorized_merchants().unwrap(), vec!["Hilton"]);

    // Unknown merchant is reported, not an error
    assert!(commands::cmd_categorize(&db, "Nobody", "Misc").is_ok());
}

#[test]
fn test_cmd_categorize_rejects_blank_category() {
    let db = setup_test_db();
    commands::cmd_import(&db, BATCH, false).unwrap();

    assert!(commands::cmd_categorize(&db, "Starbucks", "   ").is_err());
    assert_eq!(db.uncategorized_merchants().unwrap().len(), 2);
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_dashboard_empty() {
    let db = setup_test_db();
    let config = Config::default();

    assert!(commands::cmd_dashboard(&db, &config, DisplayCurrency::Usd, false).is_ok());
    assert!(commands::cmd_dashboard(&db, &config, DisplayCurrency::Cny, true).is_ok());
}

#[test]
fn test_cmd_dashboard_with_data() {
    let db = setup_test_db();
    insert_recent(&db, "Cafe", 12.5, 0);
    insert_recent(&db, "Books", 40.0, 1);

    let config = Config::default();
    assert!(commands::cmd_dashboard(&db, &config, DisplayCurrency::Usd, false).is_ok());
}

#[test]
fn test_cmd_cycle() {
    let db = setup_test_db();
    let config = Config::default();
    assert!(commands::cmd_cycle(&db, &config, false).is_ok());

    insert_recent(&db, "Cafe", 12.5, 0);
    assert!(commands::cmd_cycle(&db, &config, false).is_ok());
    assert!(commands::cmd_cycle(&db, &config, true).is_ok());
}

#[test]
fn test_cmd_cycle_invalid_config() {
    let db = setup_test_db();
    let config = Config {
        cycle_start_day: 31,
        ..Config::default()
    };
    assert!(commands::cmd_cycle(&db, &config, false).is_err());
}

#[test]
fn test_cmd_merchants() {
    let db = setup_test_db();
    insert_recent(&db, "Cafe", 30.0, 2);
    insert_recent(&db, "Books", 50.0, 3);
    insert_recent(&db, "Ancient", 99.0, 400);

    let config = Config::default();
    assert!(commands::cmd_merchants(&db, &config, 30, false).is_ok());
    assert!(commands::cmd_merchants(&db, &config, 30, true).is_ok());
    assert!(commands::cmd_merchants(&db, &config, -1, false).is_err());
}

// ========== Rate Command Tests ==========

#[test]
fn test_cmd_rate() {
    let db = setup_test_db();
    assert!(commands::cmd_rate_show(&db, false).is_ok());

    commands::cmd_rate_set(&db, 7.18).unwrap();
    assert_eq!(db.latest_exchange_rate().unwrap().unwrap().rate, 7.18);
    assert!(commands::cmd_rate_show(&db, true).is_ok());

    assert!(commands::cmd_rate_set(&db, -1.0).is_err());
}

// ========== Watch Tests ==========

#[test]
fn test_refresh_if_changed() {
    let db = setup_test_db();
    let config = Config::default();
    let mut session = Session::new(config.monthly_budget, DisplayCurrency::Usd);

    assert!(!commands::refresh_if_changed(&db, &config, &mut session).unwrap());

    insert_recent(&db, "Cafe", 4.0, 0);
    assert!(commands::refresh_if_changed(&db, &config, &mut session).unwrap());
    assert!(!commands::refresh_if_changed(&db, &config, &mut session).unwrap());
}

#[test]
fn test_handle_input_toggles_currency() {
    let db = setup_test_db();
    insert_recent(&db, "Cafe", 4.0, 0);
    let config = Config::default();
    let mut session = Session::new(config.monthly_budget, DisplayCurrency::Usd);

    assert!(commands::handle_input(&db, &config, &mut session, "c\n").unwrap());
    assert_eq!(session.currency(), DisplayCurrency::Cny);

    assert!(commands::handle_input(&db, &config, &mut session, " C ").unwrap());
    assert_eq!(session.currency(), DisplayCurrency::Usd);

    // Anything else leaves the display alone
    assert!(!commands::handle_input(&db, &config, &mut session, "").unwrap());
    assert!(!commands::handle_input(&db, &config, &mut session, "quit").unwrap());
    assert_eq!(session.currency(), DisplayCurrency::Usd);
}

#[test]
fn test_cmd_merchants_huge_window() {
    let db = setup_test_db();
    insert_recent(&db, "Cafe", 30.0, 2);

    let config = Config::default();
    assert!(commands::cmd_merchants(&db, &config, 1_000_000_000, false).is_ok());
}

#[test]
fn test_cmd_watch_rejects_zero_interval() {
    let db = setup_test_db();
    let config = Config::default();
    assert!(commands::cmd_watch(&db, &config, DisplayCurrency::Usd, 0).is_err());
}

// ========== Helper Function Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a long string that exceeds", 10), "a long ..."); // 7 chars + "..."
    assert_eq!(truncate("exact", 5), "exact");
    assert_eq!(truncate("toolong", 6), "too...");
    // Counts characters, not bytes
    assert_eq!(truncate("星巴克咖啡店", 5), "星巴...");
}
