//! Bank notification parser
//!
//! Card notifications arrive as free text in a fixed template:
//!
//! ```text
//! 2024年03月15日您尾号1234的卡在Starbucks消费USD12.50元
//! ```
//!
//! Each occurrence yields one [`TransactionRecord`]. The merchant is everything
//! between `在` and the verb, and the verb decides the transaction type.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{TransactionRecord, TransactionType};

/// Date, then `在`, then merchant+verb up to the first `USD<amount>元`
///
/// The amount is digits with at most one dot, so `12.`, `.5` and `12.50` all match.
fn template_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([0-9]{4}年[0-9]{2}月[0-9]{2}日).+?在(.+?)USD([0-9]+\.?[0-9]*|\.[0-9]+)元")
            .expect("invalid notification regex")
    })
}

/// Trailing run of CJK characters, which is where the verb sits
fn trailing_verb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\p{Han}+$").expect("invalid verb regex"))
}

const VERBS: [(&str, TransactionType); 2] = [
    ("消费", TransactionType::Consumption),
    ("预授权", TransactionType::PreAuthorization),
];

/// Parse every notification in `text`
///
/// Records come back in the order they appear. A matching notification with a
/// verb other than `消费` or `预授权` fails the whole call, so callers never see
/// a partial batch.
pub fn parse(text: &str) -> Result<Vec<TransactionRecord>> {
    let mut transactions = Vec::new();

    for caps in template_re().captures_iter(text) {
        let fragment = &caps[0];
        let date = normalize_date(&caps[1]);

        let (merchant, transaction_type) = split_verb(&caps[2], fragment)?;
        if merchant.is_empty() {
            debug!("Skipping notification without merchant: {}", fragment);
            continue;
        }

        let amount_str = &caps[3];
        let amount: f64 = amount_str.parse().map_err(|_| Error::InvalidAmount {
            amount: amount_str.to_string(),
            fragment: fragment.to_string(),
        })?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount {
                amount: amount_str.to_string(),
                fragment: fragment.to_string(),
            });
        }

        transactions.push(TransactionRecord {
            date,
            merchant,
            amount,
            transaction_type,
            category: String::new(),
        });
    }

    debug!("Parsed {} notification transactions", transactions.len());
    Ok(transactions)
}

/// `2024年03月15日` -> `2024-03-15`
///
/// No calendar check happens here, `2024年02月31日` comes out as `2024-02-31`.
fn normalize_date(raw: &str) -> String {
    raw.replace('年', "-").replace('月', "-").replace('日', "")
}

/// Split `Starbucks消费` into the trimmed merchant and the mapped verb
fn split_verb(segment: &str, fragment: &str) -> Result<(String, TransactionType)> {
    for (verb, transaction_type) in VERBS {
        if let Some(merchant) = segment.strip_suffix(verb) {
            return Ok((merchant.trim().to_string(), transaction_type));
        }
    }

    let verb = trailing_verb_re()
        .find(segment)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Err(Error::UnrecognizedVerb {
        verb,
        fragment: fragment.to_string(),
    })
}
