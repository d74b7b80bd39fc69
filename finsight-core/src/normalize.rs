//! Normalizer: turns untrusted extraction fields into canonical values.
//!
//! Never fails on malformed input: unparseable amounts become 0 and unknown
//! currencies become USD, so every line item still contributes a defined
//! value to downstream sums even when the source is garbage.

use chrono::Utc;
use serde_json::Value;

use crate::model::{RawTransaction, Transaction};

/// Parse an amount the extractor may have returned as a number, a string
/// with thousands separators ("1,234.50") or a trailing currency suffix
/// ("99.9 PLN"), or garbage. Garbage parses to 0.
pub fn parse_amount(v: &Value) -> f64 {
    if let Some(n) = v.as_f64() {
        if n.is_finite() {
            return n;
        }
    }
    let s = match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    leading_number(s.replace(',', "").trim()).unwrap_or(0.0)
}

/// Longest numeric prefix of `s`, so "123.45USD" still yields 123.45.
fn leading_number(s: &str) -> Option<f64> {
    for end in (1..=s.len()).rev() {
        if !s.is_char_boundary(end) {
            continue;
        }
        if let Ok(n) = s[..end].parse::<f64>() {
            if n.is_finite() {
                return Some(n);
            }
        }
    }
    None
}

/// Canonical currency code: trimmed, uppercased, `$` mapped to USD, anything
/// empty or absent defaulting to USD.
pub fn normalize_currency(v: &Value) -> String {
    let s = match v {
        Value::String(s) => s.clone(),
        Value::Null => return "USD".to_string(),
        other => other.to_string(),
    };
    let s = s.trim().to_uppercase();
    if s == "$" || s.is_empty() {
        "USD".to_string()
    } else {
        s
    }
}

/// Round to cents, half away from zero.
pub fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Normalize one extraction run's line items.
///
/// Each transaction gets a fresh `tx-<millis>-<index>` id; date, description
/// and category pass through untouched.
pub fn normalize_transactions(raw: &[RawTransaction]) -> Vec<Transaction> {
    let stamp = Utc::now().timestamp_millis();
    raw.iter()
        .enumerate()
        .map(|(i, item)| Transaction {
            id: format!("tx-{}-{}", stamp, i),
            date: item.date.clone(),
            description: item.description.clone(),
            amount: round_cents(parse_amount(&item.amount)),
            currency: normalize_currency(&item.currency),
            category: item.category.clone(),
        })
        .collect()
}
