//! Per-currency, per-category spending rollup.
//!
//! Export and insights consumers need the same partition the reconciler
//! derives; sharing one grouping primitive keeps every view of the data in
//! agreement about which transactions belong together.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::Transaction;
use crate::normalize::round_cents;

/// Summed spending for one (currency, category) group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendingSummary {
    pub currency: String,
    pub category: String,
    pub total: f64,
    pub count: usize,
}

/// Group transactions by currency, then category.
///
/// Currencies keep first-appearance order (matching the reconciliation
/// report); within a currency, categories are sorted by descending total.
/// Totals use the same incremental cent rounding as the reconciler.
pub fn spending_by_category(txns: &[Transaction]) -> Vec<SpendingSummary> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut groups: HashMap<(String, String), (f64, usize)> = HashMap::new();

    for t in txns {
        let key = (t.currency.clone(), t.category.clone());
        let entry = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            (0.0, 0)
        });
        entry.0 = round_cents(entry.0 + t.amount);
        entry.1 += 1;
    }

    let mut currencies: Vec<&String> = Vec::new();
    for (currency, _) in &order {
        if !currencies.contains(&currency) {
            currencies.push(currency);
        }
    }

    let mut out = Vec::new();
    for currency in currencies {
        let mut rows: Vec<SpendingSummary> = order
            .iter()
            .filter(|(c, _)| c == currency)
            .map(|key| {
                let (total, count) = groups[key];
                SpendingSummary {
                    currency: key.0.clone(),
                    category: key.1.clone(),
                    total,
                    count,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.total.total_cmp(&a.total));
        out.extend(rows);
    }
    out
}
