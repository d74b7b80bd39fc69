//! Reconciler: per-currency calculated totals, candidate resolution, and the
//! tally verdict.
//!
//! Pure data transformation over already-normalized values; it never fails.
//! Disagreement is expressed structurally via `is_tally: false`, which is the
//! caller's signal to retry or reject the extraction.

use chrono::Utc;
use std::collections::HashMap;

use crate::model::{RawSummary, StatementSummary, Transaction};
use crate::normalize::{normalize_currency, parse_amount, round_cents};

/// Half-cent tolerance absorbing floating-point summation error.
pub const TALLY_TOLERANCE: f64 = 0.005;

/// Whether a calculated and a reported total agree within tolerance.
pub fn totals_agree(calculated: f64, reported: f64) -> bool {
    (calculated - reported).abs() < TALLY_TOLERANCE
}

/// Accept/retry predicate for a whole report: every currency must tally and
/// there must be at least one summary to have verified anything at all.
pub fn all_tally(summaries: &[StatementSummary]) -> bool {
    !summaries.is_empty() && summaries.iter().all(|s| s.is_tally)
}

/// Produce exactly one authoritative summary per currency.
///
/// For each currency seen in the transaction set (first-appearance order),
/// the calculated total is the running sum rounded to cents after every
/// addition, the same policy used when re-parsing persisted sums, so drift
/// cannot accumulate silently. The reported total is resolved from however
/// many raw candidates mention that currency; currencies mentioned only in
/// raw summaries are emitted afterwards with a calculated total of 0, which
/// surfaces a likely missed extraction instead of dropping it.
pub fn reconcile(txns: &[Transaction], raw_summaries: &[RawSummary]) -> Vec<StatementSummary> {
    let stamp = Utc::now().timestamp_millis();

    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, f64> = HashMap::new();
    for t in txns {
        let entry = sums.entry(t.currency.clone()).or_insert_with(|| {
            order.push(t.currency.clone());
            0.0
        });
        *entry = round_cents(*entry + t.amount);
    }

    let mut out: Vec<StatementSummary> = Vec::new();

    for currency in &order {
        let calculated = sums[currency];
        let candidates: Vec<&RawSummary> = raw_summaries
            .iter()
            .filter(|s| &normalize_currency(&s.currency) == currency)
            .collect();

        let reported = resolve_reported(calculated, &candidates);

        out.push(StatementSummary {
            id: format!("summary-{}-{}", stamp, out.len()),
            currency: currency.clone(),
            reported_total: reported,
            calculated_total: calculated,
            is_tally: totals_agree(calculated, reported),
        });
    }

    // Currencies the document's totals mention but the extraction produced no
    // transactions for. calculated = 0 here, which almost always fails the
    // tally and tells the caller something was missed.
    for s in raw_summaries {
        let currency = normalize_currency(&s.currency);
        if out.iter().any(|emitted| emitted.currency == currency) {
            continue;
        }
        let reported = round_cents(parse_amount(&s.reported_total));
        out.push(StatementSummary {
            id: format!("summary-{}-{}", stamp, out.len()),
            currency,
            reported_total: reported,
            calculated_total: 0.0,
            is_tally: totals_agree(0.0, reported),
        });
    }

    out
}

/// Resolve which reported total applies to a currency.
///
/// Zero candidates: nothing to verify against, use the calculated sum (an
/// automatic pass). One candidate: its parsed value. Several: first try the
/// sum of all of them (statements that split a grand total into sub-totals,
/// e.g. purchases + fees); if that disagrees with the calculated sum, take
/// the single candidate closest to it (duplicate or mis-tagged entries where
/// only one is the true grand total), first occurrence winning ties.
fn resolve_reported(calculated: f64, candidates: &[&RawSummary]) -> f64 {
    match candidates {
        [] => calculated,
        [only] => round_cents(parse_amount(&only.reported_total)),
        many => {
            let summed = round_cents(
                many.iter()
                    .map(|s| parse_amount(&s.reported_total))
                    .sum::<f64>(),
            );
            if totals_agree(summed, calculated) {
                return summed;
            }

            let mut best = round_cents(parse_amount(&many[0].reported_total));
            let mut best_diff = f64::INFINITY;
            for s in many {
                let r = round_cents(parse_amount(&s.reported_total));
                let diff = (r - calculated).abs();
                if diff < best_diff {
                    best_diff = diff;
                    best = r;
                }
            }
            best
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn txn(amount: f64, currency: &str) -> Transaction {
        Transaction {
            id: format!("tx-0-{}", (amount * 100.0) as i64),
            date: "2026-03-01".to_string(),
            description: "TEST".to_string(),
            amount,
            currency: currency.to_string(),
            category: "OTHER".to_string(),
        }
    }

    fn summary(currency: &str, reported: f64) -> RawSummary {
        RawSummary {
            currency: json!(currency),
            reported_total: json!(reported),
            calculated_total: json!(null),
        }
    }

    #[test]
    fn test_single_candidate_exact() {
        let txns = vec![txn(50.0, "USD"), txn(25.0, "USD")];
        let report = reconcile(&txns, &[summary("USD", 75.0)]);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].calculated_total, 75.0);
        assert_eq!(report[0].reported_total, 75.0);
        assert!(report[0].is_tally);
    }

    #[test]
    fn test_zero_candidates_auto_pass() {
        let report = reconcile(&[txn(10.0, "EUR")], &[]);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].reported_total, 10.0);
        assert!(report[0].is_tally);
    }

    #[test]
    fn test_split_total_candidates_are_summed() {
        // Purchases + fees sub-totals that together match the line items.
        let txns = vec![txn(70.0, "USD"), txn(5.0, "USD")];
        let report = reconcile(&txns, &[summary("USD", 70.0), summary("USD", 5.0)]);
        assert_eq!(report[0].reported_total, 75.0);
        assert!(report[0].is_tally);
    }

    #[test]
    fn test_decoy_candidate_picks_closest() {
        let txns = vec![txn(75.0, "USD")];
        let report = reconcile(&txns, &[summary("USD", 75.0), summary("USD", 999.0)]);
        assert_eq!(report[0].reported_total, 75.0);
        assert!(report[0].is_tally);
    }

    #[test]
    fn test_closest_tie_broken_by_first_occurrence() {
        // 70 and 80 are equidistant from 75; the first listed wins.
        let txns = vec![txn(75.0, "USD")];
        let report = reconcile(&txns, &[summary("USD", 80.0), summary("USD", 70.0)]);
        assert_eq!(report[0].reported_total, 80.0);
        assert!(!report[0].is_tally);
    }

    #[test]
    fn test_summary_only_currency_surfaces_mismatch() {
        let txns = vec![txn(75.0, "USD")];
        let report = reconcile(&txns, &[summary("USD", 75.0), summary("EUR", 50.0)]);
        assert_eq!(report.len(), 2);
        let eur = report.iter().find(|s| s.currency == "EUR").unwrap();
        assert_eq!(eur.calculated_total, 0.0);
        assert_eq!(eur.reported_total, 50.0);
        assert!(!eur.is_tally);
    }

    #[test]
    fn test_duplicate_summary_only_currency_emitted_once() {
        let report = reconcile(&[], &[summary("EUR", 50.0), summary("eur", 50.0)]);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].currency, "EUR");
    }

    #[test]
    fn test_raw_summary_currency_is_normalized_for_matching() {
        let txns = vec![txn(20.0, "USD")];
        let report = reconcile(
            &txns,
            &[RawSummary {
                currency: json!("$"),
                reported_total: json!("20.00"),
                calculated_total: json!(0),
            }],
        );
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].reported_total, 20.0);
        assert!(report[0].is_tally);
    }

    #[test]
    fn test_calculated_sum_is_reorder_invariant() {
        let amounts = [12.34, 0.01, 99.99, 5.0, 47.66];
        let forward: Vec<Transaction> = amounts.iter().map(|a| txn(*a, "USD")).collect();
        let backward: Vec<Transaction> = amounts.iter().rev().map(|a| txn(*a, "USD")).collect();

        let a = reconcile(&forward, &[]);
        let b = reconcile(&backward, &[]);
        assert_eq!(a[0].calculated_total, b[0].calculated_total);
    }

    #[test]
    fn test_currencies_emitted_in_first_appearance_order() {
        let txns = vec![txn(1.0, "PLN"), txn(2.0, "USD"), txn(3.0, "PLN")];
        let report = reconcile(&txns, &[]);
        let order: Vec<&str> = report.iter().map(|s| s.currency.as_str()).collect();
        assert_eq!(order, vec!["PLN", "USD"]);
        assert_eq!(report[0].calculated_total, 4.0);
    }

    #[test]
    fn test_tolerance_boundary() {
        assert!(totals_agree(75.0, 75.0049));
        assert!(!totals_agree(75.0, 75.0051));
        assert!(totals_agree(75.0049, 75.0));
    }

    #[test]
    fn test_all_tally() {
        let pass = StatementSummary {
            id: "summary-0-0".to_string(),
            currency: "USD".to_string(),
            reported_total: 1.0,
            calculated_total: 1.0,
            is_tally: true,
        };
        let fail = StatementSummary {
            is_tally: false,
            ..pass.clone()
        };
        assert!(all_tally(&[pass.clone()]));
        assert!(!all_tally(&[pass, fail]));
        assert!(!all_tally(&[]));
    }
}
