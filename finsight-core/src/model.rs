//! Raw (untrusted) and canonical data model for statement analysis.
//!
//! Raw types mirror the extraction service's JSON output: every field may be
//! missing, wrongly typed, or locale-formatted, so amounts and currencies are
//! kept as `serde_json::Value` until the normalizer has seen them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line item as the extraction service reported it. No invariants.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawTransaction {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    /// May be a number, a string with thousands separators, or garbage.
    #[serde(default)]
    pub amount: Value,
    /// May be a code, a symbol like `$`, mixed case, or absent.
    #[serde(default)]
    pub currency: Value,
    #[serde(default)]
    pub category: String,
}

/// A claimed grand total as the extraction service reported it.
///
/// `calculated_total` is whatever the extractor thinks it summed; the
/// reconciler never trusts it and recomputes its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawSummary {
    #[serde(default)]
    pub currency: Value,
    #[serde(default, rename = "reportedTotal")]
    pub reported_total: Value,
    #[serde(default, rename = "calculatedTotal")]
    pub calculated_total: Value,
}

/// Input boundary: the full payload returned by one extraction call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawAnalysis {
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
    #[serde(default)]
    pub summaries: Vec<RawSummary>,
}

/// A normalized line item. Immutable once created.
///
/// `amount` is always finite and rounded to cents; `currency` is a non-empty
/// uppercase code (`$` mapped to `USD`, unknown defaults to `USD`). Date,
/// description and category pass through unvalidated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub currency: String,
    pub category: String,
}

/// Per-currency reconciliation verdict.
///
/// `calculated_total` is the recomputed sum of that currency's transaction
/// amounts (0 if none); `is_tally` holds iff it agrees with `reported_total`
/// within half a cent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementSummary {
    pub id: String,
    pub currency: String,
    #[serde(rename = "reportedTotal")]
    pub reported_total: f64,
    #[serde(rename = "calculatedTotal")]
    pub calculated_total: f64,
    #[serde(rename = "isTally")]
    pub is_tally: bool,
}

/// Output boundary: normalized transactions plus the reconciliation report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub transactions: Vec<Transaction>,
    pub summaries: Vec<StatementSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_analysis_tolerates_missing_fields() {
        let raw: RawAnalysis = serde_json::from_str(
            r#"{"transactions": [{"description": "COFFEE"}]}"#,
        )
        .unwrap();
        assert_eq!(raw.transactions.len(), 1);
        assert_eq!(raw.transactions[0].description, "COFFEE");
        assert!(raw.transactions[0].amount.is_null());
        assert!(raw.summaries.is_empty());
    }

    #[test]
    fn test_summary_wire_names() {
        let s = StatementSummary {
            id: "summary-0-0".to_string(),
            currency: "USD".to_string(),
            reported_total: 75.0,
            calculated_total: 75.0,
            is_tally: true,
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["reportedTotal"], 75.0);
        assert_eq!(json["calculatedTotal"], 75.0);
        assert_eq!(json["isTally"], true);
    }
}
