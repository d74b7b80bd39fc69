//! finsight-core: normalization and reconciliation engine for
//! machine-extracted statement data.

pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod spending;

pub use model::{
    AnalysisResult, RawAnalysis, RawSummary, RawTransaction, StatementSummary, Transaction,
};
pub use normalize::{normalize_currency, normalize_transactions, parse_amount, round_cents};
pub use reconcile::{TALLY_TOLERANCE, all_tally, reconcile, totals_agree};
pub use spending::{SpendingSummary, spending_by_category};

/// Run one extraction payload through the full normalize + reconcile pass.
pub fn analyze(raw: &RawAnalysis) -> AnalysisResult {
    let transactions = normalize_transactions(&raw.transactions);
    let summaries = reconcile(&transactions, &raw.summaries);
    AnalysisResult {
        transactions,
        summaries,
    }
}
