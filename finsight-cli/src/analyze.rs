//! The extract → normalize → reconcile → accept/retry loop.

use anyhow::{Result, bail};
use std::path::Path;

use finsight_core::{AnalysisResult, all_tally, analyze};
use finsight_extract::{ExtractClient, FilePart};

use crate::session;

/// Run one statement through extraction with a bounded retry loop.
///
/// A batch is accepted only if every currency's summary tallies; anything
/// less re-invokes the extractor with escalated instructions until
/// `max_retries` attempts are spent, then fails the batch. Accepted results
/// replace the stored session, or are concatenated onto it with `append`.
pub async fn run(
    client: &ExtractClient,
    file: &Path,
    append: bool,
    max_retries: u32,
) -> Result<AnalysisResult> {
    let parts = vec![FilePart::from_path(file)?];
    let attempts = max_retries.max(1);

    let mut last_summary_count = 0;
    for attempt in 1..=attempts {
        if attempt > 1 {
            println!("Retrying extraction (attempt {attempt}/{attempts})...");
        }

        let raw = client.analyze_statement(&parts, attempt).await?;
        if raw.transactions.is_empty() && raw.summaries.is_empty() {
            bail!(
                "no extractable data in {}; ensure the statement is clear and readable",
                file.display()
            );
        }

        let result = analyze(&raw);
        last_summary_count = result.summaries.len();

        if all_tally(&result.summaries) {
            let previous = session::load_session()?;
            let merged = session::merge_session(previous, result, append);
            session::save_session(&merged)?;
            return Ok(merged);
        }

        for s in result.summaries.iter().filter(|s| !s.is_tally) {
            println!(
                "  {} mismatch: calculated {:.2} vs statement {:.2}",
                s.currency, s.calculated_total, s.reported_total
            );
        }
    }

    if last_summary_count == 0 {
        bail!("could not reconcile totals; ensure the statement is clear and try again");
    }
    bail!(
        "totals do not match after {attempts} attempts: calculated sums differ from the statement totals; verify the document and try again"
    )
}

/// Print the reconciliation report and per-category spending for a session.
pub fn print_report(session: &AnalysisResult) {
    println!(
        "{} transactions across {} summaries\n",
        session.transactions.len(),
        session.summaries.len()
    );

    for s in &session.summaries {
        let verdict = if s.is_tally { "TALLY" } else { "MISMATCH" };
        println!(
            "[{verdict}] {} | calculated={:.2} | statement={:.2}",
            s.currency, s.calculated_total, s.reported_total
        );
    }

    let groups = finsight_core::spending_by_category(&session.transactions);
    if !groups.is_empty() {
        println!();
        for g in &groups {
            println!(
                "{} {} | total={:.2} | count={}",
                g.currency, g.category, g.total, g.count
            );
        }
    }
}
