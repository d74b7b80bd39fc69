//! CSV export of an analysis session: transaction rows followed by
//! per-currency summary blocks. RFC 4180 quoting, CRLF line endings, and a
//! UTF-8 BOM so spreadsheet apps open it cleanly.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::Write;

use finsight_core::AnalysisResult;

/// Normalize a transaction date to YYYY-MM-DD for export; dates the core
/// passed through unparsed are written as-is.
fn format_date_export(date: &str) -> String {
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(date.trim(), fmt) {
            return d.format("%Y-%m-%d").to_string();
        }
    }
    date.to_string()
}

pub fn default_export_filename() -> String {
    format!(
        "finsight-transactions-{}.csv",
        chrono::Local::now().format("%Y-%m-%d")
    )
}

pub fn write_csv<W: Write>(mut out: W, session: &AnalysisResult) -> Result<()> {
    // BOM before the csv writer takes over the stream.
    out.write_all("\u{feff}".as_bytes()).context("write BOM")?;

    let mut w = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::NonNumeric)
        .flexible(true)
        .from_writer(out);

    w.write_record(["Date", "Description", "Category", "Amount", "Currency"])?;
    for t in &session.transactions {
        w.write_record([
            format_date_export(&t.date),
            t.description.clone(),
            t.category.clone(),
            format!("{:.2}", t.amount),
            t.currency.clone(),
        ])?;
    }

    if !session.summaries.is_empty() {
        w.write_record([""; 5])?;
        for s in &session.summaries {
            w.write_record([
                format!("Summary ({})", s.currency),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ])?;
            w.write_record([
                String::new(),
                "Calculated".to_string(),
                format!("{:.2}", s.calculated_total),
                s.currency.clone(),
            ])?;
            w.write_record([
                String::new(),
                "Statement Total".to_string(),
                format!("{:.2}", s.reported_total),
                s.currency.clone(),
            ])?;
            w.write_record([""; 5])?;
        }
    }

    w.flush().context("flush csv")?;
    Ok(())
}
