//! On-disk analysis session: the accumulated transactions and reconciliation
//! summaries from one or more accepted statements.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use finsight_core::AnalysisResult;

pub fn finsight_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".finsight"))
}

pub fn ensure_finsight_home() -> Result<PathBuf> {
    let dir = finsight_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn session_path() -> Result<PathBuf> {
    Ok(ensure_finsight_home()?.join("session.json"))
}

/// Load the current session, or an empty one if none has been saved yet.
pub fn load_session() -> Result<AnalysisResult> {
    let p = session_path()?;
    if !p.exists() {
        return Ok(AnalysisResult::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s).context("parse session.json")?)
}

pub fn save_session(session: &AnalysisResult) -> Result<()> {
    let p = session_path()?;
    let json = serde_json::to_string_pretty(session)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Fold a newly accepted batch into the session.
///
/// Appending concatenates both collections: each batch keeps its own
/// independent summaries, which are accumulated rather than recomputed
/// across statements. A non-append run replaces the session wholesale.
pub fn merge_session(previous: AnalysisResult, batch: AnalysisResult, append: bool) -> AnalysisResult {
    if !append {
        return batch;
    }
    let mut merged = previous;
    merged.transactions.extend(batch.transactions);
    merged.summaries.extend(batch.summaries);
    merged
}
