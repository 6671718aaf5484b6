use anyhow::{Context, Result};
use std::path::Path;

use crate::models::{HistoryRecord, LedgerState};

/// Write the cycle's entries, newest first, to a CSV file.
pub(crate) fn export_entries(state: &LedgerState, path: &Path) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(["seq", "recorded_at", "kind", "category", "amount"])?;
    for entry in state.entries() {
        wtr.write_record([
            entry.seq.to_string(),
            entry.recorded_at.clone(),
            entry.kind.to_string(),
            entry
                .category
                .as_ref()
                .map(|c| c.to_string())
                .unwrap_or_default(),
            entry.amount.to_string(),
        ])?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(state.entries().len())
}

/// One row per archived cycle, oldest first.
pub(crate) fn export_history(history: &[HistoryRecord], path: &Path) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record([
        "completed_at",
        "budget",
        "used",
        "remaining",
        "income",
        "entries",
    ])?;
    for record in history {
        let state = &record.state;
        wtr.write_record([
            record.completed_at.clone(),
            state.budget().to_string(),
            state.used().to_string(),
            state.remaining().to_string(),
            state.income_total().to_string(),
            state.entries().len().to_string(),
        ])?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(history.len())
}
