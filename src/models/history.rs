use serde::{Deserialize, Serialize};

use super::LedgerState;

/// A finished cycle, frozen at reset time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct HistoryRecord {
    #[serde(flatten)]
    pub(crate) state: LedgerState,
    #[serde(rename = "completedAt")]
    pub(crate) completed_at: String,
}

impl HistoryRecord {
    pub(crate) fn new(state: LedgerState) -> Self {
        Self {
            state,
            completed_at: chrono::Local::now().to_rfc3339(),
        }
    }
}
