use thiserror::Error;

/// Failures surfaced by the ledger and the session store.
///
/// Every variant is recoverable at the call site: input errors go back to the
/// user, `InvalidState` means "start fresh", `Persistence` is reported while
/// the in-memory ledger stays authoritative.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum LedgerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("No active budget. Set a budget first")]
    NoActiveCycle,
    #[error("Budget exceeded: {amount} is more than the remaining {remaining}")]
    BudgetExceeded { amount: String, remaining: String },
    #[error("Invalid saved state: {0}")]
    InvalidState(String),
    #[error("Storage error: {0}")]
    Persistence(String),
}

impl LedgerError {
    pub(crate) fn persistence(err: anyhow::Error) -> Self {
        Self::Persistence(format!("{err:#}"))
    }
}

pub(crate) type LedgerResult<T> = std::result::Result<T, LedgerError>;
