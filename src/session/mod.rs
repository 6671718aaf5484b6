mod memory;

use anyhow::Result;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{Ledger, LedgerRules};
use crate::models::{HistoryRecord, LedgerState};

pub(crate) use memory::MemoryStore;

pub(crate) const CURRENT_KEY: &str = "current_session";
pub(crate) const HISTORY_KEY: &str = "history";

/// Whole-value key-value persistence. Reads return a complete prior write or
/// nothing.
pub(crate) trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Write `set_key`, then remove `remove_key` only if the write succeeded.
    /// Transactional backends should override this to commit both at once.
    fn set_and_remove(&mut self, set_key: &str, value: &str, remove_key: &str) -> Result<()> {
        self.set(set_key, value)?;
        self.remove(remove_key)
    }
}

enum Saved {
    Missing,
    Usable(LedgerState),
    Unusable(LedgerError),
}

/// Durable home of the active cycle and the archive of finished ones.
///
/// Last writer wins if two processes share the same backend.
pub(crate) struct SessionStore {
    storage: Box<dyn Storage>,
}

impl SessionStore {
    pub(crate) fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// The saved cycle, or `None` when there is none or it is unusable.
    pub(crate) fn load_current(&self) -> LedgerResult<Option<LedgerState>> {
        match self.read_current()? {
            Saved::Missing => Ok(None),
            Saved::Usable(state) => Ok(Some(state)),
            Saved::Unusable(e) => {
                tracing::warn!(error = %e, "discarding saved session");
                Ok(None)
            }
        }
    }

    /// Why a saved session that exists was not restored. `None` when the key
    /// is absent or holds a usable cycle.
    pub(crate) fn discarded_session(&self) -> LedgerResult<Option<LedgerError>> {
        Ok(match self.read_current()? {
            Saved::Unusable(e) => Some(e),
            Saved::Missing | Saved::Usable(_) => None,
        })
    }

    fn read_current(&self) -> LedgerResult<Saved> {
        let Some(blob) = self
            .storage
            .get(CURRENT_KEY)
            .map_err(LedgerError::persistence)?
        else {
            return Ok(Saved::Missing);
        };
        Ok(match LedgerState::deserialize(&blob) {
            Ok(state) => Saved::Usable(state),
            Err(e) => Saved::Unusable(e),
        })
    }

    pub(crate) fn restore_ledger(&self, rules: LedgerRules) -> LedgerResult<Ledger> {
        Ok(match self.load_current()? {
            Some(state) => Ledger::restore(state, rules),
            None => Ledger::new(rules),
        })
    }

    pub(crate) fn save_current(&mut self, state: &LedgerState) -> LedgerResult<()> {
        let blob = state.serialize()?;
        self.storage
            .set(CURRENT_KEY, &blob)
            .map_err(LedgerError::persistence)
    }

    /// Save after a mutation. Failures are logged and returned for display;
    /// the in-memory ledger stays as it is.
    pub(crate) fn persist(&mut self, ledger: &Ledger) -> LedgerResult<()> {
        let Some(state) = ledger.state() else {
            return Ok(());
        };
        self.save_current(state).inspect_err(|e| {
            tracing::warn!(error = %e, "failed to save session");
        })
    }

    pub(crate) fn history(&self) -> LedgerResult<Vec<HistoryRecord>> {
        match self
            .storage
            .get(HISTORY_KEY)
            .map_err(LedgerError::persistence)?
        {
            None => Ok(Vec::new()),
            Some(blob) => serde_json::from_str(&blob)
                .map_err(|e| LedgerError::InvalidState(format!("history log: {e}"))),
        }
    }

    /// Append `state` to the history log and clear the current session.
    /// If the append fails the current session is left untouched.
    pub(crate) fn archive_and_clear(&mut self, state: &LedgerState) -> LedgerResult<HistoryRecord> {
        let mut history = self.history().map_err(|e| match e {
            LedgerError::InvalidState(msg) => {
                LedgerError::Persistence(format!("refusing to overwrite {msg}"))
            }
            other => other,
        })?;
        let record = HistoryRecord::new(state.clone());
        history.push(record.clone());

        let blob = serde_json::to_string(&history)
            .map_err(|e| LedgerError::Persistence(e.to_string()))?;
        self.storage
            .set_and_remove(HISTORY_KEY, &blob, CURRENT_KEY)
            .map_err(LedgerError::persistence)?;

        tracing::info!(
            cycles = history.len(),
            completed_at = %record.completed_at,
            "cycle archived"
        );
        Ok(record)
    }

    /// Archive the ledger's cycle and end it. The ledger keeps its cycle if
    /// archiving fails.
    pub(crate) fn reset(&mut self, ledger: &mut Ledger) -> LedgerResult<HistoryRecord> {
        let state = ledger.state().ok_or(LedgerError::NoActiveCycle)?;
        let record = self.archive_and_clear(state)?;
        ledger.end_cycle();
        Ok(record)
    }
}

#[cfg(test)]
mod tests;
