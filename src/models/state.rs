use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Entry, EntryKind};
use crate::error::{LedgerError, LedgerResult};

/// Everything persisted about one budget cycle.
///
/// Fields are only mutated through [`crate::ledger::Ledger`], which keeps
/// `used` and `remaining` in step with `entries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LedgerState {
    #[serde(with = "super::amount")]
    pub(super) budget: Decimal,
    #[serde(with = "super::amount")]
    pub(super) remaining: Decimal,
    #[serde(with = "super::amount")]
    pub(super) used: Decimal,
    /// Newest first.
    #[serde(default)]
    pub(super) entries: Vec<Entry>,
}

impl LedgerState {
    pub(crate) fn new(budget: Decimal) -> Self {
        Self {
            budget,
            remaining: budget,
            used: Decimal::ZERO,
            entries: Vec::new(),
        }
    }

    pub(crate) fn budget(&self) -> Decimal {
        self.budget
    }

    pub(crate) fn remaining(&self) -> Decimal {
        self.remaining
    }

    pub(crate) fn used(&self) -> Decimal {
        self.used
    }

    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub(crate) fn next_seq(&self) -> u64 {
        self.entries.first().map_or(1, |e| e.seq + 1)
    }

    /// Record an already validated entry. Totals are updated by the caller
    /// before this, so a failed arithmetic check never leaves a stray entry.
    pub(crate) fn push_entry(&mut self, entry: Entry, remaining: Decimal, used: Decimal) {
        self.remaining = remaining;
        self.used = used;
        self.entries.insert(0, entry);
    }

    /// Sum of income entries. `used` already holds the expense side.
    pub(crate) fn income_total(&self) -> Decimal {
        self.checked_total(EntryKind::Income)
            .unwrap_or(Decimal::MAX)
    }

    fn checked_total(&self, kind: EntryKind) -> Option<Decimal> {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.amount))
    }

    pub(crate) fn serialize(&self) -> LedgerResult<String> {
        serde_json::to_string(self).map_err(|e| LedgerError::InvalidState(e.to_string()))
    }

    /// Restore a state from its JSON form. Anything that is not a usable
    /// cycle is `InvalidState`, which callers treat as "no active cycle".
    pub(crate) fn deserialize(blob: &str) -> LedgerResult<Self> {
        let mut state: Self =
            serde_json::from_str(blob).map_err(|e| LedgerError::InvalidState(e.to_string()))?;
        state.validate()?;
        Ok(state)
    }

    pub(crate) fn validate(&mut self) -> LedgerResult<()> {
        if self.budget <= Decimal::ZERO {
            return Err(LedgerError::InvalidState(
                "budget must be greater than zero".into(),
            ));
        }

        for entry in &self.entries {
            if entry.amount <= Decimal::ZERO {
                return Err(LedgerError::InvalidState(format!(
                    "entry #{} has a non-positive amount",
                    entry.seq
                )));
            }
            match (entry.kind, &entry.category) {
                (EntryKind::Expense, None) => {
                    return Err(LedgerError::InvalidState(format!(
                        "expense #{} has no category",
                        entry.seq
                    )));
                }
                (EntryKind::Income, Some(_)) => {
                    return Err(LedgerError::InvalidState(format!(
                        "income #{} has a category",
                        entry.seq
                    )));
                }
                _ => {}
            }
        }

        let overflow = || LedgerError::InvalidState("entry totals overflow".into());
        let expenses = self.checked_total(EntryKind::Expense).ok_or_else(overflow)?;
        let income = self.checked_total(EntryKind::Income).ok_or_else(overflow)?;
        let expected_remaining = self
            .budget
            .checked_sub(expenses)
            .and_then(|v| v.checked_add(income))
            .ok_or_else(overflow)?;
        if self.used != expenses {
            return Err(LedgerError::InvalidState(format!(
                "used {} does not match expense total {}",
                self.used, expenses
            )));
        }
        if self.remaining != expected_remaining {
            return Err(LedgerError::InvalidState(format!(
                "remaining {} does not match budget {} - {} + {}",
                self.remaining, self.budget, expenses, income
            )));
        }

        // Array order is authoritative; repair ordering keys that disagree.
        let ordered = self.entries.windows(2).all(|w| w[0].seq > w[1].seq);
        if !ordered {
            tracing::debug!("renumbering entry sequence keys");
            let len = self.entries.len() as u64;
            for (i, entry) in self.entries.iter_mut().enumerate() {
                entry.seq = len - i as u64;
            }
        }

        Ok(())
    }
}
