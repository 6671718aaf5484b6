use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "Expense",
            Self::Income => "Income",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded transaction. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Entry {
    pub(crate) kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) category: Option<Category>,
    /// Always positive; the sign comes from `kind`.
    #[serde(with = "super::amount")]
    pub(crate) amount: Decimal,
    /// Logical timestamp. Larger is newer.
    #[serde(default)]
    pub(crate) seq: u64,
    #[serde(default)]
    pub(crate) recorded_at: String,
}

impl Entry {
    pub(crate) fn expense(category: Category, amount: Decimal, seq: u64) -> Self {
        Self {
            kind: EntryKind::Expense,
            category: Some(category),
            amount,
            seq,
            recorded_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub(crate) fn income(amount: Decimal, seq: u64) -> Self {
        Self {
            kind: EntryKind::Income,
            category: None,
            amount,
            seq,
            recorded_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub(crate) fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    pub(crate) fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    /// Category label for display; income entries read "Income".
    pub(crate) fn label(&self) -> &str {
        match &self.category {
            Some(c) => c.as_str(),
            None => self.kind.as_str(),
        }
    }
}
