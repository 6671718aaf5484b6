use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Expense category: one of the built-in labels or a user-supplied one.
///
/// Only the label is modelled here. Colors and icons belong to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) enum Category {
    Food,
    Travel,
    Shopping,
    Bills,
    Entertainment,
    Health,
    Education,
    Recharge,
    Subscriptions,
    Other,
    Custom(String),
}

impl Category {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            Self::Food => "Food",
            Self::Travel => "Travel",
            Self::Shopping => "Shopping",
            Self::Bills => "Bills",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Education => "Education",
            Self::Recharge => "Recharge",
            Self::Subscriptions => "Subscriptions",
            Self::Other => "Other",
            Self::Custom(label) => label,
        }
    }

    /// Parse user input. Built-in names match case-insensitively; anything
    /// else non-empty becomes a trimmed custom label.
    pub(crate) fn parse(input: &str) -> Result<Self, LedgerError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::InvalidInput("category is required".into()));
        }
        let builtin = Self::all()
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed));
        Ok(match builtin {
            Some(c) => c.clone(),
            None => Self::Custom(trimmed.to_string()),
        })
    }

    /// The enumerated set, in picker order.
    pub(crate) fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Travel,
            Self::Shopping,
            Self::Bills,
            Self::Entertainment,
            Self::Health,
            Self::Education,
            Self::Recharge,
            Self::Subscriptions,
            Self::Other,
        ]
    }

    pub(crate) fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Category {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Custom(label) => label,
            other => other.as_str().to_string(),
        }
    }
}
