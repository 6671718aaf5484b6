mod metrics;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Entry, LedgerState};

pub(crate) use metrics::{DerivedMetrics, Thresholds, WarningLevel};

/// What happens when an expense is larger than the remaining balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OverspendPolicy {
    /// Refuse the expense with `BudgetExceeded`.
    #[default]
    Reject,
    /// Apply it and let `remaining` go negative.
    Allow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct LedgerRules {
    pub(crate) overspend: OverspendPolicy,
    pub(crate) thresholds: Thresholds,
}

/// Authoritative in-memory state of the active cycle.
///
/// Takes raw user input, validates it and applies it. A failed call leaves
/// the ledger exactly as it was.
#[derive(Debug, Clone)]
pub(crate) struct Ledger {
    state: Option<LedgerState>,
    rules: LedgerRules,
}

impl Ledger {
    pub(crate) fn new(rules: LedgerRules) -> Self {
        Self { state: None, rules }
    }

    pub(crate) fn restore(state: LedgerState, rules: LedgerRules) -> Self {
        Self {
            state: Some(state),
            rules,
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub(crate) fn state(&self) -> Option<&LedgerState> {
        self.state.as_ref()
    }

    pub(crate) fn rules(&self) -> LedgerRules {
        self.rules
    }

    pub(crate) fn initialize_cycle(&mut self, budget_input: &str) -> LedgerResult<&LedgerState> {
        let budget = parse_amount(budget_input)
            .map_err(|_| LedgerError::InvalidInput("enter a valid budget amount".into()))?;
        if self.state.is_some() {
            tracing::warn!("replacing an active cycle without archiving it");
        }
        tracing::info!(%budget, "budget cycle started");
        Ok(&*self.state.insert(LedgerState::new(budget)))
    }

    pub(crate) fn apply_expense(
        &mut self,
        category_input: &str,
        amount_input: &str,
    ) -> LedgerResult<&Entry> {
        let category = Category::parse(category_input)?;
        let amount = parse_amount(amount_input)?;
        let overspend = self.rules.overspend;
        let state = self.state.as_mut().ok_or(LedgerError::NoActiveCycle)?;

        if overspend == OverspendPolicy::Reject && amount > state.remaining() {
            return Err(LedgerError::BudgetExceeded {
                amount: amount.to_string(),
                remaining: state.remaining().to_string(),
            });
        }

        let remaining = state.remaining().checked_sub(amount).ok_or_else(too_large)?;
        let used = state.used().checked_add(amount).ok_or_else(too_large)?;
        tracing::debug!(%category, %amount, "expense applied");
        let entry = Entry::expense(category, amount, state.next_seq());
        state.push_entry(entry, remaining, used);
        Ok(&state.entries()[0])
    }

    pub(crate) fn apply_income(&mut self, amount_input: &str) -> LedgerResult<&Entry> {
        let amount = parse_amount(amount_input)?;
        let state = self.state.as_mut().ok_or(LedgerError::NoActiveCycle)?;

        let remaining = state.remaining().checked_add(amount).ok_or_else(too_large)?;
        tracing::debug!(%amount, "income applied");
        let entry = Entry::income(amount, state.next_seq());
        let used = state.used();
        state.push_entry(entry, remaining, used);
        Ok(&state.entries()[0])
    }

    pub(crate) fn derived_metrics(&self) -> DerivedMetrics {
        DerivedMetrics::compute(self.state.as_ref(), &self.rules.thresholds)
    }

    /// Drop the active cycle. Only called once it has been archived.
    pub(crate) fn end_cycle(&mut self) -> Option<LedgerState> {
        self.state.take()
    }
}

fn too_large() -> LedgerError {
    LedgerError::InvalidInput("amount is too large".into())
}

/// Parse a user-typed amount into a positive decimal.
///
/// Accepts surrounding whitespace, one leading currency symbol and `,`/`_`
/// digit separators. Exponents, `NaN`, `inf` and signs other than a
/// leading `+` are rejected.
pub(crate) fn parse_amount(input: &str) -> LedgerResult<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidInput("amount is required".into()));
    }

    let unprefixed = trimmed
        .strip_prefix(['₹', '$', '€', '£', '¥'])
        .unwrap_or(trimmed)
        .trim_start();
    let cleaned: String = unprefixed.chars().filter(|c| !matches!(c, ',' | '_')).collect();

    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    let well_formed = !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1;
    if !well_formed {
        return Err(LedgerError::InvalidInput(format!(
            "'{trimmed}' is not a valid amount"
        )));
    }

    let amount = Decimal::from_str(digits)
        .map_err(|_| LedgerError::InvalidInput(format!("'{trimmed}' is not a valid amount")))?;
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidInput(
            "amount must be greater than zero".into(),
        ));
    }
    Ok(amount.normalize())
}
