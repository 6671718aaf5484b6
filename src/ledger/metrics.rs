use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::LedgerState;

/// Two independent cut-offs, both whole percentages of the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Thresholds {
    /// Balance at or below this share of the budget is `Critical`.
    pub(crate) low_balance_percent: u32,
    /// Usage at or above this share of the budget raises the usage alert.
    pub(crate) usage_alert_percent: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low_balance_percent: 30,
            usage_alert_percent: 70,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WarningLevel {
    Normal,
    Critical,
}

impl std::fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DerivedMetrics {
    /// `used / budget * 100`, clamped to `[0, 100]`.
    pub(crate) usage_percent: Decimal,
    /// Driven by the remaining balance.
    pub(crate) warning_level: WarningLevel,
    /// Driven by cumulative usage.
    pub(crate) usage_alert: bool,
}

impl DerivedMetrics {
    pub(crate) fn compute(state: Option<&LedgerState>, thresholds: &Thresholds) -> Self {
        let Some(state) = state.filter(|s| s.budget() > Decimal::ZERO) else {
            return Self {
                usage_percent: Decimal::ZERO,
                warning_level: WarningLevel::Normal,
                usage_alert: false,
            };
        };

        let budget = state.budget();
        // None only on overflow, i.e. usage far beyond the budget.
        let raw_percent = state
            .used()
            .checked_div(budget)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
        let usage_percent = raw_percent
            .unwrap_or(Decimal::ONE_HUNDRED)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        let usage_alert = raw_percent
            .map_or(true, |p| p >= Decimal::from(thresholds.usage_alert_percent));

        let low_balance = budget * fraction(thresholds.low_balance_percent);
        let warning_level = if state.remaining() <= low_balance {
            WarningLevel::Critical
        } else {
            WarningLevel::Normal
        };

        Self {
            usage_percent,
            warning_level,
            usage_alert,
        }
    }

    /// Usage rounded to a whole percent for display.
    pub(crate) fn rounded_percent(&self) -> u16 {
        self.usage_percent.round().to_u16().unwrap_or(0)
    }

    pub(crate) fn is_critical(&self) -> bool {
        self.warning_level == WarningLevel::Critical
    }
}

fn fraction(percent: u32) -> Decimal {
    Decimal::from(percent.min(100)) / Decimal::ONE_HUNDRED
}
