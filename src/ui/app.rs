use rust_decimal::Decimal;
use std::time::{Duration, Instant};

use crate::ledger::{DerivedMetrics, Ledger};
use crate::models::{Category, HistoryRecord};
use crate::session::SessionStore;

/// How long the hero balance takes to count up to a new value.
pub(crate) const ANIMATION_DURATION: Duration = Duration::from_millis(1200);
/// Redraw interval while the balance is counting.
pub(crate) const ANIMATION_TICK: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    /// Splash prompt for a new cycle's budget.
    Budget,
    Category,
    CustomCategory,
    Amount,
    Income,
    Confirm,
}

impl InputMode {
    pub(crate) fn takes_amount(self) -> bool {
        matches!(self, Self::Budget | Self::Amount | Self::Income)
    }
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Budget => write!(f, "BUDGET"),
            Self::Category => write!(f, "CATEGORY"),
            Self::CustomCategory => write!(f, "CUSTOM"),
            Self::Amount => write!(f, "EXPENSE"),
            Self::Income => write!(f, "INCOME"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PendingAction {
    Reset,
}

/// Linear count from the previously shown balance to the new one.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BalanceAnimation {
    from: Decimal,
    to: Decimal,
    started: Instant,
}

impl BalanceAnimation {
    pub(crate) fn new(from: Decimal, to: Decimal, started: Instant) -> Self {
        Self { from, to, started }
    }

    /// Whole units while counting, the exact target once finished.
    pub(crate) fn value_at(&self, now: Instant) -> Decimal {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed >= ANIMATION_DURATION {
            return self.to;
        }
        let progress = Decimal::from(elapsed.as_millis() as u64)
            / Decimal::from(ANIMATION_DURATION.as_millis() as u64);
        self.to
            .checked_sub(self.from)
            .and_then(|span| span.checked_mul(progress))
            .and_then(|step| step.checked_add(self.from))
            .map_or(self.to, |v| v.trunc())
    }

    pub(crate) fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= ANIMATION_DURATION
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) input_mode: InputMode,
    pub(crate) input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) show_history: bool,
    pub(crate) currency: String,

    pub(crate) ledger: Ledger,
    pub(crate) metrics: DerivedMetrics,
    pub(crate) history: Vec<HistoryRecord>,
    store: SessionStore,

    // Expense form
    pub(crate) category_index: usize,
    pub(crate) pending_category: Option<String>,

    // Lists
    pub(crate) entry_index: usize,
    pub(crate) entry_scroll: usize,
    pub(crate) history_index: usize,
    pub(crate) history_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    pub(crate) animation: Option<BalanceAnimation>,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(ledger: Ledger, store: SessionStore, currency: impl Into<String>) -> Self {
        let input_mode = if ledger.is_active() {
            InputMode::Normal
        } else {
            InputMode::Budget
        };
        let metrics = ledger.derived_metrics();
        // A read error here already surfaced when the ledger was restored.
        let status_message = match store.discarded_session() {
            Ok(Some(reason)) => {
                format!("Saved session could not be restored, starting fresh. {reason}")
            }
            _ => String::new(),
        };
        Self {
            running: true,
            input_mode,
            input: String::new(),
            status_message,
            show_help: false,
            show_history: false,
            currency: currency.into(),

            ledger,
            metrics,
            history: Vec::new(),
            store,

            category_index: 0,
            pending_category: None,

            entry_index: 0,
            entry_scroll: 0,
            history_index: 0,
            history_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            animation: None,

            visible_rows: 20,
        }
    }

    /// Options in the category picker: the fixed set, then "Custom".
    pub(crate) fn category_options() -> usize {
        Category::all().len() + 1
    }

    pub(crate) fn is_custom_selected(&self) -> bool {
        self.category_index >= Category::all().len()
    }

    pub(crate) fn refresh_history(&mut self) {
        match self.store.history() {
            Ok(history) => {
                self.history = history;
                if self.history_index >= self.history.len() {
                    self.history_index = self.history.len().saturating_sub(1);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not read history");
                self.set_status(e.to_string());
            }
        }
    }

    /// Balance as it should be drawn at `now`.
    pub(crate) fn displayed_balance(&self, now: Instant) -> Decimal {
        let target = self
            .ledger
            .state()
            .map_or(Decimal::ZERO, |s| s.remaining());
        match self.animation {
            Some(anim) => anim.value_at(now),
            None => target,
        }
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Drop the animation once it has reached its target.
    pub(crate) fn tick(&mut self, now: Instant) {
        if self.animation.is_some_and(|a| a.is_finished(now)) {
            self.animation = None;
        }
    }

    // ── Actions ──────────────────────────────────────────────

    pub(crate) fn open_expense(&mut self) {
        if !self.ledger.is_active() {
            self.start_budget_prompt();
            return;
        }
        self.category_index = 0;
        self.pending_category = None;
        self.input.clear();
        self.input_mode = InputMode::Category;
    }

    pub(crate) fn open_income(&mut self) {
        if !self.ledger.is_active() {
            self.start_budget_prompt();
            return;
        }
        self.input.clear();
        self.input_mode = InputMode::Income;
    }

    /// Move from the category picker to the amount prompt, or to the custom
    /// label prompt when "Custom" is highlighted.
    pub(crate) fn choose_category(&mut self) {
        match Category::all().get(self.category_index) {
            Some(category) => {
                self.pending_category = Some(category.to_string());
                self.input.clear();
                self.input_mode = InputMode::Amount;
            }
            None => {
                self.input.clear();
                self.input_mode = InputMode::CustomCategory;
            }
        }
    }

    pub(crate) fn submit_custom_category(&mut self) {
        let label = self.input.trim();
        if label.is_empty() {
            self.set_status("Enter a category name");
            return;
        }
        self.pending_category = Some(label.to_string());
        self.input.clear();
        self.input_mode = InputMode::Amount;
    }

    pub(crate) fn submit_budget(&mut self) {
        let before = self.displayed_balance(Instant::now());
        match self.ledger.initialize_cycle(&self.input) {
            Ok(state) => {
                let message = format!(
                    "Budget set to {}",
                    crate::ui::util::format_amount(state.budget(), &self.currency)
                );
                self.after_mutation(before, message);
                self.entry_index = 0;
                self.entry_scroll = 0;
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub(crate) fn submit_expense(&mut self) {
        let category = self.pending_category.clone().unwrap_or_default();
        let before = self.displayed_balance(Instant::now());
        match self.ledger.apply_expense(&category, &self.input) {
            Ok(entry) => {
                let message = format!(
                    "Spent {} on {}",
                    crate::ui::util::format_amount(entry.amount, &self.currency),
                    entry.label()
                );
                self.pending_category = None;
                self.after_mutation(before, message);
            }
            // Keep the form open so the amount can be corrected.
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub(crate) fn submit_income(&mut self) {
        let before = self.displayed_balance(Instant::now());
        match self.ledger.apply_income(&self.input) {
            Ok(entry) => {
                let message = format!(
                    "Added {}",
                    crate::ui::util::format_amount(entry.amount, &self.currency)
                );
                self.after_mutation(before, message);
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub(crate) fn request_reset(&mut self) {
        if !self.ledger.is_active() {
            self.set_status("Nothing to reset");
            return;
        }
        self.pending_action = Some(PendingAction::Reset);
        self.confirm_message = "Archive this cycle and start over?".into();
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn confirm(&mut self) {
        let Some(action) = self.pending_action.take() else {
            self.input_mode = InputMode::Normal;
            return;
        };
        match action {
            PendingAction::Reset => match self.store.reset(&mut self.ledger) {
                Ok(_) => {
                    self.metrics = self.ledger.derived_metrics();
                    self.animation = None;
                    self.entry_index = 0;
                    self.entry_scroll = 0;
                    self.refresh_history();
                    self.set_status("Cycle archived");
                    self.start_budget_prompt();
                }
                Err(e) => {
                    self.set_status(e.to_string());
                    self.input_mode = InputMode::Normal;
                }
            },
        }
    }

    pub(crate) fn cancel(&mut self) {
        self.pending_action = None;
        self.pending_category = None;
        self.input.clear();
        self.input_mode = if self.ledger.is_active() {
            InputMode::Normal
        } else {
            InputMode::Budget
        };
    }

    pub(crate) fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
        if self.show_history {
            self.refresh_history();
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn start_budget_prompt(&mut self) {
        self.input.clear();
        self.input_mode = InputMode::Budget;
    }

    /// Recompute metrics, save, and start counting toward the new balance.
    fn after_mutation(&mut self, before: Decimal, message: String) {
        self.metrics = self.ledger.derived_metrics();
        self.input.clear();
        self.input_mode = InputMode::Normal;
        let target = self
            .ledger
            .state()
            .map_or(Decimal::ZERO, |s| s.remaining());
        if target != before {
            self.animation = Some(BalanceAnimation::new(before, target, Instant::now()));
        }
        match self.store.persist(&self.ledger) {
            Ok(()) => self.set_status(message),
            Err(e) => self.set_status(format!("{message} (not saved: {e})")),
        }
    }
}
