use anyhow::{bail, Result};
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::LedgerError;
use crate::ledger::{Ledger, OverspendPolicy};
use crate::models::{Category, HistoryRecord};
use crate::session::SessionStore;
use crate::ui::util::format_amount;

/// Run one command. `args[0]` is the command name.
pub(crate) fn as_cli(args: &[String], store: &mut SessionStore, config: &Config) -> Result<()> {
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };
    let rest = &args[1..];
    match command.as_str() {
        "start" | "init" => cli_start(rest, store, config),
        "expense" | "spend" => cli_expense(rest, store, config),
        "income" | "add" => cli_income(rest, store, config),
        "status" | "s" => cli_status(store, config),
        "history" => cli_history(store, config),
        "reset" => cli_reset(rest, store),
        "export" => cli_export(rest, store),
        "categories" => {
            for category in Category::all() {
                println!("{category}");
            }
            println!("(any other label is accepted as a custom category)");
            Ok(())
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("happypocket {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Happy Pocket - a local-only budget tracker");
    println!();
    println!("Usage: happypocket [--dry-run] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  start <budget>                Begin a budget cycle (alias: init)");
    println!("  expense <category> <amount>   Record an expense (alias: spend)");
    println!("  income <amount>               Record income (alias: add)");
    println!("  status                        Show balance and usage (alias: s)");
    println!("  history                       List archived cycles");
    println!("  reset --yes                   Archive the cycle and clear it");
    println!("  export [path]                 Export the cycle's entries to CSV");
    println!("    --history                   Export archived cycles instead");
    println!("  categories                    List built-in categories");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("  --dry-run                     Keep everything in memory, save nothing");
}

fn cli_start(args: &[String], store: &mut SessionStore, config: &Config) -> Result<()> {
    let Some(budget) = args.first() else {
        bail!("Usage: happypocket start <budget>");
    };
    let mut ledger = store.restore_ledger(config.rules())?;
    if ledger.is_active() {
        bail!("A budget cycle is already active. Run `happypocket reset --yes` to archive it first");
    }
    report_discarded(store, "it will be replaced")?;
    let budget = ledger.initialize_cycle(budget)?.budget();
    store.persist(&ledger)?;
    println!(
        "Budget set to {}",
        format_amount(budget, &config.currency_symbol)
    );
    Ok(())
}

fn cli_expense(args: &[String], store: &mut SessionStore, config: &Config) -> Result<()> {
    let (category, amount) = split_expense_args(args)?;
    let mut ledger = store.restore_ledger(config.rules())?;
    let entry = ledger.apply_expense(&category, amount)?;
    let line = format!(
        "Spent {} on {}",
        format_amount(entry.amount, &config.currency_symbol),
        entry.label()
    );
    store.persist(&ledger)?;
    println!("{line}");
    print_balance_line(&ledger, config);
    Ok(())
}

fn cli_income(args: &[String], store: &mut SessionStore, config: &Config) -> Result<()> {
    let Some(amount) = args.first() else {
        bail!("Usage: happypocket income <amount>");
    };
    let mut ledger = store.restore_ledger(config.rules())?;
    let entry = ledger.apply_income(amount)?;
    let line = format!(
        "Added {}",
        format_amount(entry.amount, &config.currency_symbol)
    );
    store.persist(&ledger)?;
    println!("{line}");
    print_balance_line(&ledger, config);
    Ok(())
}

fn print_balance_line(ledger: &Ledger, config: &Config) {
    let Some(state) = ledger.state() else {
        return;
    };
    let metrics = ledger.derived_metrics();
    println!(
        "Remaining {} ({}% used)",
        format_amount(state.remaining(), &config.currency_symbol),
        metrics.rounded_percent()
    );
    if metrics.is_critical() {
        println!("Warning: balance is running low");
    }
}

fn cli_status(store: &SessionStore, config: &Config) -> Result<()> {
    let ledger = store.restore_ledger(config.rules())?;
    if !ledger.is_active() {
        report_discarded(store, "it was ignored")?;
    }
    print!("{}", status_report(&ledger, &config.currency_symbol));
    Ok(())
}

/// Tell the user on stderr when a saved session exists but could not be
/// restored.
fn report_discarded(store: &SessionStore, outcome: &str) -> Result<()> {
    if let Some(reason) = store.discarded_session()? {
        eprintln!("{}", discarded_notice(&reason, outcome));
    }
    Ok(())
}

pub(crate) fn discarded_notice(reason: &LedgerError, outcome: &str) -> String {
    format!("Note: the saved session could not be restored and {outcome}. {reason}")
}

fn cli_history(store: &SessionStore, config: &Config) -> Result<()> {
    let history = store.history()?;
    print!("{}", history_report(&history, &config.currency_symbol));
    Ok(())
}

fn cli_reset(args: &[String], store: &mut SessionStore) -> Result<()> {
    if !args.iter().any(|a| a == "--yes" || a == "-y") {
        bail!("Reset archives and clears the current cycle. Re-run with --yes to confirm");
    }
    // Rules don't matter for archiving.
    let mut ledger = store.restore_ledger(Default::default())?;
    let record = store.reset(&mut ledger)?;
    println!(
        "Archived cycle with {} entries at {}",
        record.state.entries().len(),
        record.completed_at
    );
    Ok(())
}

fn cli_export(args: &[String], store: &SessionStore) -> Result<()> {
    let history_mode = args.iter().any(|a| a == "--history");
    let kind = if history_mode { "history" } else { "entries" };

    // Output path is the first non-flag argument
    let output_path = args
        .iter()
        .find(|a| !a.starts_with('-'))
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            let date = chrono::Local::now().format("%Y-%m-%d");
            PathBuf::from(format!("{home}/happypocket-{kind}-{date}.csv"))
        });

    let count = if history_mode {
        let history = store.history()?;
        crate::export::export_history(&history, &output_path)?
    } else {
        let ledger = store.restore_ledger(Default::default())?;
        let Some(state) = ledger.state() else {
            return Err(LedgerError::NoActiveCycle.into());
        };
        crate::export::export_entries(state, &output_path)?
    };
    println!("Exported {count} {kind} rows to {}", output_path.display());
    Ok(())
}

/// Everything before the last argument is the category, so custom labels
/// may contain spaces.
pub(crate) fn split_expense_args(args: &[String]) -> Result<(String, &str)> {
    match args.split_last() {
        Some((amount, category)) if !category.is_empty() => {
            Ok((category.join(" "), amount.as_str()))
        }
        _ => bail!("Usage: happypocket expense <category> <amount>"),
    }
}

pub(crate) fn status_report(ledger: &Ledger, currency: &str) -> String {
    let Some(state) = ledger.state() else {
        return "No active budget. Start one with `happypocket start <budget>`\n".into();
    };
    let metrics = ledger.derived_metrics();
    let mut out = String::new();
    let _ = writeln!(out, "Happy Pocket");
    let _ = writeln!(out, "{}", "─".repeat(40));
    let _ = writeln!(out, "  Remaining:  {}", format_amount(state.remaining(), currency));
    let _ = writeln!(out, "  Budget:     {}", format_amount(state.budget(), currency));
    let _ = writeln!(out, "  Used:       {}", format_amount(state.used(), currency));
    let _ = writeln!(out, "  Income:     {}", format_amount(state.income_total(), currency));
    let _ = writeln!(out, "  Usage:      {}%", metrics.rounded_percent());
    let _ = writeln!(out, "  Balance:    {}", metrics.warning_level);
    if metrics.usage_alert {
        let _ = writeln!(out, "  Alert:      spending is over the alert threshold");
    }
    if ledger.rules().overspend == OverspendPolicy::Allow {
        let _ = writeln!(out, "  Overspend:  allowed");
    }

    if !state.entries().is_empty() {
        let expenses = state.entries().iter().filter(|e| e.is_expense()).count();
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Entries, newest first ({expenses} expenses, {} income):",
            state.entries().len() - expenses
        );
        for entry in state.entries() {
            let sign = if entry.is_income() { "+" } else { "-" };
            let _ = writeln!(
                out,
                "  {:>4}  {:<24} {sign}{}",
                entry.seq,
                entry.label(),
                format_amount(entry.amount, currency)
            );
        }
    }
    out
}

pub(crate) fn history_report(history: &[HistoryRecord], currency: &str) -> String {
    if history.is_empty() {
        return "No archived cycles\n".into();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<26} {:>12} {:>12} {:>12} Entries",
        "#", "Completed", "Budget", "Used", "Remaining"
    );
    let _ = writeln!(out, "{}", "─".repeat(80));
    for (i, record) in history.iter().enumerate() {
        let state = &record.state;
        let _ = writeln!(
            out,
            "{:<4} {:<26} {:>12} {:>12} {:>12} {}",
            i + 1,
            record.completed_at,
            format_amount(state.budget(), currency),
            format_amount(state.used(), currency),
            format_amount(state.remaining(), currency),
            state.entries().len()
        );
    }
    out
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
