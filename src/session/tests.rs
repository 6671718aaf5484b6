#![allow(clippy::unwrap_used)]

use anyhow::bail;
use rust_decimal_macros::dec;

use super::*;
use crate::db::Database;
use crate::ledger::OverspendPolicy;

/// Backend whose writes to selected keys always fail.
#[derive(Default)]
struct FailingStore {
    inner: MemoryStore,
    fail_writes_to: Vec<&'static str>,
}

impl Storage for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes_to.iter().any(|k| *k == key) {
            bail!("quota exceeded");
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

fn memory_store() -> SessionStore {
    SessionStore::new(Box::new(MemoryStore::new()))
}

fn sqlite_store() -> SessionStore {
    SessionStore::new(Box::new(Database::open_in_memory().unwrap()))
}

fn sample_ledger() -> Ledger {
    let mut ledger = Ledger::new(LedgerRules::default());
    ledger.initialize_cycle("1000").unwrap();
    ledger.apply_expense("Food", "200").unwrap();
    ledger.apply_income("50").unwrap();
    ledger
}

// ── load / save ───────────────────────────────────────────────

#[test]
fn test_load_empty_store() {
    for store in [memory_store(), sqlite_store()] {
        assert!(store.load_current().unwrap().is_none());
        assert!(store.history().unwrap().is_empty());
    }
}

#[test]
fn test_save_then_load() {
    for mut store in [memory_store(), sqlite_store()] {
        let ledger = sample_ledger();
        store.save_current(ledger.state().unwrap()).unwrap();
        let loaded = store.load_current().unwrap().unwrap();
        assert_eq!(&loaded, ledger.state().unwrap());
    }
}

#[test]
fn test_save_overwrites_whole_value() {
    let mut store = memory_store();
    let mut ledger = sample_ledger();
    store.save_current(ledger.state().unwrap()).unwrap();
    ledger.apply_expense("Travel", "100").unwrap();
    store.save_current(ledger.state().unwrap()).unwrap();

    let loaded = store.load_current().unwrap().unwrap();
    assert_eq!(loaded.remaining(), dec!(750));
    assert_eq!(loaded.entries().len(), 3);
}

#[test]
fn test_load_invalid_blob_is_no_cycle() {
    let mut store = memory_store();
    store
        .storage
        .set(CURRENT_KEY, r#"{"budget":0,"remaining":0,"used":0,"entries":[]}"#)
        .unwrap();
    assert!(store.load_current().unwrap().is_none());

    store.storage.set(CURRENT_KEY, "{{{{").unwrap();
    assert!(store.load_current().unwrap().is_none());
}

#[test]
fn test_discarded_session_reports_only_present_blobs() {
    let mut store = memory_store();
    assert!(store.discarded_session().unwrap().is_none());

    store.save_current(sample_ledger().state().unwrap()).unwrap();
    assert!(store.discarded_session().unwrap().is_none());

    store
        .storage
        .set(CURRENT_KEY, r#"{"budget":"1000","remaining":"1000","used":"0"}"#)
        .unwrap();
    assert!(store.load_current().unwrap().is_none());
    assert!(matches!(
        store.discarded_session().unwrap(),
        Some(LedgerError::InvalidState(_))
    ));
}

#[test]
fn test_save_then_load_keeps_every_digit() {
    for mut store in [memory_store(), sqlite_store()] {
        let mut ledger = Ledger::new(LedgerRules::default());
        ledger.initialize_cycle("1000000000000000001").unwrap();
        ledger.apply_expense("Food", "1").unwrap();
        ledger.apply_income("0.123456789").unwrap();
        store.persist(&ledger).unwrap();

        let loaded = store.load_current().unwrap();
        assert_eq!(loaded.as_ref(), ledger.state());
        assert_eq!(
            loaded.unwrap().remaining(),
            dec!(1000000000000000000.123456789)
        );
    }
}

#[test]
fn test_restore_ledger() {
    let mut store = memory_store();
    let rules = LedgerRules {
        overspend: OverspendPolicy::Allow,
        ..LedgerRules::default()
    };
    assert!(!store.restore_ledger(rules).unwrap().is_active());

    store.save_current(sample_ledger().state().unwrap()).unwrap();
    let ledger = store.restore_ledger(rules).unwrap();
    assert!(ledger.is_active());
    assert_eq!(ledger.rules(), rules);
    assert_eq!(ledger.state().unwrap().remaining(), dec!(850));
}

#[test]
fn test_persist_failure_keeps_memory_state() {
    let mut store = SessionStore::new(Box::new(FailingStore {
        fail_writes_to: vec![CURRENT_KEY],
        ..FailingStore::default()
    }));
    let mut ledger = Ledger::new(LedgerRules::default());
    ledger.initialize_cycle("500").unwrap();
    ledger.apply_expense("Bills", "100").unwrap();

    let err = store.persist(&ledger).unwrap_err();
    assert!(matches!(err, LedgerError::Persistence(_)));
    assert_eq!(ledger.state().unwrap().remaining(), dec!(400));
    assert!(store.load_current().unwrap().is_none());
}

#[test]
fn test_persist_without_cycle_is_noop() {
    let mut store = memory_store();
    store.persist(&Ledger::new(LedgerRules::default())).unwrap();
    assert!(store.load_current().unwrap().is_none());
}

// ── archive_and_clear ─────────────────────────────────────────

#[test]
fn test_archive_clears_current_and_appends() {
    for mut store in [memory_store(), sqlite_store()] {
        let ledger = sample_ledger();
        let state = ledger.state().unwrap();
        store.save_current(state).unwrap();

        let before = store.history().unwrap().len();
        let record = store.archive_and_clear(state).unwrap();

        assert!(store.load_current().unwrap().is_none());
        let history = store.history().unwrap();
        assert_eq!(history.len(), before + 1);
        assert_eq!(history.last().unwrap().state, *state);
        assert_eq!(history.last().unwrap(), &record);
    }
}

#[test]
fn test_history_preserves_order() {
    let mut store = sqlite_store();
    for budget in ["100", "200", "300"] {
        let mut ledger = Ledger::new(LedgerRules::default());
        ledger.initialize_cycle(budget).unwrap();
        store.persist(&ledger).unwrap();
        store.reset(&mut ledger).unwrap();
        assert!(!ledger.is_active());
    }
    let budgets: Vec<_> = store
        .history()
        .unwrap()
        .iter()
        .map(|r| r.state.budget())
        .collect();
    assert_eq!(budgets, vec![dec!(100), dec!(200), dec!(300)]);
}

#[test]
fn test_archive_failure_keeps_current_session() {
    let mut store = SessionStore::new(Box::new(FailingStore {
        fail_writes_to: vec![HISTORY_KEY],
        ..FailingStore::default()
    }));
    let mut ledger = sample_ledger();
    store.persist(&ledger).unwrap();

    let err = store.reset(&mut ledger).unwrap_err();
    assert!(matches!(err, LedgerError::Persistence(_)));
    assert!(ledger.is_active());
    assert!(store.load_current().unwrap().is_some());
    assert!(store.history().unwrap().is_empty());
}

#[test]
fn test_archive_refuses_corrupt_history() {
    let mut store = memory_store();
    store.storage.set(HISTORY_KEY, "not a list").unwrap();
    let mut ledger = sample_ledger();
    store.persist(&ledger).unwrap();

    let err = store.reset(&mut ledger).unwrap_err();
    assert!(matches!(err, LedgerError::Persistence(_)));
    assert!(ledger.is_active());
    assert!(store.load_current().unwrap().is_some());
    assert_eq!(
        store.storage.get(HISTORY_KEY).unwrap().as_deref(),
        Some("not a list")
    );
}

#[test]
fn test_reset_without_cycle() {
    let mut store = memory_store();
    let mut ledger = Ledger::new(LedgerRules::default());
    assert_eq!(
        store.reset(&mut ledger).unwrap_err(),
        LedgerError::NoActiveCycle
    );
}

#[test]
fn test_history_layout() {
    let mut store = memory_store();
    let mut ledger = sample_ledger();
    store.reset(&mut ledger).unwrap();

    let blob = store.storage.get(HISTORY_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let first = &value.as_array().unwrap()[0];
    assert_eq!(first["budget"], 1000);
    assert_eq!(first["used"], 200);
    assert!(first["completedAt"].is_string());
    assert_eq!(first["entries"].as_array().unwrap().len(), 2);
}
