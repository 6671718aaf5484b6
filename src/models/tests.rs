#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::LedgerError;

fn sample_state() -> LedgerState {
    let mut state = LedgerState::new(dec!(1000));
    state.push_entry(
        Entry::expense(Category::Food, dec!(200), 1),
        dec!(800),
        dec!(200),
    );
    state.push_entry(
        Entry::expense(Category::Custom("Gym".into()), dec!(35.5), 2),
        dec!(764.5),
        dec!(235.5),
    );
    state.push_entry(Entry::income(dec!(50), 3), dec!(814.5), dec!(235.5));
    state
}

fn assert_invalid(blob: &str) {
    assert!(
        matches!(
            LedgerState::deserialize(blob),
            Err(LedgerError::InvalidState(_))
        ),
        "expected InvalidState for {blob}"
    );
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_parse_builtin() {
    assert_eq!(Category::parse("Food").unwrap(), Category::Food);
    assert_eq!(Category::parse("food").unwrap(), Category::Food);
    assert_eq!(Category::parse("  BILLS ").unwrap(), Category::Bills);
    assert_eq!(
        Category::parse("subscriptions").unwrap(),
        Category::Subscriptions
    );
}

#[test]
fn test_category_parse_custom() {
    assert_eq!(
        Category::parse(" Pet food ").unwrap(),
        Category::Custom("Pet food".into())
    );
    assert!(Category::parse("Pet food").unwrap().is_custom());
    assert!(!Category::parse("Other").unwrap().is_custom());
}

#[test]
fn test_category_parse_empty() {
    assert!(matches!(
        Category::parse("   "),
        Err(LedgerError::InvalidInput(_))
    ));
}

#[test]
fn test_category_roundtrip_through_label() {
    for c in Category::all() {
        assert_eq!(Category::parse(c.as_str()).unwrap(), *c);
        assert_eq!(format!("{c}"), c.as_str());
    }
    assert_eq!(Category::all().len(), 10);
}

#[test]
fn test_category_serializes_as_label() {
    let json = serde_json::to_string(&Category::Entertainment).unwrap();
    assert_eq!(json, "\"Entertainment\"");
    let json = serde_json::to_string(&Category::Custom("Rent".into())).unwrap();
    assert_eq!(json, "\"Rent\"");
    let back: Category = serde_json::from_str("\"travel\"").unwrap();
    assert_eq!(back, Category::Travel);
    assert!(serde_json::from_str::<Category>("\"  \"").is_err());
}

// ── Entry ─────────────────────────────────────────────────────

#[test]
fn test_entry_constructors() {
    let e = Entry::expense(Category::Health, dec!(12), 4);
    assert!(e.is_expense());
    assert!(!e.is_income());
    assert_eq!(e.label(), "Health");
    assert!(!e.recorded_at.is_empty());

    let i = Entry::income(dec!(99), 5);
    assert!(i.is_income());
    assert!(i.category.is_none());
    assert_eq!(i.label(), "Income");
}

#[test]
fn test_income_entry_omits_category_in_json() {
    let json = serde_json::to_value(Entry::income(dec!(10), 1)).unwrap();
    assert_eq!(json["kind"], "Income");
    assert_eq!(json["amount"], 10);
    assert!(json.get("category").is_none());
}

// ── LedgerState serialization ─────────────────────────────────

#[test]
fn test_state_roundtrip() {
    let state = sample_state();
    let blob = state.serialize().unwrap();
    let back = LedgerState::deserialize(&blob).unwrap();
    assert_eq!(back, state);
}

#[test]
fn test_state_layout() {
    let value: serde_json::Value =
        serde_json::from_str(&sample_state().serialize().unwrap()).unwrap();
    assert_eq!(value["budget"], 1000);
    assert_eq!(value["remaining"], 814.5);
    assert_eq!(value["used"], 235.5);
    assert_eq!(value["entries"].as_array().unwrap().len(), 3);
    assert_eq!(value["entries"][0]["kind"], "Income");
    assert_eq!(value["entries"][1]["category"], "Gym");
}

#[test]
fn test_amounts_are_written_digit_for_digit() {
    let blob = sample_state().serialize().unwrap();
    assert!(blob.contains(r#""budget":1000,"#), "{blob}");
    assert!(blob.contains(r#""remaining":814.5,"#), "{blob}");
    assert!(blob.contains(r#""amount":35.5,"#), "{blob}");
}

#[test]
fn test_roundtrip_beyond_f64_precision() {
    // 19 significant digits in the budget.
    let mut big = LedgerState::new(dec!(1000000000000000001));
    big.push_entry(
        Entry::expense(Category::Food, dec!(1), 1),
        dec!(1000000000000000000),
        dec!(1),
    );
    let blob = big.serialize().unwrap();
    assert!(blob.contains(r#""budget":1000000000000000001,"#), "{blob}");
    assert!(blob.contains(r#""remaining":1000000000000000000,"#), "{blob}");
    assert_eq!(LedgerState::deserialize(&blob).unwrap(), big);

    // 17 fractional digits in an expense.
    let mut precise = LedgerState::new(dec!(100));
    precise.push_entry(
        Entry::expense(Category::Other, dec!(0.12345678901234567), 1),
        dec!(99.87654321098765433),
        dec!(0.12345678901234567),
    );
    let blob = precise.serialize().unwrap();
    assert!(blob.contains(r#""amount":0.12345678901234567,"#), "{blob}");
    assert_eq!(LedgerState::deserialize(&blob).unwrap(), precise);
}

#[test]
fn test_history_record_keeps_precise_amounts() {
    let mut state = LedgerState::new(dec!(1000000000));
    state.push_entry(
        Entry::income(dec!(0.000000000000000001), 1),
        dec!(1000000000.000000000000000001),
        dec!(0),
    );
    let record = HistoryRecord::new(state);
    let blob = serde_json::to_string(&[&record]).unwrap();
    assert!(blob.contains(r#""remaining":1000000000.000000000000000001,"#), "{blob}");
    let back: Vec<HistoryRecord> = serde_json::from_str(&blob).unwrap();
    assert_eq!(back, vec![record]);
}

#[test]
fn test_deserialize_accepts_integer_numbers() {
    let blob = r#"{"budget":1000,"remaining":800,"used":200,
        "entries":[{"kind":"Expense","category":"Food","amount":200,"seq":1}]}"#;
    let state = LedgerState::deserialize(blob).unwrap();
    assert_eq!(state.remaining(), dec!(800));
    assert_eq!(state.entries()[0].category, Some(Category::Food));
}

#[test]
fn test_deserialize_without_entries_field() {
    let state =
        LedgerState::deserialize(r#"{"budget":500,"remaining":500,"used":0}"#).unwrap();
    assert!(state.entries().is_empty());
}

#[test]
fn test_deserialize_zero_budget_is_invalid() {
    assert_invalid(r#"{"budget":0,"remaining":0,"used":0,"entries":[]}"#);
}

#[test]
fn test_deserialize_negative_budget_is_invalid() {
    assert_invalid(r#"{"budget":-10,"remaining":-10,"used":0,"entries":[]}"#);
}

#[test]
fn test_deserialize_missing_budget_is_invalid() {
    assert_invalid(r#"{"remaining":10,"used":0,"entries":[]}"#);
}

#[test]
fn test_deserialize_non_numeric_budget_is_invalid() {
    assert_invalid(r#"{"budget":"lots","remaining":10,"used":0,"entries":[]}"#);
    assert_invalid(r#"{"budget":null,"remaining":10,"used":0,"entries":[]}"#);
}

#[test]
fn test_deserialize_rejects_quoted_amounts() {
    assert_invalid(r#"{"budget":"1000","remaining":"1000","used":"0"}"#);
    assert_invalid(r#"{"budget":1000,"remaining":1000,"used":"0"}"#);
    assert_invalid(
        r#"{"budget":100,"remaining":90,"used":10,
            "entries":[{"kind":"Expense","category":"Food","amount":"10","seq":1}]}"#,
    );
}

#[test]
fn test_deserialize_accepts_exponent_numbers() {
    let state = LedgerState::deserialize(r#"{"budget":1e3,"remaining":1.0e3,"used":0}"#).unwrap();
    assert_eq!(state.budget(), dec!(1000));
    assert_eq!(state.remaining(), dec!(1000));
}

#[test]
fn test_deserialize_out_of_range_number_is_invalid() {
    assert_invalid(r#"{"budget":1e40,"remaining":1e40,"used":0}"#);
}

#[test]
fn test_deserialize_garbage_is_invalid() {
    assert_invalid("");
    assert_invalid("null");
    assert_invalid("not json");
    assert_invalid("[1,2,3]");
}

#[test]
fn test_deserialize_mismatched_totals_is_invalid() {
    assert_invalid(
        r#"{"budget":1000,"remaining":900,"used":200,
            "entries":[{"kind":"Expense","category":"Food","amount":200,"seq":1}]}"#,
    );
    assert_invalid(
        r#"{"budget":1000,"remaining":800,"used":150,
            "entries":[{"kind":"Expense","category":"Food","amount":200,"seq":1}]}"#,
    );
}

#[test]
fn test_deserialize_malformed_entries_are_invalid() {
    // Expense without category.
    assert_invalid(
        r#"{"budget":100,"remaining":90,"used":10,
            "entries":[{"kind":"Expense","amount":10,"seq":1}]}"#,
    );
    // Income with category.
    assert_invalid(
        r#"{"budget":100,"remaining":110,"used":0,
            "entries":[{"kind":"Income","category":"Food","amount":10,"seq":1}]}"#,
    );
    // Non-positive amount.
    assert_invalid(
        r#"{"budget":100,"remaining":100,"used":0,
            "entries":[{"kind":"Income","amount":0,"seq":1}]}"#,
    );
    // Unknown kind.
    assert_invalid(
        r#"{"budget":100,"remaining":100,"used":0,
            "entries":[{"kind":"Refund","amount":5,"seq":1}]}"#,
    );
}

#[test]
fn test_deserialize_renumbers_out_of_order_seq() {
    let blob = r#"{"budget":100,"remaining":95,"used":10,"entries":[
        {"kind":"Income","amount":5},
        {"kind":"Expense","category":"Food","amount":10}]}"#;
    let state = LedgerState::deserialize(blob).unwrap();
    let seqs: Vec<u64> = state.entries().iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![2, 1]);
    assert_eq!(state.next_seq(), 3);
}

#[test]
fn test_totals_helpers() {
    let state = sample_state();
    assert_eq!(state.income_total(), dec!(50));
    assert_eq!(LedgerState::new(dec!(1)).income_total(), Decimal::ZERO);
}

// ── HistoryRecord ─────────────────────────────────────────────

#[test]
fn test_history_record_is_flat() {
    let record = HistoryRecord::new(sample_state());
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["budget"], 1000);
    assert!(value["completedAt"].is_string());
    assert!(value.get("state").is_none());

    let back: HistoryRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back, record);
}
