#![allow(clippy::unwrap_used)]

use std::io::Write;

use super::*;

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    (dir, path)
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("nope.json")).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.overspend, OverspendPolicy::Reject);
    assert_eq!(config.low_balance_percent, 30);
    assert_eq!(config.usage_alert_percent, 70);
    assert_eq!(config.currency_symbol, "₹");
    assert!(config.db_path.is_none());
}

#[test]
fn test_partial_file_fills_defaults() {
    let (_dir, path) = write_config(r#"{ "overspend": "allow", "currency_symbol": "$" }"#);
    let config = Config::load(&path).unwrap();
    assert_eq!(config.overspend, OverspendPolicy::Allow);
    assert_eq!(config.currency_symbol, "$");
    assert_eq!(config.low_balance_percent, 30);
}

#[test]
fn test_full_file() {
    let (_dir, path) = write_config(
        r#"{
            "overspend": "reject",
            "low_balance_percent": 20,
            "usage_alert_percent": 80,
            "currency_symbol": "€",
            "db_path": "/tmp/pocket.db"
        }"#,
    );
    let config = Config::load(&path).unwrap();
    let rules = config.rules();
    assert_eq!(rules.overspend, OverspendPolicy::Reject);
    assert_eq!(rules.thresholds.low_balance_percent, 20);
    assert_eq!(rules.thresholds.usage_alert_percent, 80);
    assert_eq!(config.db_path, Some(PathBuf::from("/tmp/pocket.db")));
}

#[test]
fn test_out_of_range_percent_rejected() {
    let (_dir, path) = write_config(r#"{ "usage_alert_percent": 150 }"#);
    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("usage_alert_percent"));
}

#[test]
fn test_unknown_policy_rejected() {
    let (_dir, path) = write_config(r#"{ "overspend": "sometimes" }"#);
    assert!(Config::load(&path).is_err());
}

#[test]
fn test_malformed_json_rejected() {
    let (_dir, path) = write_config("{ overspend: allow");
    let err = Config::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Invalid config"));
}

#[test]
fn test_default_serializes_without_db_path() {
    let json = serde_json::to_value(Config::default()).unwrap();
    assert_eq!(json["overspend"], "reject");
    assert!(json.get("db_path").is_none());
}
