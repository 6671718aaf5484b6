//! Serde adapter that stores a `Decimal` as a JSON number without going
//! through `f64`. Needs serde_json's `arbitrary_precision` feature, which
//! keeps the number's digits verbatim in both directions.

use rust_decimal::Decimal;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;
use std::str::FromStr;

pub(super) fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    Number::from_str(&value.to_string())
        .map_err(ser::Error::custom)?
        .serialize(serializer)
}

/// Only JSON numbers are accepted; `"1000"` is a type error.
pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Number::deserialize(deserializer)?.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| de::Error::custom(format!("number {text} does not fit a decimal amount")))
}
