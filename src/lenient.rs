// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Forgiving field parsers for records coming from the panel's JSON API or
//! from loosely typed SQLite columns. Bad numbers become zero and bad
//! timestamps become `None`; neither aborts the surrounding record.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Offset-carrying values are normalised to UTC wall-clock, bare dates map
/// to midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn decimal_or_zero(s: &str) -> Decimal {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .unwrap_or(Decimal::ZERO)
}

pub fn decimal_from_value(v: &Value) -> Decimal {
    match v {
        Value::Number(n) => decimal_or_zero(&n.to_string()),
        Value::String(s) => decimal_or_zero(s),
        _ => Decimal::ZERO,
    }
}

fn integer_from_value(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                Decimal::from_str(s)
                    .ok()
                    .and_then(|d| d.trunc().to_i64())
            })
        }
        _ => None,
    }
}

pub fn decimal<'de, D>(d: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(decimal_from_value(&v))
}

pub fn integer<'de, D>(d: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(integer_from_value(&v).unwrap_or(0))
}

pub fn opt_integer<'de, D>(d: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(integer_from_value(&v))
}

pub fn timestamp<'de, D>(d: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::String(s) => parse_timestamp(&s),
        _ => None,
    })
}

pub fn text<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_text(d)?.unwrap_or_default())
}

pub fn opt_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Nested record lists. Anything but an array reads as empty and elements
/// that fail to decode are skipped.
pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn timestamps_in_panel_shapes() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let ten = day.and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(parse_timestamp("2024-01-02 10:00:00"), Some(ten));
        assert_eq!(parse_timestamp("2024-01-02T10:00:00.000000Z"), Some(ten));
        assert_eq!(parse_timestamp("2024-01-02T12:00:00+02:00"), Some(ten));
        assert_eq!(parse_timestamp("2024-01-02T10:00"), Some(ten));
        assert_eq!(
            parse_timestamp("2024-01-02"),
            Some(day.and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("  "), None);
    }

    #[test]
    fn numbers_never_fail() {
        assert_eq!(decimal_from_value(&Value::from(12.5)), Decimal::new(125, 1));
        assert_eq!(decimal_from_value(&Value::from("40.00")), Decimal::from(40));
        assert_eq!(decimal_from_value(&Value::from("abc")), Decimal::ZERO);
        assert_eq!(decimal_from_value(&Value::Null), Decimal::ZERO);
        assert_eq!(decimal_from_value(&Value::from(true)), Decimal::ZERO);
        assert_eq!(integer_from_value(&Value::from("7")), Some(7));
        assert_eq!(integer_from_value(&Value::from("7.9")), Some(7));
        assert_eq!(integer_from_value(&Value::from("x")), None);
    }
}
