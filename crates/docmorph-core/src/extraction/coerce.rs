//! Value coercion
//!
//! Converts a matched value into the type requested by a rule. Plain
//! results stay ordinary JSON; big integers, instants and byte arrays come
//! back as [`ExtendedValue`]s and are wrapped in envelopes on output.

use crate::extended::ExtendedValue;
use crate::types::CoerceType;
use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use num_bigint::BigInt;
use serde_json::{Number, Value};
use std::str::FromStr;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Coerce a value to the requested type, or pass it through when no type is given
pub fn coerce(value: &Value, coerce_type: Option<CoerceType>) -> Result<ExtendedValue> {
    let Some(tag) = coerce_type else {
        return Ok(ExtendedValue::Plain(value.clone()));
    };

    if value.is_null() {
        return Err(Error::coercion(tag, value, "null cannot be coerced"));
    }

    match tag {
        CoerceType::String => to_string(value).map(ExtendedValue::Plain),
        CoerceType::Number => to_number(value).map(ExtendedValue::Plain),
        CoerceType::Integer => to_integer(value).map(ExtendedValue::Plain),
        CoerceType::Boolean => to_boolean(value).map(ExtendedValue::Plain),
        CoerceType::BigInt => to_bigint(value).map(ExtendedValue::BigInt),
        CoerceType::Date => {
            let instant = to_instant(CoerceType::Date, value)?;
            let midnight = instant.date_naive().and_time(NaiveTime::MIN);
            Ok(ExtendedValue::Date(Utc.from_utc_datetime(&midnight)))
        }
        CoerceType::DateTime => to_instant(CoerceType::DateTime, value).map(ExtendedValue::Date),
        CoerceType::Time => to_time(value).map(ExtendedValue::Plain),
        CoerceType::Object => to_object(value).map(ExtendedValue::Plain),
        CoerceType::Uint8Array => to_bytes(value).map(ExtendedValue::Bytes),
    }
}

fn to_string(value: &Value) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(s.clone())),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        _ => Err(Error::coercion(
            CoerceType::String,
            value,
            "arrays and objects have no string form",
        )),
    }
}

fn to_number(value: &Value) -> Result<Value> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::Bool(b) => Ok(Value::from(u8::from(*b))),
        Value::String(s) => parse_number(s)
            .map(Value::Number)
            .ok_or_else(|| Error::coercion(CoerceType::Number, value, "not a numeric string")),
        _ => Err(Error::coercion(CoerceType::Number, value, "not a number")),
    }
}

fn to_integer(value: &Value) -> Result<Value> {
    let number = match value {
        Value::Number(n) => n.clone(),
        Value::Bool(b) => return Ok(Value::from(u8::from(*b))),
        Value::String(s) => parse_number(s)
            .ok_or_else(|| Error::coercion(CoerceType::Integer, value, "not a numeric string"))?,
        _ => return Err(Error::coercion(CoerceType::Integer, value, "not a number")),
    };

    if number.is_i64() || number.is_u64() {
        return Ok(Value::Number(number));
    }

    match number.as_f64() {
        Some(f) if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(Value::from(f.trunc() as i64))
        }
        _ => Err(Error::coercion(CoerceType::Integer, value, "out of integer range")),
    }
}

fn to_boolean(value: &Value) -> Result<Value> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::Number(n) => Ok(Value::Bool(n.as_f64().map(|f| f != 0.0).unwrap_or(true))),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(Error::coercion(
                CoerceType::Boolean,
                value,
                "expected true, false, 1 or 0",
            )),
        },
        _ => Err(Error::coercion(CoerceType::Boolean, value, "not a boolean")),
    }
}

fn to_bigint(value: &Value) -> Result<BigInt> {
    match value {
        Value::Bool(b) => Ok(BigInt::from(u8::from(*b))),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(BigInt::from(i));
            }
            if let Some(u) = n.as_u64() {
                return Ok(BigInt::from(u));
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => BigInt::from_str(&format!("{:.0}", f))
                    .map_err(|e| Error::coercion(CoerceType::BigInt, value, e.to_string())),
                _ => Err(Error::coercion(CoerceType::BigInt, value, "not an integral number")),
            }
        }
        Value::String(s) => BigInt::from_str(s.trim())
            .map_err(|e| Error::coercion(CoerceType::BigInt, value, e.to_string())),
        _ => Err(Error::coercion(CoerceType::BigInt, value, "not an integer")),
    }
}

/// Years an envelope can carry as a four digit RFC 3339 year
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// Parse an instant, truncated to millisecond precision
fn to_instant(tag: CoerceType, value: &Value) -> Result<DateTime<Utc>> {
    let instant = match value {
        Value::String(s) => parse_instant(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    };

    let instant = instant
        .and_then(|dt| Utc.timestamp_millis_opt(dt.timestamp_millis()).single())
        .ok_or_else(|| Error::coercion(tag, value, "not a recognizable date"))?;

    if !YEAR_RANGE.contains(&instant.year()) {
        return Err(Error::coercion(
            tag,
            value,
            format!("year {} is outside 0000-9999", instant.year()),
        ));
    }
    Ok(instant)
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

fn to_time(value: &Value) -> Result<Value> {
    let time = match value {
        Value::String(s) => {
            let s = s.trim();
            TIME_FORMATS
                .iter()
                .find_map(|format| NaiveTime::parse_from_str(s, format).ok())
                .or_else(|| parse_instant(s).map(|dt| dt.time()))
        }
        Value::Number(_) => to_instant(CoerceType::Time, value).ok().map(|dt| dt.time()),
        _ => None,
    };

    time.map(|t| Value::String(t.format("%H:%M:%S").to_string()))
        .ok_or_else(|| Error::coercion(CoerceType::Time, value, "not a recognizable time"))
}

fn to_object(value: &Value) -> Result<Value> {
    match value {
        Value::Object(_) | Value::Array(_) => Ok(value.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed @ (Value::Object(_) | Value::Array(_))) => Ok(parsed),
            Ok(_) => Err(Error::coercion(
                CoerceType::Object,
                value,
                "string does not contain an object or array",
            )),
            Err(e) => Err(Error::coercion(CoerceType::Object, value, e.to_string())),
        },
        _ => Err(Error::coercion(CoerceType::Object, value, "not an object")),
    }
}

fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(digits) => hex::decode(digits)
                    .map_err(|e| Error::coercion(CoerceType::Uint8Array, value, e.to_string())),
                None => STANDARD
                    .decode(s)
                    .map_err(|e| Error::coercion(CoerceType::Uint8Array, value, e.to_string())),
            }
        }
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| {
                        Error::coercion(
                            CoerceType::Uint8Array,
                            value,
                            format!("{} is not a byte", item),
                        )
                    })
            })
            .collect(),
        _ => Err(Error::coercion(
            CoerceType::Uint8Array,
            value,
            "expected base64, hex or an array of bytes",
        )),
    }
}

fn parse_number(s: &str) -> Option<Number> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(Number::from(u));
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}
