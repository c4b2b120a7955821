//! Extended values and their JSON envelope form
//!
//! Some coerced values (arbitrary precision integers, instants and byte
//! arrays) have no plain JSON representation. They cross the serialization
//! boundary as a tagged envelope:
//!
//! ```json
//! {"@ext": "bigint", "value": "12345678901234567890"}
//! {"@ext": "date", "value": "2024-01-01T00:00:00.000Z"}
//! {"@ext": "uint8array", "value": "AAEC"}
//! ```

use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use num_bigint::BigInt;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Envelope key carrying the extended type name
pub const EXTENDED_TAG: &str = "@ext";

/// Envelope key carrying the textual representation
pub const EXTENDED_VALUE: &str = "value";

/// A value that may need an envelope to be represented as JSON
#[derive(Debug, Clone, PartialEq)]
pub enum ExtendedValue {
    /// Ordinary JSON value, encoded as itself
    Plain(Value),
    /// Arbitrary precision integer
    BigInt(BigInt),
    /// Instant in UTC, millisecond precision
    Date(DateTime<Utc>),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl ExtendedValue {
    /// Envelope type name, or `None` for plain values
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            ExtendedValue::Plain(_) => None,
            ExtendedValue::BigInt(_) => Some("bigint"),
            ExtendedValue::Date(_) => Some("date"),
            ExtendedValue::Bytes(_) => Some("uint8array"),
        }
    }

    /// Encode into plain JSON, wrapping non-JSON values in an envelope
    pub fn into_value(self) -> Value {
        match self {
            ExtendedValue::Plain(value) => value,
            ExtendedValue::BigInt(n) => envelope("bigint", n.to_string()),
            ExtendedValue::Date(dt) => {
                envelope("date", dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            ExtendedValue::Bytes(bytes) => envelope("uint8array", STANDARD.encode(bytes)),
        }
    }

    /// Decode a JSON value, unwrapping an envelope when present
    pub fn decode(value: &Value) -> Result<Self> {
        let Some(obj) = value.as_object() else {
            return Ok(ExtendedValue::Plain(value.clone()));
        };
        let Some(tag) = obj.get(EXTENDED_TAG) else {
            return Ok(ExtendedValue::Plain(value.clone()));
        };

        let tag = tag
            .as_str()
            .ok_or_else(|| Error::invalid_envelope(format!("'{}' must be a string", EXTENDED_TAG)))?;
        let repr = obj
            .get(EXTENDED_VALUE)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::invalid_envelope(format!("'{}' envelope needs a string '{}'", tag, EXTENDED_VALUE))
            })?;

        match tag {
            "bigint" => BigInt::from_str(repr)
                .map(ExtendedValue::BigInt)
                .map_err(|e| Error::invalid_envelope(format!("bad bigint '{}': {}", repr, e))),
            "date" => DateTime::parse_from_rfc3339(repr)
                .map(|dt| ExtendedValue::Date(dt.with_timezone(&Utc)))
                .map_err(|e| Error::invalid_envelope(format!("bad date '{}': {}", repr, e))),
            "uint8array" => STANDARD
                .decode(repr)
                .map(ExtendedValue::Bytes)
                .map_err(|e| Error::invalid_envelope(format!("bad uint8array '{}': {}", repr, e))),
            other => Err(Error::invalid_envelope(format!("unknown extended type '{}'", other))),
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, ExtendedValue::Plain(_))
    }
}

impl From<Value> for ExtendedValue {
    fn from(value: Value) -> Self {
        ExtendedValue::Plain(value)
    }
}

fn envelope(tag: &str, repr: String) -> Value {
    let mut obj = Map::with_capacity(2);
    obj.insert(EXTENDED_TAG.to_string(), Value::String(tag.to_string()));
    obj.insert(EXTENDED_VALUE.to_string(), Value::String(repr));
    Value::Object(obj)
}

/// Walk a document and decode every envelope it contains
///
/// Returns the location of each extended value in document order, which is
/// what callers inspecting an extraction result usually need. Fails on the
/// first object whose `@ext` member is not a valid envelope.
pub fn collect_extended(document: &Value) -> Result<Vec<(String, ExtendedValue)>> {
    find_envelopes(document)
        .into_iter()
        .map(|(path, value)| Ok((path, ExtendedValue::decode(value)?)))
        .collect()
}

/// Every object carrying an `@ext` member, with its location, undecoded
pub fn find_envelopes(document: &Value) -> Vec<(String, &Value)> {
    let mut found = Vec::new();
    find_into(document, String::new(), &mut found);
    found
}

fn find_into<'a>(value: &'a Value, path: String, found: &mut Vec<(String, &'a Value)>) {
    match value {
        Value::Object(obj) if obj.contains_key(EXTENDED_TAG) => found.push((path, value)),
        Value::Object(obj) => {
            for (key, child) in obj {
                find_into(child, join(&path, key), found);
            }
        }
        Value::Array(arr) => {
            for (index, child) in arr.iter().enumerate() {
                find_into(child, join(&path, &index.to_string()), found);
            }
        }
        _ => {}
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_bigint_envelope() {
        let value = ExtendedValue::BigInt(BigInt::from(0)).into_value();
        assert_eq!(value, json!({"@ext": "bigint", "value": "0"}));
    }

    #[test]
    fn test_date_envelope() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let value = ExtendedValue::Date(dt).into_value();
        assert_eq!(value, json!({"@ext": "date", "value": "2024-01-02T03:04:05.000Z"}));
        assert_eq!(ExtendedValue::decode(&value).unwrap(), ExtendedValue::Date(dt));
    }

    #[test]
    fn test_bytes_envelope() {
        let value = ExtendedValue::Bytes(vec![0, 1, 2, 255]).into_value();
        assert_eq!(value, json!({"@ext": "uint8array", "value": "AAEC/w=="}));
        assert_eq!(
            ExtendedValue::decode(&value).unwrap(),
            ExtendedValue::Bytes(vec![0, 1, 2, 255])
        );
    }

    #[test]
    fn test_plain_passthrough() {
        let value = json!({"a": [1, "two"]});
        let decoded = ExtendedValue::decode(&value).unwrap();
        assert!(decoded.is_plain());
        assert_eq!(decoded.into_value(), value);
    }

    #[test]
    fn test_malformed_envelopes() {
        for bad in [
            json!({"@ext": 1, "value": "0"}),
            json!({"@ext": "bigint"}),
            json!({"@ext": "bigint", "value": "12a"}),
            json!({"@ext": "date", "value": "yesterday"}),
            json!({"@ext": "uint8array", "value": "!!"}),
            json!({"@ext": "decimal", "value": "1.5"}),
        ] {
            assert!(
                matches!(ExtendedValue::decode(&bad), Err(Error::InvalidEnvelope { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_collect_extended() {
        let doc = json!({
            "id": {"@ext": "bigint", "value": "42"},
            "items": [{"raw": {"@ext": "uint8array", "value": "AQ=="}}],
            "name": "plain"
        });
        let found = collect_extended(&doc).unwrap();

        assert_eq!(
            found,
            vec![
                ("id".to_string(), ExtendedValue::BigInt(BigInt::from(42))),
                ("items.0.raw".to_string(), ExtendedValue::Bytes(vec![1])),
            ]
        );
    }

    #[test]
    fn test_find_envelopes_keeps_malformed_entries() {
        let doc = json!({
            "meta": {"@ext": "custom"},
            "n": [{"@ext": "bigint", "value": "7"}]
        });

        let found = find_envelopes(&doc);
        let paths: Vec<&str> = found.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, ["meta", "n.0"]);
        assert!(collect_extended(&doc).is_err());
    }
}
