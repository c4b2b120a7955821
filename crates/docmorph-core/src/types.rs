//! Core types and data structures for the Docmorph extraction engine
//!
//! This module defines the fundamental data structures used throughout
//! the library for representing rules, rule groups, converted documents
//! and the matches produced by query evaluation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A single extraction instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Query expression evaluated against the input document
    pub source: String,

    /// Dotted output path that receives each match
    pub target: String,

    /// Number of trailing location segments appended to the target
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "maintainNestingDepth"
    )]
    pub retain_path_depth: Option<usize>,

    /// Conversion applied to each matched value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coerce: Option<CoerceType>,
}

impl Rule {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            retain_path_depth: None,
            coerce: None,
        }
    }

    pub fn with_retain_path_depth(mut self, depth: usize) -> Self {
        self.retain_path_depth = Some(depth);
        self
    }

    pub fn with_coerce(mut self, coerce: CoerceType) -> Self {
        self.coerce = Some(coerce);
        self
    }
}

/// A named, ordered set of rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroup {
    /// Unique identifier
    pub id: String,

    /// Human readable label
    pub label: String,

    /// Rules applied in order
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RuleGroup {
    pub fn new(id: impl Into<String>, label: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            rules,
        }
    }
}

/// A converted document together with the format it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredData {
    /// MIME type of the raw bytes the document was converted from
    pub source_mime_type: String,

    /// The converted document
    pub object: Value,
}

impl StructuredData {
    pub fn new(source_mime_type: impl Into<String>, object: Value) -> Self {
        Self {
            source_mime_type: source_mime_type.into(),
            object,
        }
    }
}

/// Target types a matched value can be coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoerceType {
    String,
    Number,
    Integer,
    Boolean,
    BigInt,
    Date,
    DateTime,
    Time,
    Object,
    Uint8Array,
}

impl CoerceType {
    /// All coercion tags in declaration order
    pub const ALL: [CoerceType; 10] = [
        CoerceType::String,
        CoerceType::Number,
        CoerceType::Integer,
        CoerceType::Boolean,
        CoerceType::BigInt,
        CoerceType::Date,
        CoerceType::DateTime,
        CoerceType::Time,
        CoerceType::Object,
        CoerceType::Uint8Array,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoerceType::String => "string",
            CoerceType::Number => "number",
            CoerceType::Integer => "integer",
            CoerceType::Boolean => "boolean",
            CoerceType::BigInt => "bigint",
            CoerceType::Date => "date",
            CoerceType::DateTime => "datetime",
            CoerceType::Time => "time",
            CoerceType::Object => "object",
            CoerceType::Uint8Array => "uint8array",
        }
    }
}

impl fmt::Display for CoerceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoerceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        CoerceType::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown coercion type '{}'", s))
    }
}

/// One step of a location inside a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    /// Object member name
    Key(String),
    /// Array position
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A node selected by a query, with the path from the document root
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedNode<'a> {
    /// The selected value, borrowed from the document
    pub value: &'a Value,
    /// Segments leading from the root to the value
    pub location: Vec<Segment>,
}

impl<'a> MatchedNode<'a> {
    /// The document root itself
    pub fn root(value: &'a Value) -> Self {
        Self {
            value,
            location: Vec::new(),
        }
    }

    /// A member of this node
    pub fn member(&self, key: &str, value: &'a Value) -> Self {
        let mut location = Vec::with_capacity(self.location.len() + 1);
        location.extend_from_slice(&self.location);
        location.push(Segment::Key(key.to_string()));
        Self { value, location }
    }

    /// An element of this node
    pub fn element(&self, index: usize, value: &'a Value) -> Self {
        let mut location = Vec::with_capacity(self.location.len() + 1);
        location.extend_from_slice(&self.location);
        location.push(Segment::Index(index));
        Self { value, location }
    }

    /// Normalized path form of the location, e.g. `$['users'][0]`
    pub fn normalized_path(&self) -> String {
        let mut path = String::from("$");
        for segment in &self.location {
            match segment {
                Segment::Key(key) => {
                    path.push_str("['");
                    path.push_str(&key.replace('\\', "\\\\").replace('\'', "\\'"));
                    path.push_str("']");
                }
                Segment::Index(index) => {
                    path.push('[');
                    path.push_str(&index.to_string());
                    path.push(']');
                }
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_deserialize_camel_case() {
        let rule: Rule = serde_json::from_value(json!({
            "source": "$.a.*",
            "target": "x",
            "retainPathDepth": 1,
            "coerce": "bigint"
        }))
        .unwrap();

        assert_eq!(rule.source, "$.a.*");
        assert_eq!(rule.retain_path_depth, Some(1));
        assert_eq!(rule.coerce, Some(CoerceType::BigInt));
    }

    #[test]
    fn test_rule_accepts_legacy_depth_name() {
        let rule: Rule = serde_json::from_value(json!({
            "source": "$.a",
            "target": "x",
            "maintainNestingDepth": 2
        }))
        .unwrap();
        assert_eq!(rule.retain_path_depth, Some(2));
    }

    #[test]
    fn test_rule_serialize_skips_unset() {
        let value = serde_json::to_value(Rule::new("$.foo", "goo")).unwrap();
        assert_eq!(value, json!({"source": "$.foo", "target": "goo"}));
    }

    #[test]
    fn test_rule_group_defaults_rules() {
        let group: RuleGroup =
            serde_json::from_value(json!({"id": "g", "label": "Group"})).unwrap();
        assert!(group.rules.is_empty());
    }

    #[test]
    fn test_coerce_type_names() {
        for tag in CoerceType::ALL {
            let serialized = serde_json::to_value(tag).unwrap();
            assert_eq!(serialized, json!(tag.as_str()));
            assert_eq!(tag.as_str().parse::<CoerceType>().unwrap(), tag);
        }
        assert!("decimal".parse::<CoerceType>().is_err());
    }

    #[test]
    fn test_normalized_path() {
        let doc = json!({"a": [{"b'c": 1}]});
        let root = MatchedNode::root(&doc);
        let a = root.member("a", &doc["a"]);
        let first = a.element(0, &doc["a"][0]);
        let leaf = first.member("b'c", &doc["a"][0]["b'c"]);

        assert_eq!(leaf.normalized_path(), "$['a'][0]['b\\'c']");
        assert_eq!(
            leaf.location,
            vec![
                Segment::Key("a".into()),
                Segment::Index(0),
                Segment::Key("b'c".into())
            ]
        );
    }

    #[test]
    fn test_segment_display() {
        assert_eq!(Segment::Key("users".into()).to_string(), "users");
        assert_eq!(Segment::Index(3).to_string(), "3");
    }
}
