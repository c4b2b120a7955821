//! Docmorph Core - rule-driven extraction from structured documents
//!
//! This crate maps one JSON-shaped document onto a new one according to a
//! list of declarative rules. Each rule selects nodes with a JSONPath query,
//! places them under a target path (optionally keeping the tail of their
//! source location), and coerces them to a requested type.
//!
//! # Main Components
//!
//! - **Query Evaluation**: JSONPath parsing and evaluation with node locations
//! - **Extraction**: path building, value coercion and output assignment
//! - **Extended Values**: envelopes for big integers, dates and byte arrays
//! - **Connectors**: `Converter` and `Extractor` capability traits
//!
//! # Example
//!
//! ```
//! use docmorph_core::{extract, Rule};
//! use serde_json::json;
//!
//! let input = json!({"a": {"b": {"x": 0}, "c": {"x": 2}}});
//! let rules = [Rule::new("$.a.*.x", "z").with_retain_path_depth(2)];
//!
//! let output = extract(&input, &rules).unwrap();
//! assert_eq!(output, json!({"z": {"b": {"x": 0}, "c": {"x": 2}}}));
//! ```

pub mod connector;
pub mod error;
pub mod extended;
pub mod extraction;
pub mod query;
pub mod types;

// Re-export main types for convenience
pub use connector::{Converter, Extractor};
pub use error::{Error, Result};
pub use extended::{collect_extended, find_envelopes, ExtendedValue, EXTENDED_TAG, EXTENDED_VALUE};
pub use extraction::{coerce, extract, JsonPathExtractor};
pub use query::{QueryError, QueryPath};
pub use types::{CoerceType, MatchedNode, Rule, RuleGroup, Segment, StructuredData};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
