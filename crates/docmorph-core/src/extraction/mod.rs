//! Rule-driven extraction engine
//!
//! For each rule, in order, the source query is evaluated against the input
//! document. Every match is given an output path (the rule target plus the
//! retained tail of the match location), coerced, encoded and written into
//! a fresh output document.
//!
//! Copyright (c) 2025 Docmorph Team
//! Licensed under the Apache-2.0 license

pub mod assign;
pub mod coerce;
pub mod path;


pub use assign::assign;
pub use coerce::coerce;
pub use path::{build_target_path, parse_output_path, PathSegment};

use crate::connector::Extractor;
use crate::query::QueryPath;
use crate::types::{Rule, StructuredData};
use crate::{Error, Result};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Apply `rules` to `document` and return the extracted document
///
/// Fails with [`Error::InvalidRule`] naming the offending rule's source when
/// a query does not parse, a match cannot be coerced or its output path
/// cannot be written. No partial output is returned on failure.
pub fn extract(document: &Value, rules: &[Rule]) -> Result<Value> {
    let mut output = Value::Object(Map::new());

    for rule in rules {
        apply_rule(document, rule, &mut output)
            .map_err(|cause| Error::invalid_rule(rule.source.as_str(), cause))?;
    }

    Ok(output)
}

fn apply_rule(document: &Value, rule: &Rule, output: &mut Value) -> Result<()> {
    let query = QueryPath::parse(&rule.source)?;
    let matches = query.evaluate(document);
    debug!(
        source = %rule.source,
        target = %rule.target,
        matches = matches.len(),
        "Applying rule"
    );

    for node in matches {
        let target = build_target_path(rule, &node.location);
        let value = coerce(node.value, rule.coerce)?.into_value();
        trace!(from = %node.normalized_path(), to = %target, "Assigning match");
        assign(output, &target, value)?;
    }

    Ok(())
}

/// Extractor backed by the JSONPath rule engine
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPathExtractor;

impl JsonPathExtractor {
    /// Name this extractor registers under
    pub const NAME: &'static str = "jsonpath";

    pub fn new() -> Self {
        Self
    }
}

impl Extractor for JsonPathExtractor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn extract(&self, data: &StructuredData, rules: &[Rule]) -> Result<StructuredData> {
        let object = extract(&data.object, rules)?;
        Ok(StructuredData::new(data.source_mime_type.clone(), object))
    }
}
