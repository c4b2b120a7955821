//! JSONPath query evaluation with node locations
//!
//! This module parses query expressions and evaluates them against a
//! document, returning every selected node together with the sequence of
//! member names and array positions that leads to it.
//!
//! Copyright (c) 2025 Docmorph Team
//! Licensed under the Apache-2.0 license

pub mod ast;
pub mod error;
pub mod executor;
pub mod parser;
pub mod selector;

pub use ast::{ArrayIndex, Expression, Selector};
pub use error::QueryError;
pub use executor::{ExecutionContext, Executor};
pub use parser::Parser;

use crate::types::MatchedNode;
use crate::Result;
use serde_json::Value;

/// A parsed query expression ready for repeated evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPath {
    source: String,
    expression: Expression,
}

impl QueryPath {
    /// Parse a query expression
    pub fn parse(path: &str) -> Result<Self> {
        let expression = Parser::new(path)?.parse()?;
        Ok(Self {
            source: path.to_string(),
            expression,
        })
    }

    /// Evaluate against the given document
    pub fn evaluate<'a>(&self, data: &'a Value) -> Vec<MatchedNode<'a>> {
        Executor::new().execute(&self.expression, data)
    }

    /// The expression text as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Get the parsed expression for inspection
    pub fn expression(&self) -> &Expression {
        &self.expression
    }
}

impl std::fmt::Display for QueryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse and evaluate a query in one step
pub fn evaluate<'a>(path: &str, data: &'a Value) -> Result<Vec<MatchedNode<'a>>> {
    Ok(QueryPath::parse(path)?.evaluate(data))
}

/// Check a query expression without evaluating it
pub fn validate(path: &str) -> std::result::Result<Expression, QueryError> {
    Parser::new(path)?.parse()
}
