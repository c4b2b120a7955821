//! Error types for query parsing and evaluation
//!
//! Copyright (c) 2025 Docmorph Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Query error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Parse errors while reading the expression
    #[error("Parse error at position {position}: {message}")]
    Parse {
        message: String,
        position: usize,
        input: String,
    },

    /// Syntax errors with detailed position information
    #[error("Syntax error at position {position}: {message}")]
    Syntax {
        message: String,
        position: usize,
        input: String,
        expected: Vec<String>,
        found: String,
    },

    /// Recognized syntax that this evaluator does not implement
    #[error("Unsupported feature at position {position}: {feature}")]
    Unsupported {
        feature: String,
        position: usize,
        input: String,
    },
}

impl QueryError {
    /// Create a parse error with position
    pub fn parse(message: impl Into<String>, position: usize, input: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            position,
            input: input.into(),
        }
    }

    /// Create a syntax error with detailed information
    pub fn syntax(
        message: impl Into<String>,
        position: usize,
        input: impl Into<String>,
        expected: Vec<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
            input: input.into(),
            expected,
            found: found.into(),
        }
    }

    /// Create an unsupported feature error
    pub fn unsupported(feature: impl Into<String>, position: usize, input: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
            position,
            input: input.into(),
        }
    }

    /// The expression this error refers to
    pub fn expression(&self) -> &str {
        match self {
            Self::Parse { input, .. } | Self::Syntax { input, .. } | Self::Unsupported { input, .. } => input,
        }
    }

    /// Reason string in the form `<message> ('<expression>':<position>)`
    pub fn reason(&self) -> String {
        match self {
            Self::Parse { message, position, input } | Self::Syntax { message, position, input, .. } => {
                format!("{} ('{}':{})", message, input, position)
            }
            Self::Unsupported { feature, position, input } => {
                format!("{} are not supported ('{}':{})", feature, input, position)
            }
        }
    }

    /// Get the error message with a caret pointing at the failure
    pub fn detailed_message(&self) -> String {
        match self {
            Self::Parse { position, input, .. } | Self::Unsupported { position, input, .. } => {
                let mut result = self.to_string();
                push_caret(&mut result, input, *position);
                result
            }
            Self::Syntax { position, input, expected, found, .. } => {
                let mut result = self.to_string();
                if !expected.is_empty() {
                    result.push_str(&format!("\nExpected one of: {}", expected.join(", ")));
                }
                result.push_str(&format!("\nFound: {}", found));
                push_caret(&mut result, input, *position);
                result
            }
        }
    }
}

fn push_caret(out: &mut String, input: &str, position: usize) {
    if input.is_empty() {
        return;
    }
    out.push_str(&format!("\nInput: {}", input));
    if let Some(prefix) = input.get(..position) {
        let column = prefix.chars().count();
        out.push_str(&format!("\n       {}^", " ".repeat(column)));
    }
}

/// Convert query errors to core errors
impl From<QueryError> for crate::Error {
    fn from(err: QueryError) -> Self {
        crate::Error::InvalidQuery {
            expression: err.expression().to_string(),
            reason: err.reason(),
        }
    }
}
