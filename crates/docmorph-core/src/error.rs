//! Error types for the Docmorph core library
//!
//! This module defines the error handling system shared by the query
//! evaluator, the value coercer and the rule engine, using thiserror for
//! ergonomic error definitions.

use crate::types::CoerceType;
use serde_json::Value;
use thiserror::Error;

/// Main error type for Docmorph core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A query expression could not be parsed or evaluated
    #[error("Invalid query '{expression}': {reason}")]
    InvalidQuery { expression: String, reason: String },

    /// A rule failed during extraction
    #[error("Invalid rule '{rule}': {reason}")]
    InvalidRule {
        rule: String,
        reason: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// A value could not be converted to the requested type
    #[error("Cannot coerce {value} to {type_tag}: {reason}")]
    Coercion {
        type_tag: CoerceType,
        value: Value,
        reason: String,
    },

    /// A tagged extended-value envelope was malformed
    #[error("Invalid extended value: {message}")]
    InvalidEnvelope { message: String },

    /// Raw input could not be parsed as the claimed format
    #[error("Invalid {mime_type} data: {failure}")]
    InvalidFormat { mime_type: String, failure: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// An output path cannot be written
    #[error("Invalid target '{path}': {reason}")]
    InvalidTarget { path: String, reason: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid query error
    pub fn invalid_query(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a failure raised while applying the rule with the given source query
    pub fn invalid_rule(rule: impl Into<String>, cause: Error) -> Self {
        Self::InvalidRule {
            rule: rule.into(),
            reason: cause.reason(),
            source: Some(Box::new(cause)),
        }
    }

    /// Create a coercion error
    pub fn coercion(type_tag: CoerceType, value: &Value, reason: impl Into<String>) -> Self {
        Self::Coercion {
            type_tag,
            value: value.clone(),
            reason: reason.into(),
        }
    }

    /// Create an envelope decoding error
    pub fn invalid_envelope(message: impl Into<String>) -> Self {
        Self::InvalidEnvelope {
            message: message.into(),
        }
    }

    /// Create an invalid output path error
    pub fn invalid_target(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid input format error
    pub fn invalid_format(mime_type: impl Into<String>, failure: impl Into<String>) -> Self {
        Self::InvalidFormat {
            mime_type: mime_type.into(),
            failure: failure.into(),
        }
    }

    /// The human-readable reason without the variant prefix
    ///
    /// Query and rule failures carry their reason verbatim so callers can
    /// surface the parser's positional message unchanged.
    pub fn reason(&self) -> String {
        match self {
            Self::InvalidQuery { reason, .. } | Self::InvalidRule { reason, .. } => reason.clone(),
            Self::Coercion { reason, .. } | Self::InvalidTarget { reason, .. } => reason.clone(),
            Self::InvalidEnvelope { message } => message.clone(),
            Self::InvalidFormat { failure, .. } => failure.clone(),
            Self::Json { message, .. } => message.clone(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}
