//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from the extraction engine
    #[error("{0}")]
    Core(#[from] docmorph_core::Error),

    /// Error from the processing service
    #[error("{0}")]
    Service(#[from] docmorph_service::ServiceError),

    /// Query expression that does not parse
    #[error("Invalid query\n{}", .0.detailed_message())]
    Query(#[from] docmorph_core::QueryError),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {}", path.display(), expected)]
    InvalidFormat { path: PathBuf, expected: String },

    /// Rule group file not found in the rules directory
    #[error("Rule group '{}' not found in {}", id, dir.display())]
    RuleGroupNotFound { id: String, dir: PathBuf },

    /// Rule file with rules that fail validation
    #[error("{} invalid rule(s) in {}", count, path.display())]
    InvalidRules { path: PathBuf, count: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::Service(_) => 3,
            Self::Query(_) => 4,
            Self::FileNotFound { .. } => 5,
            Self::InvalidFormat { .. } => 6,
            Self::RuleGroupNotFound { .. } => 7,
            Self::InvalidRules { .. } => 8,
            Self::Config(_) => 9,
            Self::InvalidArgs(_) => 10,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Toml(_) => 14,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmorph_core::query;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            Error::Io(io::Error::new(io::ErrorKind::Other, "x")),
            Error::Core(docmorph_core::Error::invalid_envelope("x")),
            Error::Service(docmorph_service::ServiceError::MimeTypeNotFound),
            Error::FileNotFound { path: PathBuf::from("a") },
            Error::config("x"),
            Error::invalid_args("x"),
            Error::other("x"),
        ];
        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_query_error_shows_caret() {
        let err: Error = query::validate("$.a[").unwrap_err().into();
        let message = err.to_string();
        assert!(message.starts_with("Invalid query\n"));
        assert!(message.contains('^'));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_format_error_plain() {
        let err = Error::invalid_args("either --rules or --group is required");
        assert_eq!(
            format_error(&err, false),
            "Error: Invalid arguments: either --rules or --group is required"
        );
        assert!(err.should_show_help());
    }
}
