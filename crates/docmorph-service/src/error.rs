//! Error types for the processing service

use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors raised while managing rule groups or processing input
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Rule group not found: {id}")]
    RuleGroupNotFound { id: String },

    #[error("Unable to determine the MIME type of the input")]
    MimeTypeNotFound,

    #[error("No converter registered for MIME type: {mime_type}")]
    ConverterNotFound { mime_type: String },

    #[error("Extractor not found: {name}")]
    ExtractorNotFound { name: String },

    #[error("No extractor registered")]
    NoExtractorRegistered,

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Core(#[from] docmorph_core::Error),

    #[error("Rule group store failure: {message}")]
    Store { message: String },
}

impl ServiceError {
    pub fn rule_group_not_found(id: impl Into<String>) -> Self {
        Self::RuleGroupNotFound { id: id.into() }
    }

    pub fn converter_not_found(mime_type: impl Into<String>) -> Self {
        Self::ConverterNotFound {
            mime_type: mime_type.into(),
        }
    }

    pub fn extractor_not_found(name: impl Into<String>) -> Self {
        Self::ExtractorNotFound { name: name.into() }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Whether the error means something requested does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RuleGroupNotFound { .. }
                | Self::ConverterNotFound { .. }
                | Self::ExtractorNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ServiceError::rule_group_not_found("aaa").to_string(),
            "Rule group not found: aaa"
        );
        assert_eq!(
            ServiceError::converter_not_found("text/plain").to_string(),
            "No converter registered for MIME type: text/plain"
        );
        assert_eq!(
            ServiceError::validation("id", "must not be empty").to_string(),
            "Invalid id: must not be empty"
        );
    }

    #[test]
    fn test_core_errors_pass_through() {
        let core = docmorph_core::Error::invalid_format("application/json", "EOF");
        let message = core.to_string();
        let err: ServiceError = core.into();
        assert_eq!(err.to_string(), message);
        assert!(!err.is_not_found());
    }
}
