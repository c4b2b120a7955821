//! Capability interfaces for pluggable converters and extractors
//!
//! Implementations are handed to the processing service at construction
//! time; nothing here keeps a global registry.

use crate::types::{Rule, StructuredData};
use crate::Result;
use serde_json::Value;

/// Turns raw bytes of one or more MIME types into a document
pub trait Converter: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// MIME types this converter accepts
    fn mime_types(&self) -> &[&'static str];

    /// Convert raw bytes into a document
    fn convert(&self, data: &[u8]) -> Result<Value>;

    /// Whether this converter handles the given MIME type
    fn supports(&self, mime_type: &str) -> bool {
        self.mime_types()
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mime_type))
    }
}

/// Applies rules to a converted document
pub trait Extractor: Send + Sync {
    /// Name the extractor is registered under
    fn name(&self) -> &str;

    /// Extract a new document from `data` according to `rules`
    fn extract(&self, data: &StructuredData, rules: &[Rule]) -> Result<StructuredData>;
}
