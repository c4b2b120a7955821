//! JSON converter

use crate::mime::{APPLICATION_JSON, APPLICATION_LD_JSON};
use crate::strip_bom;
use docmorph_core::{Converter, Error, Result};
use serde_json::{Map, Value};
use tracing::debug;

/// Parses JSON and JSON-LD input
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConverter;

impl JsonConverter {
    pub const MIME_TYPES: &'static [&'static str] = &[APPLICATION_JSON, APPLICATION_LD_JSON];

    pub fn new() -> Self {
        Self
    }
}

impl Converter for JsonConverter {
    fn name(&self) -> &str {
        "json"
    }

    fn mime_types(&self) -> &[&'static str] {
        Self::MIME_TYPES
    }

    fn convert(&self, data: &[u8]) -> Result<Value> {
        let body = strip_bom(data);
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Object(Map::new()));
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| Error::invalid_format(APPLICATION_JSON, e.to_string()))?;
        debug!(bytes = data.len(), "Converted JSON input");
        Ok(value)
    }
}
