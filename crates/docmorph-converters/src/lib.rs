//! Docmorph Converters - raw bytes to documents
//!
//! Each converter implements [`docmorph_core::Converter`] for a family of
//! MIME types. [`detect_mime_type`] sniffs the type of raw input when the
//! caller does not supply one.

pub mod json;
pub mod mime;
pub mod xml;

pub use json::JsonConverter;
pub use mime::detect_mime_type;
pub use xml::XmlConverter;

use docmorph_core::Converter;

/// The converters shipped with Docmorph, JSON first
pub fn default_converters() -> Vec<Box<dyn Converter>> {
    vec![Box::new(JsonConverter::new()), Box::new(XmlConverter::new())]
}

/// Drop a leading UTF-8 byte order mark
pub(crate) fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&[0xEF, 0xBB, 0xBF][..]).unwrap_or(data)
}
