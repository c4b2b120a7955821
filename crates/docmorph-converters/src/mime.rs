//! MIME type constants and content sniffing

use crate::strip_bom;
use serde_json::Value;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_LD_JSON: &str = "application/ld+json";
pub const APPLICATION_XML: &str = "application/xml";
pub const TEXT_XML: &str = "text/xml";
pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";

/// Guess the MIME type of raw input
///
/// Returns `None` only for empty input. JSON is reported when the content
/// starts like a JSON container and parses; a leading `<` means XML. Other
/// UTF-8 text is `text/plain` and anything else is an octet stream.
pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
    if data.is_empty() {
        return None;
    }

    let Ok(text) = std::str::from_utf8(strip_bom(data)) else {
        return Some(APPLICATION_OCTET_STREAM);
    };

    let trimmed = text.trim_start();
    let detected = match trimmed.as_bytes().first() {
        Some(b'{') | Some(b'[') if serde_json::from_str::<Value>(trimmed).is_ok() => APPLICATION_JSON,
        Some(b'<') => APPLICATION_XML,
        _ => TEXT_PLAIN,
    };
    Some(detected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_has_no_type() {
        assert_eq!(detect_mime_type(b""), None);
    }

    #[test]
    fn test_json_detection() {
        assert_eq!(detect_mime_type(b"{\"a\": 1}"), Some(APPLICATION_JSON));
        assert_eq!(detect_mime_type(b"\xEF\xBB\xBF  [1, 2]"), Some(APPLICATION_JSON));
        assert_eq!(detect_mime_type(b"{not json"), Some(TEXT_PLAIN));
    }

    #[test]
    fn test_xml_detection() {
        assert_eq!(detect_mime_type(b"<?xml version=\"1.0\"?><a/>"), Some(APPLICATION_XML));
        assert_eq!(detect_mime_type(b"\n<root></root>"), Some(APPLICATION_XML));
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(detect_mime_type(&[0]), Some(TEXT_PLAIN));
        assert_eq!(detect_mime_type(b"hello"), Some(TEXT_PLAIN));
        assert_eq!(detect_mime_type(&[0xFF, 0xFE, 0x00]), Some(APPLICATION_OCTET_STREAM));
    }
}
