//! XML converter
//!
//! Copyright (c) 2025 Docmorph Team
//! Licensed under the Apache-2.0 license
//!
//! Produces the conventional attribute/text/children shape:
//!
//! - the document is `{ <root name>: <element> }`
//! - an element with neither attributes nor children is its text (`""` when empty)
//! - otherwise it is an object with attributes under `"$"`, non-blank text
//!   under `"_"` and one member per child name
//! - repeated child names collect into an array in document order

use crate::mime::{APPLICATION_XML, TEXT_XML};
use crate::strip_bom;
use docmorph_core::{Converter, Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};
use tracing::debug;

const ATTRIBUTES_KEY: &str = "$";
const TEXT_KEY: &str = "_";

/// Parses XML input into a document
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlConverter;

impl XmlConverter {
    pub const MIME_TYPES: &'static [&'static str] = &[APPLICATION_XML, TEXT_XML];

    pub fn new() -> Self {
        Self
    }

    /// Parse an XML string
    pub fn parse(text: &str) -> Result<Value> {
        let mut reader = Reader::from_str(text);
        let mut tree = TreeBuilder::default();

        loop {
            let event = reader.read_event().map_err(|e| {
                invalid_xml(format!("{} at position {}", e, reader.buffer_position()))
            })?;

            match event {
                Event::Start(start) => tree.open(element_name(&start), read_attributes(&start)?)?,
                Event::Empty(start) => {
                    tree.open(element_name(&start), read_attributes(&start)?)?;
                    tree.close()?;
                }
                Event::End(_) => tree.close()?,
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| invalid_xml(e.to_string()))?;
                    tree.text(&text)?;
                }
                Event::CData(data) => {
                    let raw = data.into_inner();
                    tree.text(&String::from_utf8_lossy(&raw))?;
                }
                Event::Eof => break,
                // declarations, comments, processing instructions, doctype
                _ => {}
            }
        }

        tree.finish()
    }
}

impl Converter for XmlConverter {
    fn name(&self) -> &str {
        "xml"
    }

    fn mime_types(&self) -> &[&'static str] {
        Self::MIME_TYPES
    }

    fn convert(&self, data: &[u8]) -> Result<Value> {
        let text = std::str::from_utf8(strip_bom(data)).map_err(|e| invalid_xml(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        let value = Self::parse(text)?;
        debug!(bytes = data.len(), "Converted XML input");
        Ok(value)
    }
}

fn invalid_xml(failure: impl Into<String>) -> Error {
    Error::invalid_format(APPLICATION_XML, failure)
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn read_attributes(start: &BytesStart<'_>) -> Result<Map<String, Value>> {
    let mut attributes = Map::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| invalid_xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| invalid_xml(e.to_string()))?;
        attributes.insert(key, Value::String(value.into_owned()));
    }
    Ok(attributes)
}

/// An element whose end tag has not been seen yet
#[derive(Debug)]
struct ElementFrame {
    name: String,
    attributes: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl ElementFrame {
    fn add_child(&mut self, name: String, value: Value) {
        match self.children.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }

    fn into_value(self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            return Value::String(self.text);
        }

        let mut object = Map::new();
        if !self.attributes.is_empty() {
            object.insert(ATTRIBUTES_KEY.to_string(), Value::Object(self.attributes));
        }
        if !self.text.trim().is_empty() {
            object.insert(TEXT_KEY.to_string(), Value::String(self.text));
        }
        object.extend(self.children);
        Value::Object(object)
    }
}

#[derive(Debug, Default)]
struct TreeBuilder {
    stack: Vec<ElementFrame>,
    root: Option<Value>,
}

impl TreeBuilder {
    fn open(&mut self, name: String, attributes: Map<String, Value>) -> Result<()> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(invalid_xml(format!("Multiple root elements, found <{}>", name)));
        }
        self.stack.push(ElementFrame {
            name,
            attributes,
            children: Map::new(),
            text: String::new(),
        });
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| invalid_xml("Unexpected closing tag"))?;
        let name = frame.name.clone();
        let value = frame.into_value();

        match self.stack.last_mut() {
            Some(parent) => parent.add_child(name, value),
            None => {
                let mut document = Map::new();
                document.insert(name, value);
                self.root = Some(Value::Object(document));
            }
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(frame) => {
                frame.text.push_str(text);
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None if self.root.is_none() => Err(invalid_xml("Non-whitespace before first tag")),
            None => Err(invalid_xml("Text data outside of root node")),
        }
    }

    fn finish(self) -> Result<Value> {
        if let Some(frame) = self.stack.first() {
            return Err(invalid_xml(format!("Unclosed root tag <{}>", frame.name)));
        }
        Ok(self.root.unwrap_or_else(|| Value::Object(Map::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(xml: &str) -> Value {
        XmlConverter.convert(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_text_only_elements() {
        assert_eq!(
            parse("<person><name>Ada</name><born>1815</born></person>"),
            json!({"person": {"name": "Ada", "born": "1815"}})
        );
    }

    #[test]
    fn test_empty_elements() {
        assert_eq!(parse("<a><b/><c></c></a>"), json!({"a": {"b": "", "c": ""}}));
        assert_eq!(parse("<a/>"), json!({"a": ""}));
    }

    #[test]
    fn test_attributes_and_text() {
        assert_eq!(
            parse(r#"<price currency="EUR">12.50</price>"#),
            json!({"price": {"$": {"currency": "EUR"}, "_": "12.50"}})
        );
        assert_eq!(
            parse(r#"<item id="1"/>"#),
            json!({"item": {"$": {"id": "1"}}})
        );
    }

    #[test]
    fn test_repeated_children_become_arrays() {
        assert_eq!(
            parse("<list><v>1</v><w>x</w><v>2</v><v>3</v></list>"),
            json!({"list": {"v": ["1", "2", "3"], "w": "x"}})
        );
    }

    #[test]
    fn test_text_whitespace_is_preserved() {
        assert_eq!(parse("<a> spaced </a>"), json!({"a": " spaced "}));
        assert_eq!(
            parse("<a>\n  <b>1</b>\n</a>"),
            json!({"a": {"b": "1"}})
        );
    }

    #[test]
    fn test_entities_and_cdata() {
        assert_eq!(
            parse("<a>fish &amp; chips</a>"),
            json!({"a": "fish & chips"})
        );
        assert_eq!(
            parse("<a><![CDATA[<raw>]]></a>"),
            json!({"a": "<raw>"})
        );
        assert_eq!(
            parse(r#"<a title="&lt;b&gt;"/>"#),
            json!({"a": {"$": {"title": "<b>"}}})
        );
    }

    #[test]
    fn test_declaration_and_comments_are_ignored() {
        assert_eq!(
            parse("<?xml version=\"1.0\"?>\n<!-- note -->\n<a>1</a>\n"),
            json!({"a": "1"})
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), json!({}));
        assert_eq!(parse("  \n"), json!({}));
    }

    #[test]
    fn test_malformed_input() {
        for xml in [
            "<a><b></a>",
            "<a>",
            "<a></a><b></b>",
            "text<a></a>",
            "<a></a>trailing",
            "</a>",
        ] {
            match XmlConverter.convert(xml.as_bytes()) {
                Err(Error::InvalidFormat { mime_type, .. }) => {
                    assert_eq!(mime_type, APPLICATION_XML, "{xml}")
                }
                other => panic!("{xml}: unexpected result {other:?}"),
            }
        }
    }
}
