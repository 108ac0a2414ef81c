//! XML tree to JSON value conversion
//!
//! Elements become objects keyed by child tag name. Text runs are keyed
//! `#text` and coerced to numbers when they read as one. Repeated keys are
//! aggregated into arrays in document order. Attributes are not represented.

use tracing::{debug, instrument, warn};

use crate::error::{Error, ErrorClass, ErrorKind, Result, Span};
use crate::format::{self, FormatConfig};
use crate::input::Input;
use crate::number;
use crate::value::{Array, Object, Value};
use crate::xml::model::{Content, Document, Element};
use crate::xml::parser::{Config as XmlConfig, Parser as XmlParser};

/// Key used for text content inside an element object
pub const TEXT_KEY: &str = "#text";

/// Options for a whole XML to JSON conversion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Limits applied while parsing
    pub xml: XmlConfig,
    /// Maximum element depth walked by the converter (0 means unlimited)
    pub max_depth: u16,
    /// Output layout
    pub format: FormatConfig,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            xml: XmlConfig::default(),
            max_depth: 128,
            format: FormatConfig::default(),
        }
    }
}

/// Convert a parsed document.
///
/// The root value is wrapped under the root tag name, so `<a>42</a>` becomes
/// `{"a": 42}`. A document without a root element converts to `null`.
pub fn document_to_value(doc: &Document, max_depth: u16) -> Result<Value> {
    let Some(root) = doc.root() else {
        return Ok(Value::Null);
    };

    let mut wrapper = Object::new();
    wrapper.insert(root.name.clone(), element_to_value(root, max_depth)?);
    Ok(Value::Object(wrapper))
}

/// Convert a single element to its value, without a wrapping key.
pub fn element_to_value(element: &Element, max_depth: u16) -> Result<Value> {
    Walker { max_depth }.element(element, 1)
}

struct Walker {
    max_depth: u16,
}

impl Walker {
    fn element(&self, element: &Element, depth: u16) -> Result<Value> {
        if self.max_depth != 0 && depth > self.max_depth {
            return Err(Error::with_message(
                ErrorKind::ConversionDepthExceeded {
                    max: self.max_depth,
                },
                Span::empty(),
                format!(
                    "element <{}> is nested deeper than {} levels",
                    element.name, self.max_depth
                ),
            ));
        }

        let obj = element
            .children
            .iter()
            .filter(|child| !child.is_comment())
            .try_fold(Object::new(), |obj, child| {
                Ok::<_, Error>(match self.node(child, depth)? {
                    Some(value) => aggregate(obj, child.node_name(), value),
                    None => obj,
                })
            })?;

        if obj.len() == 1 && obj.get(TEXT_KEY).is_some_and(Value::is_scalar) {
            let mut obj = obj;
            return Ok(obj.remove(TEXT_KEY).unwrap_or_default());
        }

        if obj.is_empty() && element.children.is_empty() {
            return Ok(Value::Null);
        }

        Ok(Value::Object(obj))
    }

    /// `None` means the node contributes nothing to its parent.
    fn node(&self, node: &Content, depth: u16) -> Result<Option<Value>> {
        match node {
            Content::Element(element) => self.element(element, depth.saturating_add(1)).map(Some),
            Content::Text(text) => Ok(text_value(text)),
            Content::CData(_) | Content::Comment(_) | Content::ProcessingInstruction { .. } => {
                Ok(None)
            }
        }
    }
}

/// Scalar for a text run, or `None` if it is whitespace only.
pub fn text_value(text: &str) -> Option<Value> {
    let trimmed = text.trim_matches(number::is_js_whitespace);
    if trimmed.is_empty() {
        return None;
    }

    Some(match number::parse_finite(trimmed) {
        Some(n) => Value::Number(n),
        None => Value::String(trimmed.to_string()),
    })
}

/// Add `value` under `key`, turning repeated keys into arrays.
pub fn aggregate(mut obj: Object, key: &str, value: Value) -> Object {
    match obj.get_mut(key) {
        None => {
            obj.insert(key, value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = std::mem::take(existing);
            *existing = Value::Array(Array::from(vec![first, value]));
        }
    }
    obj
}

/// Parse XML text into a document, rejecting blank input first.
pub fn parse_document(input: &Input<'_>, config: XmlConfig) -> Result<Document> {
    if input.is_blank() {
        return Err(Error::empty_input());
    }
    XmlParser::with_config(input.as_bytes(), config).parse()
}

/// Parse and convert XML text to a value
#[instrument(level = "debug", skip_all, fields(len = input.len(), file = input.filename()))]
pub fn input_to_value(input: &Input<'_>, options: &ConvertOptions) -> Result<Value> {
    let doc = parse_document(input, options.xml)?;
    debug!(nodes = doc.children.len(), "parsed xml document");
    document_to_value(&doc, options.max_depth)
}

/// Convert XML text to pretty-printed JSON
pub fn convert(input: &str) -> Result<String> {
    convert_with_options(input, &ConvertOptions::default())
}

/// Convert XML text to JSON with options
pub fn convert_with_options(input: &str, options: &ConvertOptions) -> Result<String> {
    let value = input_to_value(&Input::from_str(input), options)?;
    Ok(format::to_string_with_config(&value, options.format))
}

/// Convert XML text to JSON, rendering any failure as an error payload.
///
/// Never fails: the output is always a JSON document, either the converted
/// value or an object with an `error` key.
pub fn xml_to_json(input: &str) -> String {
    xml_to_json_with_options(input, &ConvertOptions::default())
}

/// [`xml_to_json`] with options
pub fn xml_to_json_with_options(input: &str, options: &ConvertOptions) -> String {
    render(&Input::from_str(input), options)
}

/// Convert an [`Input`], rendering any failure as an error payload
pub fn render(input: &Input<'_>, options: &ConvertOptions) -> String {
    let value = match input_to_value(input, options) {
        Ok(value) => value,
        Err(err) => {
            warn!(class = ?err.class(), "{err}");
            error_payload(&err)
        }
    };
    format::to_string_with_config(&value, options.format)
}

/// Structured payload describing a failed conversion
pub fn error_payload(err: &Error) -> Value {
    let mut payload = Object::new();
    match err.class() {
        ErrorClass::InputEmpty => {
            payload.insert("error", "XML input cannot be empty.");
        }
        ErrorClass::Parse => {
            payload.insert("error", "Invalid XML format");
            payload.insert("details", err.to_string());
        }
        ErrorClass::Conversion => {
            payload.insert("error", "Error converting XML to JSON");
            payload.insert("message", err.message());
        }
    }
    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(input: &str) -> Result<Value> {
        input_to_value(&Input::from_str(input), &ConvertOptions::default())
    }

    fn obj(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_text_value_coercion() {
        assert_eq!(text_value("  42 "), Some(Value::Number(42.0)));
        assert_eq!(text_value("foo"), Some(Value::from("foo")));
        assert_eq!(text_value(" \n\t "), None);
        assert_eq!(text_value("\u{feff}7"), Some(Value::Number(7.0)));
        assert_eq!(text_value("\u{a0}x\u{3000}"), Some(Value::from("x")));
        assert_eq!(text_value("\u{85}x"), Some(Value::from("\u{85}x")));
    }

    #[test]
    fn test_aggregate_builds_arrays() {
        let obj = Object::new();
        let obj = aggregate(obj, "b", Value::Null);
        let obj = aggregate(obj, "b", Value::from(1i32));
        let obj = aggregate(obj, "b", Value::from(2i32));
        assert_eq!(
            obj.get("b"),
            Some(&Value::from(vec![
                Value::Null,
                Value::from(1i32),
                Value::from(2i32)
            ]))
        );
    }

    #[test]
    fn test_text_only_element_collapses() -> Result<()> {
        assert_eq!(value_of("<a>42</a>")?, obj(vec![("a", Value::from(42i32))]));
        assert_eq!(value_of("<a>foo</a>")?, obj(vec![("a", Value::from("foo"))]));
        Ok(())
    }

    #[test]
    fn test_empty_elements() -> Result<()> {
        assert_eq!(value_of("<a/>")?, obj(vec![("a", Value::Null)]));
        assert_eq!(value_of("<a></a>")?, obj(vec![("a", Value::Null)]));
        // has a child node, just no keys
        assert_eq!(value_of("<a> </a>")?, obj(vec![("a", obj(vec![]))]));
        assert_eq!(value_of("<a><!--x--></a>")?, obj(vec![("a", obj(vec![]))]));
        Ok(())
    }

    #[test]
    fn test_mixed_content_keeps_text_key() -> Result<()> {
        assert_eq!(
            value_of("<a>hi<b>1</b></a>")?,
            obj(vec![(
                "a",
                obj(vec![("#text", Value::from("hi")), ("b", Value::from(1i32))])
            )])
        );
        Ok(())
    }

    #[test]
    fn test_text_split_by_comment_aggregates() -> Result<()> {
        assert_eq!(
            value_of("<a>1<!--c-->x</a>")?,
            obj(vec![(
                "a",
                obj(vec![(
                    "#text",
                    Value::from(vec![Value::from(1i32), Value::from("x")])
                )])
            )])
        );
        Ok(())
    }

    #[test]
    fn test_unsupported_nodes_are_omitted() -> Result<()> {
        assert_eq!(
            value_of("<a><![CDATA[raw]]><?pi data?><b/></a>")?,
            obj(vec![("a", obj(vec![("b", Value::Null)]))])
        );
        Ok(())
    }

    #[test]
    fn test_attributes_are_ignored() -> Result<()> {
        assert_eq!(
            value_of("<a id=\"1\"><b kind=\"x\">2</b></a>")?,
            obj(vec![("a", obj(vec![("b", Value::from(2i32))]))])
        );
        Ok(())
    }

    #[test]
    fn test_document_without_root_is_null() -> Result<()> {
        let doc = Document {
            children: vec![Content::Comment("only".into())],
        };
        assert_eq!(document_to_value(&doc, 0)?, Value::Null);
        Ok(())
    }

    #[test]
    fn test_conversion_depth_limit() {
        let tree = Element::new("a").with_child(Element::new("b").with_child(Element::new("c")));
        let err = element_to_value(&tree, 2).err();
        assert_eq!(err.map(|e| e.class()), Some(ErrorClass::Conversion));
        assert!(element_to_value(&tree, 3).is_ok());
    }

    #[test]
    fn test_error_payload_shapes() {
        assert_eq!(
            error_payload(&Error::empty_input()).to_string(),
            r#"{"error":"XML input cannot be empty."}"#
        );

        let parse_err = value_of("<a><b></a>").err();
        let payload = parse_err.as_ref().map(error_payload);
        let field = |key: &str| {
            payload
                .as_ref()
                .and_then(Value::as_object)
                .and_then(|o| o.get(key))
                .and_then(Value::as_string)
                .map(str::to_string)
        };
        assert_eq!(field("error").as_deref(), Some("Invalid XML format"));
        assert_eq!(
            field("details").as_deref(),
            Some("error at line 1, column 7: mismatched closing tag: expected </b>, found </a>")
        );
    }

    #[test]
    fn test_xml_to_json_reports_empty_input() {
        assert_eq!(
            xml_to_json("   "),
            "{\n  \"error\": \"XML input cannot be empty.\"\n}"
        );
    }

    #[test]
    fn test_conversion_error_payload() {
        let options = ConvertOptions {
            xml: XmlConfig::unlimited(),
            max_depth: 1,
            format: FormatConfig::compact(),
        };
        assert_eq!(
            xml_to_json_with_options("<a><b/></a>", &options),
            r#"{"error":"Error converting XML to JSON","message":"element <b> is nested deeper than 1 levels"}"#
        );
    }
}
