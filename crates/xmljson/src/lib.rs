//! xmljson - XML to JSON conversion
//!
//! Elements become objects keyed by tag name, text-only elements collapse to
//! numbers or strings, and repeated siblings are gathered into arrays.
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), xmljson::Error> {
//! let json = xmljson::convert("<a><b>1</b><b>2</b></a>")?;
//! assert_eq!(json, "{\n  \"a\": {\n    \"b\": [\n      1,\n      2\n    ]\n  }\n}");
//! # Ok(())
//! # }
//! ```
//!
//! [`xml_to_json`] never fails; problems are reported inside the JSON text:
//!
//! ```
//! let json = xmljson::xml_to_json("");
//! assert_eq!(json, "{\n  \"error\": \"XML input cannot be empty.\"\n}");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorClass, ErrorKind, Pos, Result, Span};

pub mod cursor;
pub use cursor::Cursor;

pub mod input;
pub use input::Input;

pub mod value;
pub use value::{Array, Object, Value};

pub mod number;

pub mod format;
pub use format::{to_string_pretty, to_string_with_config, FormatConfig, JsonFormatter};

pub mod convert;
pub use convert::{
    convert, convert_with_options, error_payload, xml_to_json, xml_to_json_with_options,
    ConvertOptions,
};

pub mod xml;
pub use xml::{
    Config as XmlConfig, Content as XmlContent, Document as XmlDocument, Element as XmlElement,
    Parser as XmlParser,
};

/// Parse XML from string
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    from_xml_bytes(s.as_bytes())
}

/// Parse XML from bytes
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    convert::parse_document(&Input::from_bytes(bytes), XmlConfig::default())
}

/// Parse XML with custom configuration
pub fn from_xml_str_with_config(s: &str, config: XmlConfig) -> Result<XmlDocument> {
    convert::parse_document(&Input::from_str(s), config)
}

/// Parse and convert XML to a [`Value`] with default limits
pub fn xml_to_value(s: &str) -> Result<Value> {
    convert::input_to_value(&Input::from_str(s), &ConvertOptions::default())
}
