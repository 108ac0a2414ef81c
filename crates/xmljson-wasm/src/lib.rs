//! WebAssembly bindings for xmljson
//!
//! Exposes the converter to JavaScript as `xmlToJson`, which always returns
//! JSON text, and `xmlToValue`, which returns a plain JS object and throws
//! the error payload on failure.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use xmljson::{error_payload, to_string_pretty, xml_to_json, xml_to_value};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Convert XML to pretty-printed JSON, or to an error payload.
#[wasm_bindgen(js_name = xmlToJson)]
pub fn xml_to_json_text(input: &str) -> String {
    xml_to_json(input)
}

/// Convert XML to a JavaScript value.
///
/// Throws the error payload as a JSON string when conversion fails.
#[wasm_bindgen(js_name = xmlToValue)]
pub fn xml_to_js_value(input: &str) -> Result<JsValue, JsValue> {
    let value = xml_to_value(input)
        .map_err(|err| JsValue::from_str(&to_string_pretty(&error_payload(&err))))?;
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(JsValue::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_to_json_text() -> Result<(), serde_json::Error> {
        let output: serde_json::Value = serde_json::from_str(&xml_to_json_text("<a>1</a>"))?;
        assert_eq!(output, serde_json::json!({"a": 1}));
        Ok(())
    }

    #[test]
    fn test_xml_to_json_text_never_fails() -> Result<(), serde_json::Error> {
        let output: serde_json::Value = serde_json::from_str(&xml_to_json_text("<a>"))?;
        assert_eq!(output["error"], "Invalid XML format");
        Ok(())
    }
}
