//! Runs under `wasm-pack test --node`
#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::wasm_bindgen_test;
use xmljson_wasm::{xml_to_js_value, xml_to_json_text};

#[wasm_bindgen_test]
fn xml_to_value_returns_plain_object() -> Result<(), JsValue> {
    let value = xml_to_js_value("<a><b>1</b><b>x</b></a>")?;
    let parsed: serde_json::Value = serde_wasm_bindgen::from_value(value)?;
    assert_eq!(parsed["a"]["b"][0].as_f64(), Some(1.0));
    assert_eq!(parsed["a"]["b"][1], "x");
    Ok(())
}

#[wasm_bindgen_test]
fn xml_to_value_throws_error_payload() {
    let thrown = xml_to_js_value("").err().and_then(|err| err.as_string());
    assert_eq!(
        thrown.as_deref(),
        Some("{\n  \"error\": \"XML input cannot be empty.\"\n}")
    );

    let thrown = xml_to_js_value("<a><b></a>").err().and_then(|err| err.as_string());
    assert!(thrown.is_some_and(|payload| payload.contains("Invalid XML format")));
}

#[wasm_bindgen_test]
fn xml_to_json_matches_library() {
    assert_eq!(xml_to_json_text("<a/>"), xmljson::xml_to_json("<a/>"));
}
