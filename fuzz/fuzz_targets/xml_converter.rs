#![no_main]
use libfuzzer_sys::fuzz_target;
use xmljson::xml_to_json;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let output = xml_to_json(s);
        assert!(output.starts_with('{'));
    }
});
