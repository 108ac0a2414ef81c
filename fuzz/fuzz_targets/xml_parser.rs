#![no_main]
use libfuzzer_sys::fuzz_target;
use xmljson::{XmlConfig, XmlParser};

fuzz_target!(|data: &[u8]| {
    let _ = XmlParser::with_config(data, XmlConfig::default()).parse();
});
