#![no_main]

use flv_decoder::ScriptData;
use libfuzzer_sys::fuzz_target;

// Fuzz target: decode a script-data payload.
//
// Catches bugs in:
// - Length prefixes larger than the payload
// - Names that are not strings
// - Unterminated objects and ECMA arrays
fuzz_target!(|data: &[u8]| {
    if let Ok(script) = ScriptData::decode(data) {
        let _ = script.on_meta_data();
    }
});
