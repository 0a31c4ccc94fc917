#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: FlvHeader::read_from with arbitrary bytes.
//
// Catches bugs in:
// - Signature validation
// - Data offset bounds
// - Truncated header handling
fuzz_target!(|data: &[u8]| {
    let _ = flv_wire::FlvHeader::read_from(data);
});
