#![no_main]

use std::io::Read;

use libfuzzer_sys::fuzz_target;

// Fuzz target: full decoder over arbitrary bytes.
//
// Decodes every tag, reading half of each payload, until the stream ends
// or a fatal error. Recoverable errors continue the loop. Afterwards the
// decoder must be in a terminal state.
fuzz_target!(|data: &[u8]| {
    let Ok(mut decoder) = flv_decoder::Decoder::new(data) else {
        return;
    };

    let mut sink = Vec::new();
    let fatal = loop {
        match decoder.next_tag() {
            Ok(Some(mut tag)) => {
                if let Some(payload) = tag.data() {
                    let half = payload.remaining() / 2;
                    sink.clear();
                    let _ = payload.take(half).read_to_end(&mut sink);
                }
            }
            Ok(None) => break false,
            Err(e) if e.is_recoverable() => {}
            Err(_) => break true,
        }
    };

    assert!(decoder.position() <= data.len() as u64);
    if fatal {
        assert!(matches!(
            decoder.next_tag(),
            Err(flv_decoder::DecodeError::Poisoned)
        ));
    } else {
        assert!(matches!(decoder.next_tag(), Ok(None)));
    }
});
