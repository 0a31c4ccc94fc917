#![no_main]

use flv_wire::header::HEADER_SIZE;
use flv_wire::{FlvHeader, HeaderFlags};
use libfuzzer_sys::fuzz_target;

// Fuzz target: FlvHeader write->read roundtrip.
//
// Input format:
//   byte 0:     version
//   byte 1:     flags (all bits kept)
//   bytes 2..6: data offset, clamped to at least 9
fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }

    let header = FlvHeader {
        version: data[0],
        flags: HeaderFlags::from_raw(data[1]),
        data_offset: u32::from_be_bytes([data[2], data[3], data[4], data[5]]).max(9),
    };

    let mut buf = [0u8; HEADER_SIZE];
    header.write_to(&mut buf).unwrap();

    let parsed = FlvHeader::read_from(&buf).unwrap();
    assert_eq!(parsed, header);
    assert_eq!(parsed.flags.has_audio(), data[1] & 0x04 != 0);
    assert_eq!(parsed.flags.has_video(), data[1] & 0x01 != 0);
});
