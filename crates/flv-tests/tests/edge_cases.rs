//! Malformed and truncated input.
//!
//! Covers three groups:
//!
//! - **Fatal framing errors**: bad signature, bad data offset, non-zero
//!   first tag size, truncation. The decoder returns the error once and
//!   then reports `Poisoned`.
//! - **Recoverable tag errors**: unsupported tag type, short sub-header,
//!   broken script data, rejected stream id. The failed tag is skipped and
//!   the next tag decodes normally.
//! - **Strictness options**: tag-size and stream-id checks that are off by
//!   default.

use flv_decoder::{Amf0Value, DecodeError, Decoder, DecoderConfig, ErrorKind, TagType};
use flv_tests::{FlvBuilder, sample_stream, script_payload};
use flv_types::{AacPacketType, AvcPacketType, FrameType};
use flv_wire::WireError;

/// Decode to the end, collecting timestamps of good tags and kinds of
/// errors. Stops at the first fatal error.
fn drain(bytes: &[u8], config: DecoderConfig) -> (Vec<u32>, Vec<ErrorKind>) {
    let mut decoder = Decoder::with_config(bytes, config).unwrap();
    let mut timestamps = Vec::new();
    let mut errors = Vec::new();
    loop {
        match decoder.next_tag() {
            Ok(Some(tag)) => timestamps.push(tag.timestamp()),
            Ok(None) => break,
            Err(e) => {
                errors.push(e.kind());
                if !e.is_recoverable() {
                    break;
                }
            }
        }
    }
    (timestamps, errors)
}

// ── File header ───────────────────────────────────────────────────────────────

#[test]
fn bad_signature() {
    let mut bytes = sample_stream();
    bytes[..3].copy_from_slice(b"RIF");
    let err = Decoder::new(bytes.as_slice()).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Wire(WireError::InvalidSignature { found }) if &found == b"RIF"
    ));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn data_offset_below_header_size() {
    let mut bytes = sample_stream();
    bytes[5..9].copy_from_slice(&4u32.to_be_bytes());
    let err = Decoder::new(bytes.as_slice()).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Wire(WireError::DataOffsetTooSmall { offset: 4, .. })
    ));
}

#[test]
fn short_header() {
    let err = Decoder::new(&b"FLV\x01\x05"[..]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Truncated);
}

#[test]
fn nonzero_first_tag_size() {
    let mut bytes = sample_stream();
    bytes[9..13].copy_from_slice(&[0, 0, 0, 11]);
    let mut decoder = Decoder::new(bytes.as_slice()).unwrap();
    assert!(matches!(
        decoder.next_tag(),
        Err(DecodeError::InitialTagSize { found: 11 })
    ));
    assert!(matches!(decoder.next_tag(), Err(DecodeError::Poisoned)));
    assert_eq!(decoder.next_tag().unwrap_err().kind(), ErrorKind::Poisoned);
}

// ── Truncation ────────────────────────────────────────────────────────────────

/// Byte offsets at which the sample stream can end cleanly: after the
/// header, after the zero size field, and after every tag's size field.
fn clean_boundaries() -> Vec<usize> {
    let mut boundaries = vec![9, 13];
    let bytes = sample_stream();
    let mut at = 13;
    while at < bytes.len() {
        let data_size = u32::from_be_bytes([0, bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize;
        at += 11 + data_size + 4;
        boundaries.push(at);
    }
    boundaries
}

#[test]
fn every_cut_is_clean_end_or_truncation() {
    let bytes = sample_stream();
    let boundaries = clean_boundaries();
    assert_eq!(*boundaries.last().unwrap(), bytes.len());

    for len in 0..=bytes.len() {
        let prefix = &bytes[..len];
        let mut decoder = match Decoder::new(prefix) {
            Ok(decoder) => decoder,
            Err(e) => {
                assert!(len < 9, "header failed at length {len}: {e}");
                assert_eq!(e.kind(), ErrorKind::Truncated);
                continue;
            }
        };

        let outcome = loop {
            match decoder.next_tag() {
                Ok(Some(mut tag)) => {
                    if let Some(data) = tag.data() {
                        // Reading a cut payload is not an error by itself;
                        // the next call reports it.
                        let mut sink = Vec::new();
                        std::io::Read::read_to_end(data, &mut sink).unwrap();
                    }
                }
                Ok(None) => break None,
                Err(e) => break Some(e),
            }
        };

        match outcome {
            None => assert!(boundaries.contains(&len), "clean end at cut {len}"),
            Some(e) => {
                assert!(!boundaries.contains(&len), "error at clean cut {len}: {e}");
                assert_eq!(e.kind(), ErrorKind::Truncated, "cut {len}: {e}");
            }
        }
    }
}

#[test]
fn declared_size_past_end_of_stream() {
    let bytes = FlvBuilder::new()
        .raw(&[0x09, 0x01, 0x00, 0x00, 0, 0, 0, 0, 0, 0, 0]) // video, 65536 bytes
        .raw(&[0x17, 0x01, 0x00, 0x00, 0x00])
        .build();
    let mut decoder = Decoder::new(bytes.as_slice()).unwrap();
    let tag = decoder.next_tag().unwrap().unwrap();
    assert_eq!(tag.header.data_size, 0x01_0000);
    drop(tag);
    let err = decoder.next_tag().unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Wire(WireError::Truncated {
            field: "tag payload",
            ..
        })
    ));
    assert!(matches!(decoder.next_tag(), Err(DecodeError::Poisoned)));
}

// ── Recovery ──────────────────────────────────────────────────────────────────

#[test]
fn unsupported_tag_type_is_skipped() {
    let bytes = FlvBuilder::new()
        .aac(0, AacPacketType::Raw, &[1])
        .raw_tag(0x0F, 10, 0, &[0xDE, 0xAD, 0xBE, 0xEF], 15)
        .aac(20, AacPacketType::Raw, &[2])
        .build();
    let mut decoder = Decoder::new(bytes.as_slice()).unwrap();

    assert_eq!(decoder.next_tag().unwrap().unwrap().timestamp(), 0);
    let err = decoder.next_tag().unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Wire(WireError::UnsupportedTagType {
            tag_type: 0x0F,
            data_size: 4
        })
    ));
    assert!(err.is_recoverable());
    assert_eq!(decoder.next_tag().unwrap().unwrap().timestamp(), 20);
    assert!(decoder.next_tag().unwrap().is_none());
}

#[test]
fn empty_audio_payload_recovers() {
    let bytes = FlvBuilder::new()
        .tag(TagType::Audio, 0, &[])
        .aac(5, AacPacketType::Raw, &[1])
        .build();
    let (timestamps, errors) = drain(&bytes, DecoderConfig::default());
    assert_eq!(timestamps, [5]);
    assert_eq!(errors, [ErrorKind::UnexpectedEndOfPayload]);
}

#[test]
fn aac_missing_packet_type_recovers() {
    let bytes = FlvBuilder::new()
        .tag(TagType::Audio, 0, &[0xAF])
        .aac(5, AacPacketType::Raw, &[1])
        .build();
    let mut decoder = Decoder::new(bytes.as_slice()).unwrap();
    assert!(matches!(
        decoder.next_tag(),
        Err(DecodeError::UnexpectedEndOfPayload {
            tag_type: TagType::Audio,
            field: "AAC packet type"
        })
    ));
    assert_eq!(decoder.next_tag().unwrap().unwrap().timestamp(), 5);
}

#[test]
fn short_avc_header_recovers() {
    let bytes = FlvBuilder::new()
        .tag(TagType::Video, 0, &[0x17, 0x01, 0x00])
        .avc(40, FrameType::InterFrame, AvcPacketType::Nalu, 0, &[0])
        .build();
    let (timestamps, errors) = drain(&bytes, DecoderConfig::default());
    assert_eq!(timestamps, [40]);
    assert_eq!(errors, [ErrorKind::UnexpectedEndOfPayload]);
}

#[test]
fn broken_script_value_recovers() {
    let mut payload = script_payload(&[("onMetaData", Amf0Value::Null)]);
    // Replace the null marker with an undefined AMF0 marker.
    *payload.last_mut().unwrap() = 0x42;
    let bytes = FlvBuilder::new()
        .tag(TagType::ScriptData, 0, &payload)
        .aac(1, AacPacketType::Raw, &[1])
        .build();
    let mut decoder = Decoder::new(bytes.as_slice()).unwrap();

    match decoder.next_tag() {
        Err(DecodeError::ValueDecode { name: Some(name), .. }) => assert_eq!(name, "onMetaData"),
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(decoder.next_tag().unwrap().unwrap().timestamp(), 1);
}

#[test]
fn script_name_without_value() {
    let payload = hex::decode("0200036b6579").unwrap(); // string "key", then nothing
    let bytes = FlvBuilder::new().tag(TagType::ScriptData, 0, &payload).build();
    let mut decoder = Decoder::new(bytes.as_slice()).unwrap();
    let err = decoder.next_tag().unwrap_err();
    assert!(matches!(
        err,
        DecodeError::ValueDecode {
            name: Some(ref name),
            ..
        } if name == "key"
    ));
    assert!(decoder.next_tag().unwrap().is_none());
}

#[test]
fn number_as_script_name() {
    let payload = script_payload(&[("x", Amf0Value::Null)]);
    let mut bytes = vec![0x00];
    bytes.extend_from_slice(&1.5f64.to_be_bytes());
    bytes.extend_from_slice(&payload);
    let bytes = FlvBuilder::new()
        .tag(TagType::ScriptData, 0, &bytes)
        .aac(7, AacPacketType::Raw, &[1])
        .build();
    let (timestamps, errors) = drain(&bytes, DecoderConfig::default());
    assert_eq!(timestamps, [7]);
    assert_eq!(errors, [ErrorKind::ValueDecode]);
}

#[test]
fn cut_size_field_after_bad_tag_is_truncation() {
    let full = FlvBuilder::new()
        .tag(TagType::Video, 0, &[0x17])
        .build();
    for cut in 1..4 {
        let bytes = &full[..full.len() - cut];
        let mut decoder = Decoder::new(bytes).unwrap();
        assert_eq!(
            decoder.next_tag().unwrap_err().kind(),
            ErrorKind::UnexpectedEndOfPayload
        );
        let err = decoder.next_tag().unwrap_err();
        assert!(
            matches!(
                err,
                DecodeError::Wire(WireError::Truncated { field: "tag size", .. })
            ),
            "cut {cut}: {err}"
        );
    }
}

#[test]
fn several_bad_tags_in_a_row() {
    let bytes = FlvBuilder::new()
        .raw_tag(0x01, 0, 0, &[], 11)
        .tag(TagType::Video, 1, &[])
        .tag(TagType::ScriptData, 2, &[0x05])
        .aac(3, AacPacketType::Raw, &[])
        .build();
    let (timestamps, errors) = drain(&bytes, DecoderConfig::default());
    assert_eq!(timestamps, [3]);
    assert_eq!(
        errors,
        [
            ErrorKind::Format,
            ErrorKind::UnexpectedEndOfPayload,
            ErrorKind::ValueDecode
        ]
    );
}

// ── Strictness ────────────────────────────────────────────────────────────────

#[test]
fn wrong_tag_size_is_tolerated_by_default() {
    let bytes = FlvBuilder::new()
        .raw_tag(0x08, 0, 0, &[0x2F, 0x00], 0)
        .aac(9, AacPacketType::Raw, &[1])
        .build();
    let (timestamps, errors) = drain(&bytes, DecoderConfig::default());
    assert_eq!(timestamps, [0, 9]);
    assert!(errors.is_empty());
}

#[test]
fn wrong_tag_size_is_fatal_when_strict() {
    let bytes = FlvBuilder::new()
        .raw_tag(0x08, 0, 0, &[0x2F, 0x00], 0)
        .aac(9, AacPacketType::Raw, &[1])
        .build();
    let config = DecoderConfig {
        strict_tag_sizes: true,
        ..DecoderConfig::default()
    };
    let mut decoder = Decoder::with_config(bytes.as_slice(), config).unwrap();
    decoder.next_tag().unwrap().unwrap();
    assert!(matches!(
        decoder.next_tag(),
        Err(DecodeError::TagSizeMismatch {
            expected: 13,
            found: 0
        })
    ));
}

#[test]
fn strict_accepts_well_formed_stream() {
    let (timestamps, errors) = drain(&sample_stream(), DecoderConfig::strict());
    assert_eq!(timestamps.len(), 8);
    assert!(errors.is_empty());
}

#[test]
fn stream_id_checked_only_when_strict() {
    let bytes = FlvBuilder::new()
        .raw_tag(0x08, 0, 1, &[0x2F, 0x00], 13)
        .aac(9, AacPacketType::Raw, &[1])
        .build();

    let (timestamps, errors) = drain(&bytes, DecoderConfig::default());
    assert_eq!(timestamps, [0, 9]);
    assert!(errors.is_empty());

    let config = DecoderConfig {
        require_zero_stream_id: true,
        ..DecoderConfig::default()
    };
    let (timestamps, errors) = drain(&bytes, config);
    assert_eq!(timestamps, [9]);
    assert_eq!(errors, [ErrorKind::Format]);
}
