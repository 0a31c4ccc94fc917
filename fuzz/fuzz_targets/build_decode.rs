#![no_main]

use std::io::Read;

use arbitrary::{Arbitrary, Unstructured};
use flv_decoder::{Amf0Value, Decoder, TagBody};
use flv_tests::FlvBuilder;
use flv_types::{AudioTagHeader, AvcPacketType, FrameType, SoundFormat, VideoTagHeader};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzTag {
    Audio {
        timestamp: u32,
        header: u8,
        body: Vec<u8>,
    },
    Avc {
        timestamp: u32,
        keyframe: bool,
        packet_type: u8,
        composition_time: i32,
        data: Vec<u8>,
    },
    Video {
        timestamp: u32,
        header: u8,
        body: Vec<u8>,
    },
    Script {
        timestamp: u32,
        names: Vec<String>,
        number: f64,
    },
}

// Fuzz target: FlvBuilder -> Decoder roundtrip.
//
// Builds well-formed streams from structured input and checks that the
// decoder returns every tag with the timestamp and sub-header it was
// built with, and the exact sample bytes.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(tags) = Vec::<FuzzTag>::arbitrary(&mut u) else {
        return;
    };
    let tags = &tags[..tags.len().min(32)];

    let mut builder = FlvBuilder::new();
    let mut expected = Vec::new();
    for tag in tags {
        match tag {
            FuzzTag::Audio { timestamp, header, body } => {
                let header = AudioTagHeader::from_byte(*header);
                // An AAC header needs its packet type byte.
                if header.is_aac() && body.is_empty() {
                    continue;
                }
                builder.audio(*timestamp, header, body);
                let skip = usize::from(header.is_aac());
                expected.push((*timestamp, body[skip..].to_vec()));
            }
            FuzzTag::Avc {
                timestamp,
                keyframe,
                packet_type,
                composition_time,
                data,
            } => {
                let frame_type = if *keyframe { FrameType::Keyframe } else { FrameType::InterFrame };
                // Only 24 bits of composition time survive.
                let ct = (composition_time << 8) >> 8;
                builder.avc(*timestamp, frame_type, AvcPacketType::from_bits(*packet_type), ct, data);
                expected.push((*timestamp, data.clone()));
            }
            FuzzTag::Video { timestamp, header, body } => {
                let header = VideoTagHeader::from_byte(*header);
                if header.is_avc() && body.len() < 4 {
                    continue;
                }
                builder.video(*timestamp, header, body);
                let skip = if header.is_avc() { 4 } else { 0 };
                expected.push((*timestamp, body[skip..].to_vec()));
            }
            FuzzTag::Script { timestamp, names, number } => {
                let pairs: Vec<(&str, Amf0Value<'_>)> = names
                    .iter()
                    .filter(|n| n.len() < 1024)
                    .take(8)
                    .map(|n| (n.as_str(), Amf0Value::Number(*number)))
                    .collect();
                builder.script(*timestamp, &pairs);
                expected.push((*timestamp, Vec::new()));
            }
        }
    }

    let bytes = builder.build();
    let mut decoder = Decoder::new(bytes.as_slice()).unwrap();
    for (timestamp, samples) in &expected {
        let mut tag = decoder.next_tag().unwrap().unwrap();
        assert_eq!(tag.timestamp(), *timestamp);
        if let TagBody::Audio(audio) = &tag.body {
            assert_eq!(audio.aac_packet_type.is_some(), audio.sound_format == SoundFormat::Aac);
        }
        let mut got = Vec::new();
        if let Some(data) = tag.data() {
            data.read_to_end(&mut got).unwrap();
        }
        assert_eq!(&got, samples);
    }
    assert!(decoder.next_tag().unwrap().is_none());
});
