//! Fixture builder for FLV byte streams.
//!
//! [`FlvBuilder`] writes a file header and appends tags with correct
//! framing by default. The `raw_*` methods bypass the framing rules so
//! tests can build malformed streams on purpose.
//!
//! ```text
//!   FlvBuilder::new()                  header │ size 0
//!     .avc(0, Keyframe, SequenceHeader, 0, &sps)      │ tag │ size
//!     .aac(0, SequenceHeader, &asc)                   │ tag │ size
//!     .build()
//! ```

#![allow(clippy::pedantic)]

use scuffle_amf0::{Amf0Encoder, Amf0Value};
use flv_types::{
    AacPacketType, AudioTagHeader, AvcPacketHeader, AvcPacketType, FrameType, SoundFormat,
    SoundRate, SoundSize, SoundType, VideoTagHeader, CodecId,
};
use flv_wire::header::HEADER_SIZE;
use flv_wire::tag_header::TAG_HEADER_SIZE;
use flv_wire::{FlvHeader, HeaderFlags, TagHeader, TagType};

const ECMA_ARRAY_MARKER: u8 = 0x08;

/// Empty property name followed by the object-end marker.
const OBJECT_END: [u8; 3] = [0x00, 0x00, 0x09];

/// The standard AAC audio header: 44 kHz, 16-bit, stereo.
pub const AAC_HEADER: AudioTagHeader = AudioTagHeader {
    sound_format: SoundFormat::Aac,
    sound_rate: SoundRate::Khz44,
    sound_size: SoundSize::Bits16,
    sound_type: SoundType::Stereo,
};

pub struct FlvBuilder {
    buf: Vec<u8>,
    tags: usize,
}

impl Default for FlvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlvBuilder {
    /// A version 1 header flagging audio and video, followed by the zero
    /// tag-size field.
    pub fn new() -> Self {
        Self::with_header(&FlvHeader::new(HeaderFlags::AUDIO.with(HeaderFlags::VIDEO)))
    }

    /// Write `header`, pad up to its data offset with zeros, then the zero
    /// tag-size field.
    pub fn with_header(header: &FlvHeader) -> Self {
        let mut builder = Self::header_only(header);
        builder.buf.extend_from_slice(&0u32.to_be_bytes());
        builder
    }

    /// Header and padding only, with no tag-size field after it.
    pub fn header_only(header: &FlvHeader) -> Self {
        let mut buf = vec![0u8; HEADER_SIZE];
        header.write_to(&mut buf).expect("buffer holds a full header");
        buf.resize(HEADER_SIZE + header.extra_header_len() as usize, 0);
        Self { buf, tags: 0 }
    }

    /// Append a well-formed tag: prologue, payload and matching size.
    pub fn tag(&mut self, tag_type: TagType, timestamp: u32, payload: &[u8]) -> &mut Self {
        let header = TagHeader {
            tag_type,
            data_size: payload.len() as u32,
            timestamp,
            stream_id: 0,
        };
        let mut prologue = [0u8; TAG_HEADER_SIZE];
        header.write_to(&mut prologue).expect("buffer holds a full prologue");
        self.buf.extend_from_slice(&prologue);
        self.buf.extend_from_slice(payload);
        self.buf.extend_from_slice(&header.tag_size().to_be_bytes());
        self.tags += 1;
        self
    }

    /// Append a tag with every field under the caller's control,
    /// including an arbitrary type byte and trailing size.
    pub fn raw_tag(
        &mut self,
        type_byte: u8,
        timestamp: u32,
        stream_id: u32,
        payload: &[u8],
        trailing_size: u32,
    ) -> &mut Self {
        let size = (payload.len() as u32).to_be_bytes();
        let ts = timestamp.to_be_bytes();
        let sid = stream_id.to_be_bytes();
        self.buf.extend_from_slice(&[
            type_byte, size[1], size[2], size[3], ts[1], ts[2], ts[3], ts[0], sid[1], sid[2],
            sid[3],
        ]);
        self.buf.extend_from_slice(payload);
        self.buf.extend_from_slice(&trailing_size.to_be_bytes());
        self.tags += 1;
        self
    }

    /// Append arbitrary bytes.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Audio tag from a sub-header and the bytes after it. For AAC the
    /// packet type byte belongs in `body`.
    pub fn audio(&mut self, timestamp: u32, header: AudioTagHeader, body: &[u8]) -> &mut Self {
        let mut payload = vec![header.to_byte()];
        payload.extend_from_slice(body);
        self.tag(TagType::Audio, timestamp, &payload)
    }

    pub fn aac(&mut self, timestamp: u32, packet_type: AacPacketType, data: &[u8]) -> &mut Self {
        let mut body = vec![packet_type.to_bits()];
        body.extend_from_slice(data);
        self.audio(timestamp, AAC_HEADER, &body)
    }

    /// Video tag from a sub-header and the bytes after it. For AVC the
    /// 4-byte packet header belongs in `body`.
    pub fn video(&mut self, timestamp: u32, header: VideoTagHeader, body: &[u8]) -> &mut Self {
        let mut payload = vec![header.to_byte()];
        payload.extend_from_slice(body);
        self.tag(TagType::Video, timestamp, &payload)
    }

    pub fn avc(
        &mut self,
        timestamp: u32,
        frame_type: FrameType,
        packet_type: AvcPacketType,
        composition_time: i32,
        data: &[u8],
    ) -> &mut Self {
        let header = VideoTagHeader {
            frame_type,
            codec_id: CodecId::Avc,
        };
        let mut body = AvcPacketHeader {
            packet_type,
            composition_time,
        }
        .to_bytes()
        .to_vec();
        body.extend_from_slice(data);
        self.video(timestamp, header, &body)
    }

    /// Script tag holding `(name, value)` pairs in order.
    pub fn script(&mut self, timestamp: u32, pairs: &[(&str, Amf0Value<'_>)]) -> &mut Self {
        let payload = script_payload(pairs);
        self.tag(TagType::ScriptData, timestamp, &payload)
    }

    /// The usual `onMetaData` script tag at timestamp 0, with the
    /// properties in an ECMA array the way muxers write it.
    pub fn metadata(&mut self, properties: &[(&str, Amf0Value<'_>)]) -> &mut Self {
        let mut payload = Vec::new();
        Amf0Encoder::encode_string(&mut payload, "onMetaData").expect("write to Vec");
        payload.push(ECMA_ARRAY_MARKER);
        payload.extend_from_slice(&(properties.len() as u32).to_be_bytes());
        for (name, value) in properties {
            payload.extend_from_slice(&(name.len() as u16).to_be_bytes());
            payload.extend_from_slice(name.as_bytes());
            Amf0Encoder::encode(&mut payload, value).expect("write to Vec");
        }
        payload.extend_from_slice(&OBJECT_END);
        self.tag(TagType::ScriptData, 0, &payload)
    }

    /// Number of tags appended so far.
    pub fn tag_count(&self) -> usize {
        self.tags
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn build(&self) -> Vec<u8> {
        self.buf.clone()
    }
}

/// Encode `(name, value)` pairs as a script-data payload.
pub fn script_payload(pairs: &[(&str, Amf0Value<'_>)]) -> Vec<u8> {
    let mut payload = Vec::new();
    for (name, value) in pairs {
        Amf0Encoder::encode_string(&mut payload, name).expect("names fit a short string");
        Amf0Encoder::encode(&mut payload, value).expect("write to Vec");
    }
    payload
}

/// A short but realistic stream: metadata, AVC and AAC sequence headers,
/// then interleaved frames.
pub fn sample_stream() -> Vec<u8> {
    FlvBuilder::new()
        .metadata(&[
            ("duration", Amf0Value::Number(0.1)),
            ("width", Amf0Value::Number(320.0)),
            ("height", Amf0Value::Number(240.0)),
            ("framerate", Amf0Value::Number(25.0)),
            ("videocodecid", Amf0Value::Number(7.0)),
            ("audiocodecid", Amf0Value::Number(10.0)),
            ("stereo", Amf0Value::Boolean(true)),
            ("encoder", Amf0Value::String("flv-tests".into())),
        ])
        .avc(0, FrameType::Keyframe, AvcPacketType::SequenceHeader, 0, &[0x01, 0x64, 0x00, 0x1F])
        .aac(0, AacPacketType::SequenceHeader, &[0x12, 0x10])
        .avc(0, FrameType::Keyframe, AvcPacketType::Nalu, 40, &[0x00, 0x00, 0x00, 0x02, 0x65, 0x88])
        .aac(23, AacPacketType::Raw, &[0x21, 0x00, 0x49, 0x90])
        .avc(40, FrameType::InterFrame, AvcPacketType::Nalu, 80, &[0x00, 0x00, 0x00, 0x02, 0x41, 0x9A])
        .aac(46, AacPacketType::Raw, &[0x21, 0x00, 0x49, 0x91])
        .avc(80, FrameType::InterFrame, AvcPacketType::Nalu, -40, &[0x00, 0x00, 0x00, 0x02, 0x41, 0x9B])
        .build()
}
