open_enum! {
  /// Frame type, bits 7-4 of the video tag header.
  pub enum FrameType {
    Keyframe = 1 => "keyframe",
    InterFrame = 2 => "inter",
    DisposableInterFrame = 3 => "disposable-inter",
    /// Server-generated keyframe, reserved for server use.
    GeneratedKeyframe = 4 => "generated-keyframe",
    /// Video info or command frame; carries no picture.
    VideoInfoCommand = 5 => "info-command",
  }
}

open_enum! {
  /// Video codec, bits 3-0 of the video tag header.
  ///
  /// ```text
  /// ┌──────┬────────────────────────┐
  /// │ Bits │ Codec                  │
  /// ├──────┼────────────────────────┤
  /// │ 1    │ JPEG (unused)          │
  /// │ 2    │ Sorenson H.263         │
  /// │ 3    │ Screen video           │
  /// │ 4    │ On2 VP6                │
  /// │ 5    │ On2 VP6 with alpha     │
  /// │ 6    │ Screen video v2        │
  /// │ 7    │ AVC (H.264)            │
  /// └──────┴────────────────────────┘
  /// ```
  pub enum CodecId {
    Jpeg = 1 => "jpeg",
    SorensonH263 = 2 => "h263",
    ScreenVideo = 3 => "screen",
    On2Vp6 = 4 => "vp6",
    On2Vp6Alpha = 5 => "vp6-alpha",
    ScreenVideo2 = 6 => "screen2",
    Avc = 7 => "avc",
  }
}

open_enum! {
  /// Packet type byte at the start of an AVC video packet.
  pub enum AvcPacketType {
    /// AVCDecoderConfigurationRecord.
    SequenceHeader = 0 => "sequence-header",
    /// One or more NAL units.
    Nalu = 1 => "nalu",
    /// End of sequence; the body is empty.
    EndOfSequence = 2 => "end-of-sequence",
  }
}

/// The single packed byte at the start of every video tag payload.
///
/// ```text
///   7  6  5  4 │ 3  2  1  0
///   frame type │ codec id
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoTagHeader {
  pub frame_type: FrameType,
  pub codec_id: CodecId,
}

impl VideoTagHeader {
  #[must_use]
  pub fn from_byte(byte: u8) -> Self {
    Self {
      frame_type: FrameType::from_bits((byte & 0xF0) >> 4),
      codec_id: CodecId::from_bits(byte & 0x0F),
    }
  }

  #[must_use]
  pub fn to_byte(self) -> u8 {
    (self.frame_type.to_bits() & 0x0F) << 4 | (self.codec_id.to_bits() & 0x0F)
  }

  /// Whether a 4-byte [`AvcPacketHeader`] follows this header.
  #[must_use]
  pub fn is_avc(self) -> bool {
    self.codec_id == CodecId::Avc
  }

  #[must_use]
  pub fn is_keyframe(self) -> bool {
    self.frame_type == FrameType::Keyframe
  }
}

/// Size of the AVC packet header in bytes.
pub const AVC_PACKET_HEADER_SIZE: usize = 4;

/// The 4-byte header of an AVC video packet.
///
/// ```text
/// ┌────────┬─────────┬───────────────────────────────────────┐
/// │ Offset │ Size    │ Description                           │
/// ├────────┼─────────┼───────────────────────────────────────┤
/// │ 0x00   │ 1 byte  │ AVC packet type                       │
/// │ 0x01   │ 3 bytes │ Composition time offset (signed i24)  │
/// └────────┴─────────┴───────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AvcPacketHeader {
  pub packet_type: AvcPacketType,
  /// Presentation minus decode time, in milliseconds. Negative values
  /// are legal.
  pub composition_time: i32,
}

impl AvcPacketHeader {
  #[must_use]
  pub fn from_bytes(bytes: [u8; AVC_PACKET_HEADER_SIZE]) -> Self {
    // Place the 24-bit value in the top of an i32 and shift back down
    // arithmetically, so bit 23 becomes the sign.
    let composition_time = i32::from_be_bytes([bytes[1], bytes[2], bytes[3], 0]) >> 8;
    Self {
      packet_type: AvcPacketType::from_bits(bytes[0]),
      composition_time,
    }
  }

  /// Encode back to wire bytes. The composition time is truncated to
  /// 24 bits.
  #[must_use]
  pub fn to_bytes(self) -> [u8; AVC_PACKET_HEADER_SIZE] {
    let ct = self.composition_time.to_be_bytes();
    [self.packet_type.to_bits(), ct[1], ct[2], ct[3]]
  }
}
