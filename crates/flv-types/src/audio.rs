use std::fmt;

open_enum! {
  /// Audio codec, bits 7-4 of the audio tag header.
  ///
  /// ```text
  /// ┌──────┬──────────────────────────────┐
  /// │ Bits │ Format                       │
  /// ├──────┼──────────────────────────────┤
  /// │ 0    │ Linear PCM, platform endian  │
  /// │ 1    │ ADPCM                        │
  /// │ 2    │ MP3                          │
  /// │ 3    │ Linear PCM, little endian    │
  /// │ 4    │ Nellymoser 16 kHz mono       │
  /// │ 5    │ Nellymoser 8 kHz mono        │
  /// │ 6    │ Nellymoser                   │
  /// │ 7    │ G.711 A-law                  │
  /// │ 8    │ G.711 mu-law                 │
  /// │ 10   │ AAC                          │
  /// │ 11   │ Speex                        │
  /// │ 14   │ MP3 8 kHz                    │
  /// │ 15   │ Device-specific sound        │
  /// └──────┴──────────────────────────────┘
  /// ```
  pub enum SoundFormat {
    LinearPcmPlatformEndian = 0 => "pcm",
    Adpcm = 1 => "adpcm",
    Mp3 = 2 => "mp3",
    LinearPcmLittleEndian = 3 => "pcm-le",
    Nellymoser16kMono = 4 => "nellymoser-16k-mono",
    Nellymoser8kMono = 5 => "nellymoser-8k-mono",
    Nellymoser = 6 => "nellymoser",
    G711ALaw = 7 => "g711-alaw",
    G711MuLaw = 8 => "g711-mulaw",
    Aac = 10 => "aac",
    Speex = 11 => "speex",
    Mp3Khz8 = 14 => "mp3-8k",
    DeviceSpecific = 15 => "device-specific",
  }
}

open_enum! {
  /// Packet type byte that follows the header of an AAC audio tag.
  pub enum AacPacketType {
    /// AudioSpecificConfig.
    SequenceHeader = 0 => "sequence-header",
    /// Raw AAC frame data.
    Raw = 1 => "raw",
  }
}

/// Sampling rate, bits 3-2 of the audio tag header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundRate {
  Khz5_5,
  Khz11,
  Khz22,
  Khz44,
}

impl SoundRate {
  /// Decode the two rate bits. Higher bits are ignored.
  #[must_use]
  pub fn from_bits(value: u8) -> Self {
    match value & 0b11 {
      0 => Self::Khz5_5,
      1 => Self::Khz11,
      2 => Self::Khz22,
      _ => Self::Khz44,
    }
  }

  #[must_use]
  pub fn to_bits(self) -> u8 {
    match self {
      Self::Khz5_5 => 0,
      Self::Khz11 => 1,
      Self::Khz22 => 2,
      Self::Khz44 => 3,
    }
  }

  /// Nominal sample rate in Hz.
  #[must_use]
  pub fn hz(self) -> u32 {
    match self {
      Self::Khz5_5 => 5_512,
      Self::Khz11 => 11_025,
      Self::Khz22 => 22_050,
      Self::Khz44 => 44_100,
    }
  }
}

/// Sample size, bit 1 of the audio tag header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundSize {
  Bits8,
  Bits16,
}

impl SoundSize {
  #[must_use]
  pub fn from_bits(value: u8) -> Self {
    if value & 1 == 0 { Self::Bits8 } else { Self::Bits16 }
  }

  #[must_use]
  pub fn to_bits(self) -> u8 {
    match self {
      Self::Bits8 => 0,
      Self::Bits16 => 1,
    }
  }
}

/// Channel layout, bit 0 of the audio tag header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundType {
  Mono,
  Stereo,
}

impl SoundType {
  #[must_use]
  pub fn from_bits(value: u8) -> Self {
    if value & 1 == 0 { Self::Mono } else { Self::Stereo }
  }

  #[must_use]
  pub fn to_bits(self) -> u8 {
    match self {
      Self::Mono => 0,
      Self::Stereo => 1,
    }
  }
}

impl fmt::Display for SoundRate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}Hz", self.hz())
  }
}

impl fmt::Display for SoundSize {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Bits8 => "8bit",
      Self::Bits16 => "16bit",
    })
  }
}

impl fmt::Display for SoundType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Mono => "mono",
      Self::Stereo => "stereo",
    })
  }
}

/// The single packed byte at the start of every audio tag payload.
///
/// ```text
///   7  6  5  4 │ 3  2 │ 1    │ 0
///   format     │ rate │ size │ type
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioTagHeader {
  pub sound_format: SoundFormat,
  pub sound_rate: SoundRate,
  pub sound_size: SoundSize,
  pub sound_type: SoundType,
}

impl AudioTagHeader {
  /// Unpack the header byte.
  #[must_use]
  pub fn from_byte(byte: u8) -> Self {
    Self {
      sound_format: SoundFormat::from_bits((byte & 0xF0) >> 4),
      sound_rate: SoundRate::from_bits((byte & 0x0C) >> 2),
      sound_size: SoundSize::from_bits((byte & 0x02) >> 1),
      sound_type: SoundType::from_bits(byte & 0x01),
    }
  }

  /// Pack the header back into one byte.
  #[must_use]
  pub fn to_byte(self) -> u8 {
    (self.sound_format.to_bits() & 0x0F) << 4
      | self.sound_rate.to_bits() << 2
      | self.sound_size.to_bits() << 1
      | self.sound_type.to_bits()
  }

  /// Whether an [`AacPacketType`] byte follows this header.
  #[must_use]
  pub fn is_aac(self) -> bool {
    self.sound_format == SoundFormat::Aac
  }
}
