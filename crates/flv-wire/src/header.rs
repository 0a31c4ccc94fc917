use std::io::Read;

use crate::error::WireError;
use crate::io::read_fill;
use crate::pool;

/// File signature: ASCII "FLV".
pub const FLV_SIGNATURE: [u8; 3] = *b"FLV";

/// Size of the fixed file header in bytes.
pub const HEADER_SIZE: usize = 9;

/// Smallest legal `data_offset`: the first tag-size field cannot start
/// inside the fixed header.
const MIN_DATA_OFFSET: u32 = 9;

/// Header flags bitfield.
///
/// Bit layout:
///   bit 0 = video tags present
///   bit 2 = audio tags present
///   bits 1, 3-7 = reserved (ignored, preserved in [`raw`](Self::raw))
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HeaderFlags(u8);

impl HeaderFlags {
    pub const NONE: Self = Self(0);
    pub const VIDEO: Self = Self(0b0000_0001);
    pub const AUDIO: Self = Self(0b0000_0100);

    pub fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    pub fn has_audio(self) -> bool {
        self.0 & Self::AUDIO.0 != 0
    }

    pub fn has_video(self) -> bool {
        self.0 & Self::VIDEO.0 != 0
    }

    /// Combine two flag sets.
    #[must_use]
    pub fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// FLV file header: the first 9 bytes of every stream.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────┐
/// │ Offset │ Size    │ Description                          │
/// ├────────┼─────────┼──────────────────────────────────────┤
/// │ 0x00   │ 3 bytes │ Signature: "FLV"                     │
/// │ 0x03   │ 1 byte  │ Version                              │
/// │ 0x04   │ 1 byte  │ Flags (bit 2 audio, bit 0 video)     │
/// │ 0x05   │ 4 bytes │ Data offset (u32 BE), usually 9      │
/// └────────┴─────────┴──────────────────────────────────────┘
/// ```
///
/// `data_offset` is the byte offset of the first tag-size field. Any
/// bytes between the fixed header and that offset are opaque and must be
/// skipped by the reader before tag decoding begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlvHeader {
    pub version: u8,
    pub flags: HeaderFlags,
    pub data_offset: u32,
}

impl FlvHeader {
    /// A version 1 header with the standard 9-byte data offset.
    pub fn new(flags: HeaderFlags) -> Self {
        Self {
            version: 1,
            flags,
            data_offset: MIN_DATA_OFFSET,
        }
    }

    /// Number of bytes between the fixed header and the first tag-size
    /// field.
    #[must_use]
    pub fn extra_header_len(&self) -> u32 {
        self.data_offset.saturating_sub(MIN_DATA_OFFSET)
    }

    /// Write the 9-byte header into the provided buffer.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Truncated`] if `buf` is shorter than
    /// [`HEADER_SIZE`].
    pub fn write_to(&self, buf: &mut [u8]) -> Result<(), WireError> {
        if buf.len() < HEADER_SIZE {
            return Err(WireError::Truncated {
                field: "file header",
                needed: HEADER_SIZE,
                got: buf.len(),
            });
        }

        buf[0..3].copy_from_slice(&FLV_SIGNATURE);
        buf[3] = self.version;
        buf[4] = self.flags.raw();
        buf[5..9].copy_from_slice(&self.data_offset.to_be_bytes());

        Ok(())
    }

    /// Parse a header from the first 9 bytes of the provided buffer.
    ///
    /// The signature is checked before anything else, so a non-FLV input
    /// always reports [`WireError::InvalidSignature`] if at least three
    /// bytes are present.
    ///
    /// # Errors
    ///
    /// - [`WireError::InvalidSignature`] if the first three bytes are not "FLV".
    /// - [`WireError::Truncated`] if the buffer is shorter than 9 bytes.
    /// - [`WireError::DataOffsetTooSmall`] if the data offset is below 9.
    pub fn read_from(buf: &[u8]) -> Result<Self, WireError> {
        if let Some(sig) = buf.get(0..3)
            && sig != FLV_SIGNATURE
        {
            return Err(WireError::InvalidSignature {
                found: [sig[0], sig[1], sig[2]],
            });
        }

        if buf.len() < HEADER_SIZE {
            return Err(WireError::Truncated {
                field: "file header",
                needed: HEADER_SIZE,
                got: buf.len(),
            });
        }

        let version = buf[3];
        let flags = HeaderFlags::from_raw(buf[4]);
        let data_offset = u32::from_be_bytes([buf[5], buf[6], buf[7], buf[8]]);

        if data_offset < MIN_DATA_OFFSET {
            return Err(WireError::DataOffsetTooSmall {
                offset: data_offset,
                min: MIN_DATA_OFFSET,
            });
        }

        Ok(Self {
            version,
            flags,
            data_offset,
        })
    }

    /// Read and parse the header from a stream positioned at offset 0.
    ///
    /// Only the 9 fixed bytes are consumed; skipping up to `data_offset`
    /// is left to the caller.
    ///
    /// # Errors
    ///
    /// As [`read_from`](Self::read_from). A stream shorter than 9 bytes is
    /// reported as truncated unless its first three bytes already rule out
    /// the FLV signature.
    pub fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self, WireError> {
        let mut buf = pool::global().acquire();
        buf.resize(HEADER_SIZE, 0);
        let got = read_fill(reader, &mut buf)?;
        Self::read_from(&buf[..got])
    }
}
