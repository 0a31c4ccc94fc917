use std::fmt;
use std::io::Read;

use crate::error::WireError;
use crate::io::read_field;

/// Size of the tag prologue in bytes.
pub const TAG_HEADER_SIZE: usize = 11;

const PROLOGUE_LEN: u32 = 11;

/// Largest value representable in the 24-bit size and stream-id fields.
pub const MAX_U24: u32 = 0x00FF_FFFF;

/// The three tag types an FLV stream may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagType {
    Audio,
    Video,
    ScriptData,
}

impl TagType {
    pub fn to_wire_byte(self) -> u8 {
        match self {
            Self::Audio => 8,
            Self::Video => 9,
            Self::ScriptData => 18,
        }
    }

    /// Map a wire byte to a tag type, or `None` for anything else.
    pub fn from_wire_byte(value: u8) -> Option<Self> {
        match value {
            8 => Some(Self::Audio),
            9 => Some(Self::Video),
            18 => Some(Self::ScriptData),
            _ => None,
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Audio => "audio",
            Self::Video => "video",
            Self::ScriptData => "script",
        })
    }
}

/// Tag prologue: the 11 bytes in front of every tag payload.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────────┐
/// │ Offset │ Size    │ Description                              │
/// ├────────┼─────────┼──────────────────────────────────────────┤
/// │ 0x00   │ 1 byte  │ Tag type (8 audio, 9 video, 18 script)   │
/// │ 0x01   │ 3 bytes │ Data size (u24 BE)                       │
/// │ 0x04   │ 3 bytes │ Timestamp, low 24 bits (BE)              │
/// │ 0x07   │ 1 byte  │ Timestamp extension, bits 24-31          │
/// │ 0x08   │ 3 bytes │ Stream id (u24 BE), always 0 in practice │
/// └────────┴─────────┴──────────────────────────────────────────┘
/// ```
///
/// The timestamp is split: the extension byte comes *after* the low
/// three bytes but is the most significant byte of the 32-bit value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagHeader {
    pub tag_type: TagType,
    pub data_size: u32,
    pub timestamp: u32,
    pub stream_id: u32,
}

impl TagHeader {
    /// Size of the whole tag on the wire: prologue plus payload. This is
    /// the value the following tag-size field should carry.
    #[must_use]
    pub fn tag_size(&self) -> u32 {
        PROLOGUE_LEN.saturating_add(self.data_size)
    }

    /// Write the 11-byte prologue into `buf`.
    ///
    /// `data_size` and `stream_id` are truncated to 24 bits.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Truncated`] if `buf` is shorter than
    /// [`TAG_HEADER_SIZE`].
    pub fn write_to(&self, buf: &mut [u8]) -> Result<(), WireError> {
        if buf.len() < TAG_HEADER_SIZE {
            return Err(WireError::Truncated {
                field: "tag header",
                needed: TAG_HEADER_SIZE,
                got: buf.len(),
            });
        }

        let size = self.data_size.to_be_bytes();
        let ts = self.timestamp.to_be_bytes();
        let sid = self.stream_id.to_be_bytes();

        buf[0] = self.tag_type.to_wire_byte();
        buf[1..4].copy_from_slice(&size[1..4]);
        buf[4..7].copy_from_slice(&ts[1..4]);
        buf[7] = ts[0];
        buf[8..11].copy_from_slice(&sid[1..4]);

        Ok(())
    }

    /// Parse a prologue from the first 11 bytes of `buf`.
    ///
    /// # Errors
    ///
    /// - [`WireError::Truncated`] if `buf` is shorter than 11 bytes.
    /// - [`WireError::UnsupportedTagType`] for an unknown tag type. The
    ///   error carries the declared data size so the payload can still be
    ///   skipped.
    pub fn read_from(buf: &[u8]) -> Result<Self, WireError> {
        if buf.len() < TAG_HEADER_SIZE {
            return Err(WireError::Truncated {
                field: "tag header",
                needed: TAG_HEADER_SIZE,
                got: buf.len(),
            });
        }

        let data_size = u32::from_be_bytes([0, buf[1], buf[2], buf[3]]);
        let timestamp = u32::from(buf[4]) << 16
            | u32::from(buf[5]) << 8
            | u32::from(buf[6])
            | u32::from(buf[7]) << 24;
        let stream_id = u32::from_be_bytes([0, buf[8], buf[9], buf[10]]);

        let tag_type =
            TagType::from_wire_byte(buf[0]).ok_or(WireError::UnsupportedTagType {
                tag_type: buf[0],
                data_size,
            })?;

        Ok(Self {
            tag_type,
            data_size,
            timestamp,
            stream_id,
        })
    }

    /// Read a prologue from a stream.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the stream ends cleanly before the first byte, which
    /// is how a well-formed FLV stream signals "no more tags".
    ///
    /// # Errors
    ///
    /// As [`read_from`](Self::read_from), plus [`WireError::Truncated`] when
    /// the stream ends partway through the prologue.
    pub fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Option<Self>, WireError> {
        match read_field(reader, TAG_HEADER_SIZE, "tag header")? {
            Some(buf) => Self::read_from(&buf).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_audio_prologue() {
        let buf = [
            0x08, // audio
            0x00, 0x01, 0x02, // data size 258
            0x00, 0x00, 0x64, // timestamp low = 100
            0x00, // extension
            0x00, 0x00, 0x00, // stream id
        ];
        let header = TagHeader::read_from(&buf).unwrap();
        assert_eq!(header.tag_type, TagType::Audio);
        assert_eq!(header.data_size, 258);
        assert_eq!(header.timestamp, 100);
        assert_eq!(header.stream_id, 0);
        assert_eq!(header.tag_size(), 269);
    }

    #[test]
    fn extension_byte_is_most_significant() {
        let buf = [
            0x09, 0x00, 0x00, 0x00, // video, empty
            0x12, 0x34, 0x56, // low 24 bits
            0x78, // extension
            0x00, 0x00, 0x00,
        ];
        let header = TagHeader::read_from(&buf).unwrap();
        assert_eq!(header.timestamp, 0x7812_3456);
    }

    #[test]
    fn nonzero_stream_id_is_kept() {
        let buf = [0x12, 0, 0, 5, 0, 0, 0, 0, 0x00, 0x01, 0x02];
        let header = TagHeader::read_from(&buf).unwrap();
        assert_eq!(header.tag_type, TagType::ScriptData);
        assert_eq!(header.stream_id, 0x0102);
    }

    #[test]
    fn write_splits_timestamp() {
        let header = TagHeader {
            tag_type: TagType::Video,
            data_size: 0x0A_0B0C,
            timestamp: 0xAABB_CCDD,
            stream_id: 0,
        };
        let mut buf = [0u8; TAG_HEADER_SIZE];
        header.write_to(&mut buf).unwrap();
        assert_eq!(
            buf,
            [0x09, 0x0A, 0x0B, 0x0C, 0xBB, 0xCC, 0xDD, 0xAA, 0x00, 0x00, 0x00]
        );
        assert_eq!(TagHeader::read_from(&buf).unwrap(), header);
    }

    #[test]
    fn unsupported_type_keeps_size() {
        let buf = [0x07, 0x00, 0x00, 0x20, 0, 0, 0, 0, 0, 0, 0];
        let result = TagHeader::read_from(&buf);
        assert!(matches!(
            result,
            Err(WireError::UnsupportedTagType {
                tag_type: 7,
                data_size: 32
            })
        ));
    }

    #[test]
    fn decode_clean_end_is_none() {
        let mut reader = &[0u8; 0][..];
        assert!(TagHeader::decode(&mut reader).unwrap().is_none());
    }

    #[test]
    fn decode_partial_prologue_is_truncated() {
        let mut reader = &[0x08u8, 0x00, 0x00][..];
        let result = TagHeader::decode(&mut reader);
        assert!(matches!(
            result,
            Err(WireError::Truncated {
                needed: 11,
                got: 3,
                ..
            })
        ));
    }
}
