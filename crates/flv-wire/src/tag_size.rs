//! The 4-byte "previous tag size" field.
//!
//! ```text
//!   header │ size=0 │ tag 1 │ size(tag 1) │ tag 2 │ size(tag 2) │ ...
//! ```
//!
//! Each field holds the size of the tag immediately before it (prologue
//! plus payload), or 0 for the field that precedes the first tag.

use std::io::Read;

use crate::error::WireError;
use crate::io::{discard, read_field};

/// Size of a tag-size field in bytes.
pub const TAG_SIZE_LEN: usize = 4;

/// Read a big-endian tag-size field.
///
/// # Returns
///
/// `Ok(None)` if the stream ends cleanly before the field starts.
///
/// # Errors
///
/// [`WireError::Truncated`] if only part of the field is present.
pub fn read_tag_size<R: Read + ?Sized>(reader: &mut R) -> Result<Option<u32>, WireError> {
    Ok(read_field(reader, TAG_SIZE_LEN, "tag size")?
        .map(|buf| u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])))
}

/// Discard a tag-size field without interpreting it.
///
/// Used to resynchronize after a tag whose body failed to decode. A short
/// or missing field is not an error here: the next read will report it.
///
/// # Errors
///
/// Propagates I/O errors from `reader`.
pub fn skip_tag_size<R: Read + ?Sized>(reader: &mut R) -> Result<u64, WireError> {
    Ok(discard(reader, TAG_SIZE_LEN as u64)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian() {
        let mut reader = &[0x00u8, 0x00, 0x01, 0x0B, 0xFF][..];
        assert_eq!(read_tag_size(&mut reader).unwrap(), Some(267));
        assert_eq!(reader, &[0xFF]);
    }

    #[test]
    fn clean_end_is_none() {
        let mut reader = &[0u8; 0][..];
        assert_eq!(read_tag_size(&mut reader).unwrap(), None);
    }

    #[test]
    fn partial_field_is_truncated() {
        let mut reader = &[0x00u8, 0x00, 0x01][..];
        let result = read_tag_size(&mut reader);
        assert!(matches!(
            result,
            Err(WireError::Truncated {
                field: "tag size",
                needed: 4,
                got: 3
            })
        ));
    }

    #[test]
    fn skip_consumes_four_bytes() {
        let mut reader = &[1u8, 2, 3, 4, 5][..];
        assert_eq!(skip_tag_size(&mut reader).unwrap(), 4);
        assert_eq!(reader, &[5]);
    }
}
