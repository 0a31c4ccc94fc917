/// Errors raised while reading the fixed-size framing fields of an FLV
/// stream: the file header, the tag prologue and the tag-size fields.
///
/// Payload-level problems (sub-headers, script values) are reported by
/// `flv-decoder`, which wraps this type.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The first three bytes were not `"FLV"`.
    #[error("invalid signature: expected \"FLV\", got {found:02X?}")]
    InvalidSignature { found: [u8; 3] },

    /// The header's data offset points inside the fixed header.
    #[error("data offset {offset} is smaller than the {min}-byte header")]
    DataOffsetTooSmall { offset: u32, min: u32 },

    /// The tag type byte is not audio (8), video (9) or script data (18).
    ///
    /// The declared payload size is kept so the caller can still skip
    /// the payload and stay aligned on the next tag.
    #[error("unsupported tag type {tag_type} ({data_size} byte payload)")]
    UnsupportedTagType { tag_type: u8, data_size: u32 },

    /// A fixed-size field ended before all of its bytes were available.
    #[error("truncated {field}: needed {needed} bytes, got {got}")]
    Truncated {
        field: &'static str,
        needed: usize,
        got: usize,
    },

    /// I/O error from the underlying reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WireError {
    /// Whether this error means the stream itself is not valid FLV, as
    /// opposed to being cut short or failing at the I/O layer.
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSignature { .. }
                | Self::DataOffsetTooSmall { .. }
                | Self::UnsupportedTagType { .. }
        )
    }
}
