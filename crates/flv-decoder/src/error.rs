use flv_wire::{TagType, WireError};
use scuffle_amf0::Amf0ReadError;

/// Errors returned by [`Decoder`](crate::Decoder).
///
/// ```text
///   DecodeError
///   ├── Wire(WireError)         ← signature, data offset, tag type, truncation
///   ├── InitialTagSize          ← first tag-size field not 0
///   ├── TagSizeMismatch         ← strict mode only
///   ├── NonZeroStreamId         ← strict mode only
///   ├── UnexpectedEndOfPayload  ← audio/video sub-header cut short
///   ├── ScriptName              ← script-data name is not a string
///   ├── ValueDecode             ← AMF0 failure in script data
///   ├── Poisoned                ← a fatal error happened earlier
///   └── Io(std::io::Error)
/// ```
///
/// Some errors leave the decoder usable: the failed tag's payload has
/// already been skipped and the next call continues with the following
/// tag. See [`is_recoverable`](Self::is_recoverable).
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Wire(#[from] WireError),

    /// The tag-size field in front of the first tag must be 0.
    #[error("first tag size must be 0, found {found}")]
    InitialTagSize { found: u32 },

    #[error("previous tag size mismatch: expected {expected}, found {found}")]
    TagSizeMismatch { expected: u32, found: u32 },

    #[error("stream id must be 0, found {stream_id}")]
    NonZeroStreamId { stream_id: u32 },

    /// A required field inside a tag payload ran past the payload's end.
    ///
    /// Distinct from [`WireError::Truncated`]: the stream itself may be
    /// fine, the tag just declared a data size too small for its contents.
    #[error("{tag_type} payload ended before {field}")]
    UnexpectedEndOfPayload {
        tag_type: TagType,
        field: &'static str,
    },

    /// A script-data pair started with something other than a string.
    #[error("script data name must be a string, found {found}")]
    ScriptName { found: &'static str },

    /// A script-data name or value failed to decode. `name` is the
    /// pair's name when it had already been read.
    #[error("failed to decode script value {}", .name.as_deref().unwrap_or("name"))]
    ValueDecode {
        name: Option<String>,
        #[source]
        source: Amf0ReadError,
    },

    #[error("decoder stopped after an earlier fatal error")]
    Poisoned,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`DecodeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The bytes violate the FLV format.
    Format,
    /// The stream ended inside a fixed-size field or payload.
    Truncated,
    /// A tag's payload was too short for its own sub-header.
    UnexpectedEndOfPayload,
    /// Script data could not be decoded.
    ValueDecode,
    Io,
    Poisoned,
}

impl DecodeError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Wire(WireError::Truncated { .. }) => ErrorKind::Truncated,
            Self::Wire(WireError::Io(_)) | Self::Io(_) => ErrorKind::Io,
            Self::Wire(_)
            | Self::InitialTagSize { .. }
            | Self::TagSizeMismatch { .. }
            | Self::NonZeroStreamId { .. } => ErrorKind::Format,
            Self::UnexpectedEndOfPayload { .. } => ErrorKind::UnexpectedEndOfPayload,
            Self::ScriptName { .. } | Self::ValueDecode { .. } => ErrorKind::ValueDecode,
            Self::Poisoned => ErrorKind::Poisoned,
        }
    }

    /// Whether the decoder can carry on after this error.
    ///
    /// True for failures confined to one tag whose payload was fully
    /// skipped: an unsupported tag type, a rejected stream id, or a body
    /// that did not decode. Everything else is fatal and poisons the
    /// decoder.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Wire(WireError::UnsupportedTagType { .. })
                | Self::NonZeroStreamId { .. }
                | Self::UnexpectedEndOfPayload { .. }
                | Self::ScriptName { .. }
                | Self::ValueDecode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_errors_are_classified() {
        let truncated = DecodeError::from(WireError::Truncated {
            field: "tag header",
            needed: 11,
            got: 2,
        });
        assert_eq!(truncated.kind(), ErrorKind::Truncated);
        assert!(!truncated.is_recoverable());

        let signature = DecodeError::from(WireError::InvalidSignature { found: *b"RIF" });
        assert_eq!(signature.kind(), ErrorKind::Format);
        assert!(!signature.is_recoverable());

        let unsupported = DecodeError::from(WireError::UnsupportedTagType {
            tag_type: 15,
            data_size: 4,
        });
        assert_eq!(unsupported.kind(), ErrorKind::Format);
        assert!(unsupported.is_recoverable());
    }

    #[test]
    fn value_decode_message_names_the_pair() {
        let source = scuffle_amf0::Amf0Decoder::new(&[0x42]).decode().unwrap_err();
        let err = DecodeError::ValueDecode {
            name: Some("onMetaData".into()),
            source,
        };
        assert_eq!(err.to_string(), "failed to decode script value onMetaData");
        assert_eq!(err.kind(), ErrorKind::ValueDecode);
        assert!(err.is_recoverable());
    }

    #[test]
    fn script_name_is_a_value_error() {
        let err = DecodeError::ScriptName { found: "number" };
        assert_eq!(err.to_string(), "script data name must be a string, found number");
        assert_eq!(err.kind(), ErrorKind::ValueDecode);
        assert!(err.is_recoverable());
    }

    #[test]
    fn payload_error_message() {
        let err = DecodeError::UnexpectedEndOfPayload {
            tag_type: TagType::Video,
            field: "AVC packet header",
        };
        assert_eq!(err.to_string(), "video payload ended before AVC packet header");
    }
}
