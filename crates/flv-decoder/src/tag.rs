//! Tag framing and dispatch.
//!
//! Each tag is an 11-byte prologue followed by `data_size` payload bytes.
//! The payload is wrapped in a [`BoundedReader`] and handed to the
//! sub-decoder for its type; a sub-decoder can never read past the
//! payload into the next tag's framing.

use std::io::Read;

use flv_wire::io::read_fill;
use flv_wire::{BoundedReader, TagHeader, TagType, TrackedReader, WireError};
use tracing::warn;

use crate::audio::{self, AudioData};
use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::script::ScriptData;
use crate::video::{self, VideoData};

/// The unread remainder of a tag payload, read straight from the
/// decoder's stream.
pub type Payload<'a, R> = BoundedReader<&'a mut TrackedReader<R>>;

/// One decoded tag.
///
/// Audio and video tags borrow the decoder through their `data` reader,
/// so a `Tag` must be dropped before the next call to
/// [`Decoder::next_tag`](crate::Decoder::next_tag).
#[derive(Debug)]
pub struct Tag<'a, R> {
    pub header: TagHeader,
    /// Stream offset of the tag's first prologue byte.
    pub offset: u64,
    pub body: TagBody<'a, R>,
}

#[derive(Debug)]
pub enum TagBody<'a, R> {
    Audio(AudioData<Payload<'a, R>>),
    Video(VideoData<Payload<'a, R>>),
    Script(ScriptData),
}

impl<'a, R> Tag<'a, R> {
    #[must_use]
    pub fn tag_type(&self) -> TagType {
        self.header.tag_type
    }

    /// Milliseconds, with the extension byte applied.
    #[must_use]
    pub fn timestamp(&self) -> u32 {
        self.header.timestamp
    }

    #[must_use]
    pub fn stream_id(&self) -> u32 {
        self.header.stream_id
    }

    /// The undecoded sample bytes of an audio or video tag.
    pub fn data(&mut self) -> Option<&mut Payload<'a, R>> {
        match &mut self.body {
            TagBody::Audio(audio) => Some(&mut audio.data),
            TagBody::Video(video) => Some(&mut video.data),
            TagBody::Script(_) => None,
        }
    }
}

/// Read the next prologue.
///
/// `Ok(None)` means the stream ended cleanly where a tag would start.
/// Tags rejected here (unknown type, or a non-zero stream id when that is
/// required) have their payload skipped before the error is returned.
pub(crate) fn read_prologue<R: Read>(
    reader: &mut TrackedReader<R>,
    config: &DecoderConfig,
) -> Result<Option<TagHeader>, DecodeError> {
    let header = match TagHeader::decode(reader) {
        Ok(Some(header)) => header,
        Ok(None) => return Ok(None),
        Err(err @ WireError::UnsupportedTagType { data_size, .. }) => {
            let mut payload = BoundedReader::new(reader, u64::from(data_size));
            return Err(abandon(&mut payload, err.into()));
        }
        Err(err) => return Err(err.into()),
    };

    if config.require_zero_stream_id && header.stream_id != 0 {
        let mut payload = BoundedReader::new(reader, u64::from(header.data_size));
        return Err(abandon(
            &mut payload,
            DecodeError::NonZeroStreamId {
                stream_id: header.stream_id,
            },
        ));
    }

    Ok(Some(header))
}

/// Decode the body of the tag whose prologue was just read.
pub(crate) fn decode_body<'a, R: Read>(
    reader: &'a mut TrackedReader<R>,
    header: &TagHeader,
) -> Result<TagBody<'a, R>, DecodeError> {
    let mut payload = BoundedReader::new(reader, u64::from(header.data_size));

    match header.tag_type {
        TagType::Audio => match audio::read_header(&mut payload) {
            Ok((sub_header, aac)) => {
                Ok(TagBody::Audio(AudioData::new(sub_header, aac, payload)))
            }
            Err(err) => Err(abandon(&mut payload, err)),
        },
        TagType::Video => match video::read_header(&mut payload) {
            Ok((sub_header, avc)) => {
                Ok(TagBody::Video(VideoData::new(sub_header, avc, payload)))
            }
            Err(err) => Err(abandon(&mut payload, err)),
        },
        TagType::ScriptData => {
            let wanted = payload.remaining();
            let bytes = payload.read_remaining()?;
            if !payload.is_exhausted() {
                return Err(WireError::Truncated {
                    field: "tag payload",
                    needed: usize::try_from(wanted).unwrap_or(usize::MAX),
                    got: bytes.len(),
                }
                .into());
            }
            ScriptData::decode(&bytes).map(TagBody::Script)
        }
    }
}

/// Skip whatever is left of a payload that failed to decode and return
/// the error to report.
///
/// If the stream ends before the payload does, the tag error is replaced
/// by a truncation error, since nothing after it can be framed.
fn abandon<R: Read>(payload: &mut BoundedReader<R>, err: DecodeError) -> DecodeError {
    let wanted = payload.remaining();
    match payload.drain() {
        Ok(drained) if drained == wanted => {
            warn!(drained, error = %err, "skipped payload of undecodable tag");
            err
        }
        Ok(drained) => WireError::Truncated {
            field: "tag payload",
            needed: usize::try_from(wanted).unwrap_or(usize::MAX),
            got: usize::try_from(drained).unwrap_or(usize::MAX),
        }
        .into(),
        Err(io) => DecodeError::Io(io),
    }
}

/// Read a fixed-size field from the front of a payload.
pub(crate) fn read_sub_header<P: Read, const N: usize>(
    payload: &mut P,
    tag_type: TagType,
    field: &'static str,
) -> Result<[u8; N], DecodeError> {
    let mut buf = [0u8; N];
    if read_fill(payload, &mut buf)? < N {
        return Err(DecodeError::UnexpectedEndOfPayload { tag_type, field });
    }
    Ok(buf)
}
