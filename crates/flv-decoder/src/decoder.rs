use std::io::Read;

use flv_wire::io::discard;
use flv_wire::tag_size::TAG_SIZE_LEN;
use flv_wire::{FlvHeader, TagHeader, TrackedReader, WireError, read_tag_size, skip_tag_size};
use tracing::{debug, trace, warn};

use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::tag::{self, Tag};

/// Pull-based FLV decoder.
///
/// The file header is read by the constructor; after that each call to
/// [`next_tag`](Self::next_tag) yields one tag until the stream ends.
///
/// ```text
///   ┌────────┬────────┬───────┬──────────┬───────┬──────────┬─────
///   │ header │ size 0 │ tag 1 │ size(t1) │ tag 2 │ size(t2) │ ...
///   └────────┴────────┴───────┴──────────┴───────┴──────────┴─────
/// ```
///
/// Audio and video payloads are not buffered. A returned [`Tag`] reads
/// its sample bytes straight from the stream, and whatever it leaves
/// unread is skipped on the next call.
///
/// # Example
///
/// ```rust,no_run
/// use flv_decoder::{Decoder, TagBody};
///
/// # fn run() -> Result<(), flv_decoder::DecodeError> {
/// let file = std::fs::File::open("input.flv")?;
/// let mut decoder = Decoder::new(std::io::BufReader::new(file))?;
/// while let Some(tag) = decoder.next_tag()? {
///     if let TagBody::Script(script) = &tag.body {
///         println!("{:?}", script.on_meta_data());
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Decoder<R> {
    reader: TrackedReader<R>,
    header: FlvHeader,
    config: DecoderConfig,
    state: State,
}

/// Where the decoder is in the stream.
///
/// ```text
///   NotStarted ──► Running ──► Finished
///        │            │
///        └────────────┴──────► Failed
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Header read; the zero tag-size field in front of the first tag
    /// has not been.
    NotStarted,
    /// At least one tag has been framed.
    Running(Resume),
    Finished,
    /// A fatal error was returned. Nothing more will be read.
    Failed,
}

/// What to do with the tag-size field that follows the last tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resume {
    /// The last tag was returned to the caller. Its payload ends at
    /// `payload_end` and the field should hold `tag_size`.
    Check { payload_end: u64, tag_size: u32 },
    /// The last tag failed to decode and its payload was skipped; the
    /// field is skipped too.
    Skip,
}

impl<R: Read> Decoder<R> {
    /// Read the file header and position the stream at the first
    /// tag-size field.
    ///
    /// # Errors
    ///
    /// Any header error from [`FlvHeader::decode`], or
    /// [`WireError::Truncated`] if the stream ends inside the extra header
    /// bytes announced by `data_offset`.
    pub fn new(reader: R) -> Result<Self, DecodeError> {
        Self::with_config(reader, DecoderConfig::default())
    }

    /// As [`new`](Self::new), with explicit strictness options.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn with_config(reader: R, config: DecoderConfig) -> Result<Self, DecodeError> {
        let mut reader = TrackedReader::new(reader);
        let header = FlvHeader::decode(&mut reader)?;

        let extra = u64::from(header.extra_header_len());
        if extra > 0 {
            let skipped = discard(&mut reader, extra)?;
            if skipped < extra {
                return Err(
                    WireError::Truncated {
                        field: "extra header bytes",
                        needed: usize::try_from(extra).unwrap_or(usize::MAX),
                        got: usize::try_from(skipped).unwrap_or(usize::MAX),
                    }
                    .into(),
                );
            }
        }

        debug!(
            version = header.version,
            has_audio = header.flags.has_audio(),
            has_video = header.flags.has_video(),
            data_offset = header.data_offset,
            "decoded FLV header"
        );

        Ok(Self {
            reader,
            header,
            config,
            state: State::NotStarted,
        })
    }

    #[must_use]
    pub fn header(&self) -> &FlvHeader {
        &self.header
    }

    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Bytes consumed from the underlying reader so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Decode the next tag.
    ///
    /// Returns `Ok(None)` once the stream has ended cleanly, and on every
    /// call after that.
    ///
    /// # Errors
    ///
    /// When [`DecodeError::is_recoverable`] holds, the failed tag has
    /// been skipped and the next call continues with the tag after it.
    /// Any other error is fatal: later calls return
    /// [`DecodeError::Poisoned`].
    pub fn next_tag(&mut self) -> Result<Option<Tag<'_, R>>, DecodeError> {
        let header = match self.frame_next() {
            Ok(Some(header)) => header,
            Ok(None) => return Ok(None),
            Err(err) => return Err(settle(&mut self.state, err)),
        };

        let payload_end = self.reader.position() + u64::from(header.data_size);
        let offset = payload_end - u64::from(header.tag_size());
        trace!(
            tag_type = %header.tag_type,
            data_size = header.data_size,
            timestamp = header.timestamp,
            offset,
            "decoding tag"
        );

        let Self { reader, state, .. } = self;
        match tag::decode_body(reader, &header) {
            Ok(body) => {
                *state = State::Running(Resume::Check {
                    payload_end,
                    tag_size: header.tag_size(),
                });
                Ok(Some(Tag {
                    header,
                    offset,
                    body,
                }))
            }
            Err(err) => Err(settle(state, err)),
        }
    }

    /// Advance past the tag-size field and read the next prologue.
    fn frame_next(&mut self) -> Result<Option<TagHeader>, DecodeError> {
        match self.state {
            State::Failed => return Err(DecodeError::Poisoned),
            State::Finished => return Ok(None),
            State::NotStarted => match read_tag_size(&mut self.reader)? {
                None => {
                    self.finish();
                    return Ok(None);
                }
                Some(0) => {}
                Some(found) => return Err(DecodeError::InitialTagSize { found }),
            },
            State::Running(Resume::Check {
                payload_end,
                tag_size,
            }) => {
                self.skip_unread(payload_end)?;
                let found = read_tag_size(&mut self.reader)?.ok_or(WireError::Truncated {
                    field: "tag size",
                    needed: TAG_SIZE_LEN,
                    got: 0,
                })?;
                if self.config.strict_tag_sizes && found != tag_size {
                    return Err(DecodeError::TagSizeMismatch {
                        expected: tag_size,
                        found,
                    });
                }
            }
            State::Running(Resume::Skip) => {
                let skipped = skip_tag_size(&mut self.reader)?;
                if skipped < TAG_SIZE_LEN as u64 {
                    return Err(WireError::Truncated {
                        field: "tag size",
                        needed: TAG_SIZE_LEN,
                        got: usize::try_from(skipped).unwrap_or(usize::MAX),
                    }
                    .into());
                }
                warn!(skipped, "skipped tag size after undecodable tag");
            }
        }

        let header = tag::read_prologue(&mut self.reader, &self.config)?;
        if header.is_none() {
            self.finish();
        }
        Ok(header)
    }

    /// Discard payload bytes the caller did not read.
    fn skip_unread(&mut self, payload_end: u64) -> Result<(), DecodeError> {
        let unread = payload_end.saturating_sub(self.reader.position());
        if unread == 0 {
            return Ok(());
        }

        let skipped = discard(&mut self.reader, unread)?;
        trace!(skipped, "skipped unread payload");
        if skipped < unread {
            return Err(
                WireError::Truncated {
                    field: "tag payload",
                    needed: usize::try_from(unread).unwrap_or(usize::MAX),
                    got: usize::try_from(skipped).unwrap_or(usize::MAX),
                }
                .into(),
            );
        }
        Ok(())
    }

    fn finish(&mut self) {
        debug!(position = self.reader.position(), "end of stream");
        self.state = State::Finished;
    }
}

/// Record the outcome of a failed call and hand the error back.
fn settle(state: &mut State, err: DecodeError) -> DecodeError {
    if err.is_recoverable() {
        *state = State::Running(Resume::Skip);
    } else {
        if *state != State::Failed {
            debug!(error = %err, "decoder failed");
        }
        *state = State::Failed;
    }
    err
}
