use std::io::Read;

use flv_types::{AacPacketType, AudioTagHeader, SoundFormat, SoundRate, SoundSize, SoundType};
use flv_wire::TagType;

use crate::error::DecodeError;
use crate::tag::read_sub_header;

/// A decoded audio tag.
///
/// `data` is positioned at the first sample byte and yields the rest of
/// the payload. Nothing is buffered: bytes the caller does not read are
/// skipped by the decoder before the next tag.
#[derive(Debug)]
pub struct AudioData<P> {
    pub sound_format: SoundFormat,
    pub sound_rate: SoundRate,
    pub sound_size: SoundSize,
    pub sound_type: SoundType,
    /// Present exactly when `sound_format` is AAC.
    pub aac_packet_type: Option<AacPacketType>,
    pub data: P,
}

impl<P> AudioData<P> {
    pub(crate) fn new(
        header: AudioTagHeader,
        aac_packet_type: Option<AacPacketType>,
        data: P,
    ) -> Self {
        Self {
            sound_format: header.sound_format,
            sound_rate: header.sound_rate,
            sound_size: header.sound_size,
            sound_type: header.sound_type,
            aac_packet_type,
            data,
        }
    }

    #[must_use]
    pub fn is_aac_sequence_header(&self) -> bool {
        self.aac_packet_type == Some(AacPacketType::SequenceHeader)
    }
}

/// Read the audio sub-header (and the AAC packet type, when present)
/// from the front of a payload.
pub(crate) fn read_header<P: Read>(
    payload: &mut P,
) -> Result<(AudioTagHeader, Option<AacPacketType>), DecodeError> {
    let [byte] = read_sub_header::<_, 1>(payload, TagType::Audio, "audio header")?;
    let header = AudioTagHeader::from_byte(byte);

    let aac_packet_type = if header.is_aac() {
        let [packet_type] = read_sub_header::<_, 1>(payload, TagType::Audio, "AAC packet type")?;
        Some(AacPacketType::from_bits(packet_type))
    } else {
        None
    };

    Ok((header, aac_packet_type))
}
