use std::io::Read;

use flv_types::video::AVC_PACKET_HEADER_SIZE;
use flv_types::{AvcPacketHeader, CodecId, FrameType, VideoTagHeader};
use flv_wire::TagType;

use crate::error::DecodeError;
use crate::tag::read_sub_header;

/// A decoded video tag. See [`AudioData`](crate::AudioData) for how
/// `data` behaves.
#[derive(Debug)]
pub struct VideoData<P> {
    pub frame_type: FrameType,
    pub codec_id: CodecId,
    /// Present exactly when `codec_id` is AVC.
    pub avc: Option<AvcPacketHeader>,
    pub data: P,
}

impl<P> VideoData<P> {
    pub(crate) fn new(header: VideoTagHeader, avc: Option<AvcPacketHeader>, data: P) -> Self {
        Self {
            frame_type: header.frame_type,
            codec_id: header.codec_id,
            avc,
            data,
        }
    }

    #[must_use]
    pub fn is_keyframe(&self) -> bool {
        self.frame_type == FrameType::Keyframe
    }
}

pub(crate) fn read_header<P: Read>(
    payload: &mut P,
) -> Result<(VideoTagHeader, Option<AvcPacketHeader>), DecodeError> {
    let [byte] = read_sub_header::<_, 1>(payload, TagType::Video, "video header")?;
    let header = VideoTagHeader::from_byte(byte);

    let avc = if header.is_avc() {
        let bytes = read_sub_header::<_, AVC_PACKET_HEADER_SIZE>(
            payload,
            TagType::Video,
            "AVC packet header",
        )?;
        Some(AvcPacketHeader::from_bytes(bytes))
    } else {
        None
    };

    Ok((header, avc))
}
