#![warn(clippy::pedantic)]

#[macro_use]
mod macros;

pub mod audio;
pub mod video;

pub use audio::{AacPacketType, AudioTagHeader, SoundFormat, SoundRate, SoundSize, SoundType};
pub use video::{AvcPacketHeader, AvcPacketType, CodecId, FrameType, VideoTagHeader};
