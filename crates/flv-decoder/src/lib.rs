#![warn(clippy::pedantic)]

pub mod audio;
pub mod config;
pub mod decoder;
pub mod error;
pub mod script;
pub mod tag;
pub mod video;

pub use audio::AudioData;
pub use config::DecoderConfig;
pub use decoder::Decoder;
pub use error::{DecodeError, ErrorKind};
pub use script::{OnMetaData, ScriptData};
pub use tag::{Payload, Tag, TagBody};
pub use video::VideoData;

pub use flv_wire::{FlvHeader, HeaderFlags, TagHeader, TagType};
pub use scuffle_amf0::Amf0Value;
