use std::borrow::Cow;
use std::collections::HashMap;

use scuffle_amf0::{Amf0Decoder, Amf0Value};

use crate::error::DecodeError;

/// Name of the metadata entry written by nearly every FLV muxer.
pub const ON_META_DATA: &str = "onMetaData";

type Properties = [(Cow<'static, str>, Amf0Value<'static>)];

/// A decoded script-data tag: AMF0 `(name, value)` pairs.
///
/// When a name repeats, the later value replaces the earlier one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptData {
    pub objects: HashMap<String, Amf0Value<'static>>,
}

impl ScriptData {
    /// Decode pairs until the payload is exhausted.
    ///
    /// Running out of input exactly where a name would start ends the
    /// sequence normally. Running out anywhere else, including between a
    /// name and its value, is an error.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::ScriptName`] if a name is not an AMF0 string.
    /// - [`DecodeError::ValueDecode`] with the pair's name if it was read.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let mut decoder = Amf0Decoder::new(payload);
        let mut objects = HashMap::new();

        while !decoder.is_empty() {
            let name = match decoder.decode() {
                Ok(Amf0Value::String(name) | Amf0Value::LongString(name)) => name.into_owned(),
                Ok(other) => {
                    return Err(DecodeError::ScriptName {
                        found: type_name(&other),
                    });
                }
                Err(source) => return Err(DecodeError::ValueDecode { name: None, source }),
            };
            let value = decoder.decode().map_err(|source| DecodeError::ValueDecode {
                name: Some(name.clone()),
                source,
            })?;
            objects.insert(name, value.to_owned());
        }

        Ok(Self { objects })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Amf0Value<'static>> {
        self.objects.get(name)
    }

    /// Typed view of the `onMetaData` entry, if there is one.
    #[must_use]
    pub fn on_meta_data(&self) -> Option<OnMetaData> {
        OnMetaData::from_script(self)
    }
}

fn type_name(value: &Amf0Value<'_>) -> &'static str {
    match value {
        Amf0Value::Number(_) => "number",
        Amf0Value::Boolean(_) => "boolean",
        Amf0Value::Object(_) => "object",
        Amf0Value::Null => "null",
        _ => "non-string value",
    }
}

/// The commonly used fields of an `onMetaData` entry.
///
/// Every field is optional: muxers write different subsets, and a field
/// of the wrong AMF0 type is treated as absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OnMetaData {
    /// Seconds.
    pub duration: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub framerate: Option<f64>,
    /// Kilobits per second.
    pub video_data_rate: Option<f64>,
    pub audio_data_rate: Option<f64>,
    pub video_codec_id: Option<f64>,
    pub audio_codec_id: Option<f64>,
    pub audio_sample_rate: Option<f64>,
    pub audio_sample_size: Option<f64>,
    pub stereo: Option<bool>,
    /// Bytes.
    pub file_size: Option<f64>,
    pub encoder: Option<String>,
}

impl OnMetaData {
    /// Extract the metadata view from decoded script data.
    ///
    /// Returns `None` when there is no `onMetaData` entry or it is not an
    /// object. ECMA arrays decode as objects.
    #[must_use]
    pub fn from_script(script: &ScriptData) -> Option<Self> {
        let Amf0Value::Object(properties) = script.get(ON_META_DATA)? else {
            return None;
        };
        let properties: &Properties = properties;

        let number = |key: &str| match property(properties, key) {
            Some(Amf0Value::Number(n)) => Some(*n),
            _ => None,
        };
        Some(Self {
            duration: number("duration"),
            width: number("width"),
            height: number("height"),
            framerate: number("framerate"),
            video_data_rate: number("videodatarate"),
            audio_data_rate: number("audiodatarate"),
            video_codec_id: number("videocodecid"),
            audio_codec_id: number("audiocodecid"),
            audio_sample_rate: number("audiosamplerate"),
            audio_sample_size: number("audiosamplesize"),
            stereo: match property(properties, "stereo") {
                Some(Amf0Value::Boolean(b)) => Some(*b),
                _ => None,
            },
            file_size: number("filesize"),
            encoder: match property(properties, "encoder") {
                Some(Amf0Value::String(s) | Amf0Value::LongString(s)) => Some(s.to_string()),
                _ => None,
            },
        })
    }
}

/// Look up an object property. The last of several equal keys wins.
fn property<'v>(properties: &'v Properties, key: &str) -> Option<&'v Amf0Value<'static>> {
    properties
        .iter()
        .rev()
        .find(|(name, _)| &**name == key)
        .map(|(_, value)| value)
}
