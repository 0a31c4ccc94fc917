/// Implementation of `flv inspect`.
///
/// # Example output
///
/// ```text
/// Header:  FLV v1, audio+video, data offset 9
///
///    #     offset  type    timestamp     size  details
///    0         13  script          0      312  onMetaData
///    1        340  video           0       46  keyframe avc sequence-header cts=0
///    2        401  audio           0        7  aac 44100Hz 16bit stereo sequence-header
///
/// Metadata:
///   duration     30.03 s
///   resolution   1280x720
/// ```
use std::io::Read;

use anyhow::{Context, Result};
use flv_decoder::{DecoderConfig, FlvHeader, OnMetaData, Tag, TagBody};

use crate::InspectArgs;

const PREVIEW_LEN: u64 = 16;

/// Run the `flv inspect` command.
///
/// Tags that fail to decode but can be skipped are reported inline and
/// inspection continues.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoding hits a
/// fatal error.
pub fn run(args: &InspectArgs) -> Result<()> {
    let mut decoder = crate::open(&args.file, DecoderConfig::default())?;
    println!("Header:  {}", describe_header(decoder.header()));
    println!();
    println!(
        "{:>4}  {:>9}  {:<6}  {:>9}  {:>7}  details",
        "#", "offset", "type", "timestamp", "size"
    );

    let mut metadata: Option<OnMetaData> = None;
    let mut index = 0usize;

    while args.limit.is_none_or(|limit| index < limit) {
        let mut tag = match decoder.next_tag() {
            Ok(Some(tag)) => tag,
            Ok(None) => break,
            Err(e) if e.is_recoverable() => {
                println!("{index:>4}  {:>9}  error: {e}", "-");
                index += 1;
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed at tag {index}"));
            }
        };

        let mut line = describe_tag(&tag);
        if metadata.is_none()
            && let TagBody::Script(script) = &tag.body
        {
            metadata = script.on_meta_data();
        }
        if args.show_data
            && let Some(data) = tag.data()
        {
            let mut preview = Vec::new();
            data.take(PREVIEW_LEN)
                .read_to_end(&mut preview)
                .context("failed to read tag payload")?;
            line.push_str("  ");
            line.push_str(&hex::encode(&preview));
        }

        println!(
            "{index:>4}  {:>9}  {:<6}  {:>9}  {:>7}  {line}",
            tag.offset,
            tag.tag_type().to_string(),
            tag.timestamp(),
            tag.header.data_size,
        );
        index += 1;
    }

    if let Some(meta) = metadata {
        println!();
        print_metadata(&meta);
    }

    Ok(())
}

fn describe_header(header: &FlvHeader) -> String {
    let content = match (header.flags.has_audio(), header.flags.has_video()) {
        (true, true) => "audio+video",
        (true, false) => "audio",
        (false, true) => "video",
        (false, false) => "no streams flagged",
    };
    format!(
        "FLV v{}, {content}, data offset {}",
        header.version, header.data_offset
    )
}

/// One-line summary of a tag body.
pub(crate) fn describe_tag<R>(tag: &Tag<'_, R>) -> String {
    match &tag.body {
        TagBody::Audio(audio) => {
            let mut out = format!(
                "{} {} {} {}",
                audio.sound_format, audio.sound_rate, audio.sound_size, audio.sound_type
            );
            if let Some(packet_type) = audio.aac_packet_type {
                out.push_str(&format!(" {packet_type}"));
            }
            out
        }
        TagBody::Video(video) => {
            let mut out = format!("{} {}", video.frame_type, video.codec_id);
            if let Some(avc) = video.avc {
                out.push_str(&format!(" {} cts={}", avc.packet_type, avc.composition_time));
            }
            out
        }
        TagBody::Script(script) => {
            let mut names: Vec<&str> = script.objects.keys().map(String::as_str).collect();
            names.sort_unstable();
            names.join(", ")
        }
    }
}

fn print_metadata(meta: &OnMetaData) {
    println!("Metadata:");
    if let Some(duration) = meta.duration {
        println!("  duration     {duration:.2} s");
    }
    if let (Some(w), Some(h)) = (meta.width, meta.height) {
        println!("  resolution   {w}x{h}");
    }
    if let Some(fps) = meta.framerate {
        println!("  framerate    {fps}");
    }
    if let Some(rate) = meta.video_data_rate {
        println!("  video rate   {rate} kbps");
    }
    if let Some(rate) = meta.audio_data_rate {
        println!("  audio rate   {rate} kbps");
    }
    if let Some(encoder) = &meta.encoder {
        println!("  encoder      {encoder}");
    }
}
