/// Implementation of `flv stats`.
///
/// # Example output
///
/// ```text
/// File:    /tmp/clip.flv
/// Tags:    1532 total, 0 skipped
///
/// Type      Count       Bytes
/// ──────────────────────────────
/// script        1         312
/// audio       760      179012
/// video       771     2120231
/// ──────────────────────────────
/// Total      1532     2299555
///
/// Keyframes:  13
/// Timestamps: 0 ms .. 30030 ms (30.03 s)
/// ```
use std::collections::BTreeMap;

use anyhow::{Context, Result};
use flv_decoder::{DecoderConfig, TagBody, TagHeader, TagType};

use crate::StatsArgs;

/// Running totals over the tags of one file.
#[derive(Debug, Default)]
pub(crate) struct Stats {
    /// Keyed by tag type name so the table prints in a stable order.
    pub per_type: BTreeMap<&'static str, TypeTotals>,
    pub keyframes: usize,
    pub skipped: usize,
    pub first_timestamp: Option<u32>,
    pub last_timestamp: Option<u32>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TypeTotals {
    pub count: usize,
    pub bytes: u64,
}

impl Stats {
    pub fn record(&mut self, header: &TagHeader, keyframe: bool) {
        let totals = self.per_type.entry(type_name(header.tag_type)).or_default();
        totals.count += 1;
        totals.bytes += u64::from(header.data_size);

        if keyframe {
            self.keyframes += 1;
        }
        if self.first_timestamp.is_none() {
            self.first_timestamp = Some(header.timestamp);
        }
        self.last_timestamp = Some(header.timestamp);
    }

    pub fn total(&self) -> TypeTotals {
        self.per_type
            .values()
            .fold(TypeTotals::default(), |acc, t| TypeTotals {
                count: acc.count + t.count,
                bytes: acc.bytes + t.bytes,
            })
    }
}

fn type_name(tag_type: TagType) -> &'static str {
    match tag_type {
        TagType::ScriptData => "script",
        TagType::Audio => "audio",
        TagType::Video => "video",
    }
}

/// Run the `flv stats` command.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoding hits a
/// fatal error.
pub fn run(args: &StatsArgs) -> Result<()> {
    let mut decoder = crate::open(&args.file, DecoderConfig::default())?;
    let mut stats = Stats::default();

    loop {
        match decoder.next_tag() {
            Ok(Some(tag)) => {
                let keyframe = matches!(&tag.body, TagBody::Video(video) if video.is_keyframe());
                stats.record(&tag.header, keyframe);
            }
            Ok(None) => break,
            Err(e) if e.is_recoverable() => stats.skipped += 1,
            Err(e) => {
                return Err(e).with_context(|| format!("failed to decode {}", args.file.display()));
            }
        }
    }

    let total = stats.total();
    println!("File:    {}", args.file.display());
    println!("Tags:    {} total, {} skipped", total.count, stats.skipped);
    println!();
    println!("{:<8} {:>7} {:>11}", "Type", "Count", "Bytes");
    println!("{}", "─".repeat(30));
    for name in ["script", "audio", "video"] {
        if let Some(t) = stats.per_type.get(name) {
            println!("{name:<8} {:>7} {:>11}", t.count, t.bytes);
        }
    }
    println!("{}", "─".repeat(30));
    println!("{:<8} {:>7} {:>11}", "Total", total.count, total.bytes);
    println!();
    println!("Keyframes:  {}", stats.keyframes);
    if let (Some(first), Some(last)) = (stats.first_timestamp, stats.last_timestamp) {
        let span = f64::from(last.saturating_sub(first)) / 1000.0;
        println!("Timestamps: {first} ms .. {last} ms ({span:.2} s)");
    }

    Ok(())
}
