use std::io::Read;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use flv_decoder::{Amf0Value, Decoder, ScriptData};
use flv_tests::script_payload;
use flv_tests::{FlvBuilder, sample_stream};
use flv_types::{AacPacketType, AvcPacketType, FrameType};

/// A stream of `frames` video frames of `frame_size` bytes with one audio
/// frame after each.
fn av_stream(frames: u32, frame_size: usize) -> Vec<u8> {
    let video = vec![0x41u8; frame_size];
    let audio = [0x21u8; 200];
    let mut builder = FlvBuilder::new();
    builder.avc(0, FrameType::Keyframe, AvcPacketType::SequenceHeader, 0, &[1, 2, 3]);
    for i in 0..frames {
        let frame_type = if i % 50 == 0 {
            FrameType::Keyframe
        } else {
            FrameType::InterFrame
        };
        builder.avc(i * 40, frame_type, AvcPacketType::Nalu, 0, &video);
        builder.aac(i * 40, AacPacketType::Raw, &audio);
    }
    builder.build()
}

fn bench_decode_sample(c: &mut Criterion) {
    let bytes = sample_stream();
    c.bench_function("decode_sample", |b| {
        b.iter(|| {
            let mut decoder = Decoder::new(bytes.as_slice()).unwrap();
            while decoder.next_tag().unwrap().is_some() {}
        });
    });
}

/// Headers only: payloads are skipped without being read.
fn bench_skip_payloads(c: &mut Criterion) {
    let mut group = c.benchmark_group("skip_payloads");
    for frame_size in [1_000usize, 20_000, 200_000] {
        let bytes = av_stream(100, frame_size);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(frame_size), &bytes, |b, bytes| {
            b.iter(|| {
                let mut decoder = Decoder::new(bytes.as_slice()).unwrap();
                let mut tags = 0usize;
                while decoder.next_tag().unwrap().is_some() {
                    tags += 1;
                }
                tags
            });
        });
    }
    group.finish();
}

/// Every payload read to the end through its bounded reader.
fn bench_read_payloads(c: &mut Criterion) {
    let bytes = av_stream(100, 20_000);
    let mut group = c.benchmark_group("read_payloads");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("20k_frames", |b| {
        let mut sink = Vec::with_capacity(32 * 1024);
        b.iter(|| {
            let mut decoder = Decoder::new(bytes.as_slice()).unwrap();
            while let Some(mut tag) = decoder.next_tag().unwrap() {
                if let Some(data) = tag.data() {
                    sink.clear();
                    data.read_to_end(&mut sink).unwrap();
                }
            }
        });
    });
    group.finish();
}

/// A large `onMetaData` entry, like the keyframe index some muxers write.
fn bench_script_metadata(c: &mut Criterion) {
    let names: Vec<String> = (0..1_000).map(|i| format!("keyframe{i}")).collect();
    let properties: Vec<(&str, Amf0Value<'_>)> = names
        .iter()
        .zip(0u32..)
        .map(|(name, i)| (name.as_str(), Amf0Value::Number(f64::from(i) * 0.04)))
        .collect();
    let bytes = FlvBuilder::new().metadata(&properties).build();
    let payload = script_payload(&properties);

    let mut group = c.benchmark_group("script_metadata");
    group.bench_function("tag", |b| {
        b.iter(|| {
            let mut decoder = Decoder::new(bytes.as_slice()).unwrap();
            decoder.next_tag().unwrap().is_some()
        });
    });
    group.bench_function("pairs", |b| {
        b.iter(|| ScriptData::decode(&payload).unwrap().objects.len());
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_decode_sample,
    bench_skip_payloads,
    bench_read_payloads,
    bench_script_metadata
);
criterion_main!(benches);
