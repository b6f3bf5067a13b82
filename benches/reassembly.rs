//! Benchmarks for the extraction hot paths
//!
//! - Reassembly of complete and lossy streams at realistic chunk counts
//! - Classification of chunk datagrams
//! - Reading and decoding an in-memory pcapng capture
//!
//! Platform: Cross-platform (synthetic captures, CI-safe)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use framecap::capture::{CaptureReader, LinkType};
use framecap::pipeline::reassemble;
use framecap::protocol::classify;
use framecap::test_utils::{PcapNgWriter, first_chunk, last_chunk, record, stream_datagram, stream_frame};
use framecap::transport;
use framecap::types::{StreamRecord, Timestamp};
use std::hint::black_box;

const CHUNK_BODY: usize = 1400;

/// Records of one stream with `chunks` positions, every `drop_every`-th lost
fn stream_records(chunks: u8, drop_every: Option<u8>) -> Vec<StreamRecord> {
    let ts = Timestamp::new(1_700_000_000, 0);
    let body = vec![0x5a; CHUNK_BODY];
    let mut records = vec![record(1, 0, &first_chunk(&body), ts)];
    for index in (1..=chunks).rev() {
        if drop_every.is_some_and(|n| index != chunks && index % n == 0) {
            continue;
        }
        let payload = if index == chunks { last_chunk(&body) } else { body.clone() };
        records.push(record(1, index, &payload, ts));
    }
    records
}

fn bench_reassemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("reassemble");

    for chunks in [16u8, 64, 255] {
        group.throughput(Throughput::Bytes(u64::from(chunks) * CHUNK_BODY as u64));

        let complete = stream_records(chunks, None);
        group.bench_with_input(BenchmarkId::new("complete", chunks), &complete, |b, records| {
            b.iter(|| black_box(reassemble(1, black_box(records.clone()))))
        });

        let lossy = stream_records(chunks, Some(7));
        group.bench_with_input(BenchmarkId::new("lossy", chunks), &lossy, |b, records| {
            b.iter(|| black_box(reassemble(1, black_box(records.clone()))))
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let datagram = stream_datagram(0x0102_0304, 9, 0, &vec![0x5a; CHUNK_BODY]);
    let noise = vec![0u8; 200];
    let ts = Timestamp::UNIX_EPOCH;

    let mut group = c.benchmark_group("classify");
    group.bench_function("chunk_datagram", |b| b.iter(|| black_box(classify(black_box(&datagram), ts))));
    group.bench_function("foreign_datagram", |b| b.iter(|| black_box(classify(black_box(&noise), ts))));
    group.finish();
}

fn bench_capture_read(c: &mut Criterion) {
    let body = vec![0x5a; CHUNK_BODY];
    let mut writer = PcapNgWriter::new(LinkType::ETHERNET);
    for stream in 0..32u32 {
        let ts = Timestamp::new(i64::from(stream), 0);
        writer.push_frame(&stream_frame(stream, 0, &first_chunk(&body), ts));
        for index in 1..32u8 {
            writer.push_frame(&stream_frame(stream, index, &body, ts));
        }
        writer.push_frame(&stream_frame(stream, 32, &last_chunk(&body), ts));
    }
    let capture = writer.finish();

    let mut group = c.benchmark_group("capture_read");
    group.throughput(Throughput::Bytes(capture.len() as u64));
    group.bench_function("pcapng_to_records", |b| {
        b.iter(|| {
            let mut reader = CaptureReader::from_bytes(capture.clone()).expect("valid capture");
            let mut records = 0usize;
            while let Some(frame) = reader.read_next_frame().expect("readable frame") {
                if let Some(payload) = transport::decode(&frame).udp_payload() {
                    records += usize::from(classify(payload, frame.timestamp).is_some());
                }
            }
            black_box(records)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_reassemble, bench_classify, bench_capture_read);
criterion_main!(benches);
