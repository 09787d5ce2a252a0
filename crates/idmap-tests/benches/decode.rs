use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use idmap_decoder::{IdmapDecoder, RecordStream};
use idmap_tests::synthetic_map;

fn bench_decode_slice(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_slice");

    for count in [100u32, 10_000, 100_000] {
        let payload = synthetic_map(count);
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &payload, |b, p| {
            b.iter(|| IdmapDecoder::decode(p));
        });
    }

    group.finish();
}

fn bench_decode_stream(c: &mut Criterion) {
    let payload = synthetic_map(10_000);

    c.bench_function("decode_stream_10k", |b| {
        b.iter(|| {
            let stream = RecordStream::new(Cursor::new(payload.as_slice())).unwrap();
            stream.map(Result::unwrap).count()
        });
    });
}

criterion_group!(benches, bench_decode_slice, bench_decode_stream);
criterion_main!(benches);
