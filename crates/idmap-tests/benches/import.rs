use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use idmap_import::{ImportPipeline, MemorySource, SymbolTable};
use idmap_tests::{CountingSink, synthetic_map};

fn bench_import_counting(c: &mut Criterion) {
    let payload = synthetic_map(10_000);
    let pipeline = ImportPipeline::default();

    let mut group = c.benchmark_group("import");
    group.throughput(Throughput::Elements(10_000));

    group.bench_function("counting_sink", |b| {
        b.iter(|| {
            let mut sink = CountingSink::default();
            pipeline
                .run(MemorySource::new(payload.clone()), 0x1_4000_0000, &mut sink)
                .unwrap()
        });
    });

    group.bench_function("symbol_table", |b| {
        b.iter(|| {
            let mut table = SymbolTable::new();
            pipeline
                .run(MemorySource::new(payload.clone()), 0x1_4000_0000, &mut table)
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_import_counting);
criterion_main!(benches);
