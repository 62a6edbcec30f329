use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pack_tally::decode;
use std::hint::black_box;

fn measurement_input(len: usize) -> String {
    // Cycle through the whole alphabet plus the placeholder so every branch
    // of the decoder gets exercised.
    "abcdefghijklmnopqrstuvwxyz_z".chars().cycle().take(len).collect()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [64, 256, 1024, 4096, 16384].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        let input = measurement_input(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| decode(black_box(input)));
        });
    }
    group.finish();
}

fn bench_decode_chain_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_chain_heavy");

    for size in [256, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        let input: String = "z".repeat(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| decode(black_box(input)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_decode_chain_heavy);
criterion_main!(benches);
