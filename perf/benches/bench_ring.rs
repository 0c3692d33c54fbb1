use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use spool_perf::{payload, temp_ring_path, wrapped_ring};
use spool_ring::{ByteRing, InlineRing, send};
use spool_shm::{MappedRing, RingConfig};

fn bench_write_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring");

    for &len in &[16usize, 256, 4096] {
        let data = payload(len);
        let mut out = vec![0u8; len];
        let mut ring: InlineRing<8192> = ByteRing::inline();
        // start mid-buffer so half the iterations wrap
        ring.write(&payload(8192 - len / 2));
        ring.skip(8192 - len / 2);

        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("write_read", len), &len, |b, _| {
            b.iter(|| {
                black_box(ring.write(black_box(&data)));
                black_box(ring.read(&mut out));
            });
        });
    }

    group.finish();
}

fn bench_peek(c: &mut Criterion) {
    let ring = wrapped_ring(4096, 3000, 4096);
    let mut out = vec![0u8; 4096];

    let mut group = c.benchmark_group("ring");
    group.throughput(Throughput::Bytes(4096));
    group.bench_function("peek (wrapped, full)", |b| {
        b.iter(|| black_box(ring.peek(&mut out)));
    });
    group.finish();
}

fn bench_send(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring");
    group.throughput(Throughput::Bytes(1024));

    group.bench_function("send (both wrapped)", |b| {
        b.iter_batched_ref(
            || (wrapped_ring(4096, 3500, 1024), wrapped_ring(4096, 3800, 0)),
            |(src, dst)| black_box(send(dst, src, 1024)),
            criterion::BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_realign(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring");

    for &cap in &[1024usize, 16384, 65536] {
        group.throughput(Throughput::Bytes(cap as u64));
        group.bench_with_input(BenchmarkId::new("realign (worst case)", cap), &cap, |b, &cap| {
            b.iter_batched_ref(
                || wrapped_ring(cap, cap / 2 + 1, cap),
                |ring| ring.realign(),
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_mapped(c: &mut Criterion) {
    let path = temp_ring_path("crit_mapped");
    let mut mapped =
        MappedRing::create(&path, RingConfig::new(65536)).expect("failed to create mapped ring");
    let data = payload(512);
    let mut out = vec![0u8; 512];

    let mut group = c.benchmark_group("mapped");
    group.throughput(Throughput::Bytes(512));
    group.bench_function("guard + write_read", |b| {
        b.iter(|| {
            let mut ring = mapped.ring().expect("cursor valid");
            black_box(ring.write(black_box(&data)));
            black_box(ring.read(&mut out));
        });
    });
    group.finish();

    drop(mapped);
    let _ = std::fs::remove_file(&path);
}

criterion_group!(
    benches,
    bench_write_read,
    bench_peek,
    bench_send,
    bench_realign,
    bench_mapped,
);
criterion_main!(benches);
