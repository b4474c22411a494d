//! Criterion micro-benchmarks for off-heap allocation and bulk operations.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rawgate::raw::OffHeapBuffer;
use rawgate_bench::fast_gateway;

/// Benchmark: allocate, fill and free a 64 KiB block.
fn bench_alloc_fill_free(c: &mut Criterion) {
    let raw = fast_gateway().raw().unwrap();
    c.bench_function("alloc_fill_free_64k", |b| {
        b.iter(|| {
            let addr = raw.allocate_memory(64 * 1024).unwrap();
            // SAFETY: `addr` is a live 64 KiB block, freed exactly once.
            unsafe {
                raw.set_memory_at(addr, 64 * 1024, 0xAB);
                black_box(raw.get_at::<u8>(addr.add(4095)));
                raw.free_memory(addr);
            }
        });
    });
}

/// Benchmark: checked i64 writes through an owned buffer.
fn bench_buffer_put(c: &mut Criterion) {
    let raw = fast_gateway().raw().unwrap();
    let mut buf = OffHeapBuffer::new(raw, 8 * 1024).unwrap();
    c.bench_function("buffer_put_i64_1k", |b| {
        b.iter(|| {
            for i in 0..1024 {
                buf.put::<i64>(i * 8, i as i64).unwrap();
            }
            black_box(buf.get::<i64>(8 * 1023).unwrap());
        });
    });
}

/// Benchmark: growing a buffer by doubling up to 1 MiB.
fn bench_buffer_grow(c: &mut Criterion) {
    let raw = fast_gateway().raw().unwrap();
    c.bench_function("buffer_grow_to_1m", |b| {
        b.iter(|| {
            let mut buf = OffHeapBuffer::new(raw, 64).unwrap();
            while buf.len() < 1 << 20 {
                let len = buf.len() * 2;
                buf.resize(len).unwrap();
            }
            black_box(buf.len());
        });
    });
}

/// Benchmark: overlapping 32 KiB copy within one buffer.
fn bench_copy_within(c: &mut Criterion) {
    let raw = fast_gateway().raw().unwrap();
    let mut buf = OffHeapBuffer::new(raw, 64 * 1024).unwrap();
    c.bench_function("copy_within_32k", |b| {
        b.iter(|| {
            buf.copy_within(0..32 * 1024, 16 * 1024).unwrap();
            black_box(buf.get::<u8>(0).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_alloc_fill_free,
    bench_buffer_put,
    bench_buffer_grow,
    bench_copy_within
);
criterion_main!(benches);
