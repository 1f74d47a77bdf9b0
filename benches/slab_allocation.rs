//! Slab allocator benchmarks
//!
//! Compares single-chunk alloc/free cycles, batch workloads, and the
//! system allocator baseline across a few representative chunk sizes.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nebula_slab::{SlabConfig, SlabContext};
use std::hint::black_box;

fn bench_single_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_allocation");

    group.bench_function("slab_64b", |b| {
        let ctx = SlabContext::create("bench", 64, SlabConfig::new(64 * 1024)).unwrap();
        b.iter(|| {
            let ptr = ctx.allocate(64).unwrap().unwrap();
            unsafe { ctx.free(ptr) };
            black_box(ptr);
        });
    });

    group.bench_function("system_64b", |b| {
        let layout = std::alloc::Layout::from_size_align(64, 8).unwrap();
        b.iter(|| unsafe {
            let ptr = std::alloc::alloc(layout);
            std::alloc::dealloc(ptr, layout);
            black_box(ptr);
        });
    });

    group.finish();
}

fn bench_batch_allocations(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_allocations");
    group.throughput(Throughput::Elements(100));

    group.bench_function("slab_100x64b", |b| {
        let ctx = SlabContext::create("bench", 64, SlabConfig::new(64 * 1024)).unwrap();
        b.iter(|| {
            let mut ptrs = Vec::with_capacity(100);
            for _ in 0..100 {
                ptrs.push(ctx.allocate(64).unwrap().unwrap());
            }
            for ptr in ptrs {
                unsafe { ctx.free(ptr) };
            }
        });
    });

    group.finish();
}

fn bench_allocation_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation_sizes");

    for size in [16usize, 64, 256, 1024, 4096] {
        group.bench_with_input(BenchmarkId::new("slab", size), &size, |b, &size| {
            let ctx = SlabContext::create("bench", size, SlabConfig::new(64 * 1024)).unwrap();
            b.iter(|| {
                let ptr = ctx.allocate(size).unwrap().unwrap();
                unsafe { ctx.free(ptr) };
                black_box(ptr);
            });
        });
    }

    group.finish();
}

/// Sequential: fill several blocks, then drain them, versus an interleaved
/// alloc/free pattern that should stay within a single block via reuse.
fn bench_allocation_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation_patterns");

    group.bench_function("slab_sequential", |b| {
        let ctx = SlabContext::create("bench", 64, SlabConfig::new(4096)).unwrap();
        b.iter(|| {
            let mut ptrs = Vec::with_capacity(50);
            for _ in 0..50 {
                ptrs.push(ctx.allocate(64).unwrap().unwrap());
            }
            for ptr in ptrs {
                unsafe { ctx.free(ptr) };
            }
        });
    });

    group.bench_function("slab_interleaved", |b| {
        let ctx = SlabContext::create("bench", 64, SlabConfig::new(4096)).unwrap();
        b.iter(|| {
            for _ in 0..50 {
                let ptr = ctx.allocate(64).unwrap().unwrap();
                unsafe { ctx.free(ptr) };
            }
        });
    });

    group.finish();
}

/// Freeing the last live chunk in a block returns it to the system
/// allocator immediately, so a tight alloc/free loop on a single chunk
/// repeatedly creates and reclaims its one block rather than reusing it
/// the way a non-eager pool would.
fn bench_memory_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_reuse");

    group.bench_function("slab_single_chunk_block", |b| {
        let ctx = SlabContext::create("bench", 128, SlabConfig::new(128 + 64)).unwrap();
        b.iter(|| {
            let ptr1 = ctx.allocate(128).unwrap().unwrap();
            unsafe { ctx.free(ptr1) };

            let ptr2 = ctx.allocate(128).unwrap().unwrap();
            unsafe { ctx.free(ptr2) };

            black_box((ptr1, ptr2));
        });
    });

    group.finish();
}

fn bench_large_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_block");
    group.sample_size(50);

    group.bench_function("slab_1mb_chunk", |b| {
        let ctx = SlabContext::create("bench", 1024 * 1024, SlabConfig::new(4 * 1024 * 1024))
            .unwrap();
        b.iter(|| {
            let ptr = ctx.allocate(1024 * 1024).unwrap().unwrap();
            unsafe { ctx.free(ptr) };
            black_box(ptr);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_allocation,
    bench_batch_allocations,
    bench_allocation_sizes,
    bench_allocation_patterns,
    bench_memory_reuse,
    bench_large_block
);

criterion_main!(benches);
