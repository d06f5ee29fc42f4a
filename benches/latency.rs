//! Benchmark harness using Criterion for latency measurement.
//!
//! Measures:
//! - set (update in place, with and without listeners)
//! - delete + re-insert
//! - positional reads
//! - splice and unshift rebuilds
//! - mixed workload

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use event_map::{EventKind, OrderedEventMap};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

type Map = OrderedEventMap<u64, u64>;

fn filled(size: u64) -> Map {
    OrderedEventMap::from_pairs((0..size).map(|i| (i, i)))
}

fn with_listeners(mut map: Map, count: usize) -> Map {
    for _ in 0..count {
        for kind in EventKind::ALL {
            map.on(kind, |event| {
                black_box(event.key());
                Ok(())
            });
        }
    }
    map
}

/// Benchmark: set on an existing key, by listener count
fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_existing");

    for listeners in [0usize, 1, 8].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(listeners), listeners, |b, &listeners| {
            let mut map = with_listeners(filled(10_000), listeners);
            let mut i = 0u64;
            b.iter(|| {
                i += 1;
                black_box(map.set(i % 10_000, i).is_ok())
            })
        });
    }

    group.finish();
}

/// Benchmark: delete, then set the key again at the end
fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete_reinsert");

    for size in [100u64, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut map = filled(size);
            let mut i = 0u64;
            b.iter(|| {
                // Front-most key is the worst case for the index rewrite
                let key = *map.entry_at(0).map(|(k, _)| k).unwrap_or(&0);
                i += 1;
                black_box(map.delete(&key).is_ok());
                black_box(map.set(key, i).is_ok());
            })
        });
    }

    group.finish();
}

/// Benchmark: positional reads
fn bench_at(c: &mut Criterion) {
    let map = filled(10_000);
    let mut rng = ChaCha8Rng::seed_from_u64(0xDEADBEEF);

    c.bench_function("at_random", |b| {
        b.iter(|| {
            let index: isize = rng.gen_range(-10_000..10_000);
            black_box(map.at(index))
        })
    });
}

/// Benchmark: rebuilding operations
fn bench_rebuilds(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");

    for size in [100u64, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("splice_middle", size), size, |b, &size| {
            let mut map = filled(size);
            let mut next = size;
            b.iter(|| {
                next += 1;
                black_box(map.splice((size / 2) as isize, Some(1), [(next, next)]))
            })
        });

        group.bench_with_input(BenchmarkId::new("unshift_shift", size), size, |b, &size| {
            let mut map = filled(size);
            let mut next = size;
            b.iter(|| {
                next += 1;
                map.unshift([(next, next)]);
                black_box(map.pop())
            })
        });
    }

    group.finish();
}

/// Benchmark: mixed workload
fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_workload");

    // 60% set, 20% delete, 20% read
    group.bench_function("60_set_20_delete_20_at", |b| {
        let mut map = with_listeners(filled(1_000), 1);
        let mut rng = ChaCha8Rng::seed_from_u64(0xCAFEBABE);

        b.iter(|| {
            let key = rng.gen_range(0..2_000u64);
            match rng.gen_range(0..10) {
                0..=5 => black_box(map.set(key, key).is_ok()),
                6 | 7 => black_box(map.delete(&key).is_ok()),
                _ => black_box(map.at(key as isize).is_some()),
            }
        })
    });

    group.finish();
}

/// Benchmark: bulk push throughput
fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("push_1000", |b| {
        b.iter(|| {
            let mut map = Map::with_capacity(1000);
            black_box(map.push((0..1000u64).map(|i| (i, i))).is_ok());
            map
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set,
    bench_delete,
    bench_at,
    bench_rebuilds,
    bench_mixed_workload,
    bench_throughput,
);

criterion_main!(benches);
