//! Benchmark for KeySortedList vs standard BTreeMap.
//!
//! Compares insert, remove, lower-bound search, and iteration for a range of
//! sizes, plus the effect of the block fanout on lookups.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use keysorted::{KeySortedList, KslConfig, NaturalOrder};
use std::collections::BTreeMap;
use std::hint::black_box;

const SIZES: [u64; 3] = [100, 1_000, 10_000];

/// Spreads `0..size` over the key space in a fixed, non-sequential order.
fn scattered(size: u64) -> impl Iterator<Item = u64> {
    (0..size).map(move |index| (index * 7_919) % size)
}

fn filled_list(size: u64) -> KeySortedList<u64, u64> {
    let mut list = KeySortedList::new().unwrap();
    for key in scattered(size) {
        list.insert(key, key * 2).unwrap();
    }
    list
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in SIZES {
        group.bench_with_input(
            BenchmarkId::new("KeySortedList", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut list = KeySortedList::new().unwrap();
                    for key in scattered(size) {
                        list.insert(black_box(key), black_box(key * 2)).unwrap();
                    }
                    black_box(list)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut map = BTreeMap::new();
                for key in scattered(size) {
                    map.insert(black_box(key), black_box(key * 2));
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove");

    for size in SIZES {
        group.bench_with_input(
            BenchmarkId::new("KeySortedList", size),
            &size,
            |bencher, &size| {
                bencher.iter_batched(
                    || filled_list(size),
                    |mut list| {
                        for key in 0..size {
                            list.remove(&black_box(key)).unwrap();
                        }
                        black_box(list)
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || scattered(size).map(|key| (key, key * 2)).collect::<BTreeMap<_, _>>(),
                |mut map| {
                    for key in 0..size {
                        map.remove(&black_box(key));
                    }
                    black_box(map)
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// lower_bound Benchmark
// =============================================================================

fn benchmark_lower_bound(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("lower_bound");

    for size in SIZES {
        let list = filled_list(size);
        let map: BTreeMap<u64, u64> = scattered(size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(
            BenchmarkId::new("KeySortedList", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = list.lower_bound(&black_box(key)).value() {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0;
                for key in 0..size {
                    if let Some((_, &value)) = map.range(black_box(key)..).next() {
                        sum += value;
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");

    for size in SIZES {
        let list = filled_list(size);
        let map: BTreeMap<u64, u64> = scattered(size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(BenchmarkId::new("KeySortedList", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: u64 = list.values().sum();
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: u64 = map.values().sum();
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// fanout Benchmark
// =============================================================================

fn benchmark_fanout(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("fanout_lookup");
    let size = 10_000_u64;

    for min_fanout in [2, 8, 16, 64] {
        let config = KslConfig::new().with_min_fanout(min_fanout);
        let mut list = KeySortedList::with_config(NaturalOrder, config).unwrap();
        for key in scattered(size) {
            list.insert(key, key).unwrap();
        }

        group.bench_with_input(
            BenchmarkId::new("KeySortedList", min_fanout),
            &min_fanout,
            |bencher, _| {
                bencher.iter(|| {
                    let mut found = 0;
                    for key in (0..size).step_by(7) {
                        if list.contains_key(&black_box(key)) {
                            found += 1;
                        }
                    }
                    black_box(found)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_remove,
    benchmark_lower_bound,
    benchmark_iteration,
    benchmark_fanout
);

criterion_main!(benches);
