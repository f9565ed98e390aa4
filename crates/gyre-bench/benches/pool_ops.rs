//! Criterion benchmarks for scratch-list leasing.

use std::hint::black_box;
use std::sync::Arc;
use std::thread;

use criterion::{criterion_group, criterion_main, Criterion};
use gyre_core::NodeIndex;
use gyre_pool::Pool;

/// Benchmark: acquire, fill with 8 indices, release, single-threaded.
fn bench_lease_cycle(c: &mut Criterion) {
    let pool: Pool<Vec<NodeIndex>> = Pool::with_capacity(1);

    c.bench_function("pool_lease_cycle", |b| {
        b.iter(|| {
            let mut lease = pool.acquire();
            lease.extend((0..8).map(NodeIndex));
            black_box(lease.len());
        });
    });
}

/// Benchmark: 4 threads each running 1000 lease cycles on one pool.
fn bench_contended_leases(c: &mut Criterion) {
    let pool: Arc<Pool<Vec<NodeIndex>>> = Arc::new(Pool::new());

    c.bench_function("pool_contended_4x1000", |b| {
        b.iter(|| {
            thread::scope(|s| {
                for _ in 0..4 {
                    let pool = &pool;
                    s.spawn(move || {
                        for i in 0..1000 {
                            let mut lease = pool.acquire();
                            lease.push(NodeIndex(i));
                            black_box(lease.len());
                        }
                    });
                }
            });
        });
    });
}

criterion_group!(benches, bench_lease_cycle, bench_contended_leases);
criterion_main!(benches);
