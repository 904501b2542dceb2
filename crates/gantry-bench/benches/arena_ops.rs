//! Criterion micro-benchmarks for slot arena insert, erase, and
//! iteration.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gantry_arena::SlotArena;
use gantry_bench::populated_arena;

fn bench_insert_erase(c: &mut Criterion) {
    c.bench_function("arena_insert_erase_cycle", |b| {
        let mut arena: SlotArena<u64> = SlotArena::new();
        b.iter(|| {
            let id = arena.insert(black_box(42));
            arena.erase(id);
        });
    });

    c.bench_function("arena_insert_1k_fresh", |b| {
        b.iter(|| {
            let mut arena: SlotArena<u64> = SlotArena::new();
            for i in 0..1024 {
                black_box(arena.insert(i));
            }
            arena
        });
    });
}

fn bench_iteration(c: &mut Criterion) {
    // Dense: every slot live.
    let (dense, _) = populated_arena(4096);
    c.bench_function("arena_iterate_dense_4k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for (_, &v) in dense.iter() {
                sum = sum.wrapping_add(v);
            }
            black_box(sum)
        });
    });

    // Sparse: one in every 64 slots live, the case word-skipping wins.
    let (mut sparse, ids) = populated_arena(4096);
    for (i, id) in ids.iter().enumerate() {
        if i % 64 != 0 {
            sparse.erase(*id);
        }
    }
    c.bench_function("arena_iterate_sparse_4k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for (_, &v) in sparse.iter() {
                sum = sum.wrapping_add(v);
            }
            black_box(sum)
        });
    });
}

fn bench_indexed_access(c: &mut Criterion) {
    let (arena, ids) = populated_arena(4096);
    c.bench_function("arena_indexed_access", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for id in &ids {
                sum = sum.wrapping_add(arena[*id]);
            }
            black_box(sum)
        });
    });
}

criterion_group!(
    benches,
    bench_insert_erase,
    bench_iteration,
    bench_indexed_access
);
criterion_main!(benches);
