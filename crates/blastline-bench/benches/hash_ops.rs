//! Criterion micro-benchmarks for view hashing and comparison.

use std::hint::black_box;

use blastline_bench::reference_timeline;
use blastline_replay::{compare_views, record_checkpoints, view_hash};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_view_hash(c: &mut Criterion) {
    let view = reference_timeline(42).view();

    c.bench_function("view_hash_reference", |b| {
        b.iter(|| {
            black_box(view_hash(black_box(&view)));
        });
    });
}

fn bench_compare_equal(c: &mut Criterion) {
    let a = reference_timeline(42).view();
    let b_view = reference_timeline(42).view();

    c.bench_function("compare_views_equal", |b| {
        b.iter(|| {
            black_box(compare_views(&a, &b_view));
        });
    });
}

fn bench_compare_divergent(c: &mut Criterion) {
    let a = reference_timeline(42).view();
    let b_view = reference_timeline(43).view();

    c.bench_function("compare_views_divergent", |b| {
        b.iter(|| {
            black_box(compare_views(&a, &b_view));
        });
    });
}

fn bench_record_checkpoints(c: &mut Criterion) {
    let engine = reference_timeline(42);

    c.bench_function("record_checkpoints_reference", |b| {
        b.iter(|| {
            black_box(record_checkpoints(&engine));
        });
    });
}

criterion_group!(
    benches,
    bench_view_hash,
    bench_compare_equal,
    bench_compare_divergent,
    bench_record_checkpoints
);
criterion_main!(benches);
