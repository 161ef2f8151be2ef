//! Validation benchmarks for content_core.
//!
//! Run with: `cargo bench -p content_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use std::sync::Arc;

use content_core::cache::ValidationCache;
use content_core::digest::{compute_digest, RawPackShape};
use content_core::prelude::*;
use content_test_utils::fixtures;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Full pipeline on generated packs of increasing size.
pub fn validation_benchmark(c: &mut Criterion) {
    let options = ValidationOptions::default();
    let mut group = c.benchmark_group("validate");
    for size in [10, 100, 500] {
        let raw = fixtures::large_pack(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &raw, |b, raw| {
            b.iter(|| validate_content_pack(black_box(raw), &options));
        });
    }
    group.finish();
}

/// Digest of the raw id shape alone.
pub fn digest_benchmark(c: &mut Criterion) {
    let raw = fixtures::large_pack(500);
    c.bench_function("digest_raw_500", |b| {
        b.iter(|| compute_digest(&RawPackShape(black_box(&raw))));
    });
}

/// Cache hits after the first validation.
pub fn cache_benchmark(c: &mut Criterion) {
    let raw = fixtures::large_pack(500);
    let options = ValidationOptions::default().with_cache(Arc::new(ValidationCache::new()));
    let _ = validate_content_pack(&raw, &options);
    c.bench_function("validate_cached_500", |b| {
        b.iter(|| validate_content_pack(black_box(&raw), &options));
    });
}

criterion_group!(benches, validation_benchmark, digest_benchmark, cache_benchmark);
criterion_main!(benches);
