//! Packaging benchmarks

use criterion::{criterion_group, criterion_main, Criterion};
use einkify_core::package::page_document;
use einkify_core::sanitize;

fn sanitize_benchmark(c: &mut Criterion) {
    let paths: Vec<String> = (0..200)
        .map(|i| format!("Volume 01/Chapter {:03} (scan)/page {:04}.jpg", i / 20, i))
        .collect();

    c.bench_function("sanitize_200_paths", |b| {
        b.iter(|| {
            for path in &paths {
                std::hint::black_box(sanitize(path));
            }
        })
    });
}

fn page_document_benchmark(c: &mut Criterion) {
    c.bench_function("page_document", |b| {
        b.iter(|| std::hint::black_box(page_document("page-0001", "../Images/page-0001.jpg", 1072, 1448)))
    });
}

criterion_group!(benches, sanitize_benchmark, page_document_benchmark);
criterion_main!(benches);
