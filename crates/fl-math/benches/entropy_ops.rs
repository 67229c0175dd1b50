//! Criterion benchmarks for `fl-math`.
//!
//! Focus on the frequency-table kernels that run once per analytics request.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fl_math::{shannon_entropy, FrequencyTable};

fn bench_entropy_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("entropy");

    for size in [100usize, 1_000, 10_000] {
        // Roughly one repeat visitor per ten observations.
        let ids: Vec<String> = (0..size)
            .map(|i| format!("fp-{:08x}", i / 10 * 7 + i % 10))
            .collect();

        group.bench_with_input(BenchmarkId::new("table_build", size), &ids, |b, ids| {
            b.iter(|| {
                let table: FrequencyTable<&str> = ids.iter().map(String::as_str).collect();
                black_box(table.distinct());
            });
        });

        let table: FrequencyTable<&str> = ids.iter().map(String::as_str).collect();
        group.bench_with_input(BenchmarkId::new("table_entropy", size), &table, |b, t| {
            b.iter(|| black_box(t.entropy()));
        });

        let counts: Vec<u64> = table.iter().map(|(_, c)| c).collect();
        group.bench_with_input(BenchmarkId::new("slice_entropy", size), &counts, |b, c| {
            b.iter(|| black_box(shannon_entropy(black_box(c))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_entropy_kernels);
criterion_main!(benches);
