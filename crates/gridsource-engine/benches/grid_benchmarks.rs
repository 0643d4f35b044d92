//! Benchmarks for column reconciliation and row streaming
//!
//! These benchmarks measure reconciliation over wide grids and the cost of
//! streaming large result sets page by page.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridsource_catalog::{MemoryAdapter, MemoryAdapterBuilder, SearchCriteria};
use gridsource_core::ColumnDefinition;
use gridsource_engine::GridSource;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime must build")
}

/// Memory adapter with `width` columns named col_0, col_1, ...
fn wide_adapter(width: usize) -> MemoryAdapter {
    MemoryAdapterBuilder::new()
        .with_keys((0..width).map(|i| format!("col_{}", i)))
        .build()
}

/// Every third column configured, every other configured column ordered
fn configuration(width: usize) -> Vec<ColumnDefinition> {
    (0..width)
        .step_by(3)
        .enumerate()
        .map(|(n, i)| {
            let column = ColumnDefinition::new(format!("col_{}", i)).unwrap();
            if n % 2 == 0 {
                column.with_sort_order((width - i) as u32)
            } else {
                column
            }
        })
        .collect()
}

fn bench_reconcile(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("reconcile");

    for width in [10, 100, 1000] {
        let source = GridSource::new(wide_adapter(width));
        let configured = configuration(width);

        group.bench_with_input(BenchmarkId::new("keep_all", width), &width, |b, _| {
            b.iter(|| {
                rt.block_on(source.extract_column_definitions(black_box(&configured), true))
                    .unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("configured_only", width), &width, |b, _| {
            b.iter(|| {
                rt.block_on(source.extract_column_definitions(black_box(&configured), false))
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_stream(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("stream");

    for rows in [1_000, 10_000] {
        let adapter = MemoryAdapterBuilder::new().with_numbered_rows(rows).build();
        let mut source = GridSource::new(adapter);

        group.bench_with_input(BenchmarkId::new("default_page_size", rows), &rows, |b, _| {
            b.iter(|| {
                rt.block_on(async {
                    let mut stream = source.stream(SearchCriteria::new());
                    let mut count = 0;
                    while let Some(row) = stream.next().await {
                        black_box(row.unwrap());
                        count += 1;
                    }
                    count
                })
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reconcile, bench_stream);
criterion_main!(benches);
