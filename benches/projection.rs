//! Performance benchmarks for derived views.
//!
//! Run with: `cargo bench --bench projection`
//!
//! Every view is recomputed from the full collection on each call, so these
//! measure the cost a caller pays per refresh.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use causal_events::{
    export, import, verify_lineage, EventId, EventRecord, GraphProjector, GraphStats,
};

/// Build a layered DAG: each event links to up to three earlier events.
fn make_events(count: u32) -> Vec<EventRecord> {
    (1..=count)
        .map(|id| {
            let parents = (1..=3)
                .filter(|step| id > step * 7)
                .map(|step| EventId::new(id - step * 7))
                .collect();
            EventRecord::new(
                EventId::new(id),
                format!("event {id} with a payload long enough to be truncated in previews"),
                parents,
            )
        })
        .collect()
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_text");

    for count in [10, 100, 1_000, 10_000] {
        let events = make_events(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("events", count), &events, |b, events| {
            b.iter(|| GraphProjector::render_text(black_box(events)))
        });
    }

    group.finish();
}

fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");

    for count in [10, 100, 1_000, 10_000] {
        let events = make_events(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("events", count), &events, |b, events| {
            b.iter(|| GraphStats::compute(black_box(events)))
        });
    }

    group.finish();
}

fn bench_lineage(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify_lineage");

    for count in [100, 1_000, 10_000] {
        let events = make_events(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("events", count), &events, |b, events| {
            b.iter(|| {
                let report = verify_lineage(black_box(events));
                assert!(report.is_clean());
                report
            })
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let events = make_events(1_000);
    let bytes = export(&events);

    let mut group = c.benchmark_group("export");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("export_1000", |b| b.iter(|| export(black_box(&events))));
    group.bench_function("import_1000", |b| {
        b.iter(|| import(black_box(&bytes)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_render, bench_stats, bench_lineage, bench_export);
criterion_main!(benches);
