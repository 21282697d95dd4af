//! Criterion benchmarks for whole-search runs.
//!
//! Run with:
//!   cargo bench
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use visual_search::search::features::PartSpec;
use visual_search::{ItemSpec, ModelConfig, SearchModel};

fn feature_model(lures: u32) -> SearchModel {
    let mut model = SearchModel::with_seed(ModelConfig::default(), 42).unwrap();
    model
        .create_simulation(
            &ItemSpec::plain("red", "vertical", 1),
            &[ItemSpec::plain("green", "vertical", lures)],
            None,
        )
        .unwrap();
    model
}

/// Benchmark run_whole_search over display sizes.
fn bench_feature_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_search");

    for lures in [4u32, 16, 64, 128].iter() {
        group.throughput(Throughput::Elements(u64::from(*lures) + 1));
        group.bench_with_input(BenchmarkId::from_parameter(lures), lures, |b, &lures| {
            let mut model = feature_model(lures);
            b.iter(|| black_box(model.run_whole_search("bench").iterations));
        });
    }

    group.finish();
}

/// Conjunction and relational searches at a fixed size.
fn bench_search_kinds(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_kind");

    group.bench_function("conjunction_32", |b| {
        let mut model = SearchModel::with_seed(ModelConfig::default(), 42).unwrap();
        model
            .create_simulation(
                &ItemSpec::plain("red", "vertical", 1),
                &[
                    ItemSpec::plain("green", "vertical", 16),
                    ItemSpec::plain("red", "horizontal", 16),
                ],
                None,
            )
            .unwrap();
        b.iter(|| black_box(model.run_whole_search("bench").iterations));
    });

    group.bench_function("relations_16", |b| {
        let mut model = SearchModel::with_seed(ModelConfig::default(), 42).unwrap();
        let target = vec![
            PartSpec::new("red", "cheatXabove", "above"),
            PartSpec::new("green", "cheatObelow", "below"),
        ];
        let lure = vec![
            PartSpec::new("green", "cheatOabove", "above"),
            PartSpec::new("red", "cheatXbelow", "below"),
        ];
        model
            .create_simulation(&ItemSpec::new(target, 1), &[ItemSpec::new(lure, 15)], None)
            .unwrap();
        b.iter(|| black_box(model.run_whole_search("bench").iterations));
    });

    group.finish();
}

criterion_group!(benches, bench_feature_search, bench_search_kinds);
criterion_main!(benches);
