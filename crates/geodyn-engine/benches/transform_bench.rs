//! Transformation benchmarks: selection, sequential and parallel execution.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use geodyn_core::models::{DeformationModel, EnuVelocity, VelocityGrid};
use geodyn_core::traits::DeformationResolver;
use geodyn_core::types::{AccuracyClass, Coordinate, ModelRef};
use geodyn_core::InMemoryCatalog;
use geodyn_engine::{TransformRequest, Transformer};

struct FixedResolver(Arc<DeformationModel>);

impl DeformationResolver for FixedResolver {
    fn resolve(&self, _reference: &ModelRef) -> Arc<DeformationModel> {
        self.0.clone()
    }
}

fn engine() -> Transformer {
    let grid = VelocityGrid::uniform(
        "bench",
        (-90.0, 90.0),
        (-180.0, 180.0),
        EnuVelocity {
            east: 0.012,
            north: -0.004,
            up: 0.002,
        },
    )
    .expect("valid grid");
    let model = DeformationModel::Grid {
        reference: ModelRef::from("bench"),
        grid: Arc::new(grid),
        accuracy: AccuracyClass::Best,
        source: "bench.json".into(),
    };
    Transformer::new(
        Arc::new(InMemoryCatalog::builtin()),
        Arc::new(FixedResolver(Arc::new(model))),
        Default::default(),
    )
}

fn batch(n: usize) -> Vec<Coordinate> {
    (0..n)
        .map(|i| {
            let f = i as f64 / n as f64;
            Coordinate::new(&[40.0 + 20.0 * f, -120.0 + 60.0 * f, 100.0])
        })
        .collect()
}

fn cross_frame_request() -> TransformRequest {
    TransformRequest::new("EPSG:9989", "EPSG:8255")
        .source_epoch(2020.0)
        .target_epoch(2010.0)
}

fn bench_build_transformer(c: &mut Criterion) {
    let engine = engine();
    let request = cross_frame_request();
    c.bench_function("build_transformer_cached", |b| {
        b.iter(|| black_box(engine.build_transformer(&request).expect("pipeline")))
    });
    c.bench_function("build_transformer_uncached", |b| {
        b.iter(|| {
            engine.refresh();
            black_box(engine.build_transformer(&request).expect("pipeline"))
        })
    });
}

fn bench_execute(c: &mut Criterion) {
    let engine = engine();
    let handle = engine
        .build_transformer(&cross_frame_request())
        .expect("pipeline");
    let mut group = c.benchmark_group("execute");
    for n in [100usize, 10_000, 100_000] {
        let input = batch(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| black_box(handle.transform(input)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_transformer, bench_execute);
criterion_main!(benches);
