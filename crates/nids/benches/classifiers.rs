//! Train and predict throughput of every classifier, plus thread scaling of
//! the forest.

mod common;

use std::num::NonZeroUsize;

use common::criterion_config::default_criterion;

use nids::testing::data::{jittered_clusters, train_test_split};
use nids::{
    BoostedConfig, BoostedEnsemble, Classifier, Dataset, FeedForwardNetwork, ForestConfig,
    KnnConfig, MlpConfig, NearestNeighbor, RandomForest,
};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_data() -> (Dataset, Dataset) {
    let centers: Vec<(u32, Vec<f64>)> = (0..3u32)
        .map(|label| (label, vec![label as f64; 16]))
        .collect();
    let data = jittered_clusters(&centers, 700, 1.5, 42);
    train_test_split(&data, 0.2, 7)
}

fn classifiers() -> Vec<Box<dyn Classifier>> {
    vec![
        Box::new(NearestNeighbor::new(KnnConfig::default())),
        Box::new(RandomForest::new(
            ForestConfig::builder().n_trees(20).build().unwrap(),
        )),
        Box::new(BoostedEnsemble::new(
            BoostedConfig::builder().rounds(10).build().unwrap(),
        )),
        Box::new(FeedForwardNetwork::new(
            MlpConfig::builder()
                .hidden_layers(vec![32])
                .max_iterations(10)
                .build()
                .unwrap(),
        )),
    ]
}

fn bench_train(c: &mut Criterion) {
    let (train, _) = bench_data();
    let mut group = c.benchmark_group("classifiers/train");
    group.throughput(Throughput::Elements(train.len() as u64));

    for mut model in classifiers() {
        group.bench_function(model.name(), |b| {
            b.iter(|| model.train(black_box(&train)).unwrap())
        });
    }
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let (train, test) = bench_data();
    let mut group = c.benchmark_group("classifiers/predict");
    group.throughput(Throughput::Elements(test.len() as u64));

    for mut model in classifiers() {
        model.train(&train).unwrap();
        group.bench_function(model.name(), |b| {
            b.iter(|| black_box(model.predict(black_box(&test)).unwrap()))
        });
    }
    group.finish();
}

fn bench_forest_thread_scaling(c: &mut Criterion) {
    let (train, _) = bench_data();
    let mut group = c.benchmark_group("classifiers/forest_thread_scaling");
    group.throughput(Throughput::Elements(train.len() as u64));

    for &n_threads in common::THREAD_COUNTS {
        let config = ForestConfig::builder()
            .n_trees(32)
            .maybe_n_threads(NonZeroUsize::new(n_threads))
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::new("train", n_threads), &train, |b, train| {
            b.iter(|| {
                let mut forest = RandomForest::new(config.clone());
                forest.train(black_box(train)).unwrap();
                black_box(forest)
            })
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = default_criterion();
    targets = bench_train, bench_predict, bench_forest_thread_scaling
}
criterion_main!(benches);
