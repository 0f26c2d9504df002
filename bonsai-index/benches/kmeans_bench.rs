//! K-means tree build and search benchmarks
//!
//! Run with: cargo bench --package bonsai-index

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bonsai_index::{KMeansConfig, KMeansIndex, Matrix, SearchParams, VectorIndex};

fn random_matrix(n: usize, dim: usize, seed: u64) -> Arc<Matrix> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<f32> = (0..n * dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Arc::new(Matrix::from_vec(data, n, dim).unwrap())
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_build");
    group.sample_size(10);

    for n in [1_000, 10_000] {
        let dataset = random_matrix(n, 64, 1);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("n_{}", n), |bencher| {
            bencher.iter(|| {
                let config = KMeansConfig {
                    branching: 32,
                    iterations: Some(11),
                    seed: Some(1),
                    ..KMeansConfig::default()
                };
                let mut index = KMeansIndex::new(Arc::clone(&dataset), config);
                index.build().unwrap();
                black_box(index.used_memory())
            })
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let n = 10_000;
    let dim = 64;
    let dataset = random_matrix(n, dim, 2);
    let config = KMeansConfig {
        branching: 32,
        iterations: Some(11),
        seed: Some(2),
        ..KMeansConfig::default()
    };
    let mut index = KMeansIndex::new(Arc::clone(&dataset), config);
    index.build().unwrap();

    let mut rng = StdRng::seed_from_u64(3);
    let query: Vec<f32> = (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect();

    let mut group = c.benchmark_group("kmeans_search");
    group.throughput(Throughput::Elements(1));

    for checks in [32, 128, 512] {
        group.bench_function(format!("bounded_{}", checks), |bencher| {
            bencher.iter(|| {
                black_box(index.search(
                    black_box(&query),
                    10,
                    &SearchParams::bounded(checks),
                ))
            })
        });
    }

    group.bench_function("exact", |bencher| {
        bencher.iter(|| {
            black_box(index.search(black_box(&query), 10, &SearchParams::exact()))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);
