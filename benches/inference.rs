//! Inference benchmark: balanced forest scoring over session feature matrices.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use honeypot_recurrence::config::ForestConfig;
use honeypot_recurrence::model::BalancedForest;
use ndarray::Array2;

fn training_set(rows: usize, dim: usize) -> (Array2<f64>, Vec<usize>) {
    let x = Array2::from_shape_fn((rows, dim), |(r, c)| ((r * 31 + c * 7) % 17) as f64);
    let y = (0..rows).map(|r| usize::from(r % 5 == 0)).collect();
    (x, y)
}

fn bench_predict(c: &mut Criterion) {
    let dim = 24;
    let (x, y) = training_set(400, dim);
    let forest = BalancedForest::fit(&x, &y, &ForestConfig::default()).unwrap();

    let mut g = c.benchmark_group("forest_predict_by_rows");
    for rows in [1, 16, 256] {
        let batch = x.slice(ndarray::s![..rows, ..]).to_owned();
        g.bench_function(format!("rows_{}", rows).as_str(), |b| {
            b.iter(|| forest.predict_scores(black_box(&batch)).unwrap())
        });
    }
    g.finish();
}

fn bench_fit(c: &mut Criterion) {
    let (x, y) = training_set(400, 24);
    let config = ForestConfig {
        n_trees: 10,
        ..ForestConfig::default()
    };
    c.bench_function("forest_fit_10_trees_400_rows", |b| {
        b.iter(|| BalancedForest::fit(black_box(&x), black_box(&y), &config).unwrap())
    });
}

criterion_group!(benches, bench_predict, bench_fit);
criterion_main!(benches);
