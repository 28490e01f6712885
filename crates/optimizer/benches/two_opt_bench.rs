//! Benchmarks for the toolpath optimizer.
//!
//! Measures the 2-opt refiner and the full pipeline at various path
//! counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use plotpath_core::{progress_channel, CancelToken, OptimizeConfig, PathPlacement, PlotPath};
use plotpath_optimizer::{optimize, refine, JobContext};

fn scattered_paths(n: usize) -> Vec<PlotPath> {
    (0..n)
        .map(|i| {
            let x = ((i * 389) % 997) as f64 * 0.37;
            let y = ((i * 577) % 991) as f64 * 0.41;
            PlotPath::from_xy(&[(x, y), (x + 1.2, y + 0.8)])
        })
        .collect()
}

fn bench_refine(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_opt_refine");
    group.sample_size(10);

    for &n in &[100, 400, 1000] {
        let paths = scattered_paths(n);
        let sequence: Vec<PathPlacement> =
            (0..n).map(|i| PathPlacement::new(i, false)).collect();

        group.bench_with_input(BenchmarkId::new("scattered", n), &n, |b, _| {
            b.iter(|| {
                let (tx, _rx) = progress_channel(64);
                let ctx = JobContext::new(tx, CancelToken::new());
                let result = refine(black_box(&paths), black_box(&sequence), 500, &ctx);
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    for &n in &[100, 400] {
        let paths = scattered_paths(n);
        let config = OptimizeConfig::new()
            .with_pen_width(0.5)
            .with_visibility_threshold(50.0);

        group.bench_with_input(BenchmarkId::new("filtered", n), &n, |b, _| {
            b.iter(|| {
                let (tx, _rx) = progress_channel(4096);
                let result = optimize(
                    black_box(paths.clone()),
                    black_box(&config),
                    tx,
                    CancelToken::new(),
                );
                black_box(result)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_refine, bench_pipeline);
criterion_main!(benches);
