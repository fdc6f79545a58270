use az_inference::{
    BreitWignerConfig, BreitWignerFactory, DataSegment, Dataset, Level, Likelihood, Posterior,
    Prior, PriorSet, SolverPool,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn build(n_points: usize) -> Likelihood<BreitWignerFactory> {
    let levels = vec![
        Level { energy: 0.457, width: 0.039, strength: 2.0 },
        Level { energy: 1.56, width: 0.05, strength: 0.8 },
    ];
    let grids: Vec<Vec<f64>> = (0..4)
        .map(|s| (0..n_points).map(|i| 0.3 + 0.4 * s as f64 + 0.002 * i as f64).collect())
        .collect();
    let segments: Vec<DataSegment> = grids
        .iter()
        .enumerate()
        .map(|(s, grid)| {
            let y: Vec<f64> =
                grid.iter().map(|&e| az_inference::engine::cross_section(&levels, e)).collect();
            let yerr = y.iter().map(|v| 0.05 * v + 1e-3).collect();
            DataSegment::new(format!("set{s}"), y, yerr).unwrap()
        })
        .collect();
    let factory =
        BreitWignerFactory::new(BreitWignerConfig { levels, grids, background: 0.0 }).unwrap();
    Likelihood::new(SolverPool::new(factory).unwrap(), Dataset::segmented(segments)).unwrap()
}

fn priors() -> PriorSet {
    let mut priors = Vec::new();
    for _ in 0..2 {
        priors.push(Prior::Uniform { low: 0.1, high: 2.0 });
        priors.push(Prior::Uniform { low: 0.0, high: 1.0 });
        priors.push(Prior::Uniform { low: 0.0, high: 100.0 });
    }
    priors.extend([Prior::Normal { mean: 1.0, sd: 0.1 }; 4]);
    PriorSet::new(priors).unwrap()
}

fn bench_log_posterior(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_posterior");

    for n in [50usize, 500] {
        let lik = build(n);
        let post = Posterior::new(&lik).with_priors(priors()).unwrap();
        let mut theta = lik.initial().unwrap();

        group.bench_with_input(BenchmarkId::new("single", n), &n, |b, _| {
            b.iter(|| {
                // Nudge the first energy so the engine cache never hits.
                theta[0] += 1e-12;
                black_box(post.log_posterior(black_box(&theta)).unwrap())
            })
        });

        let batch: Vec<Vec<f64>> = (0..32)
            .map(|i| {
                let mut t = lik.initial().unwrap();
                t[0] += 1e-4 * i as f64;
                t
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("batch32", n), &n, |b, _| {
            b.iter(|| black_box(post.log_posterior_batch(black_box(&batch))))
        });

        let outside = vec![-1.0; post.dim()];
        group.bench_with_input(BenchmarkId::new("rejected", n), &n, |b, _| {
            b.iter(|| black_box(post.log_posterior(black_box(&outside)).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_log_posterior);
criterion_main!(benches);
