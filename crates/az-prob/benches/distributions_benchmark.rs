use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_prior_densities(c: &mut Criterion) {
    let xs: Vec<f64> = (0..10_000).map(|i| (i as f64) * 0.001 - 5.0).collect();

    c.bench_function("normal_logpdf_10k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for &x in &xs {
                acc += az_prob::normal::logpdf(x, 0.0, 1.3).unwrap();
            }
            black_box(acc)
        })
    });

    c.bench_function("uniform_logpdf_10k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for &x in &xs {
                acc += az_prob::uniform::logpdf(x, -10.0, 10.0).unwrap();
            }
            black_box(acc)
        })
    });

    c.bench_function("gamma_logpdf_10k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for &x in &xs {
                acc += az_prob::gamma::logpdf_shape_scale(x.abs() + 0.1, 2.0, 1.5).unwrap();
            }
            black_box(acc)
        })
    });

    c.bench_function("gaussian_term_10k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for &x in &xs {
                acc += az_prob::math::gaussian_term(x, 0.5, 0.2, 0.25);
            }
            black_box(acc)
        })
    });
}

criterion_group!(benches, bench_prior_densities);
criterion_main!(benches);
