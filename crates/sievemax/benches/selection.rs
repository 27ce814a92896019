use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sievemax::{
    FastIvm, Greedy, Optimizer, RbfKernel, Scalar, SieveStreaming, ThreeSieves, ThresholdStrategy,
};

fn clustered_points(n: usize, dim: usize, seed: u64) -> Vec<Vec<Scalar>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let center = (i % 4) as Scalar;
            (0..dim)
                .map(|_| center + rng.gen_range(-0.5..0.5))
                .collect()
        })
        .collect()
}

fn bench_selection(c: &mut Criterion) {
    let data = clustered_points(200, 4, 7);
    let kernel = RbfKernel::new((4.0_f64).sqrt(), 1.0).expect("kernel parameters");
    let k = 10;

    let mut group = c.benchmark_group("summary_selection");

    group.bench_function("greedy_200x4_k10", |b| {
        b.iter(|| {
            let objective = FastIvm::new(k, &kernel, 1.0).expect("objective parameters");
            let mut opt = Greedy::new(k, &objective).expect("budget");
            opt.fit(black_box(&data), None, 1).expect("fit");
            black_box(opt.value().expect("value"))
        });
    });

    group.bench_function("sieve_streaming_200x4_k10", |b| {
        b.iter(|| {
            let objective = FastIvm::new(k, &kernel, 1.0).expect("objective parameters");
            let mut opt = SieveStreaming::new(k, &objective, 1.0, 0.1).expect("grid");
            opt.fit(black_box(&data), None, 1).expect("fit");
            black_box(opt.value().expect("value"))
        });
    });

    group.bench_function("three_sieves_200x4_k10", |b| {
        b.iter(|| {
            let objective = FastIvm::new(k, &kernel, 1.0).expect("objective parameters");
            let mut opt =
                ThreeSieves::new(k, &objective, 1.0, 0.1, ThresholdStrategy::Geometric, 50)
                    .expect("parameters");
            opt.fit(black_box(&data), None, 1).expect("fit");
            black_box(opt.value().expect("value"))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_selection);
criterion_main!(benches);
