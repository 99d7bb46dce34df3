use ark_ff::UniformRand;
use criterion::{criterion_group, BatchSize, Criterion};
use privcore_cryptography::bulletproofs::{
    curve::Scalar,
    range::{AggregatedRangeProof, AggregatedRangeWitness},
};
use rand::{thread_rng, Rng};
use std::hint::black_box;

fn benchmark_prove(c: &mut Criterion) {
    for n in [1, 2, 8, 32].into_iter() {
        c.bench_function(&format!("{}/values={}", module_path!(), n), |b| {
            b.iter_batched(
                || {
                    let mut rng = thread_rng();
                    let values = (0..n).map(|_| rng.gen()).collect();
                    let blindings = (0..n).map(|_| Scalar::rand(&mut rng)).collect();
                    AggregatedRangeWitness::new(values, blindings).unwrap()
                },
                |witness| {
                    black_box(AggregatedRangeProof::prove(&witness, &mut thread_rng()).unwrap());
                },
                BatchSize::SmallInput,
            );
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_prove
}
