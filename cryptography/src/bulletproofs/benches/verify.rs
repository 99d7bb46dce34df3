use ark_ff::UniformRand;
use criterion::{criterion_group, Criterion};
use privcore_cryptography::bulletproofs::{
    curve::Scalar,
    range::{AggregatedRangeProof, AggregatedRangeWitness},
};
use rand::{thread_rng, Rng};
use std::hint::black_box;

fn benchmark_verify(c: &mut Criterion) {
    let mut rng = thread_rng();
    for n in [1, 2, 8, 32].into_iter() {
        let values = (0..n).map(|_| rng.gen()).collect();
        let blindings = (0..n).map(|_| Scalar::rand(&mut rng)).collect();
        let witness = AggregatedRangeWitness::new(values, blindings).unwrap();
        let proof = AggregatedRangeProof::prove(&witness, &mut rng).unwrap();
        for faster in [false, true] {
            c.bench_function(
                &format!("{}/values={} faster={}", module_path!(), n, faster),
                |b| {
                    b.iter(|| {
                        if faster {
                            black_box(proof.verify_faster().unwrap());
                        } else {
                            black_box(proof.verify().unwrap());
                        }
                    });
                },
            );
        }
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_verify
}
