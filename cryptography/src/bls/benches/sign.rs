use criterion::{criterion_group, BatchSize, Criterion};
use privcore_cryptography::bls::{keygen, ops};
use rand::{thread_rng, Rng};
use std::hint::black_box;

fn benchmark_sign(c: &mut Criterion) {
    let mut msg = [0u8; 32];
    thread_rng().fill(&mut msg);
    for n in [10, 100, 1000].into_iter() {
        let (secrets, committee): (Vec<_>, Vec<_>) =
            (0..n as u64).map(|i| keygen(&i.to_be_bytes())).unzip();
        c.bench_function(&format!("{}/committee={}", module_path!(), n), |b| {
            b.iter_batched(
                || thread_rng().gen_range(0..n),
                |index| {
                    let secret = secrets[index].to_bytes();
                    black_box(ops::sign(&msg, &secret, index, &committee).unwrap());
                },
                BatchSize::SmallInput,
            );
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_sign
}
