use criterion::{criterion_group, Criterion};
use privcore_cryptography::bls::{
    cache::{AggregationCache, Config},
    keygen, ops,
};
use rand::{thread_rng, Rng};
use std::hint::black_box;

fn benchmark_verify(c: &mut Criterion) {
    let mut msg = [0u8; 32];
    thread_rng().fill(&mut msg);
    for n in [10, 100].into_iter() {
        let (secrets, committee): (Vec<_>, Vec<_>) =
            (0..n as u64).map(|i| keygen(&i.to_be_bytes())).unzip();
        let signers: Vec<usize> = (0..n).collect();
        let shares: Vec<_> = secrets
            .iter()
            .enumerate()
            .map(|(i, secret)| ops::sign(&msg, &secret.to_bytes(), i, &committee).unwrap())
            .collect();
        let signature = ops::combine(&shares).unwrap();
        for cached in [false, true] {
            for concurrency in [1, 8] {
                // Warm the cache so only lookups are measured
                let cache = AggregationCache::new(Config::default());
                let cache = cached.then_some(&cache);
                ops::verify(&signature, &msg, &signers, &committee, cache, concurrency).unwrap();
                c.bench_function(
                    &format!(
                        "{}/signers={} cached={} conc={}",
                        module_path!(),
                        n,
                        cached,
                        concurrency
                    ),
                    |b| {
                        b.iter(|| {
                            black_box(
                                ops::verify(
                                    &signature,
                                    &msg,
                                    &signers,
                                    &committee,
                                    cache,
                                    concurrency,
                                )
                                .unwrap(),
                            )
                        });
                    },
                );
            }
        }
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_verify
}
