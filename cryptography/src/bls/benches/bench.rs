use criterion::criterion_main;

mod sign;
mod verify;

criterion_main!(
    sign::benches,
    verify::benches,
    aggregate_public_key::benches,
);
