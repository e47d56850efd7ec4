//! Argon2 password hashing benchmarks

use askme::utils::password::{hash_password, verify_password, verify_password_or_dummy};
use criterion::{Criterion, criterion_group, criterion_main};

fn bench_hash_password(c: &mut Criterion) {
    c.bench_function("password/hash", |b| {
        b.iter(|| {
            let _ = hash_password("test_password_123");
        });
    });
}

fn bench_verify_password(c: &mut Criterion) {
    let password = "correct_password_456";
    let hash = hash_password(password).expect("hash should succeed");

    let mut group = c.benchmark_group("password/verify");

    group.bench_function("correct", |b| {
        b.iter(|| {
            let result = verify_password(password, &hash).expect("verify should succeed");
            assert!(result);
        });
    });

    group.bench_function("wrong", |b| {
        b.iter(|| {
            let result = verify_password("wrong_password", &hash).expect("verify should succeed");
            assert!(!result);
        });
    });

    group.finish();
}

/// Unknown accounts should cost about as much as a wrong password.
fn bench_verify_unknown_account(c: &mut Criterion) {
    // build the dummy hash outside the measurement
    let _ = verify_password_or_dummy("warmup", None);

    c.bench_function("password/verify_unknown_account", |b| {
        b.iter(|| {
            let result = verify_password_or_dummy("whatever", None).expect("verify should succeed");
            assert!(!result);
        });
    });
}

criterion_group!(
    benches,
    bench_hash_password,
    bench_verify_password,
    bench_verify_unknown_account,
);
criterion_main!(benches);
