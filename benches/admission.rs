use chrono::{DateTime, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal_macros::dec;
use std::sync::Arc;
use velocity_gate::{
    in_memory_gate, is_prime, normalize, Load, RawField, RawLoad,
};

fn raw_load(id: i64, customer_id: i64) -> RawLoad {
    RawLoad {
        id: RawField::Number(id),
        customer_id: RawField::Number(customer_id),
        load_amount: "$100.00".to_string(),
        time: "2025-07-08T10:00:00Z".to_string(),
    }
}

fn typed_load(id: i64, customer_id: i64, timestamp: DateTime<Utc>) -> Load {
    Load {
        id,
        customer_id,
        amount: dec!(100.00),
        timestamp,
        is_prime: is_prime(id),
    }
}

/// Benchmark normalization of raw wire requests
fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalization");

    let numeric = raw_load(15888, 528);
    let stringly = RawLoad {
        id: RawField::Text("15887".to_string()),
        customer_id: RawField::Text("528".to_string()),
        load_amount: "$3318.47".to_string(),
        time: "2000-01-01T00:00:00Z".to_string(),
    };

    group.bench_function("numeric_fields", |b| {
        b.iter(|| normalize(black_box(&numeric)))
    });

    group.bench_function("string_fields_with_sigil", |b| {
        b.iter(|| normalize(black_box(&stringly)))
    });

    group.finish();
}

/// Benchmark identifier primality classification
fn bench_prime_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("prime_classification");

    group.bench_function("small_prime", |b| b.iter(|| is_prime(black_box(15887))));
    group.bench_function("small_composite", |b| b.iter(|| is_prime(black_box(15888))));
    group.bench_function("large_prime", |b| {
        b.iter(|| is_prime(black_box(2_147_483_647)))
    });

    group.finish();
}

/// Benchmark single-threaded admission throughput
fn bench_single_threaded_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_threaded");
    group.throughput(Throughput::Elements(1000));

    // Distinct customers: every decision passes the whole rule chain.
    group.bench_function("1000_customers", |b| {
        let timestamp: DateTime<Utc> = "2025-07-08T10:00:00Z".parse().unwrap();
        b.iter(|| {
            let gate = in_memory_gate();
            for i in 0..1000i64 {
                let load = typed_load(4 + 2 * i, i, timestamp);
                black_box(gate.decide(black_box(&load)).unwrap());
            }
        })
    });

    // One customer: rejections dominate once the day fills up.
    group.bench_function("single_customer", |b| {
        let timestamp: DateTime<Utc> = "2025-07-08T10:00:00Z".parse().unwrap();
        b.iter(|| {
            let gate = in_memory_gate();
            for i in 0..1000i64 {
                let load = typed_load(4 + 2 * i, 1, timestamp);
                black_box(gate.decide(black_box(&load)).unwrap());
            }
        })
    });

    group.finish();
}

/// Benchmark multi-threaded concurrent throughput
fn bench_concurrent_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    for num_threads in [2, 4, 8].iter() {
        group.throughput(Throughput::Elements((*num_threads as u64) * 1000));

        group.bench_with_input(
            BenchmarkId::new("threads", num_threads),
            num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let gate = Arc::new(in_memory_gate());
                    let timestamp: DateTime<Utc> = "2025-07-08T10:00:00Z".parse().unwrap();

                    let mut handles = vec![];
                    for t in 0..num_threads {
                        let gate = Arc::clone(&gate);
                        let handle = std::thread::spawn(move || {
                            // Each thread drives its own customer to avoid
                            // measuring pure lock contention.
                            for i in 0..1000i64 {
                                let load = typed_load(4 + 2 * i, t as i64, timestamp);
                                black_box(gate.decide(black_box(&load)).unwrap());
                            }
                        });
                        handles.push(handle);
                    }

                    for handle in handles {
                        handle.join().unwrap();
                    }
                })
            },
        );
    }

    group.finish();
}

/// Benchmark ledger scaling across many accounts and dates
fn bench_ledger_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_scaling");

    for num_customers in [100i64, 1000, 10_000].iter() {
        group.bench_with_input(
            BenchmarkId::new("fill", num_customers),
            num_customers,
            |b, &num_customers| {
                let timestamp: DateTime<Utc> = "2025-07-08T10:00:00Z".parse().unwrap();
                b.iter(|| {
                    let gate = in_memory_gate();
                    for i in 0..num_customers {
                        let load = typed_load(4 + 2 * i, i, timestamp);
                        gate.decide(&load).unwrap();
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_normalization,
    bench_prime_classification,
    bench_single_threaded_throughput,
    bench_concurrent_throughput,
    bench_ledger_scaling,
);
criterion_main!(benches);
