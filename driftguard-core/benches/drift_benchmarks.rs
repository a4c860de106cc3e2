use criterion::{Criterion, black_box, criterion_group, criterion_main};
use driftguard_core::{DEFAULT_BUCKETS, Dataset, Sample, check_datasets, ks_test, psi};
use serde_json::json;

fn ramp(n: usize, offset: f64) -> Vec<f64> {
    (0..n).map(|i| (i as f64 * 0.37).sin() * 100.0 + offset).collect()
}

fn bench_psi(c: &mut Criterion) {
    let reference = Sample::from(ramp(10_000, 0.0));
    let current = Sample::from(ramp(10_000, 5.0));

    c.bench_function("psi_10k_shifted", |b| {
        b.iter(|| psi(black_box(&reference), black_box(&current), DEFAULT_BUCKETS))
    });

    let constant = Sample::from(vec![3.0; 10_000]);
    c.bench_function("psi_10k_constant_reference", |b| {
        b.iter(|| psi(black_box(&constant), black_box(&current), DEFAULT_BUCKETS))
    });
}

fn bench_ks(c: &mut Criterion) {
    let reference = Sample::from(ramp(10_000, 0.0));
    let current = Sample::from(ramp(10_000, 5.0));

    c.bench_function("ks_10k_shifted", |b| {
        b.iter(|| ks_test(black_box(&reference), black_box(&current)))
    });
}

fn bench_wide_table(c: &mut Criterion) {
    let columns: Vec<String> = (0..50).map(|i| format!("f{i}")).collect();
    let table = |offset: f64| {
        let rows = (0..2_000)
            .map(|r| {
                (0..columns.len())
                    .map(|col| json!(((r * (col + 1)) as f64 * 0.11).cos() * 10.0 + offset))
                    .collect()
            })
            .collect();
        Dataset::new(columns.clone(), rows)
    };
    let reference = table(0.0);
    let current = table(0.5);

    c.bench_function("check_50_columns_2k_rows", |b| {
        b.iter(|| check_datasets(black_box(&reference), black_box(&current), DEFAULT_BUCKETS))
    });
}

criterion_group!(benches, bench_psi, bench_ks, bench_wide_table);
criterion_main!(benches);
