//! Benchmarks for circuit folding.

use alsvin_ir::Circuit;
use alsvin_zne::{FoldStrategy, fold_gates_at_random, fold_gates_from_left, fold_global};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn layered_circuit(width: u32, layers: usize) -> Circuit {
    let mut circuit = Circuit::with_size("layered", width, 0);
    for _ in 0..layers {
        for q in 0..width {
            circuit.h(q.into()).unwrap();
        }
        for q in 0..width.saturating_sub(1) {
            circuit.cx(q.into(), (q + 1).into()).unwrap();
        }
    }
    circuit
}

fn bench_fold_from_left(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold_from_left");
    for width in [4u32, 8, 16] {
        let circuit = layered_circuit(width, 10);
        group.bench_with_input(BenchmarkId::from_parameter(width), &circuit, |b, circuit| {
            b.iter(|| fold_gates_from_left(black_box(circuit), 2.0).unwrap());
        });
    }
    group.finish();
}

fn bench_fold_at_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold_at_random");
    for width in [4u32, 8, 16] {
        let circuit = layered_circuit(width, 10);
        group.bench_with_input(BenchmarkId::from_parameter(width), &circuit, |b, circuit| {
            b.iter(|| fold_gates_at_random(black_box(circuit), 2.0, Some(1)).unwrap());
        });
    }
    group.finish();
}

fn bench_fold_global(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold_global");
    let strategy = FoldStrategy::FromLeft;
    for stretch in [3.0, 5.0, 9.0] {
        let circuit = layered_circuit(8, 10);
        group.bench_with_input(
            BenchmarkId::from_parameter(stretch),
            &circuit,
            |b, circuit| {
                b.iter(|| fold_global(black_box(circuit), stretch, &strategy).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_fold_from_left,
    bench_fold_at_random,
    bench_fold_global
);
criterion_main!(benches);
