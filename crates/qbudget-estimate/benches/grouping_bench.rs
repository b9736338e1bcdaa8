//! Benchmarks for measurement grouping and shot allocation
//!
//! Run with: cargo bench -p qbudget-estimate

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use num_complex::Complex64;
use qbudget_estimate::{
    BitwiseCommuting, EqualPartition, MeasurementGrouping, Operator, PauliOp, PauliTerm,
    Proportional, Remainder, ShotAllocator,
};

/// Heisenberg-style chain: XX + YY + ZZ on neighbours plus a Z field.
fn chain_operator(n: u32) -> Operator {
    let mut op = Operator::new();
    for q in 0..n.saturating_sub(1) {
        for p in [PauliOp::X, PauliOp::Y, PauliOp::Z] {
            let term = PauliTerm::from_ops([(q, p), (q + 1, p)]).unwrap();
            op.add_term(term, Complex64::new(1.0, 0.0));
        }
    }
    for q in 0..n {
        op.add_term(PauliTerm::single(q, PauliOp::Z), Complex64::new(0.5, 0.0));
    }
    op
}

/// Benchmark bitwise-commuting grouping
fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");

    for n in &[4u32, 8, 16, 32] {
        let op = chain_operator(*n);
        group.bench_with_input(BenchmarkId::new("bitwise_commuting", n), &op, |b, op| {
            b.iter(|| BitwiseCommuting.group(black_box(op)));
        });
    }

    group.finish();
}

/// Benchmark shot allocation over precomputed groups
fn bench_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation");

    let op = chain_operator(32);
    let groups = BitwiseCommuting.group(&op);

    group.bench_function("equal", |b| {
        let allocator = EqualPartition::new(Remainder::Distribute);
        b.iter(|| allocator.allocate(black_box(&op), black_box(&groups), black_box(100_000)));
    });

    group.bench_function("proportional", |b| {
        b.iter(|| Proportional.allocate(black_box(&op), black_box(&groups), black_box(100_000)));
    });

    group.finish();
}

criterion_group!(benches, bench_grouping, bench_allocation);
criterion_main!(benches);
