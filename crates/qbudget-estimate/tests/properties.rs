//! Property tests for grouping, allocation and accounting.

use num_complex::Complex64;
use proptest::prelude::*;
use qbudget_estimate::{
    BatchCost, BitwiseCommuting, EqualPartition, MeasurementGrouping, Operator, PauliOp,
    PauliTerm, Proportional, Remainder, ResourceLedger, ShotAllocator,
};

const WIDTH: u32 = 6;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn term_strategy() -> impl Strategy<Value = PauliTerm> {
    prop::collection::vec(0..4u8, WIDTH as usize).prop_map(|letters| {
        let ops = letters.into_iter().enumerate().map(|(q, l)| {
            let op = match l {
                0 => PauliOp::I,
                1 => PauliOp::X,
                2 => PauliOp::Y,
                _ => PauliOp::Z,
            };
            (q as u32, op)
        });
        PauliTerm::from_ops(ops).unwrap()
    })
}

fn operator_strategy() -> impl Strategy<Value = Operator> {
    prop::collection::vec((term_strategy(), -2.0..2.0f64), 0..24).prop_map(|terms| {
        terms
            .into_iter()
            .map(|(t, c)| (t, Complex64::new(c, 0.0)))
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn grouping_is_deterministic(op in operator_strategy()) {
        let a = BitwiseCommuting.group(&op);
        let b = BitwiseCommuting.group(&op);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn groups_partition_non_identity_terms(op in operator_strategy()) {
        let groups = BitwiseCommuting.group(&op);
        let mut seen: Vec<PauliTerm> = groups
            .iter()
            .flat_map(|g| g.terms().iter().cloned())
            .collect();
        seen.sort();
        let expected: Vec<PauliTerm> = op.non_identity_terms().cloned().collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn grouped_terms_commute_qubit_wise(op in operator_strategy()) {
        for group in BitwiseCommuting.group(&op) {
            let terms = group.terms();
            for (i, a) in terms.iter().enumerate() {
                prop_assert!(a.qubit_wise_commutes(group.basis()));
                for b in &terms[i + 1..] {
                    prop_assert!(a.qubit_wise_commutes(b));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn equal_split_is_balanced(op in operator_strategy(), total in 0..10_000u64) {
        let groups = BitwiseCommuting.group(&op);
        let alloc = EqualPartition::new(Remainder::Distribute).allocate(&op, &groups, total);
        prop_assert_eq!(alloc.len(), groups.len());
        if !groups.is_empty() {
            prop_assert_eq!(alloc.total(), total);
            let max = alloc.as_slice().iter().max().copied().unwrap_or(0);
            let min = alloc.as_slice().iter().min().copied().unwrap_or(0);
            prop_assert!(max - min <= 1);
        }
    }

    #[test]
    fn dropped_remainder_never_overspends(op in operator_strategy(), total in 0..10_000u64) {
        let groups = BitwiseCommuting.group(&op);
        let alloc = EqualPartition::new(Remainder::Drop).allocate(&op, &groups, total);
        prop_assert!(alloc.total() <= total);
        let shares: Vec<u64> = alloc.as_slice().to_vec();
        prop_assert!(shares.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn proportional_spends_exactly(op in operator_strategy(), total in 0..10_000u64) {
        let groups = BitwiseCommuting.group(&op);
        let alloc = Proportional.allocate(&op, &groups, total);
        prop_assert_eq!(alloc.len(), groups.len());
        if !groups.is_empty() {
            prop_assert_eq!(alloc.total(), total);
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn ledger_counters_are_monotone(
        costs in prop::collection::vec((0..5u64, 0..1000u64, 0.0..10.0f64), 1..30)
    ) {
        let mut ledger = ResourceLedger::default();
        let mut last = ledger.snapshot();
        for (jobs, shots, time) in costs {
            ledger.record(BatchCost::new(jobs, shots, time));
            let now = ledger.snapshot();
            prop_assert!(now.total_jobs >= last.total_jobs);
            prop_assert!(now.total_shots >= last.total_shots);
            prop_assert!(now.total_circuit_time >= last.total_circuit_time);
            last = now;
        }
        ledger.reset();
        prop_assert_eq!(ledger.total_jobs(), 0);
        prop_assert_eq!(ledger.total_circuit_time(), 0.0);
    }
}
