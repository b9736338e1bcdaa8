//! End-to-end session behavior against deterministic stub backends.

use num_complex::Complex64;
use qbudget_estimate::{
    BackendResult, BudgetKind, BudgetLimits, CountDistribution, EqualPartition, Estimate,
    EstimateError, HardwareType, Individual, Operator, PauliTerm, ProfileTable, Remainder,
    SamplingBackend, SamplingSession, SessionConfig,
};
use qbudget_ir::{Circuit, GateKind, NoiseProfile, ParameterExpression, QubitId};

/// Returns one fixed bitstring for every shot and remembers what it ran.
struct FixedBackend {
    bits: u64,
    batches: Vec<Vec<(Circuit, u64)>>,
    noise: Vec<NoiseProfile>,
}

impl FixedBackend {
    fn zeros() -> Self {
        Self::reading(0)
    }

    fn reading(bits: u64) -> Self {
        Self {
            bits,
            batches: Vec::new(),
            noise: Vec::new(),
        }
    }
}

impl SamplingBackend for FixedBackend {
    fn name(&self) -> &str {
        "fixed"
    }

    fn run(
        &mut self,
        batch: &[(Circuit, u64)],
        noise: &NoiseProfile,
    ) -> BackendResult<Vec<CountDistribution>> {
        self.batches.push(batch.to_vec());
        self.noise.push(noise.clone());
        Ok(batch
            .iter()
            .map(|(_, shots)| [(self.bits, *shots)].into_iter().collect())
            .collect())
    }
}

fn term(label: &str) -> PauliTerm {
    label.parse().unwrap()
}

fn op(labels: &[(&str, f64)]) -> Operator {
    labels
        .iter()
        .map(|(l, c)| (term(l), Complex64::new(*c, 0.0)))
        .collect()
}

fn real(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

// ---------------------------------------------------------------------------
// Shortcuts
// ---------------------------------------------------------------------------

#[test]
fn empty_operator_is_zero_and_free() {
    let mut session = SamplingSession::new(FixedBackend::zeros());
    let est = session
        .estimate(&Operator::new(), &Circuit::with_size("c", 2), 1000, "it")
        .unwrap();
    assert_eq!(est, Estimate::zero());
    assert_eq!(session.ledger().total_jobs(), 0);
    assert_eq!(session.ledger().total_shots(), 0);
    assert_eq!(session.ledger().total_circuit_time(), 0.0);
    assert!(session.backend().batches.is_empty());
}

#[test]
fn identity_only_operator_returns_its_coefficient() {
    let mut session = SamplingSession::new(FixedBackend::zeros());
    let est = session
        .estimate(&op(&[("I", -1.25)]), &Circuit::with_size("c", 2), 1000, "sc")
        .unwrap();
    assert_eq!(est.value, real(-1.25));
    assert_eq!(est.error, 0.0);
    assert_eq!(session.ledger().total_jobs(), 0);
    assert!(session.backend().batches.is_empty());
}

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

#[test]
fn z_on_idle_qubit_is_one() {
    let mut session = SamplingSession::new(FixedBackend::zeros());
    let est = session
        .estimate(&op(&[("Z0", 1.0)]), &Circuit::with_size("idle", 1), 1000, "sc")
        .unwrap();
    assert_eq!(est.value, real(1.0));
    assert_eq!(est.error, 0.0);
}

#[test]
fn constant_offset_is_added() {
    let mut session = SamplingSession::new(FixedBackend::reading(0b1));
    let est = session
        .estimate(
            &op(&[("I", 0.5), ("Z0", 2.0), ("Z1", 1.0)]),
            &Circuit::with_size("c", 2),
            100,
            "sc",
        )
        .unwrap();
    // 0.5 + 2·(-1) + 1·(+1)
    assert!((est.value.re + 0.5).abs() < 1e-12);
}

#[test]
fn one_batch_per_pairing_with_one_entry_per_group() {
    let mut session = SamplingSession::new(FixedBackend::zeros());
    let operator = op(&[("Z0", 1.0), ("X0", 1.0), ("Y0", 1.0), ("Z0 Z1", 0.5)]);
    session
        .estimate(&operator, &Circuit::with_size("c", 2), 900, "sc")
        .unwrap();

    let batches = &session.backend().batches;
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 3);
    assert_eq!(batches[0].iter().map(|(_, s)| s).sum::<u64>(), 900);
    assert_eq!(session.ledger().total_jobs(), 1);
    assert_eq!(session.ledger().total_shots(), 900);
}

#[test]
fn zero_shot_groups_are_not_executed() {
    let mut session = SamplingSession::new(FixedBackend::zeros())
        .with_allocator(EqualPartition::new(Remainder::Drop));
    let operator = op(&[("Z0", 1.0), ("X0", 1.0), ("Y0", 1.0)]);
    let est = session
        .estimate(&operator, &Circuit::with_size("c", 1), 2, "sc")
        .unwrap();
    assert_eq!(est, Estimate::zero());
    assert!(session.backend().batches.is_empty());
    // The pairing is still charged with the requested shots.
    assert_eq!(session.ledger().total_jobs(), 1);
    assert_eq!(session.ledger().total_shots(), 2);

    let mut session = SamplingSession::new(FixedBackend::zeros());
    session
        .estimate(&operator, &Circuit::with_size("c", 1), 2, "sc")
        .unwrap();
    assert_eq!(session.backend().batches[0].len(), 2);
}

#[test]
fn individual_grouping_runs_every_term() {
    let mut session = SamplingSession::new(FixedBackend::zeros()).with_grouping(Individual);
    session
        .estimate(
            &op(&[("Z0", 1.0), ("Z1", 1.0), ("Z0 Z1", 1.0)]),
            &Circuit::with_size("c", 2),
            300,
            "sc",
        )
        .unwrap();
    assert_eq!(session.backend().batches[0].len(), 3);
}

#[test]
fn ion_trap_batches_carry_matrix_gates() {
    let mut session = SamplingSession::new(FixedBackend::zeros());
    let mut circuit = Circuit::with_size("c", 2);
    circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
    session
        .estimate(&op(&[("X0 X1", 1.0)]), &circuit, 100, "it")
        .unwrap();

    let (executed, _) = &session.backend().batches[0][0];
    assert!(executed.instructions().iter().all(|inst| match &inst.gate.kind {
        GateKind::Custom(g) => g.matrix.is_some(),
        GateKind::Standard(_) => inst.name() == "rz",
    }));
    assert_eq!(session.backend().noise[0].t1, 10.0);
    assert_eq!(session.last_hardware(), Some(HardwareType::IonTrap));
}

#[test]
fn noiseless_session_passes_noiseless_profile() {
    let mut session = SamplingSession::new(FixedBackend::zeros()).noiseless();
    session
        .estimate(&op(&[("Z0", 1.0)]), &Circuit::with_size("c", 1), 10, "sc")
        .unwrap();
    assert!(session.backend().noise[0].is_noiseless());
    // Time is still charged with the hardware's constants.
    assert!(session.ledger().total_circuit_time() > 0.0);
}

// ---------------------------------------------------------------------------
// Broadcasting
// ---------------------------------------------------------------------------

#[test]
fn one_operator_three_circuits() {
    let operator = op(&[("Z0", 1.0), ("X1", 0.5)]);
    let mut circuits = Vec::new();
    for n in 0..3u32 {
        let mut c = Circuit::with_size(format!("c{n}"), 2);
        for _ in 0..n {
            c.x(QubitId(0)).unwrap();
        }
        circuits.push(c);
    }

    let mut batched = SamplingSession::new(FixedBackend::zeros());
    let many = batched.estimate_many(&[operator.clone()], &circuits, 400, "sc").unwrap();
    assert_eq!(many.len(), 3);
    assert_eq!(batched.ledger().total_jobs(), 3);
    assert_eq!(batched.backend().batches.len(), 3);

    let mut single = SamplingSession::new(FixedBackend::zeros());
    for (c, est) in circuits.iter().zip(&many) {
        assert_eq!(&single.estimate(&operator, c, 400, "sc").unwrap(), est);
    }
    assert_eq!(single.ledger().total_shots(), batched.ledger().total_shots());
    assert!(
        (single.ledger().total_circuit_time() - batched.ledger().total_circuit_time()).abs()
            < 1e-12
    );
}

#[test]
fn many_operators_one_circuit() {
    let mut session = SamplingSession::new(FixedBackend::zeros());
    let ops = vec![op(&[("Z0", 1.0)]), op(&[("Z0", -2.0)]), Operator::new()];
    let out = session
        .estimate_many(&ops, &[Circuit::with_size("c", 1)], 100, "sc")
        .unwrap();
    let values: Vec<f64> = out.iter().map(|e| e.value.re).collect();
    assert_eq!(values, vec![1.0, -2.0, 0.0]);
    assert_eq!(session.ledger().total_jobs(), 2);
}

#[test]
fn mismatched_counts_fail() {
    let mut session = SamplingSession::new(FixedBackend::zeros());
    let c = Circuit::with_size("c", 1);
    let err = session
        .estimate_many(
            &[op(&[("Z0", 1.0)]), op(&[("X0", 1.0)])],
            &[c.clone(), c.clone(), c],
            100,
            "sc",
        )
        .unwrap_err();
    assert!(matches!(
        err,
        EstimateError::ArityMismatch {
            operators: 2,
            circuits: 3
        }
    ));
    assert_eq!(session.ledger().total_jobs(), 0);
}

#[test]
fn parametric_estimation_binds_each_vector() {
    let mut circuit = Circuit::with_size("ansatz", 1);
    circuit
        .rx(ParameterExpression::symbol("theta"), QubitId(0))
        .unwrap();
    let mut session = SamplingSession::new(FixedBackend::zeros());
    let out = session
        .estimate_parametric(
            &op(&[("Z0", 1.0)]),
            &circuit,
            &[vec![0.1], vec![0.2]],
            50,
            "sc",
        )
        .unwrap();
    assert_eq!(out.len(), 2);
    assert!(
        session
            .estimate_parametric(&op(&[("Z0", 1.0)]), &circuit, &[vec![]], 50, "sc")
            .is_err()
    );
}

// ---------------------------------------------------------------------------
// Budgets
// ---------------------------------------------------------------------------

#[test]
fn second_call_breaches_and_is_recorded() {
    let config = SessionConfig {
        limits: BudgetLimits {
            max_circuit_time: 1.5e-3,
            ..BudgetLimits::default()
        },
        ..SessionConfig::default()
    };
    let mut session = SamplingSession::with_config(FixedBackend::zeros(), &config).unwrap();
    let operator = op(&[("Z0", 1.0)]);
    let idle = Circuit::with_size("idle", 1);

    // Depth 0: each call costs init_time · shots = 1e-3 s.
    session.estimate(&operator, &idle, 1000, "sc").unwrap();
    let err = session.estimate(&operator, &idle, 1000, "sc").unwrap_err();
    match err {
        EstimateError::BudgetExceeded {
            kind, circuit_time, ..
        } => {
            assert_eq!(kind, BudgetKind::CircuitTime);
            assert!((circuit_time - 2e-3).abs() < 1e-12);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.ledger().total_jobs(), 2);
    assert_eq!(session.ledger().total_shots(), 2000);

    session.reset();
    assert_eq!(session.ledger().total_jobs(), 0);
    assert!(session.ledger().check().is_ok());
    assert!(session.estimate(&operator, &idle, 1000, "sc").is_ok());
}

#[test]
fn single_oversized_batch_breaches_immediately() {
    let mut session = SamplingSession::new(FixedBackend::zeros());
    // 2e9 shots · 1e-6 s init > 1000 s.
    let err = session
        .estimate(&op(&[("Z0", 1.0)]), &Circuit::with_size("c", 1), 2_000_000_000, "sc")
        .unwrap_err();
    assert!(err.is_budget_exceeded());
    assert!(session.ledger().total_circuit_time() > 1000.0);
}

#[test]
fn depth_drives_circuit_time() {
    let mut session = SamplingSession::new(FixedBackend::zeros());
    let mut circuit = Circuit::with_size("c", 1);
    circuit.x(QubitId(0)).unwrap().x(QubitId(0)).unwrap();
    session
        .estimate(&op(&[("Z0", 1.0)]), &circuit, 1000, "it")
        .unwrap();
    let (executed, _) = &session.backend().batches[0][0];
    let depth = executed.depth() as f64;
    let expected = depth * 1e-4 * 1000.0 + 1e-4 * 1000.0;
    assert!(depth >= 2.0);
    assert!((session.ledger().total_circuit_time() - expected).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Hardware table
// ---------------------------------------------------------------------------

#[test]
fn hardware_tags_resolve() {
    let table = ProfileTable::new();
    let sc = table.resolve("sc").unwrap();
    let it = table.resolve("it").unwrap();
    assert_ne!(sc.gate_time(), it.gate_time());
    assert_eq!(sc.transpiler().name(), "superconducting");
    assert_eq!(it.transpiler().name(), "ion_trap");
    assert!(matches!(
        table.resolve("xx"),
        Err(EstimateError::UnsupportedHardware(_))
    ));

    let mut session = SamplingSession::new(FixedBackend::zeros());
    assert!(matches!(
        session.sample(&Circuit::with_size("c", 1), 10, "tpu"),
        Err(EstimateError::UnsupportedHardware(_))
    ));
}
