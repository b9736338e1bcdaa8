//! End-to-end transpilation tests over both hardware pipelines.

use proptest::prelude::*;
use qbudget_compile::{BasisGates, CompileError, NativeGateSynthesizer, Transpiler};
use qbudget_ir::{Circuit, GateKind, ParameterExpression, QubitId};

fn ansatz(n: u32) -> Circuit {
    let mut circuit = Circuit::with_size("ansatz", n);
    for q in 0..n {
        circuit
            .ry(ParameterExpression::symbol(format!("t{q}")), QubitId(q))
            .unwrap();
    }
    for q in 0..n.saturating_sub(1) {
        circuit.cz(QubitId(q), QubitId(q + 1)).unwrap();
    }
    circuit.cx(QubitId(0), QubitId(n - 1)).unwrap();
    circuit
}

// ---------------------------------------------------------------------------
// Superconducting pipeline
// ---------------------------------------------------------------------------

#[test]
fn test_superconducting_keeps_parameters() {
    let circuit = ansatz(6);
    let out = Transpiler::superconducting().run(&circuit).unwrap();
    assert_eq!(out.parameters(), circuit.parameters());
    assert_eq!(out.num_qubits(), 6);

    let basis = BasisGates::superconducting();
    assert!(out.instructions().iter().all(|i| basis.contains(i.name())));
}

#[test]
fn test_superconducting_rejects_wide_circuit() {
    let mut circuit = Circuit::with_size("wide", 70);
    circuit.cx(QubitId(0), QubitId(69)).unwrap();
    let err = Transpiler::superconducting().run(&circuit).unwrap_err();
    assert!(matches!(err, CompileError::RoutingFailed { .. }));
}

// ---------------------------------------------------------------------------
// Ion-trap pipeline
// ---------------------------------------------------------------------------

#[test]
fn test_ion_trap_then_synthesis() {
    let circuit = ansatz(4)
        .bind_parameters(&[0.1, 0.2, 0.3, 0.4])
        .unwrap();
    let native = Transpiler::ion_trap().run(&circuit).unwrap();
    let basis = BasisGates::ion_trap();
    assert!(native.instructions().iter().all(|i| basis.contains(i.name())));

    let executable = NativeGateSynthesizer::new()
        .synthesize_circuit(&native)
        .unwrap();
    for inst in executable.instructions() {
        match &inst.gate.kind {
            GateKind::Custom(g) => assert!(g.matrix.is_some()),
            GateKind::Standard(g) => assert_eq!(g.name(), "rz"),
        }
    }
    assert_eq!(executable.depth(), native.depth());
}

#[test]
fn test_synthesis_needs_bound_parameters() {
    let native = Transpiler::ion_trap().run(&ansatz(2)).unwrap();
    let err = NativeGateSynthesizer::new()
        .synthesize_circuit(&native)
        .unwrap_err();
    assert!(matches!(err, CompileError::Ir(_)));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn transpilation_is_deterministic(n in 2u32..10, seed in 0u32..1000) {
        let mut circuit = Circuit::with_size("random", n);
        let a = seed % n;
        let b = (a + 1 + seed / n % (n - 1)) % n;
        circuit.h(QubitId(a)).unwrap();
        circuit.cx(QubitId(a), QubitId(b)).unwrap();
        circuit.rzz(0.3, QubitId(b), QubitId(a)).unwrap();

        for transpiler in [Transpiler::superconducting(), Transpiler::ion_trap()] {
            let first = transpiler.run(&circuit).unwrap();
            let second = transpiler.run(&circuit).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
