//! Basis translation passes.
//!
//! Every decomposition here is exact up to a global phase. Sequences are
//! listed in application order, so `[A, B]` means `B · A`.

use std::f64::consts::PI;

use qbudget_ir::{Circuit, GateKind, Instruction, ParameterExpression, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;
use crate::property::BasisGates;

/// Which native alphabet a [`BasisTranslation`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Superconducting,
    IonTrap,
}

/// Basis translation pass.
///
/// Translates gates to one of the two native alphabets:
/// - superconducting: X + SX + RZ + CX
/// - ion trap: U1q + ZZ + RZZ + RZ
pub struct BasisTranslation {
    target: Target,
    basis: BasisGates,
}

impl BasisTranslation {
    /// Translate to X + SX + RZ + CX.
    pub fn superconducting() -> Self {
        Self {
            target: Target::Superconducting,
            basis: BasisGates::superconducting(),
        }
    }

    /// Translate to U1q + ZZ + RZZ + RZ.
    pub fn ion_trap() -> Self {
        Self {
            target: Target::IonTrap,
            basis: BasisGates::ion_trap(),
        }
    }

    /// The target basis.
    pub fn basis(&self) -> &BasisGates {
        &self.basis
    }

    fn translate(&self, inst: &Instruction) -> CompileResult<Vec<Instruction>> {
        if self.basis.contains(inst.name()) {
            return Ok(vec![inst.clone()]);
        }
        let GateKind::Standard(gate) = &inst.gate.kind else {
            return Err(CompileError::GateNotInBasis {
                gate: inst.name().to_string(),
                basis: self.basis.name().to_string(),
            });
        };
        match self.target {
            Target::Superconducting => translate_to_superconducting(gate, &inst.qubits),
            Target::IonTrap => translate_to_ion_trap(gate, &inst.qubits),
        }
    }
}

impl Pass for BasisTranslation {
    fn name(&self) -> &str {
        match self.target {
            Target::Superconducting => "BasisTranslation(superconducting)",
            Target::IonTrap => "BasisTranslation(ion_trap)",
        }
    }

    fn run(&self, circuit: &Circuit) -> CompileResult<Circuit> {
        let mut translated = Vec::with_capacity(circuit.len());
        for inst in circuit.instructions() {
            translated.extend(self.translate(inst)?);
        }
        Ok(circuit.with_instructions(translated)?)
    }

    fn should_run(&self, circuit: &Circuit) -> bool {
        circuit
            .instructions()
            .iter()
            .any(|inst| !self.basis.contains(inst.name()))
    }
}

fn one(gate: StandardGate, q: QubitId) -> Instruction {
    Instruction::single_qubit_gate(gate, q)
}

fn two(gate: StandardGate, q0: QubitId, q1: QubitId) -> Instruction {
    Instruction::two_qubit_gate(gate, q0, q1)
}

fn rz(angle: f64, q: QubitId) -> Instruction {
    one(StandardGate::Rz(angle.into()), q)
}

/// `expr + offset`, folded to a constant when possible.
fn offset(expr: &ParameterExpression, by: f64) -> ParameterExpression {
    (expr.clone() + ParameterExpression::constant(by)).simplify()
}

fn negated(expr: &ParameterExpression) -> ParameterExpression {
    (-expr.clone()).simplify()
}

/// Translate a standard gate to the superconducting basis (X + SX + RZ + CX).
fn translate_to_superconducting(
    gate: &StandardGate,
    qubits: &[QubitId],
) -> CompileResult<Vec<Instruction>> {
    let q0 = qubits[0];

    Ok(match gate {
        StandardGate::I => vec![],

        // Native
        StandardGate::X => vec![one(StandardGate::X, q0)],
        StandardGate::SX => vec![one(StandardGate::SX, q0)],
        StandardGate::Rz(theta) => vec![one(StandardGate::Rz(theta.clone()), q0)],

        // Y = X · Rz(π)
        StandardGate::Y => vec![rz(PI, q0), one(StandardGate::X, q0)],

        // Diagonal gates are Rz up to phase
        StandardGate::Z => vec![rz(PI, q0)],
        StandardGate::S => vec![rz(PI / 2.0, q0)],
        StandardGate::Sdg => vec![rz(-PI / 2.0, q0)],
        StandardGate::T => vec![rz(PI / 4.0, q0)],
        StandardGate::Tdg => vec![rz(-PI / 4.0, q0)],
        StandardGate::P(lambda) => vec![one(StandardGate::Rz(lambda.clone()), q0)],

        // H = Rz(π/2) · SX · Rz(π/2)
        StandardGate::H => vec![rz(PI / 2.0, q0), one(StandardGate::SX, q0), rz(PI / 2.0, q0)],

        // SXdg = Rz(π) · SX · Rz(π)
        StandardGate::SXdg => vec![rz(PI, q0), one(StandardGate::SX, q0), rz(PI, q0)],

        // Rx(θ) = Rz(π/2) · SX · Rz(θ+π) · SX · Rz(π/2)
        StandardGate::Rx(theta) => vec![
            rz(PI / 2.0, q0),
            one(StandardGate::SX, q0),
            one(StandardGate::Rz(offset(theta, PI)), q0),
            one(StandardGate::SX, q0),
            rz(PI / 2.0, q0),
        ],

        // Ry(θ) = Rz(π) · SX · Rz(θ+π) · SX
        StandardGate::Ry(theta) => vec![
            one(StandardGate::SX, q0),
            one(StandardGate::Rz(offset(theta, PI)), q0),
            one(StandardGate::SX, q0),
            rz(PI, q0),
        ],

        // U(θ,φ,λ) = Rz(φ) · Ry(θ) · Rz(λ)
        StandardGate::U(theta, phi, lambda) => {
            let mut result = vec![one(StandardGate::Rz(lambda.clone()), q0)];
            result.extend(translate_to_superconducting(
                &StandardGate::Ry(theta.clone()),
                &[q0],
            )?);
            result.push(one(StandardGate::Rz(phi.clone()), q0));
            result
        }

        // U1q(θ,φ) = Rz(φ) · Rx(θ) · Rz(-φ)
        StandardGate::U1q(theta, phi) => {
            let mut result = vec![one(StandardGate::Rz(negated(phi)), q0)];
            result.extend(translate_to_superconducting(
                &StandardGate::Rx(theta.clone()),
                &[q0],
            )?);
            result.push(one(StandardGate::Rz(phi.clone()), q0));
            result
        }

        StandardGate::CX => vec![two(StandardGate::CX, q0, qubits[1])],

        // CZ = H(t) · CX · H(t)
        StandardGate::CZ => {
            let q1 = qubits[1];
            let h = translate_to_superconducting(&StandardGate::H, &[q1])?;
            let mut result = h.clone();
            result.push(two(StandardGate::CX, q0, q1));
            result.extend(h);
            result
        }

        // CY = Rz(π/2)(t) · CX · Rz(-π/2)(t)
        StandardGate::CY => {
            let q1 = qubits[1];
            vec![
                rz(-PI / 2.0, q1),
                two(StandardGate::CX, q0, q1),
                rz(PI / 2.0, q1),
            ]
        }

        // SWAP = CX(a,b) · CX(b,a) · CX(a,b)
        StandardGate::Swap => {
            let q1 = qubits[1];
            vec![
                two(StandardGate::CX, q0, q1),
                two(StandardGate::CX, q1, q0),
                two(StandardGate::CX, q0, q1),
            ]
        }

        // RZZ(θ) = CX · Rz(θ)(b) · CX
        StandardGate::RZZ(theta) => {
            let q1 = qubits[1];
            vec![
                two(StandardGate::CX, q0, q1),
                one(StandardGate::Rz(theta.clone()), q1),
                two(StandardGate::CX, q0, q1),
            ]
        }

        // ZZ = RZZ(π/2)
        StandardGate::ZZ => {
            translate_to_superconducting(&StandardGate::RZZ((PI / 2.0).into()), qubits)?
        }
    })
}

/// Translate a standard gate to the ion-trap basis (U1q + ZZ + RZZ + RZ).
fn translate_to_ion_trap(
    gate: &StandardGate,
    qubits: &[QubitId],
) -> CompileResult<Vec<Instruction>> {
    let q0 = qubits[0];
    let u1q = |theta: ParameterExpression, phi: f64, q: QubitId| {
        one(StandardGate::U1q(theta, phi.into()), q)
    };

    Ok(match gate {
        StandardGate::I => vec![],

        // Native
        StandardGate::Rz(theta) => vec![one(StandardGate::Rz(theta.clone()), q0)],
        StandardGate::U1q(theta, phi) => {
            vec![one(StandardGate::U1q(theta.clone(), phi.clone()), q0)]
        }
        StandardGate::ZZ => vec![two(StandardGate::ZZ, q0, qubits[1])],
        StandardGate::RZZ(theta) => vec![two(StandardGate::RZZ(theta.clone()), q0, qubits[1])],

        // X = U1q(π, 0), Y = U1q(π, π/2)
        StandardGate::X => vec![u1q(PI.into(), 0.0, q0)],
        StandardGate::Y => vec![u1q(PI.into(), PI / 2.0, q0)],

        // Diagonal gates are Rz up to phase
        StandardGate::Z => vec![rz(PI, q0)],
        StandardGate::S => vec![rz(PI / 2.0, q0)],
        StandardGate::Sdg => vec![rz(-PI / 2.0, q0)],
        StandardGate::T => vec![rz(PI / 4.0, q0)],
        StandardGate::Tdg => vec![rz(-PI / 4.0, q0)],
        StandardGate::P(lambda) => vec![one(StandardGate::Rz(lambda.clone()), q0)],

        // H = U1q(π, 0) · U1q(π/2, π/2)
        StandardGate::H => vec![u1q((PI / 2.0).into(), PI / 2.0, q0), u1q(PI.into(), 0.0, q0)],

        StandardGate::SX => vec![u1q((PI / 2.0).into(), 0.0, q0)],
        StandardGate::SXdg => vec![u1q((-PI / 2.0).into(), 0.0, q0)],

        // Rx(θ) = U1q(θ, 0), Ry(θ) = U1q(θ, π/2)
        StandardGate::Rx(theta) => vec![u1q(theta.clone(), 0.0, q0)],
        StandardGate::Ry(theta) => vec![u1q(theta.clone(), PI / 2.0, q0)],

        // U(θ,φ,λ) = Rz(φ) · U1q(θ, π/2) · Rz(λ)
        StandardGate::U(theta, phi, lambda) => vec![
            one(StandardGate::Rz(lambda.clone()), q0),
            u1q(theta.clone(), PI / 2.0, q0),
            one(StandardGate::Rz(phi.clone()), q0),
        ],

        // CZ = Rz(-π/2)(a) · Rz(-π/2)(b) · ZZ, up to a global phase of i
        StandardGate::CZ => {
            let q1 = qubits[1];
            vec![
                two(StandardGate::ZZ, q0, q1),
                rz(-PI / 2.0, q0),
                rz(-PI / 2.0, q1),
            ]
        }

        // CX = H(t) · CZ · H(t)
        StandardGate::CX => {
            let q1 = qubits[1];
            let h = translate_to_ion_trap(&StandardGate::H, &[q1])?;
            let mut result = h.clone();
            result.extend(translate_to_ion_trap(&StandardGate::CZ, qubits)?);
            result.extend(h);
            result
        }

        // CY = Rz(π/2)(t) · CX · Rz(-π/2)(t)
        StandardGate::CY => {
            let q1 = qubits[1];
            let mut result = vec![rz(-PI / 2.0, q1)];
            result.extend(translate_to_ion_trap(&StandardGate::CX, qubits)?);
            result.push(rz(PI / 2.0, q1));
            result
        }

        // SWAP = CX(a,b) · CX(b,a) · CX(a,b)
        StandardGate::Swap => {
            let q1 = qubits[1];
            let forward = translate_to_ion_trap(&StandardGate::CX, &[q0, q1])?;
            let backward = translate_to_ion_trap(&StandardGate::CX, &[q1, q0])?;
            let mut result = forward.clone();
            result.extend(backward);
            result.extend(forward);
            result
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unitary::Unitary2x2;

    /// Product of a bound single-qubit sequence in application order.
    fn sequence_unitary(circuit: &Circuit) -> Unitary2x2 {
        circuit
            .instructions()
            .iter()
            .fold(Unitary2x2::identity(), |acc, inst| {
                Unitary2x2::from_gate(inst.as_standard().unwrap()).unwrap() * acc
            })
    }

    fn single_qubit_gates() -> Vec<StandardGate> {
        vec![
            StandardGate::X,
            StandardGate::Y,
            StandardGate::Z,
            StandardGate::H,
            StandardGate::S,
            StandardGate::Sdg,
            StandardGate::T,
            StandardGate::Tdg,
            StandardGate::SX,
            StandardGate::SXdg,
            StandardGate::Rx(0.731.into()),
            StandardGate::Ry((-1.2).into()),
            StandardGate::Rz(0.4.into()),
            StandardGate::P(2.1.into()),
            StandardGate::U(0.731.into(), 1.3.into(), (-0.4).into()),
            StandardGate::U1q(0.9.into(), (-0.6).into()),
        ]
    }

    fn check_single_qubit(pass: &BasisTranslation) {
        for gate in single_qubit_gates() {
            let expected = Unitary2x2::from_gate(&gate).unwrap();
            let mut circuit = Circuit::with_size("test", 1);
            circuit.gate(gate.clone(), [QubitId(0)]).unwrap();

            let translated = pass.run(&circuit).unwrap();
            for inst in translated.instructions() {
                assert!(pass.basis().contains(inst.name()), "{} left {}", gate.name(), inst.name());
            }
            let got = sequence_unitary(&translated);
            assert!(
                got.equiv_up_to_phase(&expected),
                "{} decomposition is not exact",
                gate.name()
            );
        }
    }

    #[test]
    fn test_superconducting_single_qubit_exact() {
        check_single_qubit(&BasisTranslation::superconducting());
    }

    #[test]
    fn test_ion_trap_single_qubit_exact() {
        check_single_qubit(&BasisTranslation::ion_trap());
    }

    #[test]
    fn test_superconducting_two_qubit_counts() {
        let pass = BasisTranslation::superconducting();
        let count = |gate: StandardGate| {
            let mut circuit = Circuit::with_size("test", 2);
            circuit.gate(gate, [QubitId(0), QubitId(1)]).unwrap();
            pass.run(&circuit).unwrap().len()
        };
        assert_eq!(count(StandardGate::CX), 1);
        // H · CX · H with H = 3 gates
        assert_eq!(count(StandardGate::CZ), 7);
        assert_eq!(count(StandardGate::CY), 3);
        assert_eq!(count(StandardGate::Swap), 3);
        assert_eq!(count(StandardGate::RZZ(0.3.into())), 3);
        assert_eq!(count(StandardGate::ZZ), 3);
    }

    #[test]
    fn test_ion_trap_two_qubit_counts() {
        let pass = BasisTranslation::ion_trap();
        let count = |gate: StandardGate| {
            let mut circuit = Circuit::with_size("test", 2);
            circuit.gate(gate, [QubitId(0), QubitId(1)]).unwrap();
            pass.run(&circuit).unwrap().len()
        };
        assert_eq!(count(StandardGate::ZZ), 1);
        assert_eq!(count(StandardGate::CZ), 3);
        // H(2) + CZ(3) + H(2)
        assert_eq!(count(StandardGate::CX), 7);
        assert_eq!(count(StandardGate::Swap), 21);
    }

    #[test]
    fn test_symbolic_parameters_survive() {
        let mut circuit = Circuit::with_size("test", 1);
        circuit
            .rx(ParameterExpression::symbol("theta"), QubitId(0))
            .unwrap();

        let translated = BasisTranslation::superconducting().run(&circuit).unwrap();
        assert_eq!(translated.parameters(), vec!["theta".to_string()]);

        let bound = translated.bind_parameters(&[0.731]).unwrap();
        let expected = Unitary2x2::rx(0.731);
        assert!(sequence_unitary(&bound).equiv_up_to_phase(&expected));
    }

    #[test]
    fn test_identity_dropped() {
        let mut circuit = Circuit::with_size("test", 1);
        circuit.id(QubitId(0)).unwrap();
        let translated = BasisTranslation::ion_trap().run(&circuit).unwrap();
        assert!(translated.is_empty());
    }

    #[test]
    fn test_custom_gate_rejected() {
        use qbudget_ir::CustomGate;
        let mut circuit = Circuit::with_size("test", 1);
        circuit.gate(CustomGate::new("mystery", 1), [QubitId(0)]).unwrap();
        let err = BasisTranslation::superconducting().run(&circuit).unwrap_err();
        assert!(matches!(err, CompileError::GateNotInBasis { .. }));
    }

    #[test]
    fn test_should_run_skips_native_circuit() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit.sx(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        assert!(!BasisTranslation::superconducting().should_run(&circuit));
        assert!(BasisTranslation::ion_trap().should_run(&circuit));
    }
}
