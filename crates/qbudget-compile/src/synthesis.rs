//! Native-gate synthesis: ion-trap natives to explicit unitaries.

use num_complex::Complex64;

use qbudget_ir::{Circuit, CustomGate, Gate, GateKind, Instruction, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::unitary::{Unitary2x2, diagonal4};

/// Turns ion-trap native gates into gates a statevector backend can execute.
///
/// `U1q` and `ZZ`/`RZZ` become matrix gates built in closed form; `RZ`
/// passes through. Anything else is rejected, so the input must already be
/// in the ion-trap basis.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeGateSynthesizer;

impl NativeGateSynthesizer {
    /// Create a synthesizer.
    pub fn new() -> Self {
        Self
    }

    /// Synthesize one native instruction.
    pub fn synthesize(&self, inst: &Instruction) -> CompileResult<Instruction> {
        let GateKind::Standard(gate) = &inst.gate.kind else {
            return Err(CompileError::UnsupportedGate(inst.name().to_string()));
        };

        let matrix_gate = match gate {
            StandardGate::Rz(_) => return Ok(inst.clone()),
            StandardGate::U1q(theta, phi) => {
                let u = Unitary2x2::u1q(theta.evaluate()?, phi.evaluate()?);
                CustomGate::new("u1q", 1)
                    .with_params(vec![theta.clone(), phi.clone()])
                    .with_matrix(u.to_vec())?
            }
            StandardGate::ZZ => {
                let one = Complex64::new(1.0, 0.0);
                let i = Complex64::new(0.0, 1.0);
                CustomGate::new("zz", 2).with_matrix(diagonal4([one, i, i, one]))?
            }
            StandardGate::RZZ(theta) => {
                let one = Complex64::new(1.0, 0.0);
                let phase = Complex64::from_polar(1.0, theta.evaluate()?);
                CustomGate::new("rzz", 2)
                    .with_params(vec![theta.clone()])
                    .with_matrix(diagonal4([one, phase, phase, one]))?
            }
            other => return Err(CompileError::UnsupportedGate(other.name().to_string())),
        };

        Ok(Instruction::gate(Gate::custom(matrix_gate), inst.qubits.clone()))
    }

    /// Synthesize every instruction of a circuit.
    pub fn synthesize_circuit(&self, circuit: &Circuit) -> CompileResult<Circuit> {
        let synthesized = circuit
            .instructions()
            .iter()
            .map(|inst| self.synthesize(inst))
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(circuit.with_instructions(synthesized)?)
    }
}
