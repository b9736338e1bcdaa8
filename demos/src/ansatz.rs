//! Parameterized ansatz circuits.
//!
//! The ansatz is built once with symbolic parameters `theta_0 .. theta_{n-1}`
//! and bound per evaluation, so the session can compute parameter-shift
//! gradients on it.

use qbudget_ir::{Circuit, IrResult, ParameterExpression, QubitId};

/// Number of parameters of [`hardware_efficient_ansatz`].
///
/// Total parameters = n_qubits * (reps + 1)
pub fn num_parameters(n_qubits: u32, reps: usize) -> usize {
    n_qubits as usize * (reps + 1)
}

/// Name of the `index`-th ansatz parameter.
pub fn parameter_name(index: usize) -> String {
    format!("theta_{index}")
}

/// Hardware-efficient real ansatz with a Hartree–Fock-style prefix.
///
/// The circuit:
/// - flips every qubit in `occupied` (the reference determinant)
/// - applies an RY rotation layer
/// - repeats `reps` times: a CZ chain between neighbours, then an RY layer
///
/// Every amplitude stays real, which suits real Hamiltonians.
pub fn hardware_efficient_ansatz(
    n_qubits: u32,
    reps: usize,
    occupied: &[u32],
) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("hw_efficient", n_qubits);
    for &q in occupied {
        circuit.x(QubitId(q))?;
    }

    let mut param_idx = 0;
    let mut rotation_layer = |circuit: &mut Circuit| -> IrResult<()> {
        for q in 0..n_qubits {
            circuit.ry(ParameterExpression::symbol(parameter_name(param_idx)), QubitId(q))?;
            param_idx += 1;
        }
        Ok(())
    };

    rotation_layer(&mut circuit)?;
    for _ in 0..reps {
        for q in 1..n_qubits {
            circuit.cz(QubitId(q - 1), QubitId(q))?;
        }
        rotation_layer(&mut circuit)?;
    }

    Ok(circuit)
}
