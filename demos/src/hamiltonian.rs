//! Demo Hamiltonians.
//!
//! Operators are plain [`Operator`] values; files use the engine's serde
//! form, a JSON list of `{ "pauli": "X0 Z1", "re": 0.5, "im": 0.0 }` records.

use std::path::Path;

use anyhow::Context;
use num_complex::Complex64;
use qbudget_estimate::{Operator, PauliTerm};

/// Exact ground-state energy of [`h2_hamiltonian`], in Hartree.
pub const H2_GROUND_STATE_ENERGY: f64 = -1.857_275_030_202_382;

/// H2 at 0.735 Å, parity-mapped with two-qubit reduction.
///
/// The reference determinant is `|q0 = 1, q1 = 0⟩`.
pub fn h2_hamiltonian() -> Operator {
    [
        ("I", -1.052_373_245_772_859),
        ("Z0", 0.397_937_424_843_180_45),
        ("Z1", -0.397_937_424_843_180_45),
        ("Z0 Z1", -0.011_280_104_256_235_38),
        ("X0 X1", 0.180_931_199_784_231_56),
    ]
    .into_iter()
    .map(|(label, c)| (label_term(label), Complex64::new(c, 0.0)))
    .collect()
}

/// Occupied qubits of the H2 reference determinant.
pub const H2_OCCUPIED: [u32; 1] = [0];

/// Transverse-field Ising chain: `-J Σ Z_i Z_{i+1} - h Σ X_i`.
pub fn ising_chain(n_qubits: u32, coupling: f64, field: f64) -> Operator {
    let mut op = Operator::new();
    for q in 1..n_qubits {
        op.add_term(
            label_term(&format!("Z{} Z{q}", q - 1)),
            Complex64::new(-coupling, 0.0),
        );
    }
    for q in 0..n_qubits {
        op.add_term(label_term(&format!("X{q}")), Complex64::new(-field, 0.0));
    }
    op
}

/// Load an operator from a JSON file.
pub fn load_operator(path: &Path) -> anyhow::Result<Operator> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading operator file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parsing operator file {}", path.display()))
}

/// Width an operator needs: one past its highest qubit.
pub fn required_qubits(op: &Operator) -> u32 {
    op.max_qubit().map_or(1, |q| q + 1)
}

fn label_term(label: &str) -> PauliTerm {
    // Labels above are fixed and well formed.
    label.parse().unwrap_or_else(|_| PauliTerm::identity())
}
