//! Error types for the compile crate.

use qbudget_ir::IrError;
use thiserror::Error;

/// Errors produced while transpiling or synthesizing a circuit.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// A gate has no decomposition into the requested basis.
    #[error("Gate '{gate}' cannot be translated to the {basis} basis")]
    GateNotInBasis {
        /// Name of the gate.
        gate: String,
        /// Name of the target basis.
        basis: String,
    },

    /// A gate outside the native alphabet reached native-gate synthesis.
    #[error("Gate '{0}' is not a synthesizable native gate")]
    UnsupportedGate(String),

    /// The circuit does not fit the device connectivity.
    #[error("Cannot route {num_qubits}-qubit circuit on a {capacity}-qubit lattice")]
    RoutingFailed {
        /// Width of the circuit.
        num_qubits: u32,
        /// Number of sites on the lattice.
        capacity: u32,
    },

    /// Circuit IR error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
