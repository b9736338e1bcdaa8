//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index outside the circuit width.
    #[error("Qubit {qubit} not found in {num_qubits}-qubit circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Width of the circuit.
        num_qubits: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Appended circuit is wider than the circuit it is appended to.
    #[error("Cannot compose a {other}-qubit circuit onto a {base}-qubit circuit")]
    WidthMismatch {
        /// Width of the base circuit.
        base: u32,
        /// Width of the appended circuit.
        other: u32,
    },

    /// Parameter is unbound.
    #[error("Parameter '{0}' is unbound")]
    UnboundParameter(String),

    /// Wrong number of values supplied when binding parameters.
    #[error("Circuit has {expected} parameters, got {got} values")]
    ParameterCountMismatch {
        /// Number of free parameters in the circuit.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// A matrix gate was given a matrix of the wrong size.
    #[error("Matrix of length {got} does not fit a {num_qubits}-qubit gate")]
    MatrixShape {
        /// Number of qubits of the gate.
        num_qubits: u32,
        /// Length of the supplied row-major matrix.
        got: usize,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
