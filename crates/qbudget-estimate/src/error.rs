//! Error types for the estimation engine.

use std::fmt;

use qbudget_compile::CompileError;
use qbudget_ir::IrError;
use thiserror::Error;

use crate::backend::BackendError;
use crate::config::ConfigError;

/// Which resource ceiling a [`EstimateError::BudgetExceeded`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetKind {
    /// Accumulated simulated circuit execution time.
    CircuitTime,
    /// Wall-clock time since the session started.
    WallTime,
}

impl fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetKind::CircuitTime => write!(f, "circuit time"),
            BudgetKind::WallTime => write!(f, "wall time"),
        }
    }
}

/// Errors produced by the sampling session and its components.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EstimateError {
    /// Hardware tag is not one of the supported classes.
    #[error("Unsupported hardware type '{0}' (expected \"sc\" or \"it\")")]
    UnsupportedHardware(String),

    /// A gate outside the native alphabet reached synthesis.
    #[error("Unsupported gate '{0}' for this hardware profile")]
    UnsupportedGate(String),

    /// Operator and circuit counts cannot be paired.
    #[error("Cannot pair {operators} operators with {circuits} circuits")]
    ArityMismatch {
        /// Number of operators supplied.
        operators: usize,
        /// Number of circuits supplied.
        circuits: usize,
    },

    /// A batched call received no operators or no circuits.
    #[error("Batched estimation needs at least one operator and one circuit")]
    EmptyBatch,

    /// A resource ceiling was breached. The breaching batch is already recorded.
    #[error(
        "Budget exceeded ({kind} limit {limit}s): circuit time {circuit_time:.3}s, wall time {wall_time:.3}s"
    )]
    BudgetExceeded {
        /// The ceiling that was breached.
        kind: BudgetKind,
        /// Value of that ceiling in seconds.
        limit: f64,
        /// Accumulated circuit time at the breach.
        circuit_time: f64,
        /// Elapsed wall time at the breach.
        wall_time: f64,
    },

    /// A Pauli term acts on a qubit the circuit does not have.
    #[error("Operator references qubit {qubit} but circuit only has {num_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: u32,
        /// Width of the circuit.
        num_qubits: u32,
    },

    /// A Pauli term acts on a qubit past the widest readable bitstring.
    #[error("Operator references qubit {qubit} but outcomes hold at most {max} qubits")]
    UnreadableQubit {
        /// The offending qubit index.
        qubit: u32,
        /// Width of a count bitstring.
        max: u32,
    },

    /// A Pauli label could not be parsed or repeats a qubit.
    #[error("Invalid Pauli label '{0}'")]
    InvalidPauliLabel(String),

    /// The sampling backend failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Circuit IR error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] IrError),

    /// Transpilation error.
    #[error("Compile error: {0}")]
    Compile(CompileError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EstimateError {
    /// True for the one error an optimizer loop is expected to handle.
    pub fn is_budget_exceeded(&self) -> bool {
        matches!(self, EstimateError::BudgetExceeded { .. })
    }
}

impl From<CompileError> for EstimateError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::UnsupportedGate(name) => EstimateError::UnsupportedGate(name),
            CompileError::Ir(ir) => EstimateError::Ir(ir),
            other => EstimateError::Compile(other),
        }
    }
}

/// Result type for estimation operations.
pub type EstimateResult<T> = Result<T, EstimateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_lifting() {
        let err: EstimateError = CompileError::UnsupportedGate("h".into()).into();
        assert!(matches!(err, EstimateError::UnsupportedGate(ref g) if g == "h"));

        let err: EstimateError = CompileError::Ir(IrError::UnboundParameter("t".into())).into();
        assert!(matches!(err, EstimateError::Ir(IrError::UnboundParameter(_))));

        let err: EstimateError = CompileError::RoutingFailed {
            num_qubits: 70,
            capacity: 64,
        }
        .into();
        assert!(matches!(err, EstimateError::Compile(_)));
    }

    #[test]
    fn test_budget_exceeded_display() {
        let err = EstimateError::BudgetExceeded {
            kind: BudgetKind::CircuitTime,
            limit: 1000.0,
            circuit_time: 1100.0,
            wall_time: 2.5,
        };
        assert!(err.is_budget_exceeded());
        let msg = err.to_string();
        assert!(msg.contains("circuit time limit 1000s"));
        assert!(msg.contains("1100.000"));
        assert!(!EstimateError::EmptyBatch.is_budget_exceeded());
    }
}
