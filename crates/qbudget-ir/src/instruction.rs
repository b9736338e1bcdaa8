//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::{Gate, StandardGate};
use crate::qubit::QubitId;

/// A gate applied to concrete qubits.
///
/// For controlled gates the control qubits come first in `qubits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The gate.
    pub gate: Gate,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            gate: gate.into(),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        self.gate.name()
    }

    /// Control qubits (empty for uncontrolled gates).
    pub fn controls(&self) -> &[QubitId] {
        let n = (self.gate.num_controls() as usize).min(self.qubits.len());
        &self.qubits[..n]
    }

    /// Target qubits.
    pub fn targets(&self) -> &[QubitId] {
        let n = (self.gate.num_controls() as usize).min(self.qubits.len());
        &self.qubits[n..]
    }

    /// The standard gate, if this instruction carries one.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        self.gate.as_standard()
    }
}
