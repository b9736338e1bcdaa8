//! Routing pass for inserting SWAP gates on a square lattice.

use qbudget_ir::{Circuit, Instruction, QubitId, StandardGate};
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;
use crate::property::CouplingMap;

/// SWAP routing on a square lattice.
///
/// Logical qubit `i` sits on lattice site `i` (row-major). For each
/// two-qubit gate on non-adjacent sites, the first operand is swapped along
/// a shortest path until it neighbours the second, the gate is applied, and
/// the SWAPs are undone so every qubit returns to its home site.
pub struct SquareLatticeRouting {
    rows: u32,
    cols: u32,
}

impl SquareLatticeRouting {
    /// Routing on a `rows × cols` lattice.
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Number of lattice sites.
    pub fn capacity(&self) -> u32 {
        self.rows * self.cols
    }

    fn coupling_map(&self, num_qubits: u32) -> CompileResult<CouplingMap> {
        if num_qubits > self.capacity() {
            return Err(CompileError::RoutingFailed {
                num_qubits,
                capacity: self.capacity(),
            });
        }
        Ok(CouplingMap::square_lattice(self.rows, self.cols).restricted(num_qubits))
    }
}

impl Default for SquareLatticeRouting {
    fn default() -> Self {
        Self::new(8, 8)
    }
}

impl Pass for SquareLatticeRouting {
    fn name(&self) -> &str {
        "SquareLatticeRouting"
    }

    fn run(&self, circuit: &Circuit) -> CompileResult<Circuit> {
        let coupling_map = self.coupling_map(circuit.num_qubits())?;
        let mut routed = Vec::with_capacity(circuit.len());
        let mut swaps_inserted = 0usize;

        for inst in circuit.instructions() {
            if inst.qubits.len() != 2 {
                routed.push(inst.clone());
                continue;
            }

            let (a, b) = (inst.qubits[0].0, inst.qubits[1].0);
            if coupling_map.is_connected(a, b) {
                routed.push(inst.clone());
                continue;
            }

            let path = coupling_map
                .shortest_path(a, b)
                .ok_or(CompileError::RoutingFailed {
                    num_qubits: circuit.num_qubits(),
                    capacity: self.capacity(),
                })?;

            // Move the first operand to the site next to the second.
            let hops: Vec<(QubitId, QubitId)> = path[..path.len() - 1]
                .windows(2)
                .map(|w| (QubitId(w[0]), QubitId(w[1])))
                .collect();
            for &(p, q) in &hops {
                routed.push(Instruction::two_qubit_gate(StandardGate::Swap, p, q));
            }

            let mut moved = inst.clone();
            moved.qubits[0] = QubitId(path[path.len() - 2]);
            routed.push(moved);

            for &(p, q) in hops.iter().rev() {
                routed.push(Instruction::two_qubit_gate(StandardGate::Swap, p, q));
            }
            swaps_inserted += 2 * hops.len();
        }

        debug!("Inserted {} SWAPs", swaps_inserted);
        Ok(circuit.with_instructions(routed)?)
    }

    fn should_run(&self, circuit: &Circuit) -> bool {
        circuit.instructions().iter().any(|inst| inst.qubits.len() == 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_gate_untouched() {
        let mut circuit = Circuit::with_size("test", 9);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.cx(QubitId(0), QubitId(8)).unwrap();

        let routed = SquareLatticeRouting::default().run(&circuit).unwrap();
        assert_eq!(routed, circuit);
    }

    #[test]
    fn test_distant_gate_swapped_and_restored() {
        // 0 and 3 sit three columns apart in the first row.
        let mut circuit = Circuit::with_size("test", 4);
        circuit.cx(QubitId(0), QubitId(3)).unwrap();

        let routed = SquareLatticeRouting::default().run(&circuit).unwrap();
        let names: Vec<&str> = routed.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["swap", "swap", "cx", "swap", "swap"]);

        let cx = &routed.instructions()[2];
        assert_eq!(cx.qubits, vec![QubitId(2), QubitId(3)]);
        // Undo order mirrors the forward SWAPs.
        assert_eq!(routed.instructions()[0].qubits, routed.instructions()[4].qubits);
        assert_eq!(routed.instructions()[1].qubits, routed.instructions()[3].qubits);
    }

    #[test]
    fn test_every_two_qubit_gate_adjacent_after_routing() {
        let n = 12;
        let mut circuit = Circuit::with_size("test", n);
        for a in 0..n {
            for b in 0..n {
                if a != b {
                    circuit.cz(QubitId(a), QubitId(b)).unwrap();
                }
            }
        }
        let routed = SquareLatticeRouting::default().run(&circuit).unwrap();
        let map = CouplingMap::square_lattice(8, 8).restricted(n);
        for inst in routed.instructions() {
            assert!(map.is_connected(inst.qubits[0].0, inst.qubits[1].0));
        }
    }

    #[test]
    fn test_too_wide_circuit_fails() {
        let circuit = Circuit::with_size("wide", 65);
        let err = SquareLatticeRouting::default().run(&circuit).unwrap_err();
        assert_eq!(
            err,
            CompileError::RoutingFailed {
                num_qubits: 65,
                capacity: 64
            }
        );
    }
}
