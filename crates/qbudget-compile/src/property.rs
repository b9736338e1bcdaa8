//! Target properties: device connectivity and native gate sets.

use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use rustc_hash::FxHashSet;

/// Target device coupling map.
///
/// The coupling map defines which pairs of physical qubits can interact
/// with two-qubit gates. Node `i` of the graph is physical qubit `i`.
#[derive(Debug, Clone)]
pub struct CouplingMap {
    graph: UnGraph<u32, ()>,
}

impl CouplingMap {
    /// Create a coupling map with `num_qubits` isolated qubits.
    pub fn new(num_qubits: u32) -> Self {
        let mut graph = UnGraph::with_capacity(num_qubits as usize, 0);
        for q in 0..num_qubits {
            graph.add_node(q);
        }
        Self { graph }
    }

    /// Add an edge between two qubits (bidirectional).
    ///
    /// Duplicate edges and edges to unknown qubits are ignored.
    pub fn add_edge(&mut self, q1: u32, q2: u32) {
        if q1 == q2 || q1 >= self.num_qubits() || q2 >= self.num_qubits() {
            return;
        }
        let (a, b) = (node(q1), node(q2));
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, ());
        }
    }

    /// Create a linear coupling map (0-1-2-3-...).
    pub fn linear(n: u32) -> Self {
        let mut map = Self::new(n);
        for i in 0..n.saturating_sub(1) {
            map.add_edge(i, i + 1);
        }
        map
    }

    /// Create a fully connected coupling map.
    pub fn full(n: u32) -> Self {
        let mut map = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                map.add_edge(i, j);
            }
        }
        map
    }

    /// Create a `rows × cols` square lattice with row-major numbering.
    pub fn square_lattice(rows: u32, cols: u32) -> Self {
        let mut map = Self::new(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    map.add_edge(q, q + 1);
                }
                if r + 1 < rows {
                    map.add_edge(q, q + cols);
                }
            }
        }
        map
    }

    /// The subgraph induced by qubits `0..n`.
    pub fn restricted(&self, n: u32) -> Self {
        let n = n.min(self.num_qubits());
        let mut map = Self::new(n);
        for edge in self.graph.raw_edges() {
            let (a, b) = (edge.source().index() as u32, edge.target().index() as u32);
            if a < n && b < n {
                map.add_edge(a, b);
            }
        }
        map
    }

    /// Check if two qubits are directly connected.
    #[inline]
    pub fn is_connected(&self, q1: u32, q2: u32) -> bool {
        q1 < self.num_qubits()
            && q2 < self.num_qubits()
            && self.graph.find_edge(node(q1), node(q2)).is_some()
    }

    /// Get the number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.graph.node_count() as u32
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Shortest path between two qubits, endpoints included.
    ///
    /// Returns `None` if either qubit is unknown or no path exists.
    pub fn shortest_path(&self, from: u32, to: u32) -> Option<Vec<u32>> {
        if from >= self.num_qubits() || to >= self.num_qubits() {
            return None;
        }
        let goal = node(to);
        astar(&self.graph, node(from), |n| n == goal, |_| 1u32, |_| 0u32)
            .map(|(_, path)| path.into_iter().map(|n| n.index() as u32).collect())
    }

    /// Shortest-path distance in edges.
    pub fn distance(&self, from: u32, to: u32) -> Option<u32> {
        self.shortest_path(from, to)
            .map(|path| path.len().saturating_sub(1) as u32)
    }
}

#[inline]
fn node(q: u32) -> NodeIndex {
    NodeIndex::new(q as usize)
}

/// Native gate set of a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasisGates {
    name: String,
    gates: FxHashSet<String>,
}

impl BasisGates {
    /// Create a named basis from gate names.
    pub fn new(
        name: impl Into<String>,
        gates: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            gates: gates.into_iter().map(Into::into).collect(),
        }
    }

    /// Superconducting basis: X + SX + RZ + CX.
    pub fn superconducting() -> Self {
        Self::new("superconducting", ["x", "sx", "rz", "cx"])
    }

    /// Ion-trap basis: U1q + ZZ + RZZ + RZ.
    pub fn ion_trap() -> Self {
        Self::new("ion_trap", ["u1q", "zz", "rzz", "rz"])
    }

    /// Check if a gate is in the basis.
    pub fn contains(&self, gate: &str) -> bool {
        self.gates.contains(gate)
    }

    /// Name of the basis.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of gates in the basis.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// True if the basis is empty.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coupling_map_linear() {
        let map = CouplingMap::linear(5);
        assert!(map.is_connected(0, 1));
        assert!(map.is_connected(1, 0));
        assert!(!map.is_connected(0, 2));
        assert_eq!(map.distance(0, 4), Some(4));
        assert_eq!(map.shortest_path(0, 3), Some(vec![0, 1, 2, 3]));
    }

    #[test]
    fn test_square_lattice() {
        let map = CouplingMap::square_lattice(8, 8);
        assert_eq!(map.num_qubits(), 64);
        // 2 * 8 * 7 edges
        assert_eq!(map.num_edges(), 112);
        assert!(map.is_connected(0, 1));
        assert!(map.is_connected(0, 8));
        assert!(!map.is_connected(7, 8));
        assert_eq!(map.distance(0, 63), Some(14));
    }

    #[test]
    fn test_restricted_lattice_stays_connected() {
        let map = CouplingMap::square_lattice(8, 8).restricted(11);
        assert_eq!(map.num_qubits(), 11);
        assert!(map.is_connected(2, 10));
        assert!(!map.is_connected(10, 11));
        for q in 1..11 {
            assert!(map.distance(0, q).is_some());
        }
    }

    #[test]
    fn test_duplicate_edges_ignored() {
        let mut map = CouplingMap::new(3);
        map.add_edge(0, 1);
        map.add_edge(1, 0);
        map.add_edge(1, 1);
        map.add_edge(1, 7);
        assert_eq!(map.num_edges(), 1);
        assert_eq!(map.shortest_path(0, 2), None);
    }

    #[test]
    fn test_basis_gates() {
        let sc = BasisGates::superconducting();
        assert!(sc.contains("cx"));
        assert!(sc.contains("rz"));
        assert!(!sc.contains("u1q"));

        let it = BasisGates::ion_trap();
        assert!(it.contains("u1q"));
        assert!(it.contains("zz"));
        assert!(!it.contains("cx"));
        assert_eq!(it.name(), "ion_trap");
    }
}
