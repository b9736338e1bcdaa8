//! Transpiler: an ordered pass pipeline.

use std::fmt;

use tracing::{debug, info, instrument};

use qbudget_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{BasisTranslation, SquareLatticeRouting};

/// Runs a sequence of compilation passes over a circuit.
///
/// A transpiler is a pure function of its input circuit; it holds no state
/// between runs.
pub struct Transpiler {
    /// Name used in logs.
    name: String,
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl Transpiler {
    /// Create a new empty transpiler.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passes: vec![],
        }
    }

    /// Add a pass to the pipeline.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Add a pass, builder style.
    #[must_use]
    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.add_pass(pass);
        self
    }

    /// Superconducting pipeline.
    ///
    /// Translate to X + SX + RZ + CX, route on an 8×8 lattice, then translate
    /// again to lower the inserted SWAPs.
    pub fn superconducting() -> Self {
        Self::new("superconducting")
            .with_pass(BasisTranslation::superconducting())
            .with_pass(SquareLatticeRouting::new(8, 8))
            .with_pass(BasisTranslation::superconducting())
    }

    /// Ion-trap pipeline: translate to U1q + ZZ + RZZ + RZ with all-to-all connectivity.
    pub fn ion_trap() -> Self {
        Self::new("ion_trap").with_pass(BasisTranslation::ion_trap())
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit), fields(transpiler = %self.name))]
    pub fn run(&self, circuit: &Circuit) -> CompileResult<Circuit> {
        debug!(
            "Running {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.num_qubits()
        );

        let mut current = circuit.clone();
        for pass in &self.passes {
            if pass.should_run(&current) {
                debug!("Running pass: {}", pass.name());
                current = pass.run(&current)?;
                debug!("Pass {} completed, ops: {}", pass.name(), current.len());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Transpiled '{}': depth {} -> {}, ops {} -> {}",
            circuit.name(),
            circuit.depth(),
            current.depth(),
            circuit.len(),
            current.len()
        );

        Ok(current)
    }

    /// Name of the pipeline.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the transpiler has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl fmt::Debug for Transpiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transpiler")
            .field("name", &self.name)
            .field(
                "passes",
                &self.passes.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbudget_ir::QubitId;

    #[test]
    fn test_empty_transpiler() {
        let t = Transpiler::new("empty");
        assert!(t.is_empty());

        let circuit = Circuit::bell().unwrap();
        assert_eq!(t.run(&circuit).unwrap(), circuit);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Transpiler::superconducting().len(), 3);
        assert_eq!(Transpiler::ion_trap().len(), 1);
        assert!(format!("{:?}", Transpiler::ion_trap()).contains("ion_trap"));
    }

    #[test]
    fn test_superconducting_output_is_native_and_adjacent() {
        let mut circuit = Circuit::with_size("test", 10);
        circuit.h(QubitId(0)).unwrap();
        circuit.cz(QubitId(0), QubitId(9)).unwrap();
        circuit.swap(QubitId(3), QubitId(4)).unwrap();

        let out = Transpiler::superconducting().run(&circuit).unwrap();
        let basis = crate::property::BasisGates::superconducting();
        let map = crate::property::CouplingMap::square_lattice(8, 8);
        for inst in out.instructions() {
            assert!(basis.contains(inst.name()), "non-native {}", inst.name());
            if inst.qubits.len() == 2 {
                assert!(map.is_connected(inst.qubits[0].0, inst.qubits[1].0));
            }
        }
    }

    #[test]
    fn test_transpiler_is_pure() {
        let circuit = Circuit::ghz(4).unwrap();
        let t = Transpiler::ion_trap();
        assert_eq!(t.run(&circuit).unwrap(), t.run(&circuit).unwrap());
    }
}
