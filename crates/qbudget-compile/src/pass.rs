//! Pass trait for compilation passes.

use qbudget_ir::Circuit;

use crate::error::CompileResult;

/// A compilation pass mapping a circuit to a new circuit.
///
/// Passes never mutate their input; circuits are values and each pass
/// returns the rewritten one.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Run the pass on the given circuit.
    fn run(&self, circuit: &Circuit) -> CompileResult<Circuit>;

    /// Check if this pass should run on the given circuit.
    ///
    /// This can be overridden to skip passes that are not needed.
    fn should_run(&self, _circuit: &Circuit) -> bool {
        true
    }
}
