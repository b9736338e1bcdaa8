//! Qubit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit within a circuit.
///
/// Qubits are addressed positionally: a circuit of width `n` owns
/// `q0 .. q{n-1}`, and bit `i` of a sampled bitstring is the outcome of `qi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The qubit index as a `usize`, for indexing statevectors and masks.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Bit mask selecting this qubit in a little-endian bitstring.
    ///
    /// Returns `None` for qubits that do not fit in a `u64`.
    #[inline]
    pub fn mask(self) -> Option<u64> {
        1u64.checked_shl(self.0)
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId(0)), "q0");
        assert_eq!(format!("{}", QubitId(17)), "q17");
    }

    #[test]
    fn test_qubit_mask() {
        assert_eq!(QubitId(0).mask(), Some(1));
        assert_eq!(QubitId(3).mask(), Some(8));
        assert_eq!(QubitId(63).mask(), Some(1 << 63));
        assert_eq!(QubitId(64).mask(), None);
    }
}
