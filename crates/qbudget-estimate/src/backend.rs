//! The sampling backend interface the session drives.
//!
//! A backend turns `(circuit, shots)` pairs into measurement counts. It owns
//! its random state, so `run` takes `&mut self`; a session holding the
//! backend is therefore never shared between threads without external
//! synchronization.

use std::collections::BTreeMap;
use std::collections::btree_map;

use qbudget_ir::{Circuit, IrError, NoiseProfile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Widest register a [`CountDistribution`] bitstring can hold.
pub const MAX_READOUT_QUBITS: u32 = u64::BITS;

/// Measured bitstrings and how often each occurred.
///
/// Bitstrings are little-endian integers: bit `i` is the outcome of qubit `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountDistribution {
    counts: BTreeMap<u64, u64>,
}

impl CountDistribution {
    /// Create an empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of `bits`.
    pub fn record(&mut self, bits: u64, count: u64) {
        if count > 0 {
            *self.counts.entry(bits).or_insert(0) += count;
        }
    }

    /// Occurrences of `bits`.
    pub fn get(&self, bits: u64) -> u64 {
        self.counts.get(&bits).copied().unwrap_or(0)
    }

    /// Total number of shots.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct bitstrings observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(bits, count)` pairs in ascending bitstring order.
    pub fn iter(&self) -> btree_map::Iter<'_, u64, u64> {
        self.counts.iter()
    }

    /// The most frequent bitstring, lowest value on ties.
    pub fn most_frequent(&self) -> Option<(u64, u64)> {
        self.counts
            .iter()
            .map(|(b, c)| (*b, *c))
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
    }
}

impl FromIterator<(u64, u64)> for CountDistribution {
    fn from_iter<T: IntoIterator<Item = (u64, u64)>>(iter: T) -> Self {
        let mut dist = Self::new();
        for (bits, count) in iter {
            dist.record(bits, count);
        }
        dist
    }
}

/// Errors reported by a sampling backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    /// Circuit is wider than the backend can simulate.
    #[error("Circuit has {num_qubits} qubits, backend supports at most {max}")]
    TooManyQubits {
        /// Width of the submitted circuit.
        num_qubits: u32,
        /// Backend limit.
        max: u32,
    },

    /// Backend cannot execute a gate.
    #[error("Backend cannot execute gate '{0}'")]
    UnsupportedGate(String),

    /// Circuit could not be evaluated.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] IrError),

    /// Generic execution failure.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Executes batches of circuits and returns one distribution per entry.
///
/// Distributions are returned in batch order and each sums to its entry's
/// shot count. Given the same internal seed state, a backend must return
/// the same counts.
pub trait SamplingBackend: Send {
    /// Backend name.
    fn name(&self) -> &str;

    /// Run every `(circuit, shots)` entry under `noise`.
    fn run(
        &mut self,
        batch: &[(Circuit, u64)],
        noise: &NoiseProfile,
    ) -> BackendResult<Vec<CountDistribution>>;
}

impl<B: SamplingBackend + ?Sized> SamplingBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(
        &mut self,
        batch: &[(Circuit, u64)],
        noise: &NoiseProfile,
    ) -> BackendResult<Vec<CountDistribution>> {
        (**self).run(batch, noise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_distribution() {
        let mut dist = CountDistribution::new();
        dist.record(0b00, 480);
        dist.record(0b11, 520);
        dist.record(0b01, 0);
        assert_eq!(dist.total(), 1000);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.get(0b01), 0);
        assert_eq!(dist.most_frequent(), Some((0b11, 520)));
    }

    #[test]
    fn test_from_iter_accumulates() {
        let dist: CountDistribution = [(1, 2), (1, 3), (0, 5)].into_iter().collect();
        assert_eq!(dist.get(1), 5);
        assert_eq!(dist.total(), 10);
        assert_eq!(dist.most_frequent(), Some((0, 5)));
    }
}
