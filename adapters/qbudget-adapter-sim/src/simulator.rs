//! Simulator backend implementation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use std::time::Instant;
use tracing::{debug, instrument};

use qbudget_estimate::{BackendError, BackendResult, CountDistribution, SamplingBackend};
use qbudget_ir::{Circuit, NoiseProfile};

use crate::noise::{ErrorEvent, NoiseChannels};
use crate::statevector::Statevector;

/// Local noisy statevector backend.
///
/// Each batch entry is simulated independently. The random state is owned
/// by the backend, so two simulators created with the same seed return the
/// same counts for the same sequence of batches.
pub struct SimulatorBackend {
    /// Backend name.
    name: String,
    /// Maximum number of qubits supported.
    max_qubits: u32,
    /// Source of all randomness.
    rng: StdRng,
}

impl SimulatorBackend {
    /// Create a new simulator seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a reproducible simulator.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            name: "statevector".to_string(),
            max_qubits: 20,
            rng,
        }
    }

    /// Set the maximum circuit width.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Maximum circuit width.
    pub fn max_qubits(&self) -> u32 {
        self.max_qubits
    }

    /// Sample one circuit.
    #[instrument(skip(self, circuit, channels), fields(circuit = circuit.name()))]
    fn run_circuit(
        &mut self,
        circuit: &Circuit,
        shots: u64,
        channels: &NoiseChannels,
    ) -> BackendResult<CountDistribution> {
        let start = Instant::now();
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.max_qubits {
            return Err(BackendError::TooManyQubits {
                num_qubits,
                max: self.max_qubits,
            });
        }

        debug!("Starting simulation: {} qubits, {} shots", num_qubits, shots);

        let instructions = circuit.instructions();
        let operands: Vec<Vec<usize>> = instructions
            .iter()
            .map(|inst| inst.qubits.iter().map(|q| q.index()).collect())
            .collect();

        // Error-free final state, shared by every shot that draws no gate error.
        let mut ideal = Statevector::new(num_qubits as usize);
        for inst in instructions {
            ideal.apply(inst)?;
        }
        let cumulative: Vec<f64> = ideal
            .probabilities()
            .into_iter()
            .scan(0.0, |acc, p| {
                *acc += p;
                Some(*acc)
            })
            .collect();

        let mut counts: FxHashMap<u64, u64> = FxHashMap::default();
        let mut schedule: Vec<(usize, ErrorEvent)> = Vec::new();
        let mut events = Vec::new();
        let mut replayed = 0u64;

        for _ in 0..shots {
            schedule.clear();
            if !channels.gates_are_ideal() {
                for (index, qubits) in operands.iter().enumerate() {
                    events.clear();
                    channels.sample_gate_errors(qubits, &mut self.rng, &mut events);
                    schedule.extend(events.iter().map(|e| (index, *e)));
                }
            }

            let bits = if schedule.is_empty() {
                sample_cumulative(&cumulative, &mut self.rng)
            } else {
                replayed += 1;
                let mut state = Statevector::new(num_qubits as usize);
                let mut pending = schedule.iter().peekable();
                for (index, inst) in instructions.iter().enumerate() {
                    state.apply(inst)?;
                    while let Some((_, event)) = pending.next_if(|(i, _)| *i == index) {
                        event.apply(&mut state, &mut self.rng);
                    }
                }
                state.sample(&mut self.rng)
            };

            let bits = channels.flip_readout(bits, num_qubits, &mut self.rng);
            *counts.entry(bits).or_insert(0) += 1;
        }

        debug!(
            "Simulation completed in {:?}, {} of {} shots replayed with errors",
            start.elapsed(),
            replayed,
            shots
        );

        Ok(counts.into_iter().collect())
    }
}

/// Draw a basis index from a running sum of probabilities.
fn sample_cumulative(cumulative: &[f64], rng: &mut impl Rng) -> u64 {
    let total = cumulative.last().copied().unwrap_or(1.0);
    let r: f64 = rng.gen_range(0.0..1.0) * total;
    let index = cumulative.partition_point(|&c| c <= r);
    index.min(cumulative.len().saturating_sub(1)) as u64
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SimulatorBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatorBackend")
            .field("name", &self.name)
            .field("max_qubits", &self.max_qubits)
            .finish_non_exhaustive()
    }
}

impl SamplingBackend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(entries = batch.len()))]
    fn run(
        &mut self,
        batch: &[(Circuit, u64)],
        noise: &NoiseProfile,
    ) -> BackendResult<Vec<CountDistribution>> {
        let channels = NoiseChannels::from_profile(noise);
        batch
            .iter()
            .map(|(circuit, shots)| self.run_circuit(circuit, *shots, &channels))
            .collect()
    }
}
