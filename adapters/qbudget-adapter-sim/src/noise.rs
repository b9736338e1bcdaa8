//! Per-shot error sampling.
//!
//! Every gate is followed by a depolarizing error on its operands and a
//! thermal-relaxation error on each operand for one gate duration. Which
//! error fires does not depend on the state, so a shot's error schedule is
//! drawn before the circuit is replayed. Readout flips each measured bit
//! independently.

use rand::Rng;

use qbudget_ir::NoiseProfile;

use crate::statevector::{Pauli, Statevector};

/// One sampled error, applied after the gate it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorEvent {
    /// A Pauli error on one qubit.
    Pauli { qubit: usize, pauli: Pauli },
    /// Amplitude damping: the qubit relaxes to `|excited⟩`.
    Reset { qubit: usize, excited: bool },
}

impl ErrorEvent {
    /// Apply this error to a trajectory.
    pub fn apply(self, state: &mut Statevector, rng: &mut impl Rng) {
        match self {
            ErrorEvent::Pauli { qubit, pauli } => state.apply_pauli(qubit, pauli),
            ErrorEvent::Reset { qubit, excited } => state.reset_to(qubit, excited, rng),
        }
    }
}

/// Channel probabilities derived from a [`NoiseProfile`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseChannels {
    depolarizing_1q: f64,
    depolarizing_2q: f64,
    /// Probability a qubit relaxes during one gate.
    p_reset: f64,
    /// Probability of a pure dephasing Z during one gate.
    p_dephase: f64,
    excited_state_population: f64,
    readout_bitflip: f64,
}

impl NoiseChannels {
    /// Derive per-gate probabilities from a profile.
    ///
    /// With `t = gate_time`, a qubit relaxes with `1 - e^{-t/T1}` and
    /// dephases with `(e^{-t/T1} - e^{-t/T2}) / 2`.
    pub fn from_profile(profile: &NoiseProfile) -> Self {
        let decay = |t_n: f64| {
            if profile.gate_time > 0.0 && t_n > 0.0 {
                (-profile.gate_time / t_n).exp()
            } else {
                1.0
            }
        };
        let d1 = decay(profile.t1);
        let d2 = decay(profile.t2);
        Self {
            depolarizing_1q: probability(profile.depolarizing_1q),
            depolarizing_2q: probability(profile.depolarizing_2q),
            p_reset: probability(1.0 - d1),
            p_dephase: probability((d1 - d2) / 2.0),
            excited_state_population: probability(profile.excited_state_population),
            readout_bitflip: probability(profile.readout_bitflip),
        }
    }

    /// True if no error can ever fire.
    pub fn is_ideal(&self) -> bool {
        self.depolarizing_1q == 0.0
            && self.depolarizing_2q == 0.0
            && self.p_reset == 0.0
            && self.p_dephase == 0.0
            && self.readout_bitflip == 0.0
    }

    /// True if gates never produce errors.
    pub fn gates_are_ideal(&self) -> bool {
        self.depolarizing_1q == 0.0
            && self.depolarizing_2q == 0.0
            && self.p_reset == 0.0
            && self.p_dephase == 0.0
    }

    /// Append the errors that follow one gate on `qubits` to `out`.
    pub fn sample_gate_errors(
        &self,
        qubits: &[usize],
        rng: &mut impl Rng,
        out: &mut Vec<ErrorEvent>,
    ) {
        match qubits {
            [q] => {
                if rng.gen_bool(self.depolarizing_1q) {
                    if let Some(pauli) = pauli_from_index(rng.gen_range(1..4)) {
                        out.push(ErrorEvent::Pauli { qubit: *q, pauli });
                    }
                }
            }
            [q0, q1] => {
                if rng.gen_bool(self.depolarizing_2q) {
                    // One of the 15 non-identity two-qubit Paulis.
                    let k: u8 = rng.gen_range(1..16);
                    for (qubit, index) in [(*q0, k % 4), (*q1, k / 4)] {
                        if let Some(pauli) = pauli_from_index(index) {
                            out.push(ErrorEvent::Pauli { qubit, pauli });
                        }
                    }
                }
            }
            _ => {}
        }

        if self.p_reset == 0.0 && self.p_dephase == 0.0 {
            return;
        }
        for &qubit in qubits {
            let r: f64 = rng.gen_range(0.0..1.0);
            if r < self.p_reset {
                let excited = rng.gen_bool(self.excited_state_population);
                out.push(ErrorEvent::Reset { qubit, excited });
            } else if r < self.p_reset + self.p_dephase {
                out.push(ErrorEvent::Pauli {
                    qubit,
                    pauli: Pauli::Z,
                });
            }
        }
    }

    /// Flip each of the low `num_qubits` bits with the readout probability.
    pub fn flip_readout(&self, bits: u64, num_qubits: u32, rng: &mut impl Rng) -> u64 {
        if self.readout_bitflip == 0.0 {
            return bits;
        }
        (0..num_qubits.min(64)).fold(bits, |acc, q| {
            if rng.gen_bool(self.readout_bitflip) {
                acc ^ (1u64 << q)
            } else {
                acc
            }
        })
    }
}

fn probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

fn pauli_from_index(index: u8) -> Option<Pauli> {
    match index {
        1 => Some(Pauli::X),
        2 => Some(Pauli::Y),
        3 => Some(Pauli::Z),
        _ => None,
    }
}
