//! Noise parameters of a hardware class.
//!
//! The channel set is fixed: depolarizing after every gate, thermal
//! relaxation for the duration of every gate, and a bit flip on readout.
//! A [`NoiseProfile`] carries the constants for those three channels and
//! [`NoiseProfile::channels`] lists them as [`NoiseModel`] values.

use serde::{Deserialize, Serialize};

/// One of the noise channels a backend applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum NoiseModel {
    /// Depolarizing channel after each gate.
    Depolarizing {
        /// Single-qubit gate error probability.
        p1: f64,
        /// Two-qubit gate error probability.
        p2: f64,
    },

    /// Thermal relaxation over one gate duration.
    ThermalRelaxation {
        /// Energy relaxation time in seconds.
        t1: f64,
        /// Dephasing time in seconds.
        t2: f64,
        /// Duration the channel acts for, in seconds.
        time: f64,
        /// Population of |1⟩ a relaxed qubit is reset to.
        excited_state_population: f64,
    },

    /// Bit-flip channel on each measured bit.
    BitFlip {
        /// Flip probability (0.0 to 1.0).
        p: f64,
    },
}

impl NoiseModel {
    /// Get a human-readable name for this noise model.
    pub fn name(&self) -> &str {
        match self {
            NoiseModel::Depolarizing { .. } => "depolarizing",
            NoiseModel::ThermalRelaxation { .. } => "thermal_relaxation",
            NoiseModel::BitFlip { .. } => "bit_flip",
        }
    }
}

impl std::fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoiseModel::Depolarizing { p1, p2 } => {
                write!(f, "depolarizing(p1={p1:.1e}, p2={p2:.1e})")
            }
            NoiseModel::ThermalRelaxation { t1, t2, time, .. } => {
                write!(f, "thermal_relaxation(t1={t1:.1e}, t2={t2:.1e}, t={time:.1e})")
            }
            NoiseModel::BitFlip { p } => write!(f, "bit_flip(p={p:.1e})"),
        }
    }
}

/// Noise and timing constants of one hardware class. All times are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseProfile {
    /// Single-qubit depolarizing error rate.
    pub depolarizing_1q: f64,
    /// Two-qubit depolarizing error rate.
    pub depolarizing_2q: f64,
    /// T1 relaxation time.
    pub t1: f64,
    /// T2 dephasing time.
    pub t2: f64,
    /// Duration of one gate layer.
    pub gate_time: f64,
    /// Readout bit-flip probability.
    pub readout_bitflip: f64,
    /// Qubit initialization duration.
    pub init_time: f64,
    /// Excited-state population thermal relaxation decays towards.
    #[serde(default = "default_excited_state_population")]
    pub excited_state_population: f64,
}

fn default_excited_state_population() -> f64 {
    0.1
}

impl NoiseProfile {
    /// A profile with no noise. Timing constants are zero.
    pub fn noiseless() -> Self {
        Self {
            depolarizing_1q: 0.0,
            depolarizing_2q: 0.0,
            t1: f64::INFINITY,
            t2: f64::INFINITY,
            gate_time: 0.0,
            readout_bitflip: 0.0,
            init_time: 0.0,
            excited_state_population: 0.0,
        }
    }

    /// True if no channel would ever alter a sample.
    pub fn is_noiseless(&self) -> bool {
        let relaxes = self.gate_time > 0.0 && (self.t1.is_finite() || self.t2.is_finite());
        self.depolarizing_1q == 0.0
            && self.depolarizing_2q == 0.0
            && self.readout_bitflip == 0.0
            && !relaxes
    }

    /// The channels this profile describes.
    pub fn channels(&self) -> Vec<NoiseModel> {
        vec![
            NoiseModel::Depolarizing {
                p1: self.depolarizing_1q,
                p2: self.depolarizing_2q,
            },
            NoiseModel::ThermalRelaxation {
                t1: self.t1,
                t2: self.t2,
                time: self.gate_time,
                excited_state_population: self.excited_state_population,
            },
            NoiseModel::BitFlip {
                p: self.readout_bitflip,
            },
        ]
    }
}
