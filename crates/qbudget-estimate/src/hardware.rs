//! Hardware classes and their fixed noise, timing and transpilation settings.

use std::fmt;
use std::str::FromStr;

use qbudget_compile::{NativeGateSynthesizer, Transpiler};
use qbudget_ir::{Circuit, NoiseProfile};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EstimateError, EstimateResult};

/// Supported hardware classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardwareType {
    /// Superconducting-like device, tag `"sc"`.
    #[serde(rename = "sc")]
    Superconducting,
    /// Trapped-ion-like device, tag `"it"`.
    #[serde(rename = "it")]
    IonTrap,
}

impl HardwareType {
    /// The short tag callers pass in.
    pub fn tag(self) -> &'static str {
        match self {
            HardwareType::Superconducting => "sc",
            HardwareType::IonTrap => "it",
        }
    }
}

impl fmt::Display for HardwareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for HardwareType {
    type Err = EstimateError;

    fn from_str(s: &str) -> EstimateResult<Self> {
        match s {
            "sc" => Ok(HardwareType::Superconducting),
            "it" => Ok(HardwareType::IonTrap),
            other => Err(EstimateError::UnsupportedHardware(other.to_string())),
        }
    }
}

/// Superconducting constants: short coherence, fast gates.
pub fn superconducting_noise() -> NoiseProfile {
    NoiseProfile {
        depolarizing_1q: 1e-3,
        depolarizing_2q: 1e-2,
        t1: 1.5e-4,
        t2: 1.5e-4,
        gate_time: 1e-6,
        readout_bitflip: 1e-2,
        init_time: 1e-6,
        excited_state_population: 0.1,
    }
}

/// Ion-trap constants: long coherence, slow gates, low error rates.
pub fn ion_trap_noise() -> NoiseProfile {
    NoiseProfile {
        depolarizing_1q: 1e-5,
        depolarizing_2q: 1e-3,
        t1: 10.0,
        t2: 1.0,
        gate_time: 1e-4,
        readout_bitflip: 1e-3,
        init_time: 1e-4,
        excited_state_population: 0.1,
    }
}

/// A circuit lowered for one hardware class.
#[derive(Debug, Clone)]
pub struct PreparedCircuit {
    /// Circuit in the native alphabet; its depth drives the time accounting.
    pub transpiled: Circuit,
    /// Circuit handed to the backend (native gates synthesized if required).
    pub executable: Circuit,
}

impl PreparedCircuit {
    /// Depth of the transpiled circuit.
    pub fn depth(&self) -> usize {
        self.transpiled.depth()
    }
}

/// Noise, timing and transpilation of one hardware class.
#[derive(Debug)]
pub struct HardwareProfile {
    hardware: HardwareType,
    noise: NoiseProfile,
    transpiler: Transpiler,
    needs_synthesis: bool,
}

impl HardwareProfile {
    /// The fixed superconducting profile.
    pub fn superconducting() -> Self {
        Self {
            hardware: HardwareType::Superconducting,
            noise: superconducting_noise(),
            transpiler: Transpiler::superconducting(),
            needs_synthesis: false,
        }
    }

    /// The fixed ion-trap profile. Its native gates need synthesis.
    pub fn ion_trap() -> Self {
        Self {
            hardware: HardwareType::IonTrap,
            noise: ion_trap_noise(),
            transpiler: Transpiler::ion_trap(),
            needs_synthesis: true,
        }
    }

    /// Hardware class.
    pub fn hardware(&self) -> HardwareType {
        self.hardware
    }

    /// Noise constants.
    pub fn noise(&self) -> &NoiseProfile {
        &self.noise
    }

    /// Transpiler onto the native alphabet.
    pub fn transpiler(&self) -> &Transpiler {
        &self.transpiler
    }

    /// Duration of one gate layer in seconds.
    pub fn gate_time(&self) -> f64 {
        self.noise.gate_time
    }

    /// Qubit initialization duration in seconds.
    pub fn init_time(&self) -> f64 {
        self.noise.init_time
    }

    /// True if native gates must be turned into matrices before execution.
    pub fn needs_synthesis(&self) -> bool {
        self.needs_synthesis
    }

    /// Transpile `circuit` and, if needed, synthesize its native gates.
    pub fn prepare(&self, circuit: &Circuit) -> EstimateResult<PreparedCircuit> {
        let transpiled = self.transpiler.run(circuit)?;
        let executable = if self.needs_synthesis {
            NativeGateSynthesizer::new().synthesize_circuit(&transpiled)?
        } else {
            transpiled.clone()
        };
        debug!(
            hardware = %self.hardware,
            depth = transpiled.depth(),
            gates = transpiled.len(),
            "prepared circuit"
        );
        Ok(PreparedCircuit {
            transpiled,
            executable,
        })
    }

    /// Simulated execution time of `shots` runs of a circuit of `depth`.
    pub fn circuit_time(&self, depth: usize, shots: u64) -> f64 {
        let shots = shots as f64;
        depth as f64 * self.gate_time() * shots + self.init_time() * shots
    }
}

/// Immutable lookup table from hardware tag to profile.
#[derive(Debug)]
pub struct ProfileTable {
    superconducting: HardwareProfile,
    ion_trap: HardwareProfile,
}

impl ProfileTable {
    /// Build the table with the fixed profiles.
    pub fn new() -> Self {
        Self {
            superconducting: HardwareProfile::superconducting(),
            ion_trap: HardwareProfile::ion_trap(),
        }
    }

    /// Profile of a hardware class.
    pub fn get(&self, hardware: HardwareType) -> &HardwareProfile {
        match hardware {
            HardwareType::Superconducting => &self.superconducting,
            HardwareType::IonTrap => &self.ion_trap,
        }
    }

    /// Profile for a tag, failing with `UnsupportedHardware` for unknown tags.
    pub fn resolve(&self, tag: &str) -> EstimateResult<&HardwareProfile> {
        Ok(self.get(tag.parse()?))
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::new()
    }
}
