//! qbudget Noisy Statevector Simulator
//!
//! This crate provides the local sampling backend the estimation session
//! drives. It keeps the full statevector, so it is exact but limited to
//! roughly 20 qubits.
//!
//! # Features
//!
//! - **Standard and native gates**: every gate in `qbudget-ir`, plus matrix
//!   gates produced by native-gate synthesis
//! - **Noise trajectories**: depolarizing and thermal-relaxation errors
//!   sampled per shot, readout bit flips per measured bit
//! - **Reproducible**: a seeded simulator returns the same counts for the
//!   same sequence of batches
//!
//! # Performance
//!
//! Shots whose sampled error schedule is empty are drawn from one cached
//! ideal distribution; only shots that hit an error replay the circuit.
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//!
//! # Example
//!
//! ```rust
//! use qbudget_adapter_sim::SimulatorBackend;
//! use qbudget_estimate::SamplingBackend;
//! use qbudget_ir::{Circuit, NoiseProfile};
//!
//! let mut backend = SimulatorBackend::with_seed(7);
//! let bell = Circuit::bell().unwrap();
//! let counts = backend.run(&[(bell, 1000)], &NoiseProfile::noiseless()).unwrap();
//!
//! // Only |00⟩ and |11⟩ occur.
//! assert_eq!(counts[0].get(0b00) + counts[0].get(0b11), 1000);
//! ```

mod noise;
mod simulator;
mod statevector;

pub use simulator::SimulatorBackend;
