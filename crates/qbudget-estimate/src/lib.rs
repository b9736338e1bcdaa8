//! qbudget Sampling Estimation
//!
//! This crate estimates expectation values of weighted Pauli sums by
//! sampling a state-preparation circuit on a noisy backend, and enforces a
//! budget on simulated circuit time and wall-clock time while doing so.
//!
//! # Architecture
//!
//! ```text
//! (operator, circuit, shots, "sc" | "it")
//!       │
//!       ▼
//! ┌─────────────────┐   ProfileTable ─► noise + Transpiler + timing
//! │ SamplingSession │
//! └─────────────────┘
//!       │  MeasurementGrouping ─► groups (identity term split off)
//!       │  ShotAllocator       ─► shots per group (zero-shot groups skipped)
//!       │  HardwareProfile     ─► transpile (+ synthesize) each group circuit
//!       ▼
//! SamplingBackend::run(batch) ─► counts ─► EstimateAggregator ─► Estimate
//!       │
//!       ▼
//! ResourceLedger::record + check ─► BudgetExceeded on breach
//! ```
//!
//! # Example
//!
//! ```rust
//! use qbudget_estimate::{
//!     BackendResult, CountDistribution, Operator, SamplingBackend, SamplingSession,
//! };
//! use qbudget_ir::{Circuit, NoiseProfile};
//!
//! /// Every shot reads all zeros.
//! struct Zeros;
//!
//! impl SamplingBackend for Zeros {
//!     fn name(&self) -> &str {
//!         "zeros"
//!     }
//!
//!     fn run(
//!         &mut self,
//!         batch: &[(Circuit, u64)],
//!         _noise: &NoiseProfile,
//!     ) -> BackendResult<Vec<CountDistribution>> {
//!         Ok(batch.iter().map(|(_, n)| [(0u64, *n)].into_iter().collect()).collect())
//!     }
//! }
//!
//! let operator: Operator = serde_json::from_str(r#"[{"pauli": "Z0", "re": 1.0}]"#).unwrap();
//! let mut session = SamplingSession::new(Zeros);
//! let estimate = session
//!     .estimate(&operator, &Circuit::with_size("empty", 1), 1000, "sc")
//!     .unwrap();
//!
//! assert_eq!(estimate.value.re, 1.0);
//! assert_eq!(estimate.error, 0.0);
//! assert_eq!(session.ledger().total_jobs(), 1);
//! ```

pub mod aggregate;
pub mod allocation;
pub mod backend;
pub mod config;
pub mod error;
pub mod grouping;
pub mod hardware;
pub mod ledger;
pub mod pauli;
pub mod session;

pub use aggregate::{Estimate, EstimateAggregator};
pub use allocation::{
    AllocationPolicy, EqualPartition, Proportional, Remainder, ShotAllocation, ShotAllocator,
};
pub use backend::{
    BackendError, BackendResult, CountDistribution, MAX_READOUT_QUBITS, SamplingBackend,
};
pub use config::{ConfigError, SessionConfig};
pub use error::{BudgetKind, EstimateError, EstimateResult};
pub use grouping::{
    BitwiseCommuting, GroupingStrategy, Individual, MeasurementGroup, MeasurementGrouping,
};
pub use hardware::{HardwareProfile, HardwareType, PreparedCircuit, ProfileTable};
pub use ledger::{BatchCost, BudgetLimits, LedgerSnapshot, ResourceLedger};
pub use pauli::{Operator, PauliOp, PauliTerm};
pub use session::SamplingSession;
