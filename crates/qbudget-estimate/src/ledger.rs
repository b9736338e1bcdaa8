//! Resource accounting and budget enforcement.
//!
//! The ledger accumulates shots, jobs and simulated circuit time, and
//! measures wall time from the session start. Costs are recorded before the
//! budget is checked, so after a breach the counters include the batch that
//! caused it.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{BudgetKind, EstimateError, EstimateResult};

/// The two resource ceilings, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetLimits {
    /// Ceiling on accumulated simulated circuit time.
    #[serde(default = "default_max_circuit_time")]
    pub max_circuit_time: f64,
    /// Ceiling on wall-clock time since the session started.
    #[serde(default = "default_max_wall_time")]
    pub max_wall_time: f64,
}

fn default_max_circuit_time() -> f64 {
    1000.0
}

fn default_max_wall_time() -> f64 {
    6e5
}

impl Default for BudgetLimits {
    fn default() -> Self {
        Self {
            max_circuit_time: default_max_circuit_time(),
            max_wall_time: default_max_wall_time(),
        }
    }
}

/// Cost of one backend batch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatchCost {
    /// Jobs charged.
    pub jobs: u64,
    /// Shots charged.
    pub shots: u64,
    /// Simulated circuit time in seconds.
    pub circuit_time: f64,
}

impl BatchCost {
    /// Create a batch cost.
    pub fn new(jobs: u64, shots: u64, circuit_time: f64) -> Self {
        Self {
            jobs,
            shots,
            circuit_time,
        }
    }
}

/// Point-in-time copy of the ledger counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Shots charged so far.
    pub total_shots: u64,
    /// Jobs charged so far.
    pub total_jobs: u64,
    /// Simulated circuit time charged so far, in seconds.
    pub total_circuit_time: f64,
    /// Wall time since the session started, in seconds.
    pub wall_time: f64,
}

/// Accumulated resource use of one session.
///
/// Counters are plain fields updated through `&mut self`; a ledger shared
/// between threads needs an external lock.
#[derive(Debug, Clone)]
pub struct ResourceLedger {
    total_shots: u64,
    total_jobs: u64,
    total_circuit_time: f64,
    started: Instant,
    limits: BudgetLimits,
}

impl ResourceLedger {
    /// A zeroed ledger whose wall clock starts now.
    pub fn new(limits: BudgetLimits) -> Self {
        Self::with_start(limits, Instant::now())
    }

    /// A zeroed ledger whose wall clock started at `started`.
    pub fn with_start(limits: BudgetLimits, started: Instant) -> Self {
        Self {
            total_shots: 0,
            total_jobs: 0,
            total_circuit_time: 0.0,
            started,
            limits,
        }
    }

    /// Add a batch's cost to the counters.
    pub fn record(&mut self, cost: BatchCost) {
        self.total_jobs += cost.jobs;
        self.total_shots += cost.shots;
        self.total_circuit_time += cost.circuit_time.max(0.0);
    }

    /// Fail with `BudgetExceeded` if either ceiling is breached.
    ///
    /// Both comparisons are strict. If both ceilings are breached the wall
    /// time is reported.
    pub fn check(&self) -> EstimateResult<()> {
        let wall_time = self.elapsed();
        let breached = if wall_time > self.limits.max_wall_time {
            Some((BudgetKind::WallTime, self.limits.max_wall_time))
        } else if self.total_circuit_time > self.limits.max_circuit_time {
            Some((BudgetKind::CircuitTime, self.limits.max_circuit_time))
        } else {
            None
        };
        match breached {
            Some((kind, limit)) => Err(EstimateError::BudgetExceeded {
                kind,
                limit,
                circuit_time: self.total_circuit_time,
                wall_time,
            }),
            None => Ok(()),
        }
    }

    /// Record then check.
    pub fn charge(&mut self, cost: BatchCost) -> EstimateResult<()> {
        self.record(cost);
        self.check()
    }

    /// Zero the counters. The wall clock keeps running from the session start.
    pub fn reset(&mut self) {
        self.total_shots = 0;
        self.total_jobs = 0;
        self.total_circuit_time = 0.0;
    }

    /// Shots charged.
    pub fn total_shots(&self) -> u64 {
        self.total_shots
    }

    /// Jobs charged.
    pub fn total_jobs(&self) -> u64 {
        self.total_jobs
    }

    /// Simulated circuit time charged, in seconds.
    pub fn total_circuit_time(&self) -> f64 {
        self.total_circuit_time
    }

    /// Seconds since the session started.
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// The configured ceilings.
    pub fn limits(&self) -> BudgetLimits {
        self.limits
    }

    /// Copy of the counters.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            total_shots: self.total_shots,
            total_jobs: self.total_jobs,
            total_circuit_time: self.total_circuit_time,
            wall_time: self.elapsed(),
        }
    }
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new(BudgetLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_circuit_time_breach() {
        let mut ledger = ResourceLedger::default();
        ledger.charge(BatchCost::new(1, 100, 600.0)).unwrap();

        let err = ledger.charge(BatchCost::new(1, 100, 500.0)).unwrap_err();
        match err {
            EstimateError::BudgetExceeded {
                kind,
                limit,
                circuit_time,
                ..
            } => {
                assert_eq!(kind, BudgetKind::CircuitTime);
                assert_eq!(limit, 1000.0);
                assert_eq!(circuit_time, 1100.0);
            }
            other => panic!("unexpected error: {other}"),
        }
        // The breaching batch is paid for.
        assert_eq!(ledger.total_jobs(), 2);
        assert_eq!(ledger.total_shots(), 200);
    }

    #[test]
    fn test_limit_is_strict() {
        let mut ledger = ResourceLedger::default();
        assert!(ledger.charge(BatchCost::new(1, 1, 1000.0)).is_ok());
        assert!(ledger.charge(BatchCost::new(0, 0, 1e-9)).is_err());
    }

    #[test]
    fn test_first_call_can_breach() {
        let mut ledger = ResourceLedger::default();
        assert!(ledger.charge(BatchCost::new(1, 10, 5000.0)).is_err());
    }

    #[test]
    fn test_wall_time_reported_first() {
        let limits = BudgetLimits {
            max_circuit_time: 1.0,
            max_wall_time: 1.0,
        };
        let Some(start) = Instant::now().checked_sub(Duration::from_secs(5)) else {
            return;
        };
        let mut ledger = ResourceLedger::with_start(limits, start);
        ledger.record(BatchCost::new(1, 1, 2.0));
        let err = ledger.check().unwrap_err();
        assert!(matches!(
            err,
            EstimateError::BudgetExceeded {
                kind: BudgetKind::WallTime,
                ..
            }
        ));
    }

    #[test]
    fn test_reset_keeps_clock() {
        let Some(start) = Instant::now().checked_sub(Duration::from_secs(2)) else {
            return;
        };
        let mut ledger = ResourceLedger::with_start(BudgetLimits::default(), start);
        ledger.record(BatchCost::new(3, 300, 1500.0));
        assert!(ledger.check().is_err());

        ledger.reset();
        assert_eq!(ledger.total_jobs(), 0);
        assert_eq!(ledger.total_shots(), 0);
        assert_eq!(ledger.total_circuit_time(), 0.0);
        assert!(ledger.check().is_ok());
        assert!(ledger.elapsed() >= 2.0);
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut ledger = ResourceLedger::default();
        ledger.record(BatchCost::new(2, 2000, 0.5));
        let snap = ledger.snapshot();
        assert_eq!(snap.total_jobs, 2);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"total_shots\":2000"));
    }

    #[test]
    fn test_limits_defaults_from_empty_yaml() {
        let limits: BudgetLimits = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(limits, BudgetLimits::default());
    }
}
