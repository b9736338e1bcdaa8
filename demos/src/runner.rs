//! Budgeted VQE runner.
//!
//! Each iteration estimates the energy at the current parameters, then takes
//! one Adam step along the parameter-shift gradient. Running out of budget
//! ends the run early; the best point seen so far is still reported.

use qbudget_estimate::{
    EstimateResult, LedgerSnapshot, Operator, SamplingBackend, SamplingSession,
};
use qbudget_ir::Circuit;
use tracing::{info, warn};

use crate::optimizer::Adam;

/// Why a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// All iterations ran.
    MaxIterations,
    /// The energy change fell below the tolerance.
    Converged,
    /// A budget ceiling was breached.
    BudgetExceeded(String),
}

/// Result of a VQE run.
#[derive(Debug, Clone)]
pub struct VqeResult {
    /// Lowest estimated energy.
    pub best_energy: f64,
    /// Parameters of the lowest energy.
    pub best_params: Vec<f64>,
    /// Statistical error of the lowest energy.
    pub best_error: f64,
    /// Energy estimate per completed iteration.
    pub energy_history: Vec<f64>,
    /// Number of completed iterations.
    pub iterations: usize,
    /// Why the run ended.
    pub stop_reason: StopReason,
    /// Ledger counters at the end of the run.
    pub ledger: LedgerSnapshot,
}

impl VqeResult {
    /// True if the run ended on a budget breach.
    pub fn budget_exhausted(&self) -> bool {
        matches!(self.stop_reason, StopReason::BudgetExceeded(_))
    }
}

/// VQE runner configuration.
#[derive(Debug, Clone)]
pub struct VqeRunner {
    /// Hardware tag, `"sc"` or `"it"`.
    pub hardware: String,
    /// Shots per estimate.
    pub shots: u64,
    /// Maximum optimization iterations.
    pub maxiter: usize,
    /// Stop when successive energies differ by less than this.
    pub tol: f64,
    /// Adam step size.
    pub learning_rate: f64,
}

impl Default for VqeRunner {
    fn default() -> Self {
        Self {
            hardware: "sc".to_string(),
            shots: 1024,
            maxiter: 50,
            tol: 0.0,
            learning_rate: 0.1,
        }
    }
}

impl VqeRunner {
    /// Create a runner for a hardware tag.
    pub fn new(hardware: impl Into<String>) -> Self {
        Self {
            hardware: hardware.into(),
            ..Self::default()
        }
    }

    /// Set the number of shots.
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Set maximum iterations.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set the convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the Adam learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Minimize `⟨ansatz(θ)| operator |ansatz(θ)⟩` starting at `initial`.
    ///
    /// `on_iteration` is called with the iteration index and its energy.
    /// Errors other than a budget breach are returned.
    pub fn run<B: SamplingBackend>(
        &self,
        session: &mut SamplingSession<B>,
        operator: &Operator,
        ansatz: &Circuit,
        initial: &[f64],
        mut on_iteration: impl FnMut(usize, f64),
    ) -> EstimateResult<VqeResult> {
        let mut params = initial.to_vec();
        let mut adam = Adam::new(self.learning_rate);
        let mut history = Vec::with_capacity(self.maxiter);
        let mut best: Option<(f64, f64, Vec<f64>)> = None;
        let mut stop_reason = StopReason::MaxIterations;

        for iteration in 0..self.maxiter {
            let step = self.iterate(session, operator, ansatz, &mut params, &mut adam);
            let (energy, error, evaluated) = match step {
                Ok(v) => v,
                Err(e) if e.is_budget_exceeded() => {
                    warn!(iteration, "stopping VQE: {e}");
                    stop_reason = StopReason::BudgetExceeded(e.to_string());
                    break;
                }
                Err(e) => return Err(e),
            };

            if best.as_ref().is_none_or(|(b, _, _)| energy < *b) {
                best = Some((energy, error, evaluated));
            }
            on_iteration(iteration, energy);
            info!(iteration, energy, error, "VQE iteration");

            let converged = history
                .last()
                .is_some_and(|prev: &f64| (prev - energy).abs() < self.tol);
            history.push(energy);
            if converged {
                stop_reason = StopReason::Converged;
                break;
            }
        }

        let (best_energy, best_error, best_params) =
            best.unwrap_or((f64::NAN, f64::NAN, initial.to_vec()));
        Ok(VqeResult {
            best_energy,
            best_params,
            best_error,
            iterations: history.len(),
            energy_history: history,
            stop_reason,
            ledger: session.ledger().snapshot(),
        })
    }

    /// Estimate the energy at `params`, then step them along the gradient.
    ///
    /// Returns the energy, its error and the parameters it was measured at.
    fn iterate<B: SamplingBackend>(
        &self,
        session: &mut SamplingSession<B>,
        operator: &Operator,
        ansatz: &Circuit,
        params: &mut Vec<f64>,
        adam: &mut Adam,
    ) -> EstimateResult<(f64, f64, Vec<f64>)> {
        let bound = ansatz.bind_parameters(params)?;
        let estimate = session.estimate(operator, &bound, self.shots, &self.hardware)?;
        let evaluated = params.clone();
        let grad = session.gradient(operator, ansatz, params, self.shots, &self.hardware)?;
        adam.step(params, &grad);
        Ok((estimate.value.re, estimate.error, evaluated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use qbudget_estimate::{BackendResult, CountDistribution, EstimateError, PauliTerm};
    use qbudget_ir::{NoiseProfile, ParameterExpression, QubitId};

    /// Reads |0...0⟩ every shot.
    struct Zeros;

    impl SamplingBackend for Zeros {
        fn name(&self) -> &str {
            "zeros"
        }

        fn run(
            &mut self,
            batch: &[(Circuit, u64)],
            _noise: &NoiseProfile,
        ) -> BackendResult<Vec<CountDistribution>> {
            Ok(batch
                .iter()
                .map(|(_, n)| [(0u64, *n)].into_iter().collect())
                .collect())
        }
    }

    fn z0() -> Operator {
        Operator::single("Z0".parse::<PauliTerm>().unwrap(), Complex64::new(1.0, 0.0))
    }

    fn ansatz() -> Circuit {
        let mut c = Circuit::with_size("a", 1);
        c.ry(ParameterExpression::symbol("theta_0"), QubitId(0)).unwrap();
        c
    }

    #[test]
    fn test_runs_all_iterations() {
        let mut session = SamplingSession::new(Zeros);
        let result = VqeRunner::new("sc")
            .with_maxiter(3)
            .with_shots(10)
            .run(&mut session, &z0(), &ansatz(), &[0.3], |_, _| {})
            .unwrap();
        assert_eq!(result.iterations, 3);
        assert_eq!(result.stop_reason, StopReason::MaxIterations);
        assert_eq!(result.best_energy, 1.0);
        // One estimate plus one shifted pair per iteration.
        assert_eq!(result.ledger.total_jobs, 9);
    }

    #[test]
    fn test_converges_on_flat_energy() {
        let mut session = SamplingSession::new(Zeros);
        let result = VqeRunner::new("sc")
            .with_maxiter(10)
            .with_tol(1e-9)
            .run(&mut session, &z0(), &ansatz(), &[0.3], |_, _| {})
            .unwrap();
        assert_eq!(result.iterations, 2);
        assert_eq!(result.stop_reason, StopReason::Converged);
    }

    #[test]
    fn test_unknown_hardware_is_an_error() {
        let mut session = SamplingSession::new(Zeros);
        let err = VqeRunner::new("gpu")
            .run(&mut session, &z0(), &ansatz(), &[0.3], |_, _| {})
            .unwrap_err();
        assert!(matches!(err, EstimateError::UnsupportedHardware(_)));
    }
}
