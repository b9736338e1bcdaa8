//! The sampling session: the entry points an optimizer loop calls.
//!
//! A session owns its backend, the immutable hardware profile table and the
//! resource ledger. Every entry point runs to completion before returning;
//! there is no background work. Each `(operator, circuit)` pairing is one
//! backend batch and one ledger charge, and a budget breach is returned as
//! [`EstimateError::BudgetExceeded`] after the breaching batch is recorded.

use std::f64::consts::FRAC_PI_2;

use qbudget_ir::{
    Circuit, Instruction, IrError, NoiseProfile, ParameterExpression, StandardGate,
};
use tracing::{debug, info, instrument, warn};

use crate::aggregate::{Estimate, EstimateAggregator};
use crate::allocation::{EqualPartition, ShotAllocator};
use crate::backend::{BackendError, CountDistribution, MAX_READOUT_QUBITS, SamplingBackend};
use crate::config::SessionConfig;
use crate::error::{EstimateError, EstimateResult};
use crate::grouping::{BitwiseCommuting, MeasurementGrouping};
use crate::hardware::{HardwareProfile, HardwareType, ProfileTable};
use crate::ledger::{BatchCost, BudgetLimits, ResourceLedger};
use crate::pauli::Operator;

/// Budgeted expectation-value estimation over a [`SamplingBackend`].
pub struct SamplingSession<B: SamplingBackend> {
    backend: B,
    profiles: ProfileTable,
    ledger: ResourceLedger,
    grouping: Box<dyn MeasurementGrouping>,
    allocator: Box<dyn ShotAllocator>,
    aggregator: EstimateAggregator,
    noisy: bool,
    last_hardware: Option<HardwareType>,
}

impl<B: SamplingBackend> SamplingSession<B> {
    /// A session with default limits, bitwise-commuting grouping and an
    /// equal shot split.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            profiles: ProfileTable::new(),
            ledger: ResourceLedger::new(BudgetLimits::default()),
            grouping: Box::new(BitwiseCommuting),
            allocator: Box::new(EqualPartition::default()),
            aggregator: EstimateAggregator::new(),
            noisy: true,
            last_hardware: None,
        }
    }

    /// A session configured from `config`.
    pub fn with_config(backend: B, config: &SessionConfig) -> EstimateResult<Self> {
        config.validate()?;
        Ok(Self {
            ledger: ResourceLedger::new(config.limits),
            grouping: Box::new(config.grouping),
            allocator: config.allocation.allocator(),
            ..Self::new(backend)
        })
    }

    /// Replace the grouping strategy.
    pub fn with_grouping(mut self, grouping: impl MeasurementGrouping + 'static) -> Self {
        self.grouping = Box::new(grouping);
        self
    }

    /// Replace the shot allocator.
    pub fn with_allocator(mut self, allocator: impl ShotAllocator + 'static) -> Self {
        self.allocator = Box::new(allocator);
        self
    }

    /// Sample without the hardware noise channels.
    ///
    /// Circuits are still transpiled for the hardware and time is still
    /// charged with its gate and initialization durations.
    pub fn noiseless(mut self) -> Self {
        self.noisy = false;
        self
    }

    // =========================================================================
    // Estimation
    // =========================================================================

    /// Estimate ⟨operator⟩ on the state `circuit` prepares.
    ///
    /// Empty and identity-only operators return their constant without
    /// touching the backend or the ledger.
    #[instrument(skip(self, operator, circuit), fields(terms = operator.len(), qubits = circuit.num_qubits()))]
    pub fn estimate(
        &mut self,
        operator: &Operator,
        circuit: &Circuit,
        total_shots: u64,
        hardware: &str,
    ) -> EstimateResult<Estimate> {
        let hw = self.select(hardware)?;
        self.estimate_pair(hw, operator, circuit, total_shots)
    }

    /// Estimate several `(operator, circuit)` pairings.
    ///
    /// A single operator is broadcast over all circuits and a single circuit
    /// over all operators; otherwise the counts must match. Pairings run in
    /// order, each as its own batch, and the first error stops the run.
    #[instrument(skip(self, operators, circuits), fields(operators = operators.len(), circuits = circuits.len()))]
    pub fn estimate_many(
        &mut self,
        operators: &[Operator],
        circuits: &[Circuit],
        total_shots: u64,
        hardware: &str,
    ) -> EstimateResult<Vec<Estimate>> {
        if operators.is_empty() || circuits.is_empty() {
            return Err(EstimateError::EmptyBatch);
        }
        let pairs = operators.len().max(circuits.len());
        if operators.len() > 1 && circuits.len() > 1 && operators.len() != circuits.len() {
            return Err(EstimateError::ArityMismatch {
                operators: operators.len(),
                circuits: circuits.len(),
            });
        }

        let hw = self.select(hardware)?;
        let mut estimates = Vec::with_capacity(pairs);
        for i in 0..pairs {
            let operator = &operators[if operators.len() == 1 { 0 } else { i }];
            let circuit = &circuits[if circuits.len() == 1 { 0 } else { i }];
            estimates.push(self.estimate_pair(hw, operator, circuit, total_shots)?);
        }
        Ok(estimates)
    }

    /// Bind each parameter vector into `circuit` and estimate `operator` on it.
    pub fn estimate_parametric(
        &mut self,
        operator: &Operator,
        circuit: &Circuit,
        params: &[Vec<f64>],
        total_shots: u64,
        hardware: &str,
    ) -> EstimateResult<Vec<Estimate>> {
        let bound = params
            .iter()
            .map(|values| circuit.bind_parameters(values))
            .collect::<Result<Vec<_>, IrError>>()?;
        self.estimate_many(std::slice::from_ref(operator), &bound, total_shots, hardware)
    }

    /// Parameter-shift gradient of ⟨operator⟩ at `params`.
    ///
    /// Every standard-gate parameter that depends on a circuit parameter is
    /// shifted by ±π/2 on its own; the component for parameter `k` is
    /// Σ ∂expr/∂θ_k · (E₊ − E₋)/2 over those occurrences. Each shifted
    /// circuit is estimated as its own pairing.
    ///
    /// The rule is exact for gates whose angle enters one rotation: `rx`,
    /// `ry`, `rz`, `p`, `u`, `rzz` and the θ of `u1q`. The φ of `u1q` enters
    /// twice, so a `u1q` with a symbolic φ is first expanded into
    /// `rz(-φ)`, `rx(θ)`, `rz(φ)` and both `rz` angles are shifted as separate
    /// occurrences. Any other parameterized gate is still shifted, and its
    /// component is then only an approximation.
    #[instrument(skip(self, operator, circuit, params), fields(params = params.len()))]
    pub fn gradient(
        &mut self,
        operator: &Operator,
        circuit: &Circuit,
        params: &[f64],
        total_shots: u64,
        hardware: &str,
    ) -> EstimateResult<Vec<f64>> {
        let names = circuit.parameters();
        if names.len() != params.len() {
            return Err(IrError::ParameterCountMismatch {
                expected: names.len(),
                got: params.len(),
            }
            .into());
        }

        let expanded = expand_phased_rotations(circuit)?;
        let circuit = &expanded;

        // (parameter index, chain-rule factor) per shifted circuit pair.
        let mut weights: Vec<Vec<(usize, f64)>> = Vec::new();
        let mut shifted: Vec<Circuit> = Vec::new();
        for (inst_index, inst) in circuit.instructions().iter().enumerate() {
            let Some(gate) = inst.as_standard() else {
                continue;
            };
            for (param_index, expr) in gate.parameters().into_iter().enumerate() {
                if !expr.is_symbolic() {
                    continue;
                }
                let mut factors = Vec::new();
                for (k, name) in names.iter().enumerate() {
                    if !expr.symbols().contains(name) {
                        continue;
                    }
                    let mut d = expr.derivative(name);
                    for (n, v) in names.iter().zip(params) {
                        d = d.bind(n, *v);
                    }
                    factors.push((k, d.evaluate()?));
                }
                for shift in [FRAC_PI_2, -FRAC_PI_2] {
                    // Expansion can reorder first appearances, so bind by name.
                    let c = shift_parameter(circuit, inst_index, param_index, shift)?;
                    shifted.push(
                        names
                            .iter()
                            .zip(params)
                            .fold(c, |c, (name, value)| c.assign(name, *value)),
                    );
                }
                weights.push(factors);
            }
        }

        let mut grad = vec![0.0; params.len()];
        if shifted.is_empty() {
            return Ok(grad);
        }

        let estimates =
            self.estimate_many(std::slice::from_ref(operator), &shifted, total_shots, hardware)?;
        for (pair, factors) in estimates.chunks_exact(2).zip(&weights) {
            let diff = (pair[0].value.re - pair[1].value.re) / 2.0;
            for &(k, factor) in factors {
                grad[k] += factor * diff;
            }
        }
        debug!(?grad, "parameter-shift gradient");
        Ok(grad)
    }

    // =========================================================================
    // Raw sampling
    // =========================================================================

    /// Transpile and run `circuit` for `shots` shots, charging one job.
    #[instrument(skip(self, circuit), fields(qubits = circuit.num_qubits()))]
    pub fn sample(
        &mut self,
        circuit: &Circuit,
        shots: u64,
        hardware: &str,
    ) -> EstimateResult<CountDistribution> {
        let hw = self.select(hardware)?;
        self.sample_one(hw, circuit, shots)
    }

    /// Run several `(circuit, shots)` entries, each charged as its own job.
    pub fn sample_many(
        &mut self,
        batch: &[(Circuit, u64)],
        hardware: &str,
    ) -> EstimateResult<Vec<CountDistribution>> {
        let hw = self.select(hardware)?;
        batch
            .iter()
            .map(|(circuit, shots)| self.sample_one(hw, circuit, *shots))
            .collect()
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// The resource ledger.
    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    /// Zero the ledger counters; the wall clock keeps running.
    pub fn reset(&mut self) {
        self.ledger.reset();
    }

    /// Hardware class of the most recent call, for introspection only.
    pub fn last_hardware(&self) -> Option<HardwareType> {
        self.last_hardware
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Profile of a hardware class.
    pub fn profile(&self, hardware: HardwareType) -> &HardwareProfile {
        self.profiles.get(hardware)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn select(&mut self, tag: &str) -> EstimateResult<HardwareType> {
        let hw: HardwareType = tag.parse()?;
        self.last_hardware = Some(hw);
        Ok(hw)
    }

    fn noise_for(&self, hw: HardwareType) -> NoiseProfile {
        if self.noisy {
            self.profiles.get(hw).noise().clone()
        } else {
            NoiseProfile::noiseless()
        }
    }

    fn estimate_pair(
        &mut self,
        hw: HardwareType,
        operator: &Operator,
        circuit: &Circuit,
        total_shots: u64,
    ) -> EstimateResult<Estimate> {
        if operator.is_empty() {
            return Ok(Estimate::zero());
        }
        if operator.is_identity_only() {
            return Ok(Estimate::exact(operator.constant()));
        }
        check_bound(circuit)?;
        if let Some(qubit) = operator.max_qubit() {
            if qubit >= circuit.num_qubits() {
                return Err(EstimateError::QubitOutOfRange {
                    qubit,
                    num_qubits: circuit.num_qubits(),
                });
            }
            if qubit >= MAX_READOUT_QUBITS {
                return Err(EstimateError::UnreadableQubit {
                    qubit,
                    max: MAX_READOUT_QUBITS,
                });
            }
        }

        let groups = self.grouping.group(operator);
        let allocation = self.allocator.allocate(operator, &groups, total_shots);

        let profile = self.profiles.get(hw);
        let mut batch = Vec::new();
        let mut circuit_time = 0.0;
        for (index, group) in groups.iter().enumerate() {
            let shots = allocation.get(index).unwrap_or(0);
            if shots == 0 {
                continue;
            }
            let measured = circuit.compose(&group.measurement_circuit(circuit.num_qubits())?)?;
            let prepared = profile.prepare(&measured)?;
            circuit_time += profile.circuit_time(prepared.depth(), shots);
            debug!(
                group = index,
                terms = group.terms().len(),
                basis = %group.basis(),
                shots,
                depth = prepared.depth(),
                "measurement group"
            );
            batch.push((prepared.executable, shots));
        }

        let noise = self.noise_for(hw);
        let results = if batch.is_empty() {
            Vec::new()
        } else {
            self.backend.run(&batch, &noise)?
        };
        if results.len() != batch.len() {
            return Err(BackendError::ExecutionFailed(format!(
                "expected {} count distributions, got {}",
                batch.len(),
                results.len()
            ))
            .into());
        }

        // Re-align with the groups; skipped groups get empty counts.
        let mut results = results.into_iter();
        let counts: Vec<CountDistribution> = (0..groups.len())
            .map(|index| match allocation.get(index) {
                Some(shots) if shots > 0 => results.next().unwrap_or_default(),
                _ => CountDistribution::new(),
            })
            .collect();

        let estimate = self.aggregator.aggregate(
            operator,
            operator.constant(),
            &groups,
            &allocation,
            &counts,
        );

        info!(
            hardware = %hw,
            groups = groups.len(),
            executed = batch.len(),
            shots = total_shots,
            circuit_time,
            value = estimate.value.re,
            error = estimate.error,
            "estimate"
        );
        self.charge(BatchCost::new(1, total_shots, circuit_time))?;
        Ok(estimate)
    }

    fn sample_one(
        &mut self,
        hw: HardwareType,
        circuit: &Circuit,
        shots: u64,
    ) -> EstimateResult<CountDistribution> {
        check_bound(circuit)?;
        let profile = self.profiles.get(hw);
        let prepared = profile.prepare(circuit)?;
        let circuit_time = profile.circuit_time(prepared.depth(), shots);
        let depth = prepared.depth();

        let noise = self.noise_for(hw);
        let counts = self
            .backend
            .run(&[(prepared.executable, shots)], &noise)?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::ExecutionFailed("no counts returned".to_string()))?;

        info!(hardware = %hw, shots, depth, circuit_time, "sample");
        self.charge(BatchCost::new(1, shots, circuit_time))?;
        Ok(counts)
    }

    fn charge(&mut self, cost: BatchCost) -> EstimateResult<()> {
        self.ledger.record(cost);
        self.ledger.check().inspect_err(|err| {
            warn!(
                total_jobs = self.ledger.total_jobs(),
                total_shots = self.ledger.total_shots(),
                "{err}"
            );
        })
    }
}

impl<B: SamplingBackend> std::fmt::Debug for SamplingSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplingSession")
            .field("backend", &self.backend.name())
            .field("grouping", &self.grouping.name())
            .field("allocator", &self.allocator.name())
            .field("noisy", &self.noisy)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}

fn check_bound(circuit: &Circuit) -> EstimateResult<()> {
    match circuit.parameters().into_iter().next() {
        Some(name) => Err(IrError::UnboundParameter(name).into()),
        None => Ok(()),
    }
}

/// Rewrite every `u1q(θ, φ)` with a symbolic φ as `rz(-φ)`, `rx(θ)`, `rz(φ)`.
fn expand_phased_rotations(circuit: &Circuit) -> EstimateResult<Circuit> {
    let instructions = circuit.instructions().iter().flat_map(|inst| {
        match inst.as_standard() {
            Some(StandardGate::U1q(theta, phi)) if phi.is_symbolic() => {
                let q = inst.qubits[0];
                vec![
                    Instruction::single_qubit_gate(StandardGate::Rz(-phi.clone()), q),
                    Instruction::single_qubit_gate(StandardGate::Rx(theta.clone()), q),
                    Instruction::single_qubit_gate(StandardGate::Rz(phi.clone()), q),
                ]
            }
            _ => vec![inst.clone()],
        }
    });
    Ok(circuit.with_instructions(instructions)?)
}

fn shift_parameter(
    circuit: &Circuit,
    inst_index: usize,
    param_index: usize,
    shift: f64,
) -> EstimateResult<Circuit> {
    let instructions = circuit.instructions().iter().enumerate().map(|(i, inst)| {
        let mut inst = inst.clone();
        if i == inst_index {
            if let Some(p) = inst.gate.parameters_mut().into_iter().nth(param_index) {
                *p = p.clone() + ParameterExpression::constant(shift);
            }
        }
        inst
    });
    Ok(circuit.with_instructions(instructions)?)
}
