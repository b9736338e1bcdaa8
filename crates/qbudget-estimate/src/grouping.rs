//! Partitioning operator terms into measurement groups.
//!
//! Every group shares one single-qubit measurement basis per qubit, so one
//! circuit execution yields samples for all of its terms. The identity term
//! is never grouped; it is a constant offset added after reconstruction.

use std::fmt;
use std::str::FromStr;

use qbudget_ir::{Circuit, IrResult, QubitId};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::{EstimateError, EstimateResult};
use crate::pauli::{Operator, PauliOp, PauliTerm};

/// A set of qubit-wise commuting terms measured with one circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementGroup {
    terms: Vec<PauliTerm>,
    basis: PauliTerm,
}

impl MeasurementGroup {
    /// A group holding a single term.
    pub fn new(term: PauliTerm) -> Self {
        Self {
            basis: term.clone(),
            terms: vec![term],
        }
    }

    /// Add `term` if it is compatible with the group's basis.
    ///
    /// Returns `false` and leaves the group untouched otherwise.
    pub fn try_add(&mut self, term: &PauliTerm) -> bool {
        match self.basis.union(term) {
            Some(basis) => {
                self.basis = basis;
                self.terms.push(term.clone());
                true
            }
            None => false,
        }
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    /// Per-qubit measurement basis shared by all terms.
    pub fn basis(&self) -> &PauliTerm {
        &self.basis
    }

    /// Sub-circuit rotating the group's basis onto the computational basis.
    ///
    /// X is measured after H, Y after S† then H; Z needs no rotation.
    pub fn measurement_circuit(&self, num_qubits: u32) -> IrResult<Circuit> {
        let mut circuit = Circuit::with_size("measure", num_qubits);
        for &(q, op) in self.basis.ops() {
            match op {
                PauliOp::X => {
                    circuit.h(QubitId(q))?;
                }
                PauliOp::Y => {
                    circuit.sdg(QubitId(q))?.h(QubitId(q))?;
                }
                PauliOp::Z | PauliOp::I => {}
            }
        }
        Ok(circuit)
    }

    /// Signed eigenvalue of `term` for one measured bitstring.
    ///
    /// After the basis rotation each factor reads +1 on `0` and -1 on `1`,
    /// so the product is the parity of the bits the term acts on.
    pub fn eigenvalue(term: &PauliTerm, bits: u64) -> f64 {
        if (bits & term.parity_mask()).count_ones() % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }
}

/// Strategy splitting an operator into measurement groups.
///
/// Implementations must be pure functions of the operator's term set.
pub trait MeasurementGrouping: Send + Sync {
    /// Strategy name.
    fn name(&self) -> &str;

    /// Partition the non-identity terms of `operator`.
    fn group(&self, operator: &Operator) -> Vec<MeasurementGroup>;
}

/// First-fit greedy grouping over the canonical term order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitwiseCommuting;

impl MeasurementGrouping for BitwiseCommuting {
    fn name(&self) -> &str {
        "bitwise-commuting"
    }

    fn group(&self, operator: &Operator) -> Vec<MeasurementGroup> {
        let mut groups: Vec<MeasurementGroup> = Vec::new();
        for term in operator.non_identity_terms() {
            if !groups.iter_mut().any(|g| g.try_add(term)) {
                groups.push(MeasurementGroup::new(term.clone()));
            }
        }
        groups
    }
}

/// One group per term.
#[derive(Debug, Clone, Copy, Default)]
pub struct Individual;

impl MeasurementGrouping for Individual {
    fn name(&self) -> &str {
        "individual"
    }

    fn group(&self, operator: &Operator) -> Vec<MeasurementGroup> {
        operator
            .non_identity_terms()
            .cloned()
            .map(MeasurementGroup::new)
            .collect()
    }
}

/// Configurable selection of a built-in grouping strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingStrategy {
    /// [`BitwiseCommuting`].
    #[default]
    BitwiseCommuting,
    /// [`Individual`].
    Individual,
}

impl MeasurementGrouping for GroupingStrategy {
    fn name(&self) -> &str {
        match self {
            GroupingStrategy::BitwiseCommuting => BitwiseCommuting.name(),
            GroupingStrategy::Individual => Individual.name(),
        }
    }

    fn group(&self, operator: &Operator) -> Vec<MeasurementGroup> {
        match self {
            GroupingStrategy::BitwiseCommuting => BitwiseCommuting.group(operator),
            GroupingStrategy::Individual => Individual.group(operator),
        }
    }
}

impl fmt::Display for GroupingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GroupingStrategy {
    type Err = EstimateError;

    fn from_str(s: &str) -> EstimateResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bitwise-commuting" | "bitwise" | "qwc" => Ok(GroupingStrategy::BitwiseCommuting),
            "individual" => Ok(GroupingStrategy::Individual),
            other => Err(ConfigError::ValidationError(format!(
                "Unknown grouping strategy: {other}"
            ))
            .into()),
        }
    }
}
