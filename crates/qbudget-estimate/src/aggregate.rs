//! Reconstructing an expectation value from grouped counts.
//!
//! For a term P with coefficient c measured in a group with n shots,
//!
//!   ⟨P⟩ ≈ m = (1/n) Σ_b count(b) · (-1)^{|b ∧ mask(P)|}
//!   Var(m) = (1 - m²) / n
//!
//! The estimate is const + Σ c·m and its standard error is
//! sqrt(Σ |c|² · Var(m)), treating every term as an independent estimator.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::allocation::ShotAllocation;
use crate::backend::CountDistribution;
use crate::grouping::MeasurementGroup;
use crate::pauli::Operator;

/// An expectation value with its standard error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Estimated expectation value.
    pub value: Complex64,
    /// Standard error of `value`.
    pub error: f64,
}

impl Estimate {
    /// An exact value with zero error.
    pub fn exact(value: Complex64) -> Self {
        Self { value, error: 0.0 }
    }

    /// The zero estimate.
    pub fn zero() -> Self {
        Self::exact(Complex64::new(0.0, 0.0))
    }
}

/// Combines per-group counts into an [`Estimate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimateAggregator;

impl EstimateAggregator {
    /// Create an aggregator.
    pub fn new() -> Self {
        Self
    }

    /// Aggregate counts into an estimate.
    ///
    /// `allocation` and `counts` are aligned with `groups`. A group with no
    /// allocated shots (or an empty distribution) contributes zero mean and
    /// zero variance. A term missing from `operator` is treated as having
    /// coefficient zero.
    pub fn aggregate(
        &self,
        operator: &Operator,
        const_offset: Complex64,
        groups: &[MeasurementGroup],
        allocation: &ShotAllocation,
        counts: &[CountDistribution],
    ) -> Estimate {
        let mut value = const_offset;
        let mut variance = 0.0;

        for (index, (group, dist)) in groups.iter().zip(counts).enumerate() {
            let n = dist.total();
            if allocation.get(index).unwrap_or(0) == 0 || n == 0 {
                debug!(group = index, "skipping group with no shots");
                continue;
            }
            let n = n as f64;
            for term in group.terms() {
                let coeff = operator.get(term).unwrap_or_default();
                let mean = dist
                    .iter()
                    .map(|(bits, c)| *c as f64 * MeasurementGroup::eigenvalue(term, *bits))
                    .sum::<f64>()
                    / n;
                let term_var = (1.0 - mean * mean).max(0.0) / n;
                value += coeff * mean;
                variance += coeff.norm_sqr() * term_var;
            }
        }

        Estimate {
            value,
            error: variance.sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::{BitwiseCommuting, MeasurementGrouping};

    fn op(labels: &[(&str, f64)]) -> Operator {
        labels
            .iter()
            .map(|(l, c)| (l.parse().unwrap(), Complex64::new(*c, 0.0)))
            .collect()
    }

    #[test]
    fn test_deterministic_outcome_has_zero_error() {
        let o = op(&[("Z0", 1.0)]);
        let groups = BitwiseCommuting.group(&o);
        let counts = vec![[(0u64, 1000u64)].into_iter().collect()];
        let est = EstimateAggregator.aggregate(
            &o,
            Complex64::new(0.0, 0.0),
            &groups,
            &ShotAllocation::new(vec![1000]),
            &counts,
        );
        assert_eq!(est.value, Complex64::new(1.0, 0.0));
        assert_eq!(est.error, 0.0);
    }

    #[test]
    fn test_balanced_outcome() {
        // Z0 on a 50/50 distribution: mean 0, variance 1/n.
        let o = op(&[("Z0", 2.0), ("I", 0.5)]);
        let groups = BitwiseCommuting.group(&o);
        let counts = vec![[(0u64, 50u64), (1, 50)].into_iter().collect()];
        let est = EstimateAggregator.aggregate(
            &o,
            o.constant(),
            &groups,
            &ShotAllocation::new(vec![100]),
            &counts,
        );
        assert!((est.value.re - 0.5).abs() < 1e-12);
        // sqrt(4 · 1/100) = 0.2
        assert!((est.error - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_group_terms_share_counts() {
        // Z0, Z1 and Z0 Z1 share one group; outcome 01 (qubit 0 set).
        let o = op(&[("Z0", 1.0), ("Z1", 1.0), ("Z0 Z1", 1.0)]);
        let groups = BitwiseCommuting.group(&o);
        assert_eq!(groups.len(), 1);
        let counts = vec![[(0b01u64, 10u64)].into_iter().collect()];
        let est = EstimateAggregator.aggregate(
            &o,
            Complex64::new(0.0, 0.0),
            &groups,
            &ShotAllocation::new(vec![10]),
            &counts,
        );
        // -1 + 1 - 1
        assert!((est.value.re + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_shot_group_contributes_nothing() {
        let o = op(&[("X0", 1.0), ("Z0", 1.0)]);
        let groups = BitwiseCommuting.group(&o);
        assert_eq!(groups.len(), 2);
        let counts = vec![
            CountDistribution::new(),
            [(0u64, 4u64)].into_iter().collect(),
        ];
        let est = EstimateAggregator.aggregate(
            &o,
            Complex64::new(0.0, 0.0),
            &groups,
            &ShotAllocation::new(vec![0, 4]),
            &counts,
        );
        assert_eq!(est.value, Complex64::new(1.0, 0.0));
        assert_eq!(est.error, 0.0);
    }

    #[test]
    fn test_complex_coefficients() {
        let mut o = Operator::new();
        o.add_term("Z0".parse().unwrap(), Complex64::new(0.0, 1.0));
        let groups = BitwiseCommuting.group(&o);
        let counts = vec![[(1u64, 8u64)].into_iter().collect()];
        let est = EstimateAggregator.aggregate(
            &o,
            Complex64::new(0.0, 0.0),
            &groups,
            &ShotAllocation::new(vec![8]),
            &counts,
        );
        assert_eq!(est.value, Complex64::new(0.0, -1.0));
    }
}
