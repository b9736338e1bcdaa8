//! Distributing a shot budget across measurement groups.
//!
//! Every allocator returns one count per group, in group order, and never
//! hands out more than the requested total. Groups that end up with zero
//! shots are skipped by the session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::{EstimateError, EstimateResult};
use crate::grouping::MeasurementGroup;
use crate::pauli::Operator;

/// Shots assigned to each group, aligned with the group sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShotAllocation(Vec<u64>);

impl ShotAllocation {
    /// Wrap per-group shot counts.
    pub fn new(shots: Vec<u64>) -> Self {
        Self(shots)
    }

    /// Shots of group `index`.
    pub fn get(&self, index: usize) -> Option<u64> {
        self.0.get(index).copied()
    }

    /// Sum over all groups.
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Number of groups covered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no group is covered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Per-group counts.
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }
}

/// Policy splitting `total_shots` across groups.
pub trait ShotAllocator: Send + Sync {
    /// Policy name.
    fn name(&self) -> &str;

    /// Allocate shots. The result has one entry per group and sums to at
    /// most `total_shots`.
    fn allocate(
        &self,
        operator: &Operator,
        groups: &[MeasurementGroup],
        total_shots: u64,
    ) -> ShotAllocation;
}

/// What happens to the `total_shots % groups` leftover of an equal split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Remainder {
    /// One extra shot to each of the first groups in group order.
    #[default]
    Distribute,
    /// Leftover shots are not used.
    Drop,
}

impl FromStr for Remainder {
    type Err = EstimateError;

    fn from_str(s: &str) -> EstimateResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "distribute" => Ok(Remainder::Distribute),
            "drop" => Ok(Remainder::Drop),
            other => Err(ConfigError::ValidationError(format!(
                "Unknown remainder policy: {other}"
            ))
            .into()),
        }
    }
}

/// Equal partition, the default policy.
///
/// Allocations never differ by more than one shot.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualPartition {
    /// Treatment of the integer-division leftover.
    pub remainder: Remainder,
}

impl EqualPartition {
    /// Equal partition with the given remainder treatment.
    pub fn new(remainder: Remainder) -> Self {
        Self { remainder }
    }
}

fn equal_split(num_groups: usize, total_shots: u64, remainder: Remainder) -> Vec<u64> {
    if num_groups == 0 {
        return Vec::new();
    }
    let n = num_groups as u64;
    let base = total_shots / n;
    let extra = match remainder {
        Remainder::Distribute => total_shots % n,
        Remainder::Drop => 0,
    };
    (0..n).map(|i| base + u64::from(i < extra)).collect()
}

impl ShotAllocator for EqualPartition {
    fn name(&self) -> &str {
        "equal"
    }

    fn allocate(
        &self,
        _operator: &Operator,
        groups: &[MeasurementGroup],
        total_shots: u64,
    ) -> ShotAllocation {
        ShotAllocation(equal_split(groups.len(), total_shots, self.remainder))
    }
}

/// Shots proportional to each group's coefficient weight Σ|c|.
///
/// Rounds with the largest-remainder method; ties go to the earlier group.
/// Falls back to an equal split when every weight is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Proportional;

impl ShotAllocator for Proportional {
    fn name(&self) -> &str {
        "proportional"
    }

    fn allocate(
        &self,
        operator: &Operator,
        groups: &[MeasurementGroup],
        total_shots: u64,
    ) -> ShotAllocation {
        let weights: Vec<f64> = groups
            .iter()
            .map(|g| {
                g.terms()
                    .iter()
                    .filter_map(|t| operator.get(t))
                    .map(|c| c.norm())
                    .sum()
            })
            .collect();
        let sum: f64 = weights.iter().sum();
        if !(sum.is_finite() && sum > 0.0) {
            return ShotAllocation(equal_split(
                groups.len(),
                total_shots,
                Remainder::Distribute,
            ));
        }

        let exact: Vec<f64> = weights
            .iter()
            .map(|w| total_shots as f64 * w / sum)
            .collect();
        let mut shots: Vec<u64> = exact.iter().map(|x| x.floor() as u64).collect();

        // Float rounding can overshoot by a shot; take it back from the largest.
        while shots.iter().sum::<u64>() > total_shots {
            if let Some(max) = shots.iter_mut().max() {
                *max -= 1;
            }
        }

        let leftover = total_shots - shots.iter().sum::<u64>();
        let mut order: Vec<usize> = (0..shots.len()).collect();
        order.sort_by(|&a, &b| {
            let fa = exact[a] - exact[a].floor();
            let fb = exact[b] - exact[b].floor();
            fb.total_cmp(&fa).then(a.cmp(&b))
        });
        for &i in order.iter().take(leftover as usize) {
            shots[i] += 1;
        }
        ShotAllocation(shots)
    }
}

/// Configurable selection of a built-in allocation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationPolicy {
    /// [`EqualPartition`].
    #[default]
    Equal,
    /// [`Proportional`].
    Proportional,
}

impl AllocationPolicy {
    /// Build the allocator this policy names.
    pub fn allocator(self, remainder: Remainder) -> Box<dyn ShotAllocator> {
        match self {
            AllocationPolicy::Equal => Box::new(EqualPartition::new(remainder)),
            AllocationPolicy::Proportional => Box::new(Proportional),
        }
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationPolicy::Equal => write!(f, "equal"),
            AllocationPolicy::Proportional => write!(f, "proportional"),
        }
    }
}

impl FromStr for AllocationPolicy {
    type Err = EstimateError;

    fn from_str(s: &str) -> EstimateResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "equal" => Ok(AllocationPolicy::Equal),
            "proportional" | "weighted" => Ok(AllocationPolicy::Proportional),
            other => Err(ConfigError::ValidationError(format!(
                "Unknown allocation policy: {other}"
            ))
            .into()),
        }
    }
}
