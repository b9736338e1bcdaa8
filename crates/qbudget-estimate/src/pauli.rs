//! Pauli terms and weighted Pauli-sum operators.
//!
//! An [`Operator`] is a sum of weighted Pauli strings:
//!
//!   O = Σ_k  c_k · P_k,   c_k ∈ ℂ
//!
//! Terms are kept in a `BTreeMap`, so iteration follows the canonical
//! [`PauliTerm`] ordering and every consumer sees the terms in the same
//! order for the same term set.
//!
//! # Example
//!
//! ```rust
//! use num_complex::Complex64;
//! use qbudget_estimate::pauli::{Operator, PauliTerm};
//!
//! // O = 0.5·I - 1.0·Z0 Z1 + 0.25·X0
//! let mut op = Operator::new();
//! op.add_term(PauliTerm::identity(), Complex64::new(0.5, 0.0));
//! op.add_term("Z0 Z1".parse().unwrap(), Complex64::new(-1.0, 0.0));
//! op.add_term("X0".parse().unwrap(), Complex64::new(0.25, 0.0));
//!
//! assert_eq!(op.len(), 3);
//! assert_eq!(op.constant(), Complex64::new(0.5, 0.0));
//! assert_eq!(op.max_qubit(), Some(1));
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{EstimateError, EstimateResult};

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity. Never stored inside a [`PauliTerm`].
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    fn symbol(self) -> char {
        match self {
            PauliOp::I => 'I',
            PauliOp::X => 'X',
            PauliOp::Y => 'Y',
            PauliOp::Z => 'Z',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            'I' => Some(PauliOp::I),
            'X' => Some(PauliOp::X),
            'Y' => Some(PauliOp::Y),
            'Z' => Some(PauliOp::Z),
            _ => None,
        }
    }
}

/// A tensor product of Pauli operators on distinct qubits.
///
/// Stored as a sorted `Vec<(qubit_index, PauliOp)>` with identity factors
/// omitted; the identity term is the empty vector. The derived `Ord`
/// (lexicographic over the sorted pairs) is the canonical term order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PauliTerm {
    ops: Vec<(u32, PauliOp)>,
}

impl PauliTerm {
    /// Build a term from `(qubit, op)` pairs.
    ///
    /// Identity factors are dropped and the rest sorted by qubit. Naming the
    /// same qubit twice fails with [`EstimateError::InvalidPauliLabel`].
    pub fn from_ops(ops: impl IntoIterator<Item = (u32, PauliOp)>) -> EstimateResult<Self> {
        let mut v: Vec<(u32, PauliOp)> = ops
            .into_iter()
            .filter(|(_, op)| *op != PauliOp::I)
            .collect();
        v.sort_by_key(|(q, _)| *q);
        if v.windows(2).any(|w| w[0].0 == w[1].0) {
            let label = v
                .iter()
                .map(|(q, op)| format!("{}{q}", op.symbol()))
                .collect::<Vec<_>>()
                .join(" ");
            return Err(EstimateError::InvalidPauliLabel(label));
        }
        Ok(Self { ops: v })
    }

    /// The identity term.
    pub fn identity() -> Self {
        Self { ops: Vec::new() }
    }

    /// A single-qubit term.
    pub fn single(qubit: u32, op: PauliOp) -> Self {
        if op == PauliOp::I {
            return Self::identity();
        }
        Self {
            ops: vec![(qubit, op)],
        }
    }

    /// Non-identity `(qubit, op)` pairs, sorted by qubit index.
    pub fn ops(&self) -> &[(u32, PauliOp)] {
        &self.ops
    }

    /// True for the identity term.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of non-identity factors.
    pub fn weight(&self) -> usize {
        self.ops.len()
    }

    /// The highest qubit index referenced, or `None` for the identity.
    pub fn max_qubit(&self) -> Option<u32> {
        self.ops.last().map(|(q, _)| *q)
    }

    /// The operator acting on `qubit` (identity if none).
    pub fn op_on(&self, qubit: u32) -> PauliOp {
        self.ops
            .binary_search_by_key(&qubit, |(q, _)| *q)
            .map_or(PauliOp::I, |i| self.ops[i].1)
    }

    /// Bitmask of the measured qubits, bit `i` for qubit `i`.
    ///
    /// Qubits at index 64 and above do not fit and are left out; the session
    /// rejects such operators with `UnreadableQubit` before sampling.
    pub fn parity_mask(&self) -> u64 {
        self.ops
            .iter()
            .filter(|(q, _)| *q < 64)
            .fold(0u64, |mask, (q, _)| mask | (1u64 << q))
    }

    /// True if the two terms agree on every qubit both act on.
    ///
    /// Qubit-wise commuting terms share a single-qubit measurement basis.
    pub fn qubit_wise_commutes(&self, other: &PauliTerm) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.ops.len() && j < other.ops.len() {
            let (qa, pa) = self.ops[i];
            let (qb, pb) = other.ops[j];
            match qa.cmp(&qb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    if pa != pb {
                        return false;
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        true
    }

    /// The smallest term both `self` and `other` are restrictions of.
    ///
    /// `None` if they disagree on some qubit.
    pub fn union(&self, other: &PauliTerm) -> Option<PauliTerm> {
        if !self.qubit_wise_commutes(other) {
            return None;
        }
        let mut ops = self.ops.clone();
        for &(q, op) in &other.ops {
            if let Err(pos) = ops.binary_search_by_key(&q, |(p, _)| *p) {
                ops.insert(pos, (q, op));
            }
        }
        Some(Self { ops })
    }
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return write!(f, "I");
        }
        for (i, (q, op)) in self.ops.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}{q}", op.symbol())?;
        }
        Ok(())
    }
}

impl FromStr for PauliTerm {
    type Err = EstimateError;

    /// Parse the `"X0 Y1 Z3"` label format. `"I"` and `""` are the identity.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EstimateError::InvalidPauliLabel(s.to_string());
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "I" {
            return Ok(Self::identity());
        }
        let mut ops = Vec::new();
        for token in trimmed.split_whitespace() {
            let mut chars = token.chars();
            let op = chars.next().and_then(PauliOp::from_symbol).ok_or_else(invalid)?;
            let qubit: u32 = chars.as_str().parse().map_err(|_| invalid())?;
            ops.push((qubit, op));
        }
        Self::from_ops(ops).map_err(|_| invalid())
    }
}

impl TryFrom<String> for PauliTerm {
    type Error = EstimateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PauliTerm> for String {
    fn from(term: PauliTerm) -> Self {
        term.to_string()
    }
}

/// Serialized form of one operator term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermRecord {
    /// Pauli label, e.g. `"Z0 Z1"`.
    pub pauli: PauliTerm,
    /// Real part of the coefficient.
    pub re: f64,
    /// Imaginary part of the coefficient.
    #[serde(default)]
    pub im: f64,
}

/// A weighted sum of Pauli terms with complex coefficients.
///
/// Terms are unique. A term whose coefficient is zero is still a term;
/// nothing is dropped implicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TermRecord>", into = "Vec<TermRecord>")]
pub struct Operator {
    terms: BTreeMap<PauliTerm, Complex64>,
}

impl Operator {
    /// Create an empty operator.
    pub fn new() -> Self {
        Self::default()
    }

    /// An operator with one term.
    pub fn single(term: PauliTerm, coeff: Complex64) -> Self {
        let mut op = Self::new();
        op.insert(term, coeff);
        op
    }

    /// Set the coefficient of `term`, returning the previous one.
    pub fn insert(&mut self, term: PauliTerm, coeff: Complex64) -> Option<Complex64> {
        self.terms.insert(term, coeff)
    }

    /// Add `coeff` to the coefficient of `term`.
    pub fn add_term(&mut self, term: PauliTerm, coeff: Complex64) {
        *self.terms.entry(term).or_default() += coeff;
    }

    /// Coefficient of `term`, if present.
    pub fn get(&self, term: &PauliTerm) -> Option<Complex64> {
        self.terms.get(term).copied()
    }

    /// Number of terms, identity included.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True if there are no terms at all.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Coefficient of the identity term, zero if absent.
    pub fn constant(&self) -> Complex64 {
        self.get(&PauliTerm::identity()).unwrap_or_default()
    }

    /// True if the identity is the only term.
    pub fn is_identity_only(&self) -> bool {
        self.terms.len() == 1 && self.terms.contains_key(&PauliTerm::identity())
    }

    /// The highest qubit index any term acts on.
    pub fn max_qubit(&self) -> Option<u32> {
        self.terms.keys().filter_map(PauliTerm::max_qubit).max()
    }

    /// Terms in canonical order.
    pub fn iter(&self) -> btree_map::Iter<'_, PauliTerm, Complex64> {
        self.terms.iter()
    }

    /// Non-identity terms in canonical order.
    pub fn non_identity_terms(&self) -> impl Iterator<Item = &PauliTerm> {
        self.terms.keys().filter(|t| !t.is_identity())
    }
}

impl From<PauliTerm> for Operator {
    fn from(term: PauliTerm) -> Self {
        Self::single(term, Complex64::new(1.0, 0.0))
    }
}

impl FromIterator<(PauliTerm, Complex64)> for Operator {
    fn from_iter<T: IntoIterator<Item = (PauliTerm, Complex64)>>(iter: T) -> Self {
        let mut op = Self::new();
        for (term, coeff) in iter {
            op.add_term(term, coeff);
        }
        op
    }
}

impl<'a> IntoIterator for &'a Operator {
    type Item = (&'a PauliTerm, &'a Complex64);
    type IntoIter = btree_map::Iter<'a, PauliTerm, Complex64>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl From<Vec<TermRecord>> for Operator {
    fn from(records: Vec<TermRecord>) -> Self {
        records
            .into_iter()
            .map(|r| (r.pauli, Complex64::new(r.re, r.im)))
            .collect()
    }
}

impl From<Operator> for Vec<TermRecord> {
    fn from(op: Operator) -> Self {
        op.terms
            .into_iter()
            .map(|(pauli, c)| TermRecord {
                pauli,
                re: c.re,
                im: c.im,
            })
            .collect()
    }
}
