//! Unitary matrix utilities for native-gate synthesis and decomposition checks.
//!
//! Provides 2x2 unitary matrix operations and the closed-form matrices of the
//! native gates.

use num_complex::Complex64;
use std::f64::consts::PI;

use qbudget_ir::StandardGate;

/// Tolerance for floating point comparisons.
const EPSILON: f64 = 1e-10;

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 unitary matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Create the identity matrix.
    pub fn identity() -> Self {
        Self::diagonal(Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0))
    }

    fn diagonal(a: Complex64, d: Complex64) -> Self {
        let zero = Complex64::new(0.0, 0.0);
        Self::new(a, zero, zero, d)
    }

    /// Create a Hadamard matrix.
    pub fn h() -> Self {
        let s = 1.0 / 2.0_f64.sqrt();
        Self::new(
            Complex64::new(s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(-s, 0.0),
        )
    }

    /// Create a Pauli-X matrix.
    pub fn x() -> Self {
        Self::new(
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
        )
    }

    /// Create a Pauli-Y matrix.
    pub fn y() -> Self {
        Self::new(
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(0.0, 1.0),
            Complex64::new(0.0, 0.0),
        )
    }

    /// Create a Pauli-Z matrix.
    pub fn z() -> Self {
        Self::p(PI)
    }

    /// Create an SX gate (sqrt(X)).
    pub fn sx() -> Self {
        let half = Complex64::new(0.5, 0.0);
        let half_i = Complex64::new(0.0, 0.5);
        Self::new(half + half_i, half - half_i, half - half_i, half + half_i)
    }

    /// Create an SX-dagger gate.
    pub fn sxdg() -> Self {
        Self::sx().dagger()
    }

    /// Create an RX rotation matrix.
    pub fn rx(theta: f64) -> Self {
        Self::u1q(theta, 0.0)
    }

    /// Create an RY rotation matrix.
    pub fn ry(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        )
    }

    /// Create an RZ rotation matrix.
    pub fn rz(theta: f64) -> Self {
        Self::diagonal(
            Complex64::from_polar(1.0, -theta / 2.0),
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Create a phase gate P(lambda).
    pub fn p(lambda: f64) -> Self {
        Self::diagonal(Complex64::new(1.0, 0.0), Complex64::from_polar(1.0, lambda))
    }

    /// Create a U gate U(theta, phi, lambda).
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
    }

    /// Phased rotation U1q(θ, φ) = RZ(φ) · RX(θ) · RZ(-φ).
    ///
    /// `[[cos θ/2, -i e^{-iφ} sin θ/2], [-i e^{iφ} sin θ/2, cos θ/2]]`
    pub fn u1q(theta: f64, phi: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let minus_i = Complex64::new(0.0, -1.0);
        Self::new(
            Complex64::new(c, 0.0),
            minus_i * Complex64::from_polar(s, -phi),
            minus_i * Complex64::from_polar(s, phi),
            Complex64::new(c, 0.0),
        )
    }

    /// Matrix of a bound single-qubit standard gate.
    ///
    /// Returns `None` for multi-qubit gates and gates with free parameters.
    pub fn from_gate(gate: &StandardGate) -> Option<Self> {
        let angle = |i: usize| gate.parameters().get(i).and_then(|p| p.as_f64());
        Some(match gate {
            StandardGate::I => Self::identity(),
            StandardGate::X => Self::x(),
            StandardGate::Y => Self::y(),
            StandardGate::Z => Self::z(),
            StandardGate::H => Self::h(),
            StandardGate::S => Self::p(PI / 2.0),
            StandardGate::Sdg => Self::p(-PI / 2.0),
            StandardGate::T => Self::p(PI / 4.0),
            StandardGate::Tdg => Self::p(-PI / 4.0),
            StandardGate::SX => Self::sx(),
            StandardGate::SXdg => Self::sxdg(),
            StandardGate::Rx(_) => Self::rx(angle(0)?),
            StandardGate::Ry(_) => Self::ry(angle(0)?),
            StandardGate::Rz(_) => Self::rz(angle(0)?),
            StandardGate::P(_) => Self::p(angle(0)?),
            StandardGate::U(_, _, _) => Self::u(angle(0)?, angle(1)?, angle(2)?),
            StandardGate::U1q(_, _) => Self::u1q(angle(0)?, angle(1)?),
            _ => return None,
        })
    }

    /// Multiply this matrix by another: self * other.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Get the conjugate transpose (dagger).
    pub fn dagger(&self) -> Self {
        Self::new(
            self.data[0].conj(),
            self.data[2].conj(),
            self.data[1].conj(),
            self.data[3].conj(),
        )
    }

    /// Check if this is approximately identity (up to global phase).
    pub fn is_identity(&self) -> bool {
        let [a, b, c, d] = self.data;
        if b.norm() > EPSILON || c.norm() > EPSILON {
            return false;
        }
        (a - d).norm() < EPSILON && (a.norm() - 1.0).abs() < EPSILON
    }

    /// Check whether two unitaries differ only by a global phase.
    pub fn equiv_up_to_phase(&self, other: &Self) -> bool {
        (self.dagger() * *other).is_identity()
    }

    /// Row-major elements as a vector.
    pub fn to_vec(&self) -> Vec<Complex64> {
        self.data.to_vec()
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    #[allow(clippy::needless_pass_by_value)]
    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}

/// Row-major 4x4 diagonal matrix.
pub(crate) fn diagonal4(diag: [Complex64; 4]) -> Vec<Complex64> {
    let mut m = vec![Complex64::new(0.0, 0.0); 16];
    for (i, v) in diag.into_iter().enumerate() {
        m[i * 4 + i] = v;
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        assert!(Unitary2x2::identity().is_identity());
    }

    #[test]
    fn test_hadamard_squared() {
        let h = Unitary2x2::h();
        assert!((h * h).is_identity());
    }

    #[test]
    fn test_pauli_squared() {
        let x = Unitary2x2::x();
        let y = Unitary2x2::y();
        let z = Unitary2x2::z();

        assert!((x * x).is_identity());
        assert!((y * y).is_identity());
        assert!((z * z).is_identity());
    }

    #[test]
    fn test_u1q_is_phased_rx() {
        let (theta, phi) = (0.731, 1.3);
        let expected = Unitary2x2::rz(phi) * Unitary2x2::rx(theta) * Unitary2x2::rz(-phi);
        assert!(Unitary2x2::u1q(theta, phi).equiv_up_to_phase(&expected));
    }

    #[test]
    fn test_u1q_special_angles() {
        assert!(Unitary2x2::u1q(PI, 0.0).equiv_up_to_phase(&Unitary2x2::x()));
        assert!(Unitary2x2::u1q(PI, PI / 2.0).equiv_up_to_phase(&Unitary2x2::y()));
        assert!(Unitary2x2::u1q(PI / 2.0, 0.0).equiv_up_to_phase(&Unitary2x2::sx()));
    }

    #[test]
    fn test_u_matches_euler_angles() {
        let (theta, phi, lambda) = (0.731, 1.3, -0.4);
        let euler = Unitary2x2::rz(phi) * Unitary2x2::ry(theta) * Unitary2x2::rz(lambda);
        assert!(Unitary2x2::u(theta, phi, lambda).equiv_up_to_phase(&euler));
    }

    #[test]
    fn test_from_gate_rejects_symbolic() {
        use qbudget_ir::ParameterExpression;
        assert!(Unitary2x2::from_gate(&StandardGate::Rx(ParameterExpression::symbol("t"))).is_none());
        assert!(Unitary2x2::from_gate(&StandardGate::CX).is_none());
        assert!(Unitary2x2::from_gate(&StandardGate::S).is_some());
    }

    #[test]
    fn test_diagonal4() {
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        let m = diagonal4([one, i, i, one]);
        assert_eq!(m.len(), 16);
        assert_eq!(m[5], i);
        assert_eq!(m[1], Complex64::new(0.0, 0.0));
    }
}
