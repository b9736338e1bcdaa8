//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::PI;

use qbudget_estimate::{BackendError, BackendResult};
use qbudget_ir::{GateKind, Instruction, StandardGate};

/// A single-qubit Pauli applied as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pauli {
    X,
    Y,
    Z,
}

/// A statevector representing a quantum state.
///
/// Basis index bit `i` is the state of qubit `i`.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    #[allow(dead_code)]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Apply an instruction to the statevector.
    pub fn apply(&mut self, instruction: &Instruction) -> BackendResult<()> {
        let qubits: Vec<_> = instruction.qubits.iter().map(|q| q.index()).collect();
        match &instruction.gate.kind {
            GateKind::Standard(gate) => self.apply_standard_gate(gate, &qubits),
            GateKind::Custom(custom) => match &custom.matrix {
                Some(matrix) => self.apply_matrix(&custom.name, matrix, &qubits),
                None => Err(BackendError::UnsupportedGate(custom.name.clone())),
            },
        }
    }

    /// Apply a standard gate.
    fn apply_standard_gate(&mut self, gate: &StandardGate, qubits: &[usize]) -> BackendResult<()> {
        match gate {
            // Single-qubit gates
            StandardGate::I => {}
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::Z => self.apply_z(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::S => self.apply_phase(qubits[0], PI / 2.0),
            StandardGate::Sdg => self.apply_phase(qubits[0], -PI / 2.0),
            StandardGate::T => self.apply_phase(qubits[0], PI / 4.0),
            StandardGate::Tdg => self.apply_phase(qubits[0], -PI / 4.0),
            StandardGate::SX => self.apply_rx(qubits[0], PI / 2.0),
            StandardGate::SXdg => self.apply_rx(qubits[0], -PI / 2.0),
            StandardGate::Rx(theta) => self.apply_rx(qubits[0], theta.evaluate()?),
            StandardGate::Ry(theta) => self.apply_ry(qubits[0], theta.evaluate()?),
            StandardGate::Rz(theta) => self.apply_rz(qubits[0], theta.evaluate()?),
            StandardGate::P(theta) => self.apply_phase(qubits[0], theta.evaluate()?),
            StandardGate::U(theta, phi, lambda) => self.apply_u(
                qubits[0],
                theta.evaluate()?,
                phi.evaluate()?,
                lambda.evaluate()?,
            ),
            StandardGate::U1q(theta, phi) => {
                // U1q(θ, φ) = RZ(φ) · RX(θ) · RZ(-φ)
                let (theta, phi) = (theta.evaluate()?, phi.evaluate()?);
                self.apply_rz(qubits[0], -phi);
                self.apply_rx(qubits[0], theta);
                self.apply_rz(qubits[0], phi);
            }

            // Two-qubit gates
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::CY => self.apply_cy(qubits[0], qubits[1]),
            StandardGate::CZ => self.apply_cz(qubits[0], qubits[1]),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
            StandardGate::RZZ(theta) => {
                let phase = Complex64::from_polar(1.0, theta.evaluate()?);
                self.apply_parity_phase(qubits[0], qubits[1], phase);
            }
            StandardGate::ZZ => {
                self.apply_parity_phase(qubits[0], qubits[1], Complex64::new(0.0, 1.0));
            }
        }
        Ok(())
    }

    /// Apply an error Pauli to one qubit.
    pub fn apply_pauli(&mut self, qubit: usize, pauli: Pauli) {
        match pauli {
            Pauli::X => self.apply_x(qubit),
            Pauli::Y => self.apply_y(qubit),
            Pauli::Z => self.apply_z(qubit),
        }
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        let s = Complex64::new(sqrt2_inv, 0.0);
        self.apply_1q(qubit, [s, s, s, -s]);
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        self.apply_1q(qubit, [c, neg_i_s, neg_i_s, c]);
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new((theta / 2.0).sin(), 0.0);
        self.apply_1q(qubit, [c, -s, s, c]);
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    fn apply_u(&mut self, qubit: usize, theta: f64, phi: f64, lambda: f64) {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let e_il = Complex64::from_polar(1.0, lambda);
        let e_ip = Complex64::from_polar(1.0, phi);
        let e_ipl = Complex64::from_polar(1.0, phi + lambda);
        self.apply_1q(qubit, [Complex64::new(c, 0.0), -e_il * s, e_ip * s, e_ipl * c]);
    }

    /// Apply a row-major 2x2 matrix.
    fn apply_1q(&mut self, qubit: usize, m: [Complex64; 4]) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0] * a + m[1] * b;
                self.amplitudes[j] = m[2] * a + m[3] * b;
            }
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cy(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let mask = (1 << control) | (1 << target);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp = -*amp;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Multiply by `phase` where the two qubits differ: diag(1, p, p, 1).
    fn apply_parity_phase(&mut self, q1: usize, q2: usize, phase: Complex64) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if ((i & mask1) != 0) != ((i & mask2) != 0) {
                *amp *= phase;
            }
        }
    }

    // =========================================================================
    // Matrix gates
    // =========================================================================

    /// Apply a row-major `2^k × 2^k` matrix; operand `j` is bit `j` of the
    /// local basis index.
    fn apply_matrix(&mut self, name: &str, matrix: &[Complex64], qubits: &[usize]) -> BackendResult<()> {
        match qubits {
            [q] if matrix.len() == 4 => {
                self.apply_1q(*q, [matrix[0], matrix[1], matrix[2], matrix[3]]);
                Ok(())
            }
            [q0, q1] if matrix.len() == 16 => {
                self.apply_2q(*q0, *q1, matrix);
                Ok(())
            }
            [_] | [_, _] => Err(BackendError::ExecutionFailed(format!(
                "matrix of gate '{name}' has {} entries for {} qubits",
                matrix.len(),
                qubits.len()
            ))),
            _ => Err(BackendError::UnsupportedGate(name.to_string())),
        }
    }

    fn apply_2q(&mut self, q0: usize, q1: usize, m: &[Complex64]) {
        let mask0 = 1 << q0;
        let mask1 = 1 << q1;
        let zero = Complex64::new(0.0, 0.0);
        for base in 0..self.amplitudes.len() {
            if base & (mask0 | mask1) != 0 {
                continue;
            }
            let idx = [base, base | mask0, base | mask1, base | mask0 | mask1];
            let old = idx.map(|i| self.amplitudes[i]);
            for (row, &i) in idx.iter().enumerate() {
                self.amplitudes[i] = (0..4).fold(zero, |acc, col| acc + m[row * 4 + col] * old[col]);
            }
        }
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Probability that `qubit` reads 1.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Project `qubit` onto `outcome` and renormalize.
    pub fn collapse(&mut self, qubit: usize, outcome: bool) {
        let mask = 1 << qubit;
        let mut norm_sq = 0.0;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if ((i & mask) != 0) == outcome {
                norm_sq += amp.norm_sqr();
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        let norm = norm_sq.sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }

    /// Measure `qubit` and leave it in `|target⟩`.
    pub fn reset_to(&mut self, qubit: usize, target: bool, rng: &mut impl Rng) {
        let outcome = rng.gen_bool(self.probability_one(qubit).clamp(0.0, 1.0));
        self.collapse(qubit, outcome);
        if outcome != target {
            self.apply_x(qubit);
        }
    }

    /// Probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Sample a measurement outcome of all qubits.
    pub fn sample(&self, rng: &mut impl Rng) -> u64 {
        let r: f64 = rng.gen_range(0.0..1.0);

        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if r < cumulative {
                return i as u64;
            }
        }

        // Rounding left the total just under 1.
        (self.amplitudes.len() - 1) as u64
    }
}
