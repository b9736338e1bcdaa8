//! qbudget Circuit Intermediate Representation
//!
//! This crate provides the circuit data structures the sampling engine
//! transpiles, synthesizes and hands to a backend.
//!
//! # Overview
//!
//! A [`Circuit`] is an ordered list of [`Instruction`]s over a fixed number
//! of qubits. Builder methods validate operands as gates are appended;
//! transformations such as [`Circuit::compose`] and
//! [`Circuit::bind_parameters`] return new circuits and leave their inputs
//! untouched.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`], positional within the circuit
//! - **Gates**: [`StandardGate`] for built-in gates (including the ion-trap
//!   natives `U1q` and `ZZ`) and [`CustomGate`] for explicit unitaries
//! - **Parameters**: [`ParameterExpression`] for symbolic parameters in variational circuits
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Noise**: [`NoiseProfile`] with the fixed depolarizing / thermal-relaxation / bit-flip channel set
//!
//! # Example: Parameterized Circuit
//!
//! ```rust
//! use qbudget_ir::{Circuit, QubitId, ParameterExpression};
//!
//! let mut circuit = Circuit::with_size("ansatz", 2);
//! circuit.ry(ParameterExpression::symbol("theta"), QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.parameters(), vec!["theta".to_string()]);
//! let bound = circuit.bind_parameters(&[0.25]).unwrap();
//! assert!(!bound.is_parameterized());
//! assert_eq!(bound.depth(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Phase Clifford+T gates |
//! | `SX`, `SXdg` | 1 | sqrt(X) and its inverse |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `U` | 1 | Universal single-qubit gate U(θ,φ,λ) |
//! | `U1q` | 1 | Phased rotation U1q(θ,φ), ion-trap native |
//! | `CX`, `CY`, `CZ` | 2 | Controlled Pauli gates |
//! | `Swap` | 2 | SWAP gate |
//! | `RZZ` | 2 | ZZ rotation |
//! | `ZZ` | 2 | Fixed entangler diag(1, i, i, 1), ion-trap native |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod noise;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, GateKind, StandardGate};
pub use instruction::Instruction;
pub use noise::{NoiseModel, NoiseProfile};
pub use parameter::ParameterExpression;
pub use qubit::QubitId;
