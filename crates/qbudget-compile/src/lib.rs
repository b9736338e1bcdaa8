//! qbudget Transpilation
//!
//! This crate lowers arbitrary circuits onto the native gate alphabets of the
//! two supported hardware classes and, for the ion-trap class, turns native
//! gates into explicit unitaries a statevector backend can execute.
//!
//! # Architecture
//!
//! ```text
//! Input Circuit
//!       │
//!       ▼
//! ┌────────────┐
//! │ Transpiler │  ordered Vec<Box<dyn Pass>>
//! └────────────┘
//!       │
//!       ├── superconducting: BasisTranslation → SquareLatticeRouting(8×8) → BasisTranslation
//!       └── ion trap:        BasisTranslation
//!       │
//!       ▼
//! Native Circuit ──(ion trap only)──► NativeGateSynthesizer ──► matrix gates
//! ```
//!
//! # Example
//!
//! ```rust
//! use qbudget_compile::{NativeGateSynthesizer, Transpiler};
//! use qbudget_ir::Circuit;
//!
//! let circuit = Circuit::bell().unwrap();
//!
//! let native = Transpiler::ion_trap().run(&circuit).unwrap();
//! assert!(native.instructions().iter().all(|i| ["u1q", "zz", "rzz", "rz"].contains(&i.name())));
//!
//! let executable = NativeGateSynthesizer::new().synthesize_circuit(&native).unwrap();
//! assert_eq!(executable.len(), native.len());
//! ```
//!
//! # Built-in Passes
//!
//! - [`passes::BasisTranslation`]: exact decompositions into X + SX + RZ + CX or U1q + ZZ + RZZ + RZ
//! - [`passes::SquareLatticeRouting`]: SWAP-and-restore routing on a row-major square lattice

pub mod error;
pub mod manager;
pub mod pass;
pub mod property;
pub mod synthesis;
pub mod unitary;

// Built-in passes
pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::Transpiler;
pub use pass::Pass;
pub use property::{BasisGates, CouplingMap};
pub use synthesis::NativeGateSynthesizer;
pub use unitary::Unitary2x2;
