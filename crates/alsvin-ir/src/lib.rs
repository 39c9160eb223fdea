//! Alsvin Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing quantum
//! circuits in Alsvin. Unlike DAG-based IRs, circuits here are ordered
//! sequences of *moments*: time steps whose operations act on pairwise
//! disjoint qubits. The moment structure is what the zero-noise
//! extrapolation folding engine in `alsvin-zne` manipulates, so moment
//! indices and per-moment operation indices are first-class concepts.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`] for built-in gates and [`CustomGate`] for
//!   user-defined operations; every gate exposes an inverse
//! - **Parameters**: [`ParameterExpression`] for rotation angles
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Moments**: [`Moment`] time-step groupings with a disjointness invariant
//! - **Circuit**: [`Circuit`] ordered moment sequence with a builder API
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use alsvin_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3); // H, CX, parallel measures
//! assert!(circuit.all_measurements_terminal());
//! ```
//!
//! # Example: Inverting a Circuit
//!
//! ```rust
//! use alsvin_ir::{Circuit, QubitId};
//! use std::f64::consts::PI;
//!
//! let mut circuit = Circuit::with_size("rot", 1, 0);
//! circuit.rx(PI / 4.0, QubitId(0)).unwrap();
//! circuit.s(QubitId(0)).unwrap();
//!
//! // Inverse reverses moment order and inverts each gate.
//! let inv = circuit.inverse().unwrap();
//! assert_eq!(inv.depth(), 2);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod moment;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use moment::Moment;
pub use parameter::ParameterExpression;
pub use qubit::{ClbitId, QubitId};
