//! Circuit folding for zero-noise extrapolation.
//!
//! Zero-noise extrapolation estimates a noiseless expectation value by
//! running a circuit at several amplified noise levels and extrapolating
//! back to zero. This crate implements the unitary folding family of
//! noise-scaling transforms: replacing a gate G with G G⁻¹ G leaves the
//! computation unchanged on a perfect device but roughly triples that
//! gate's exposure to noise.
//!
//! Local folds target individual gates ([`fold_gates_from_left`],
//! [`fold_gates_from_right`], [`fold_gates_at_random`], [`fold_gates`]),
//! whole moments fold via [`fold_moments`], stretch factors beyond 3
//! compose through [`fold_local`], and [`fold_global`] folds the circuit
//! as a single unit.
//!
//! # Examples
//!
//! ```
//! use alsvin_ir::Circuit;
//! use alsvin_zne::{FoldStrategy, fold_local};
//!
//! let circuit = Circuit::ghz(4)?;
//! let folded = fold_local(&circuit, 5.0, &FoldStrategy::FromLeft)?;
//! assert!(folded.num_gates() > 4 * circuit.num_gates());
//! # Ok::<(), alsvin_zne::FoldError>(())
//! ```

pub mod error;
pub mod sim;

mod compose;
mod folder;
mod global;
mod local;
mod measurement;
mod moments;
mod random;
mod strategy;

pub use compose::fold_local;
pub use error::{FoldError, FoldResult};
pub use global::fold_global;
pub use local::{fold_gates, fold_gates_from_left, fold_gates_from_right};
pub use moments::fold_moments;
pub use random::fold_gates_at_random;
pub use strategy::FoldStrategy;
