//! Fold strategy selection.

use alsvin_ir::Circuit;
use serde::{Deserialize, Serialize};

use crate::error::FoldResult;
use crate::local::{fold_gates, fold_gates_from_left, fold_gates_from_right};
use crate::random::fold_gates_at_random;

/// Which gates a local fold targets.
///
/// A strategy is plain data, so it can be stored in configuration, logged,
/// and reused across the staged folds of [`fold_local`](crate::fold_local).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FoldStrategy {
    /// Fold gates in left-to-right circuit order.
    FromLeft,
    /// Fold gates in right-to-left circuit order.
    FromRight,
    /// Fold gates chosen uniformly at random. `seed: None` draws from
    /// entropy; a fixed seed makes the fold reproducible.
    AtRandom { seed: Option<u64> },
    /// Fold an explicit gate selection; the stretch factor is ignored.
    /// `moment_indices[i]` pairs with `gate_indices[i]`.
    Explicit {
        moment_indices: Vec<usize>,
        gate_indices: Vec<Vec<usize>>,
    },
}

impl FoldStrategy {
    /// Apply this strategy to `circuit` at the given stretch factor.
    pub fn apply(&self, circuit: &Circuit, stretch: f64) -> FoldResult<Circuit> {
        match self {
            Self::FromLeft => fold_gates_from_left(circuit, stretch),
            Self::FromRight => fold_gates_from_right(circuit, stretch),
            Self::AtRandom { seed } => fold_gates_at_random(circuit, stretch, *seed),
            Self::Explicit {
                moment_indices,
                gate_indices,
            } => fold_gates(circuit, moment_indices, gate_indices),
        }
    }
}
