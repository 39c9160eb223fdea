//! Staged composition of local folds for stretch factors beyond 3.

use alsvin_ir::Circuit;
use tracing::{debug, instrument};

use crate::error::{FoldError, FoldResult};
use crate::strategy::FoldStrategy;

const UNIT_STRETCH_ATOL: f64 = 1e-2;

/// Fold locally to an arbitrary stretch factor ≥ 1.
///
/// A single local fold tops out at stretch 3, so larger factors are
/// reached by composing stages: each stage folds by `min(remaining, 3)`
/// and divides the remainder by 3 until it drops to 1. Stretch factors
/// compose multiplicatively, so the product of the stages approximates
/// the requested total.
///
/// A stretch within 0.01 of 1 returns an unmodified copy.
///
/// # Errors
///
/// - [`FoldError::StretchBelowOne`] if `stretch` < 1.
/// - Whatever the chosen strategy raises per stage.
#[instrument(skip(circuit), level = "debug")]
pub fn fold_local(
    circuit: &Circuit,
    stretch: f64,
    strategy: &FoldStrategy,
) -> FoldResult<Circuit> {
    if (stretch - 1.0).abs() < UNIT_STRETCH_ATOL {
        return Ok(circuit.clone());
    }
    if stretch < 1.0 {
        return Err(FoldError::StretchBelowOne(stretch));
    }

    let mut folded = circuit.clone();
    let mut remaining = stretch;
    while remaining > 1.0 {
        let stage = remaining.min(3.0);
        debug!(stage, remaining, "applying local fold stage");
        folded = strategy.apply(&folded, stage)?;
        remaining /= 3.0;
    }
    Ok(folded)
}
