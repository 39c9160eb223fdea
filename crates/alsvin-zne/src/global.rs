//! Global folding: C → C (C⁻¹ C)ᵍ plus a fractional local finish.

use alsvin_ir::Circuit;
use tracing::{debug, instrument};

use crate::compose::fold_local;
use crate::error::{FoldError, FoldResult};
use crate::folder::num_gates_to_fold;
use crate::local::check_terminal_measurements;
use crate::measurement::{append_measurements, pop_measurements};
use crate::strategy::FoldStrategy;

/// Fold the whole circuit as one unit.
///
/// Appends `floor(stretch / 3)` copies of `C⁻¹ C` to the measurement-free
/// circuit `C`; each copy multiplies the gate count by roughly 3. The
/// fractional remainder `stretch mod 3` is finished with `strategy` when
/// it exceeds 1, at a stretch adjusted so that the extra gates are
/// counted against the original circuit size rather than the already
/// grown one. A remainder of 1 or less needs no local folds.
///
/// # Errors
///
/// - [`FoldError::StretchBelowOne`] if `stretch` < 1.
/// - [`FoldError::IntermediateMeasurement`] if a measurement is followed
///   by later operations on the same qubit.
/// - [`FoldError::Ir`] if the circuit holds a non-invertible gate.
#[instrument(skip(circuit), level = "debug")]
pub fn fold_global(
    circuit: &Circuit,
    stretch: f64,
    strategy: &FoldStrategy,
) -> FoldResult<Circuit> {
    if stretch < 1.0 {
        return Err(FoldError::StretchBelowOne(stretch));
    }
    check_terminal_measurements(circuit)?;

    let mut folded = circuit.clone();
    let measurements = pop_measurements(&mut folded);
    folded.prune_trailing_empty_moments();

    let base = folded.clone();
    let num_gates = base.num_gates();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole_folds = (stretch / 3.0).floor() as usize;
    let remainder = stretch % 3.0;
    debug!(num_gates, whole_folds, remainder, "folding globally");

    if whole_folds > 0 {
        let inverse = base.inverse()?;
        for _ in 0..whole_folds {
            folded.append(&inverse);
            folded.append(&base);
        }
    }

    // The remainder budget is taken against the original gate count, then
    // rescaled to a stretch factor for the grown circuit.
    let local_budget = if remainder > 1.0 {
        num_gates_to_fold(remainder, num_gates)
    } else {
        0
    };
    if local_budget > 0 {
        #[allow(clippy::cast_precision_loss)]
        let adjusted = 1.0 + 2.0 * local_budget as f64 / folded.num_gates() as f64;
        folded = fold_local(&folded, adjusted, strategy)?;
    }

    append_measurements(&mut folded, measurements)?;
    Ok(folded)
}
