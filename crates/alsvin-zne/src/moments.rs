//! Whole-moment folding.

use alsvin_ir::Circuit;
use tracing::instrument;

use crate::error::FoldResult;
use crate::folder::GateFolder;

/// Fold whole moments: M → M M⁻¹ M.
///
/// `moment_indices` refer to moments of the input circuit and are
/// processed in increasing order; each fold grows the circuit by two
/// moments. An index may appear more than once, folding the same
/// original moment again.
///
/// # Errors
///
/// - [`FoldError::UntrackedMoment`](crate::FoldError::UntrackedMoment)
///   if an index is out of range.
/// - [`FoldError::Ir`](crate::FoldError::Ir) if a targeted moment holds a
///   non-invertible operation such as a measurement.
#[instrument(skip_all, level = "debug")]
pub fn fold_moments(circuit: &Circuit, moment_indices: &[usize]) -> FoldResult<Circuit> {
    let mut indices = moment_indices.to_vec();
    indices.sort_unstable();

    let mut folder = GateFolder::new(circuit.clone());
    for index in indices {
        folder.fold_moment(index)?;
    }
    Ok(folder.into_circuit())
}
