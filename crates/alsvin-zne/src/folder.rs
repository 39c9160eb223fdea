//! The gate folder: index-stable fold insertion on a working circuit.
//!
//! Every fold inserts two new moments in front of the folded moment,
//! shifting all later moment indices by +2. Instead of scattering that
//! arithmetic across every strategy, [`GateFolder`] owns the working
//! circuit together with a map from original moment indices to their
//! current positions, and updates the map on each fold. Strategies then
//! address gates purely in original-circuit coordinates.

use alsvin_ir::Circuit;

use crate::error::{FoldError, FoldResult};

/// Number of gates to fold to reach the given stretch factor.
///
/// Folding one gate nets +2 gates (G → G G⁻¹ G), so folding k gates takes
/// an n-gate circuit to n + 2k gates; solving n + 2k = stretch · n gives
/// k = n(stretch − 1)/2, rounded to the nearest integer.
pub(crate) fn num_gates_to_fold(stretch: f64, num_gates: usize) -> usize {
    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
    let k = (num_gates as f64 * (stretch - 1.0) / 2.0).round();
    if k <= 0.0 { 0 } else { k as usize }
}

/// Owns a measurement-free working circuit during one folding call.
///
/// Moment addresses passed to [`GateFolder::fold_gate`] and
/// [`GateFolder::fold_moment`] refer to the circuit as it was when the
/// folder was created; the folder translates them to current positions.
pub(crate) struct GateFolder {
    circuit: Circuit,
    /// Original moment index → index in the working circuit.
    moment_map: Vec<usize>,
}

impl GateFolder {
    /// Wrap a measurement-free circuit with an identity moment map.
    pub(crate) fn new(circuit: Circuit) -> Self {
        let moment_map = (0..circuit.num_moments()).collect();
        Self {
            circuit,
            moment_map,
        }
    }

    /// Current position of an original moment.
    fn current_index(&self, original_moment: usize) -> FoldResult<usize> {
        self.moment_map
            .get(original_moment)
            .copied()
            .ok_or(FoldError::UntrackedMoment(original_moment))
    }

    /// Every original-moment index at or after the folded one moves by +2.
    fn shift_from(&mut self, original_moment: usize) {
        for index in &mut self.moment_map[original_moment..] {
            *index += 2;
        }
    }

    /// Fold a single gate: G → G G⁻¹ G.
    ///
    /// Inserts `[G, G⁻¹]` as two distinct new moments immediately before
    /// the moment currently holding G, leaving G itself in place. Grows
    /// the circuit by exactly 2 moments and 2 gates.
    pub(crate) fn fold_gate(
        &mut self,
        original_moment: usize,
        gate_index: usize,
    ) -> FoldResult<()> {
        let at = self.current_index(original_moment)?;
        let moment = self.circuit.moment(at)?;
        let instruction = moment
            .get(gate_index)
            .ok_or(alsvin_ir::IrError::InstructionOutOfRange {
                index: gate_index,
                len: moment.len(),
            })?
            .clone();
        let inverse = instruction.inverse()?;

        self.circuit
            .insert_new_moments(at, [instruction, inverse])?;
        self.shift_from(original_moment);
        Ok(())
    }

    /// Fold a whole moment: M → M M⁻¹ M.
    ///
    /// Inserts a copy of the moment and its inverse immediately before the
    /// moment's current position. Grows the circuit by exactly 2 moments.
    pub(crate) fn fold_moment(&mut self, original_moment: usize) -> FoldResult<()> {
        let at = self.current_index(original_moment)?;
        let moment = self.circuit.moment(at)?.clone();
        let inverse = moment.inverse()?;

        self.circuit.insert_moment(at, inverse)?;
        self.circuit.insert_moment(at, moment)?;
        self.shift_from(original_moment);
        Ok(())
    }

    /// Finish folding and return the working circuit.
    pub(crate) fn into_circuit(self) -> Circuit {
        self.circuit
    }
}
