//! Deterministic local folding strategies.
//!
//! Local folding applies the map G → G G⁻¹ G to individual gates until the
//! total gate count reaches approximately `stretch × n`. One fold adds two
//! gates, which caps the local stretch factor at 3.

use alsvin_ir::Circuit;
use tracing::{debug, instrument};

use crate::error::{FoldError, FoldResult};
use crate::folder::{GateFolder, num_gates_to_fold};
use crate::measurement::{append_measurements, pop_measurements};

pub(crate) fn check_terminal_measurements(circuit: &Circuit) -> FoldResult<()> {
    if circuit.all_measurements_terminal() {
        Ok(())
    } else {
        Err(FoldError::IntermediateMeasurement)
    }
}

pub(crate) fn check_local_stretch(stretch: f64) -> FoldResult<()> {
    if (1.0..=3.0).contains(&stretch) {
        Ok(())
    } else {
        Err(FoldError::StretchOutOfBounds(stretch))
    }
}

/// Left-first fold of a measurement-free circuit.
///
/// Scans moments, and gate positions within each moment, in original
/// left-to-right order, folding every gate encountered until the budget
/// for `stretch` is spent.
pub(crate) fn fold_left_stripped(circuit: Circuit, stretch: f64) -> FoldResult<Circuit> {
    check_local_stretch(stretch)?;

    let num_gates = circuit.num_gates();
    let budget = num_gates_to_fold(stretch, num_gates);
    debug!(num_gates, budget, "folding gates from the left");
    if budget == 0 {
        return Ok(circuit);
    }

    // Snapshot the moment sizes before folding; the folder translates
    // these original coordinates as the circuit grows.
    let moment_sizes: Vec<usize> = circuit.moments().iter().map(|m| m.len()).collect();

    let mut folder = GateFolder::new(circuit);
    let mut folded = 0usize;
    'scan: for (moment_index, &size) in moment_sizes.iter().enumerate() {
        for gate_index in 0..size {
            folder.fold_gate(moment_index, gate_index)?;
            folded += 1;
            if folded == budget {
                break 'scan;
            }
        }
    }

    Ok(folder.into_circuit())
}

/// Fold gates starting from the left (beginning) of the circuit.
///
/// Returns a new circuit whose gate count is approximately
/// `stretch × n`; the input is never mutated.
///
/// # Errors
///
/// - [`FoldError::IntermediateMeasurement`] if a measurement is followed
///   by later operations on the same qubit.
/// - [`FoldError::StretchOutOfBounds`] if `stretch` is outside [1, 3].
#[instrument(skip(circuit), level = "debug")]
pub fn fold_gates_from_left(circuit: &Circuit, stretch: f64) -> FoldResult<Circuit> {
    check_terminal_measurements(circuit)?;

    let mut folded = circuit.clone();
    let measurements = pop_measurements(&mut folded);
    let mut folded = fold_left_stripped(folded, stretch)?;
    append_measurements(&mut folded, measurements)?;
    Ok(folded)
}

/// Fold gates starting from the right (end) of the circuit.
///
/// Computed by reversing the measurement-free circuit, folding from the
/// left, and reversing back.
///
/// # Errors
///
/// Same as [`fold_gates_from_left`].
#[instrument(skip(circuit), level = "debug")]
pub fn fold_gates_from_right(circuit: &Circuit, stretch: f64) -> FoldResult<Circuit> {
    check_terminal_measurements(circuit)?;

    let mut folded = circuit.clone();
    let measurements = pop_measurements(&mut folded);
    let reversed = fold_left_stripped(folded.reversed(), stretch)?;
    let mut folded = reversed.reversed();
    append_measurements(&mut folded, measurements)?;
    Ok(folded)
}

/// Fold an explicit selection of gates.
///
/// `moment_indices[i]` names a moment of the input circuit and
/// `gate_indices[i]` the gate positions within that moment to fold; all
/// indices refer to the input circuit, not to intermediate fold results.
///
/// # Errors
///
/// - [`FoldError::SelectionMismatch`] if the two slices differ in length.
/// - [`FoldError::Ir`] for out-of-range indices or non-invertible gates.
#[instrument(skip_all, level = "debug")]
pub fn fold_gates(
    circuit: &Circuit,
    moment_indices: &[usize],
    gate_indices: &[Vec<usize>],
) -> FoldResult<Circuit> {
    if moment_indices.len() != gate_indices.len() {
        return Err(FoldError::SelectionMismatch {
            moments: moment_indices.len(),
            gate_lists: gate_indices.len(),
        });
    }

    let mut folder = GateFolder::new(circuit.clone());
    for (&moment_index, gates) in moment_indices.iter().zip(gate_indices) {
        for &gate_index in gates {
            folder.fold_gate(moment_index, gate_index)?;
        }
    }
    Ok(folder.into_circuit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvin_ir::{ClbitId, QubitId};

    fn parallel_pair() -> Circuit {
        // Two single-qubit gates in one moment.
        let mut circuit = Circuit::with_size("pair", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.x(QubitId(1)).unwrap();
        circuit
    }

    #[test]
    fn test_stretch_one_is_identity() {
        let circuit = Circuit::bell().unwrap();
        let folded = fold_gates_from_left(&circuit, 1.0).unwrap();
        assert_eq!(folded, circuit);
    }

    #[test]
    fn test_stretch_three_folds_every_gate() {
        let circuit = parallel_pair();
        let folded = fold_gates_from_left(&circuit, 3.0).unwrap();
        // 2 gates + 2 folds × 2 gates each
        assert_eq!(folded.num_gates(), 6);
    }

    #[test]
    fn test_gate_count_formula() {
        let circuit = Circuit::ghz(4).unwrap(); // 4 gates
        for stretch in [1.0, 1.5, 2.0, 2.5, 3.0] {
            let folded = fold_gates_from_left(&circuit, stretch).unwrap();
            let expected = 4 + 2 * num_gates_to_fold(stretch, 4);
            assert_eq!(folded.num_gates(), expected, "stretch {stretch}");
        }
    }

    #[test]
    fn test_left_fold_targets_leading_gates() {
        let mut circuit = Circuit::with_size("seq", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.t(QubitId(0)).unwrap();

        // Budget of 1: only the leading H is folded.
        let folded = fold_gates_from_left(&circuit, 2.0).unwrap();
        assert_eq!(folded.num_gates(), 4);
        let names: Vec<_> = folded.instructions().map(|i| i.name()).collect();
        assert_eq!(names, vec!["h", "h", "h", "t"]);
    }

    #[test]
    fn test_right_fold_targets_trailing_gates() {
        let mut circuit = Circuit::with_size("seq", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.t(QubitId(0)).unwrap();

        let folded = fold_gates_from_right(&circuit, 2.0).unwrap();
        assert_eq!(folded.num_gates(), 4);
        let names: Vec<_> = folded.instructions().map(|i| i.name()).collect();
        assert_eq!(names, vec!["h", "t", "tdg", "t"]);
    }

    #[test]
    fn test_right_is_reverse_of_left_on_reverse() {
        let circuit = Circuit::ghz(4).unwrap();
        for stretch in [1.4, 2.0, 2.8] {
            let right = fold_gates_from_right(&circuit, stretch).unwrap();
            let via_reverse =
                fold_left_stripped(circuit.reversed(), stretch).unwrap().reversed();
            assert_eq!(right, via_reverse, "stretch {stretch}");
        }
    }

    #[test]
    fn test_measurements_are_reattached_terminal() {
        let circuit = Circuit::bell().unwrap();
        let folded = fold_gates_from_left(&circuit, 3.0).unwrap();
        assert!(folded.all_measurements_terminal());
        assert_eq!(folded.num_ops() - folded.num_gates(), 2);
        let last = folded.moment(folded.num_moments() - 1).unwrap();
        assert!(last.iter().all(|inst| inst.is_measure()));
    }

    #[test]
    fn test_intermediate_measurement_rejected() {
        let mut circuit = Circuit::with_size("mid", 1, 1);
        circuit.h(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();

        assert!(matches!(
            fold_gates_from_left(&circuit, 2.0),
            Err(FoldError::IntermediateMeasurement)
        ));
        assert!(matches!(
            fold_gates_from_right(&circuit, 2.0),
            Err(FoldError::IntermediateMeasurement)
        ));
    }

    #[test]
    fn test_stretch_out_of_bounds_rejected() {
        let circuit = parallel_pair();
        for stretch in [0.5, 3.5] {
            assert!(matches!(
                fold_gates_from_left(&circuit, stretch),
                Err(FoldError::StretchOutOfBounds(_))
            ));
        }
    }

    #[test]
    fn test_explicit_selection() {
        let mut circuit = Circuit::with_size("seq", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.x(QubitId(1)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        // Fold both gates in moment 0 and the CX in moment 1.
        let folded = fold_gates(&circuit, &[0, 1], &[vec![0, 1], vec![0]]).unwrap();
        assert_eq!(folded.num_gates(), 9);
    }

    #[test]
    fn test_explicit_selection_mismatch() {
        let circuit = parallel_pair();
        assert!(matches!(
            fold_gates(&circuit, &[0, 1], &[vec![0]]),
            Err(FoldError::SelectionMismatch { .. })
        ));
    }

    #[test]
    fn test_input_is_never_mutated() {
        let circuit = Circuit::bell().unwrap();
        let before = circuit.clone();
        let _ = fold_gates_from_left(&circuit, 3.0).unwrap();
        let _ = fold_gates_from_right(&circuit, 2.0).unwrap();
        assert_eq!(circuit, before);
    }
}
