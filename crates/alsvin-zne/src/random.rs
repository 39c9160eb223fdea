//! Randomized local folding.

use alsvin_ir::Circuit;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use crate::error::FoldResult;
use crate::folder::{GateFolder, num_gates_to_fold};
use crate::local::{check_local_stretch, check_terminal_measurements};
use crate::measurement::{append_measurements, pop_measurements};

const FULL_FOLD_ATOL: f64 = 1e-3;

/// Fold gates chosen uniformly at random.
///
/// Each of the budgeted folds picks a moment uniformly among those that
/// still hold unfolded gates, then a gate uniformly within it; no gate is
/// folded twice. At `stretch` ≈ 3 every moment is folded whole instead,
/// since all gates get folded regardless of the draw order.
///
/// Passing the same `seed` always yields the same folded circuit;
/// `None` seeds from entropy.
///
/// # Errors
///
/// Same as [`fold_gates_from_left`](crate::fold_gates_from_left).
#[instrument(skip(circuit), level = "debug")]
pub fn fold_gates_at_random(
    circuit: &Circuit,
    stretch: f64,
    seed: Option<u64>,
) -> FoldResult<Circuit> {
    check_terminal_measurements(circuit)?;
    check_local_stretch(stretch)?;

    let mut folded = circuit.clone();
    let measurements = pop_measurements(&mut folded);

    if (stretch - 3.0).abs() < FULL_FOLD_ATOL {
        let mut folded = fold_all_moments(folded)?;
        append_measurements(&mut folded, measurements)?;
        return Ok(folded);
    }

    let num_gates = folded.num_gates();
    let budget = num_gates_to_fold(stretch, num_gates);
    debug!(num_gates, budget, ?seed, "folding gates at random");
    if budget == 0 {
        append_measurements(&mut folded, measurements)?;
        return Ok(folded);
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Moments that still hold unfolded gates, in original coordinates,
    // with the in-moment gate positions not yet drawn.
    let mut eligible: Vec<usize> = vec![];
    let mut remaining: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    for (index, moment) in folded.moments().iter().enumerate() {
        if !moment.is_empty() {
            eligible.push(index);
            remaining.insert(index, (0..moment.len()).collect());
        }
    }

    let mut folder = GateFolder::new(folded);
    for _ in 0..budget {
        let pick = rng.gen_range(0..eligible.len());
        let moment_index = eligible[pick];
        let gates = remaining
            .get_mut(&moment_index)
            .ok_or(crate::error::FoldError::UntrackedMoment(moment_index))?;
        let gate_pick = rng.gen_range(0..gates.len());
        let gate_index = gates.swap_remove(gate_pick);

        folder.fold_gate(moment_index, gate_index)?;

        if gates.is_empty() {
            remaining.remove(&moment_index);
            eligible.remove(pick);
        }
    }

    let mut folded = folder.into_circuit();
    append_measurements(&mut folded, measurements)?;
    Ok(folded)
}

/// Fold every non-empty moment of a measurement-free circuit.
pub(crate) fn fold_all_moments(circuit: Circuit) -> FoldResult<Circuit> {
    let targets: Vec<usize> = circuit
        .moments()
        .iter()
        .enumerate()
        .filter(|(_, m)| !m.is_empty())
        .map(|(i, _)| i)
        .collect();

    let mut folder = GateFolder::new(circuit);
    for index in targets {
        folder.fold_moment(index)?;
    }
    Ok(folder.into_circuit())
}
