//! Measurement extraction and reattachment.
//!
//! Folding operates on measurement-free circuits: measurements carry no
//! inverse and must stay terminal. These helpers strip every measurement
//! before a fold and reattach them as the final moment afterwards.

use alsvin_ir::{Circuit, Instruction, Moment};

use crate::error::FoldResult;

/// Remove every measurement from the circuit.
///
/// Returns the extracted measurements as `(moment_index, instruction)`
/// pairs in moment order. Emptied moments are kept in place so that moment
/// indices of the remaining gates are unchanged.
pub(crate) fn pop_measurements(circuit: &mut Circuit) -> Vec<(usize, Instruction)> {
    let mut measurements = vec![];
    for index in 0..circuit.num_moments() {
        let Ok(moment) = circuit.moment_mut(index) else {
            continue;
        };
        let extracted = moment.extract_if(Instruction::is_measure);
        measurements.extend(extracted.into_iter().map(|inst| (index, inst)));
    }
    measurements
}

/// Reattach previously extracted measurements as the final moment.
///
/// The recorded moment indices are ignored: folding may have grown the
/// circuit, so all measurements land together in a new last moment.
/// Trailing empty moments left behind by extraction are pruned first.
pub(crate) fn append_measurements(
    circuit: &mut Circuit,
    measurements: Vec<(usize, Instruction)>,
) -> FoldResult<()> {
    circuit.prune_trailing_empty_moments();
    if measurements.is_empty() {
        return Ok(());
    }
    let moment =
        Moment::with_instructions(measurements.into_iter().map(|(_, inst)| inst))?;
    let end = circuit.num_moments();
    circuit.insert_moment(end, moment)?;
    Ok(())
}
