//! Moments: time-step groupings of operations on disjoint qubits.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// A single time step of a circuit.
///
/// All operations in one moment act on pairwise disjoint qubit sets, so
/// their order within the moment is immaterial. The disjointness invariant
/// is enforced by [`Moment::push`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Moment {
    instructions: Vec<Instruction>,
}

impl Moment {
    /// Create a new empty moment.
    pub fn new() -> Self {
        Self {
            instructions: vec![],
        }
    }

    /// Create a moment from instructions, enforcing qubit disjointness.
    pub fn with_instructions(
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<Self> {
        let mut moment = Self::new();
        for inst in instructions {
            moment.push(inst)?;
        }
        Ok(moment)
    }

    /// Add an instruction to this moment.
    ///
    /// Fails with [`IrError::OverlappingQubits`] if any qubit of the
    /// instruction is already used by an operation in this moment.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<()> {
        let used = self.qubits();
        for &qubit in &instruction.qubits {
            if used.contains(&qubit) {
                return Err(IrError::OverlappingQubits {
                    qubit,
                    gate_name: instruction.name().to_string(),
                });
            }
        }
        self.instructions.push(instruction);
        Ok(())
    }

    /// Check whether an instruction's qubits are all free in this moment.
    pub fn accepts(&self, instruction: &Instruction) -> bool {
        let used = self.qubits();
        instruction.qubits.iter().all(|q| !used.contains(q))
    }

    /// The set of qubits touched by this moment.
    pub fn qubits(&self) -> FxHashSet<QubitId> {
        self.instructions
            .iter()
            .flat_map(|inst| inst.qubits.iter().copied())
            .collect()
    }

    /// Number of operations in this moment.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the moment holds no operations.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Get the instruction at the given position.
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Remove and return the instruction at the given position.
    pub fn remove(&mut self, index: usize) -> IrResult<Instruction> {
        if index >= self.instructions.len() {
            return Err(IrError::InstructionOutOfRange {
                index,
                len: self.instructions.len(),
            });
        }
        Ok(self.instructions.remove(index))
    }

    /// Iterate over the instructions in this moment.
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    /// Remove every instruction matching the predicate, returning them in order.
    pub fn extract_if(&mut self, mut pred: impl FnMut(&Instruction) -> bool) -> Vec<Instruction> {
        let mut extracted = vec![];
        let mut kept = Vec::with_capacity(self.instructions.len());
        for inst in self.instructions.drain(..) {
            if pred(&inst) {
                extracted.push(inst);
            } else {
                kept.push(inst);
            }
        }
        self.instructions = kept;
        extracted
    }

    /// Compute the element-wise inverse of this moment.
    ///
    /// Operations within a moment commute (disjoint qubits), so the
    /// moment inverse is the per-operation inverse with order preserved.
    pub fn inverse(&self) -> IrResult<Moment> {
        let instructions = self
            .instructions
            .iter()
            .map(Instruction::inverse)
            .collect::<IrResult<Vec<_>>>()?;
        Ok(Moment { instructions })
    }
}

impl<'a> IntoIterator for &'a Moment {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;
    use crate::qubit::ClbitId;

    #[test]
    fn test_disjointness_enforced() {
        let mut moment = Moment::new();
        moment
            .push(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        let err = moment.push(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ));
        assert!(matches!(err, Err(IrError::OverlappingQubits { .. })));
    }

    #[test]
    fn test_parallel_gates_allowed() {
        let moment = Moment::with_instructions([
            Instruction::single_qubit_gate(StandardGate::H, QubitId(0)),
            Instruction::single_qubit_gate(StandardGate::X, QubitId(1)),
        ])
        .unwrap();
        assert_eq!(moment.len(), 2);
        assert!(moment.qubits().contains(&QubitId(1)));
    }

    #[test]
    fn test_inverse_elementwise() {
        let moment = Moment::with_instructions([
            Instruction::single_qubit_gate(StandardGate::S, QubitId(0)),
            Instruction::single_qubit_gate(StandardGate::T, QubitId(1)),
        ])
        .unwrap();
        let inv = moment.inverse().unwrap();
        assert_eq!(inv.get(0).unwrap().name(), "sdg");
        assert_eq!(inv.get(1).unwrap().name(), "tdg");
    }

    #[test]
    fn test_inverse_rejects_measurement() {
        let moment =
            Moment::with_instructions([Instruction::measure(QubitId(0), ClbitId(0))]).unwrap();
        assert!(moment.inverse().is_err());
    }

    #[test]
    fn test_extract_if() {
        let mut moment = Moment::with_instructions([
            Instruction::single_qubit_gate(StandardGate::H, QubitId(0)),
            Instruction::measure(QubitId(1), ClbitId(0)),
        ])
        .unwrap();
        let measures = moment.extract_if(Instruction::is_measure);
        assert_eq!(measures.len(), 1);
        assert_eq!(moment.len(), 1);
        assert_eq!(moment.get(0).unwrap().name(), "h");
    }
}
