//! High-level circuit builder API over an ordered moment sequence.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::moment::Moment;
use crate::parameter::ParameterExpression;
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit as an ordered sequence of moments.
///
/// Each moment holds operations on pairwise disjoint qubits. The builder
/// methods place operations with an earliest-available policy: a new
/// operation lands in the first moment after the last moment that touches
/// any of its qubits. Transformation code can instead insert explicitly
/// created moments at arbitrary indices via [`Circuit::insert_moment`] and
/// [`Circuit::insert_new_moments`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Number of classical bits.
    num_clbits: u32,
    /// The ordered moment sequence.
    moments: Vec<Moment>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_qubits: 0,
            num_clbits: 0,
            moments: vec![],
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            moments: vec![],
        }
    }

    // =========================================================================
    // Instruction placement
    // =========================================================================

    /// Append an instruction with earliest-available placement.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<()> {
        self.validate(&instruction)?;

        let last_conflict = self.moments.iter().rposition(|m| !m.accepts(&instruction));
        let target = last_conflict.map_or(0, |k| k + 1);
        if target == self.moments.len() {
            self.moments.push(Moment::new());
        }
        self.moments[target].push(instruction)
    }

    /// Insert a prebuilt moment at the given index.
    pub fn insert_moment(&mut self, index: usize, moment: Moment) -> IrResult<()> {
        if index > self.moments.len() {
            return Err(IrError::MomentOutOfRange {
                index,
                len: self.moments.len(),
            });
        }
        self.moments.insert(index, moment);
        Ok(())
    }

    /// Insert instructions at the given index, one fresh moment each.
    ///
    /// This is the insertion policy gate folding relies on: the inserted
    /// operations are never merged into existing moments, so inserting k
    /// instructions grows the circuit by exactly k moments.
    pub fn insert_new_moments(
        &mut self,
        index: usize,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<()> {
        if index > self.moments.len() {
            return Err(IrError::MomentOutOfRange {
                index,
                len: self.moments.len(),
            });
        }
        for (offset, instruction) in instructions.into_iter().enumerate() {
            self.validate(&instruction)?;
            let moment = Moment::with_instructions([instruction])?;
            self.moments.insert(index + offset, moment);
        }
        Ok(())
    }

    /// Get a mutable reference to the moment at the given index.
    pub fn moment_mut(&mut self, index: usize) -> IrResult<&mut Moment> {
        let len = self.moments.len();
        self.moments
            .get_mut(index)
            .ok_or(IrError::MomentOutOfRange { index, len })
    }

    /// Drop empty moments at the end of the circuit.
    pub fn prune_trailing_empty_moments(&mut self) {
        while self.moments.last().is_some_and(Moment::is_empty) {
            self.moments.pop();
        }
    }

    /// Append all moments of another circuit after this circuit's moments.
    pub fn append(&mut self, other: &Circuit) {
        self.num_qubits = self.num_qubits.max(other.num_qubits);
        self.num_clbits = self.num_clbits.max(other.num_clbits);
        self.moments.extend(other.moments.iter().cloned());
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = match &instruction.kind {
            InstructionKind::Gate(gate) => Some(gate.name().to_string()),
            InstructionKind::Measure => None,
        };

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits();
            let got = u32::try_from(instruction.qubits.len()).unwrap_or(u32::MAX);
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected,
                    got,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }
        for &clbit in &instruction.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let mut seen = rustc_hash::FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        Ok(())
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::H, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::X, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Y, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Z, qubit))?;
        Ok(self)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::S, qubit))?;
        Ok(self)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Sdg, qubit))?;
        Ok(self)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::T, qubit))?;
        Ok(self)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Tdg, qubit))?;
        Ok(self)
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(
            StandardGate::Rx(theta.into()),
            qubit,
        ))?;
        Ok(self)
    }

    /// Apply Ry rotation gate.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(
            StandardGate::Ry(theta.into()),
            qubit,
        ))?;
        Ok(self)
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(
            StandardGate::Rz(theta.into()),
            qubit,
        ))?;
        Ok(self)
    }

    /// Apply phase gate.
    pub fn p(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(
            StandardGate::P(theta.into()),
            qubit,
        ))?;
        Ok(self)
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(StandardGate::CX, control, target))?;
        Ok(self)
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(StandardGate::CY, control, target))?;
        Ok(self)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(StandardGate::CZ, control, target))?;
        Ok(self)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))?;
        Ok(self)
    }

    /// Apply controlled-phase gate.
    pub fn cp(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(
            StandardGate::CP(theta.into()),
            control,
            target,
        ))?;
        Ok(self)
    }

    /// Apply controlled-Rz gate.
    pub fn crz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(
            StandardGate::CRz(theta.into()),
            control,
            target,
        ))?;
        Ok(self)
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply a custom gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))?;
        Ok(self)
    }

    /// Measure all qubits to corresponding classical bits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        if self.num_clbits < self.num_qubits {
            self.num_clbits = self.num_qubits;
        }
        for i in 0..self.num_qubits {
            self.push(Instruction::measure(QubitId(i), ClbitId(i)))?;
        }
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Get the moments of this circuit.
    pub fn moments(&self) -> &[Moment] {
        &self.moments
    }

    /// Get the moment at the given index.
    pub fn moment(&self, index: usize) -> IrResult<&Moment> {
        self.moments.get(index).ok_or(IrError::MomentOutOfRange {
            index,
            len: self.moments.len(),
        })
    }

    /// Number of moments, including empty ones.
    pub fn num_moments(&self) -> usize {
        self.moments.len()
    }

    /// Total number of operations (gates and measurements).
    pub fn num_ops(&self) -> usize {
        self.moments.iter().map(Moment::len).sum()
    }

    /// Number of gate operations, excluding measurements.
    pub fn num_gates(&self) -> usize {
        self.moments
            .iter()
            .flat_map(Moment::iter)
            .filter(|inst| inst.is_gate())
            .count()
    }

    /// Circuit depth: the number of non-empty moments.
    pub fn depth(&self) -> usize {
        self.moments.iter().filter(|m| !m.is_empty()).count()
    }

    /// Iterate over all instructions in moment order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.moments.iter().flat_map(Moment::iter)
    }

    /// Check that every measurement is terminal.
    ///
    /// A measurement is terminal if no operation in any later moment acts
    /// on any of its qubits.
    pub fn all_measurements_terminal(&self) -> bool {
        for (index, moment) in self.moments.iter().enumerate() {
            for inst in moment.iter().filter(|inst| inst.is_measure()) {
                for later in &self.moments[index + 1..] {
                    let used = later.qubits();
                    if inst.qubits.iter().any(|q| used.contains(q)) {
                        return false;
                    }
                }
            }
        }
        true
    }

    // =========================================================================
    // Whole-circuit transformations
    // =========================================================================

    /// A copy of this circuit with the moment order reversed.
    #[must_use]
    pub fn reversed(&self) -> Circuit {
        Circuit {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            moments: self.moments.iter().rev().cloned().collect(),
        }
    }

    /// The inverse circuit: reversed moment order, each moment inverted.
    ///
    /// Fails if the circuit contains a non-invertible operation (a
    /// measurement or a matrix-less custom gate).
    pub fn inverse(&self) -> IrResult<Circuit> {
        let moments = self
            .moments
            .iter()
            .rev()
            .map(Moment::inverse)
            .collect::<IrResult<Vec<_>>>()?;
        Ok(Circuit {
            name: format!("{}_inv", self.name),
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            moments,
        })
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        circuit
            .h(QubitId(0))?
            .cx(QubitId(0), QubitId(1))?
            .measure(QubitId(0), ClbitId(0))?
            .measure(QubitId(1), ClbitId(1))?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit (without measurements).
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new("ghz_0"));
        }
        let mut circuit = Self::with_size("ghz", n, 0);
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        Ok(circuit)
    }
}

/// Circuits compare by structure: qubit/clbit counts and moment sequence.
/// The name is metadata and does not participate.
impl PartialEq for Circuit {
    fn eq(&self, other: &Self) -> bool {
        self.num_qubits == other.num_qubits
            && self.num_clbits == other.num_clbits
            && self.moments == other.moments
    }
}
