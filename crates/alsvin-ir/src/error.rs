//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit not found in circuit.
    #[error("Classical bit {clbit} not found in circuit{}", format_gate_context(.gate_name))]
    ClbitNotFound {
        /// The classical bit that was not found.
        clbit: ClbitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in a single operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Two operations in the same moment touch the same qubit.
    #[error("Operation '{gate_name}' overlaps qubit {qubit} already used in this moment")]
    OverlappingQubits {
        /// The qubit claimed by two operations.
        qubit: QubitId,
        /// Name of the operation being added.
        gate_name: String,
    },

    /// Moment index out of range.
    #[error("Moment index {index} out of range for circuit with {len} moments")]
    MomentOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of moments in the circuit.
        len: usize,
    },

    /// Instruction index out of range within a moment.
    #[error("Instruction index {index} out of range for moment with {len} operations")]
    InstructionOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of instructions in the moment.
        len: usize,
    },

    /// Operation has no well-defined inverse.
    #[error("Operation '{0}' has no inverse")]
    NonInvertible(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
