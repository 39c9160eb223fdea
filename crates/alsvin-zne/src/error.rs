//! Error types for the folding crate.

use alsvin_ir::IrError;
use thiserror::Error;

/// Errors that can occur while folding a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FoldError {
    /// The circuit contains a measurement followed by later operations on
    /// the same qubit, so gate folding cannot preserve its semantics.
    #[error("circuit contains intermediate measurements and cannot be folded")]
    IntermediateMeasurement,

    /// Local folding requires a stretch factor in [1, 3].
    #[error("stretch factor {0} is outside the interval [1, 3]")]
    StretchOutOfBounds(f64),

    /// Composed and global folding require a stretch factor of at least 1.
    #[error("stretch factor {0} is below 1")]
    StretchBelowOne(f64),

    /// An explicit gate selection paired moment indices with a gate index
    /// list of a different length.
    #[error("selection names {moments} moments but {gate_lists} gate index lists")]
    SelectionMismatch { moments: usize, gate_lists: usize },

    /// A fold targeted a moment the folder's index map does not track.
    ///
    /// This signals a bookkeeping defect inside the folding engine, not a
    /// caller error.
    #[error("moment index {0} is not tracked by the folder")]
    UntrackedMoment(usize),

    /// An underlying IR operation failed.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for folding operations.
pub type FoldResult<T> = Result<T, FoldError>;
