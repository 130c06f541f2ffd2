//! Error types for fidelity estimation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which side of an evaluation pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// The first (left) circuit/value arguments.
    Left,
    /// The second (right) circuit/value arguments.
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Errors raised by the fidelity estimator.
///
/// Shape and count problems are caller-usage faults detected before any
/// submission; sampler faults surface through the job handle. Every error
/// aborts the whole batch — there is no partial success.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FidelityError {
    /// One side supplied no circuit templates at all.
    #[error("No circuits supplied on the {0} side")]
    MissingCircuits(Side),

    /// Neither circuits nor parameter values were supplied.
    #[error("No circuits or parameter values supplied")]
    MissingInput,

    /// Left and right circuit lists differ in length after broadcasting.
    #[error("Circuit list length mismatch: {left} left vs {right} right")]
    SizeMismatch {
        /// Broadcast left list length.
        left: usize,
        /// Broadcast right list length.
        right: usize,
    },

    /// A value batch's row count disagrees with its circuit list length.
    #[error("{side} side has {circuits} circuits but {rows} value rows")]
    ValueBatchMismatch {
        /// Offending side.
        side: Side,
        /// Circuit list length.
        circuits: usize,
        /// Value batch row count.
        rows: usize,
    },

    /// An assignment's length disagrees with its template's parameter count.
    #[error(
        "Item {index}: {side} assignment has {actual} values but the template \
         declares {expected} parameters"
    )]
    ParameterCount {
        /// Index of the offending batch item.
        index: usize,
        /// Offending side.
        side: Side,
        /// The template's declared parameter count.
        expected: usize,
        /// The assignment length supplied.
        actual: usize,
    },

    /// Left and right templates of one pair have different register widths.
    #[error("Qubit count mismatch in circuit pair: {left_qubits} vs {right_qubits}")]
    StructuralMismatch {
        /// Left template qubit count.
        left_qubits: u32,
        /// Right template qubit count.
        right_qubits: u32,
    },

    /// Circuit derivation failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] rimfax_ir::IrError),

    /// The sampling backend failed.
    #[error("Sampler error: {0}")]
    Sampler(#[from] rimfax_hal::SamplerError),

    /// The asynchronous job failed, or is re-resolved after a failure.
    #[error("Fidelity job failed: {0}")]
    JobFailed(String),
}

/// Result type for fidelity operations.
pub type FidelityResult<T> = Result<T, FidelityError>;
