//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur when building or transforming circuit templates.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A qubit id is outside the template's register.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit template")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: u32,
        /// The template's qubit count.
        num_qubits: u32,
    },

    /// Composition of templates with different register widths.
    #[error("Qubit count mismatch: {left} vs {right}")]
    QubitCountMismatch {
        /// Qubit count of the receiver.
        left: u32,
        /// Qubit count of the argument.
        right: u32,
    },

    /// The template cannot be inverted.
    #[error("Template is not invertible: {0}")]
    NonInvertible(String),

    /// Composition would merge two namespaces sharing a symbol.
    #[error("Parameter symbol `{0}` appears in both composed templates")]
    ParameterClash(String),

    /// Binding values whose length disagrees with the namespace.
    #[error("Binding arity mismatch: template declares {expected} parameters, got {actual} values")]
    BindingArity {
        /// Declared parameter count.
        expected: usize,
        /// Supplied value count.
        actual: usize,
    },

    /// A gate applied to the wrong number of qubits.
    #[error("Gate `{gate}` expects {expected} qubits, got {actual}")]
    GateArity {
        /// Gate name.
        gate: String,
        /// Operand count the gate requires.
        expected: u32,
        /// Operand count supplied.
        actual: usize,
    },

    /// Appending operations after a measurement.
    #[error("Cannot append `{0}` after measurement")]
    OperationAfterMeasure(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
