//! Result type for fidelity runs.

use serde::{Deserialize, Serialize};

/// The fidelities of one batched run, index-aligned with the request.
///
/// Values are probabilities in `[0, 1]`; the sequence is immutable once
/// produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFidelityResult {
    fidelities: Vec<f64>,
}

impl StateFidelityResult {
    /// Wrap a sequence of fidelity values.
    pub(crate) fn new(fidelities: Vec<f64>) -> Self {
        Self { fidelities }
    }

    /// The fidelity values, in request order.
    pub fn fidelities(&self) -> &[f64] {
        &self.fidelities
    }

    /// Number of evaluated pairs.
    pub fn len(&self) -> usize {
        self.fidelities.len()
    }

    /// Whether the run contained no pairs.
    pub fn is_empty(&self) -> bool {
        self.fidelities.is_empty()
    }
}
