//! Outcome-frequency distributions.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// An empirical distribution over measurement outcomes.
///
/// Outcomes are indexed as integers with bit `i` holding qubit `i`, so the
/// all-zero bitstring is outcome `0`. Probabilities are non-negative and sum
/// to 1 within sampling tolerance; outcomes absent from the map have
/// probability 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDistribution {
    /// Probability per observed outcome.
    probabilities: FxHashMap<u64, f64>,
    /// Width of the measured register.
    num_qubits: u32,
}

impl OutcomeDistribution {
    /// Create an empty distribution over `num_qubits` qubits.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            probabilities: FxHashMap::default(),
            num_qubits,
        }
    }

    /// Build a distribution from `(outcome, probability)` pairs.
    pub fn from_probabilities(
        num_qubits: u32,
        entries: impl IntoIterator<Item = (u64, f64)>,
    ) -> Self {
        Self {
            probabilities: entries.into_iter().collect(),
            num_qubits,
        }
    }

    /// Build an empirical distribution from shot counts.
    pub fn from_counts(num_qubits: u32, counts: &FxHashMap<u64, u64>, shots: u64) -> Self {
        let probabilities = counts
            .iter()
            .map(|(&outcome, &n)| (outcome, n as f64 / shots as f64))
            .collect();
        Self {
            probabilities,
            num_qubits,
        }
    }

    /// Set the probability of an outcome.
    pub fn set(&mut self, outcome: u64, probability: f64) {
        self.probabilities.insert(outcome, probability);
    }

    /// The probability of `outcome`, 0.0 when unobserved.
    pub fn probability(&self, outcome: u64) -> f64 {
        self.probabilities.get(&outcome).copied().unwrap_or(0.0)
    }

    /// Width of the measured register.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of outcomes with recorded probability.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Whether no outcome has been recorded.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Iterate over `(outcome, probability)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.probabilities.iter().map(|(&k, &v)| (k, v))
    }

    /// The most probable outcome, if any.
    pub fn most_probable(&self) -> Option<(u64, f64)> {
        self.probabilities
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&k, &v)| (k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_outcome_reads_zero() {
        let dist = OutcomeDistribution::new(2);
        assert_eq!(dist.probability(0), 0.0);
        assert!(dist.is_empty());
    }

    #[test]
    fn test_from_counts() {
        let mut counts = FxHashMap::default();
        counts.insert(0u64, 750u64);
        counts.insert(3u64, 250u64);
        let dist = OutcomeDistribution::from_counts(2, &counts, 1000);

        assert_eq!(dist.probability(0), 0.75);
        assert_eq!(dist.probability(3), 0.25);
        assert_eq!(dist.probability(1), 0.0);
        assert_eq!(dist.len(), 2);
    }

    #[test]
    fn test_most_probable() {
        let dist = OutcomeDistribution::from_probabilities(2, [(0, 0.1), (2, 0.9)]);
        assert_eq!(dist.most_probable(), Some((2, 0.9)));
    }
}
