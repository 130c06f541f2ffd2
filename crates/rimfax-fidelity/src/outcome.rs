//! Outcome normalization: distribution → fidelity value.

use rimfax_hal::OutcomeDistribution;

/// The empirical probability of the all-zero outcome, clipped into `[0, 1]`.
///
/// Under the compute-uncompute construction this probability *is* the
/// fidelity. An absent all-zero key reads as 0.0 by policy — it means the
/// outcome was never observed, not that anything failed. Finite-shot
/// statistics or backend rounding can push raw estimates slightly outside
/// the valid range; such values are clamped, never rejected.
pub fn zero_outcome_probability(dist: &OutcomeDistribution) -> f64 {
    dist.probability(0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_zero() {
        let dist = OutcomeDistribution::new(2);
        assert_eq!(zero_outcome_probability(&dist), 0.0);
    }

    #[test]
    fn test_reads_all_zero_outcome() {
        let dist = OutcomeDistribution::from_probabilities(2, [(0, 0.25), (3, 0.75)]);
        assert_eq!(zero_outcome_probability(&dist), 0.25);
    }

    #[test]
    fn test_clips_above_one() {
        let dist = OutcomeDistribution::from_probabilities(1, [(0, 1.0 + 1e-9)]);
        assert_eq!(zero_outcome_probability(&dist), 1.0);
    }

    #[test]
    fn test_clips_below_zero() {
        let dist = OutcomeDistribution::from_probabilities(1, [(0, -1e-17)]);
        assert_eq!(zero_outcome_probability(&dist), 0.0);
    }
}
