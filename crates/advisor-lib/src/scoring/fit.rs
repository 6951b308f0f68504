//! Non-linear capacity fit curves

use crate::models::PriorityWeights;

/// Lowest fit score; extreme overkill never drives a score to zero
pub const MIN_FIT: f64 = 0.2;

/// Highest fit score; surplus capacity earns at most a 1.5x bonus
pub const MAX_FIT: f64 = 1.5;

const REWARD_LOG_DIVISOR: f64 = 5.0;
const PENALTY_LOG_DIVISOR: f64 = 10.0;

/// Whether surplus capacity is rewarded or gently penalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitRegime {
    /// Performance priority: more capacity is better, with diminishing returns
    RewardSurplus,
    /// Cost or balanced priority: surplus is waste
    PenalizeSurplus,
}

impl FitRegime {
    pub fn for_weights(weights: &PriorityWeights) -> Self {
        if weights.perf > 1.0 {
            FitRegime::RewardSurplus
        } else {
            FitRegime::PenalizeSurplus
        }
    }
}

/// Ratio of offered capacity to the required minimum.
///
/// A zero minimum is treated as one unit.
pub fn overkill_ratio(capacity: f64, minimum: u32) -> f64 {
    capacity / f64::from(minimum.max(1))
}

/// Fit score for an overkill ratio, always within `[MIN_FIT, MAX_FIT]`.
///
/// For ratios >= 1 (every capacity-qualified candidate) only the regime's
/// own bound can apply: the reward curve never drops below 1 and the
/// penalty curve never rises above 1.
pub fn fit_score(ratio: f64, regime: FitRegime) -> f64 {
    let raw = match regime {
        FitRegime::RewardSurplus => (1.0 + ratio.ln() / REWARD_LOG_DIVISOR).min(MAX_FIT),
        FitRegime::PenalizeSurplus => (1.0 - ratio.ln() / PENALTY_LOG_DIVISOR).max(MIN_FIT),
    };
    raw.clamp(MIN_FIT, MAX_FIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fit_scores_one() {
        assert_eq!(fit_score(1.0, FitRegime::RewardSurplus), 1.0);
        assert_eq!(fit_score(1.0, FitRegime::PenalizeSurplus), 1.0);
    }

    #[test]
    fn test_penalty_curve_values() {
        // 2x overkill ~0.93, 4x ~0.86
        let two = fit_score(2.0, FitRegime::PenalizeSurplus);
        assert!((two - (1.0 - 2f64.ln() / 10.0)).abs() < 1e-12);
        let four = fit_score(4.0, FitRegime::PenalizeSurplus);
        assert!(four < two);
    }

    #[test]
    fn test_reward_curve_caps() {
        let huge = fit_score(1_000.0, FitRegime::RewardSurplus);
        assert_eq!(huge, MAX_FIT);
        let two = fit_score(2.0, FitRegime::RewardSurplus);
        assert!((two - (1.0 + 2f64.ln() / 5.0)).abs() < 1e-12);
    }

    #[test]
    fn test_penalty_curve_floors() {
        assert_eq!(fit_score(1e9, FitRegime::PenalizeSurplus), MIN_FIT);
    }

    #[test]
    fn test_regime_from_weights() {
        let perf = PriorityWeights { cost: 0.5, perf: 1.8 };
        let balanced = PriorityWeights { cost: 1.0, perf: 1.0 };
        assert_eq!(FitRegime::for_weights(&perf), FitRegime::RewardSurplus);
        assert_eq!(FitRegime::for_weights(&balanced), FitRegime::PenalizeSurplus);
    }

    #[test]
    fn test_zero_minimum_guarded() {
        assert_eq!(overkill_ratio(4.0, 0), 4.0);
        assert_eq!(overkill_ratio(4.0, 2), 2.0);
    }
}
