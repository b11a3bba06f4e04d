use crate::{BeliefModel, Suspect, SuspectMap};

const CORRECT_REWARD: f64 = 0.2;
const BASE_PENALTY: f64 = 0.05;
const PENALTY_PER_LIE: f64 = 0.02;
const MAX_PENALTY: f64 = 0.2;

/// Temporal-difference style smoothing applied to verified statements.
///
/// Each reward overwrites the suspect's belief with the smoothed value, so
/// it acts as a reset before the posterior update that follows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReinforcementAdjuster {
    pub learning_rate: f64,
    pub discount: f64,
}

impl Default for ReinforcementAdjuster {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.9,
        }
    }
}

impl ReinforcementAdjuster {
    /// Reward for one verified statement by `lie_count`-times liar.
    #[must_use]
    pub fn reward(correct: bool, lie_count: u32) -> f64 {
        if correct {
            CORRECT_REWARD
        } else {
            -(BASE_PENALTY + f64::from(lie_count) * PENALTY_PER_LIE).min(MAX_PENALTY)
        }
    }

    /// Expected future value of scrutinizing `suspect` further.
    #[must_use]
    pub fn future_value(suspect: Suspect, lie_count: u32) -> f64 {
        let base = if suspect.profile().lie_probability > 0.5 {
            0.5
        } else {
            0.2
        };
        if lie_count > 1 { base + 0.3 } else { base }
    }

    /// Smooths `suspect`'s value towards the reward and writes it back as both
    /// the reinforcement value and the belief. Returns the new value.
    pub fn apply_reward(
        &self,
        beliefs: &mut BeliefModel,
        suspect: Suspect,
        correct: bool,
        lie_counter: &SuspectMap<u32>,
    ) -> f64 {
        let lie_count = lie_counter[suspect];
        let belief = beliefs.belief(suspect);
        let current = belief
            .reinforcement_value()
            .unwrap_or(belief.probability());
        let target =
            Self::reward(correct, lie_count) + self.discount * Self::future_value(suspect, lie_count);
        let updated = (current + self.learning_rate * (target - current)).clamp(0.0, 1.0);
        beliefs.set_reinforced(suspect, updated);
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn penalty_grows_with_lies_and_saturates() {
        assert!(approx_eq(ReinforcementAdjuster::reward(true, 9), 0.2));
        assert!(approx_eq(ReinforcementAdjuster::reward(false, 0), -0.05));
        assert!(approx_eq(ReinforcementAdjuster::reward(false, 1), -0.07));
        assert!(approx_eq(ReinforcementAdjuster::reward(false, 10), -0.2));
    }

    #[test]
    fn future_value_depends_on_propensity_and_history() {
        // nobody in the case file lies more than half the time
        assert!(approx_eq(
            ReinforcementAdjuster::future_value(Suspect::ZehabRose, 0),
            0.2
        ));
        assert!(approx_eq(
            ReinforcementAdjuster::future_value(Suspect::ZehabRose, 2),
            0.5
        ));
        assert!(approx_eq(
            ReinforcementAdjuster::future_value(Suspect::ChrisBlaine, 1),
            0.2
        ));
    }

    #[test]
    fn first_reward_starts_from_belief() {
        let adjuster = ReinforcementAdjuster::default();
        let mut beliefs = BeliefModel::from_priors();
        let mut lies = SuspectMap::<u32>::default();
        lies[Suspect::KateIvory] = 1;

        let updated = adjuster.apply_reward(&mut beliefs, Suspect::KateIvory, false, &lies);
        // 0.2 + 0.1 * (-0.07 + 0.9 * 0.2 - 0.2)
        let expected = 0.2 + 0.1 * (-0.07 + 0.18 - 0.2);
        assert!(approx_eq(updated, expected));
        assert!(approx_eq(beliefs.probability(Suspect::KateIvory), expected));
        assert_eq!(
            beliefs.belief(Suspect::KateIvory).reinforcement_value(),
            Some(updated)
        );
    }

    #[test]
    fn later_rewards_start_from_tracked_value() {
        let adjuster = ReinforcementAdjuster::default();
        let mut beliefs = BeliefModel::from_priors();
        let lies = SuspectMap::<u32>::default();

        let first = adjuster.apply_reward(&mut beliefs, Suspect::JasonBlue, true, &lies);
        beliefs.set_probability(Suspect::JasonBlue, 0.9);
        let second = adjuster.apply_reward(&mut beliefs, Suspect::JasonBlue, true, &lies);
        let expected = first + 0.1 * (0.2 + 0.18 - first);
        assert!(approx_eq(second, expected));
    }
}
