//! Heuristic guilt scores.
//!
//! The update is Bayesian in shape only: a multiplicative likelihood, additive
//! clue boosts, then division by an aggregate denominator. The result is a
//! bounded score, not a calibrated posterior, and callers normalize before
//! displaying or comparing across rounds.

use serde::Serialize;

use crate::{Clue, Suspect, SuspectMap, Weapon};

/// Denominators at or below this value leave the prior untouched.
pub const POSTERIOR_EPSILON: f64 = 1e-10;

const MATCHED_CLUE_BOOST: f64 = 0.05;
const KILLER_CLUE_BOOST: f64 = 0.10;
const WEAPON_CLUE_BOOST: f64 = 0.05;
const KNOWN_LIAR_BOOST: f64 = 0.10;

/// Observations fed into a posterior update.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evidence<'a> {
    /// Observed evidence; each one matching the suspect's clues adds a boost.
    pub clues: &'a [Clue],
    /// A clue known to come from the real killer (revealed after a miss).
    pub killer_clue: Option<Clue>,
    /// A clue known to come from the murder weapon.
    pub weapon_clue: Option<Clue>,
}

impl<'a> Evidence<'a> {
    #[must_use]
    pub fn clues(clues: &'a [Clue]) -> Self {
        Self {
            clues,
            ..Self::default()
        }
    }
}

/// Current estimate for one suspect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SuspectBelief {
    probability: f64,
    reinforcement_value: Option<f64>,
}

impl SuspectBelief {
    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }

    /// The smoothed reward value, once the suspect has received a reward.
    #[must_use]
    pub const fn reinforcement_value(&self) -> Option<f64> {
        self.reinforcement_value
    }
}

/// Per-suspect guilt scores for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefModel {
    beliefs: SuspectMap<SuspectBelief>,
}

impl BeliefModel {
    /// Starts every suspect at its case-file prior.
    #[must_use]
    pub fn from_priors() -> Self {
        Self::from_fn(|suspect| suspect.profile().prior)
    }

    pub fn from_fn<F>(mut prior: F) -> Self
    where
        F: FnMut(Suspect) -> f64,
    {
        Self {
            beliefs: SuspectMap::from_fn(|suspect| SuspectBelief {
                probability: prior(suspect).clamp(0.0, 1.0),
                reinforcement_value: None,
            }),
        }
    }

    /// How much weight a suspect's own statements carry.
    ///
    /// Habitual liars (propensity above one half) are treated as no better
    /// than chance.
    #[must_use]
    pub fn likelihood(lie_probability: f64) -> f64 {
        if lie_probability <= 0.5 {
            1.0 - lie_probability
        } else {
            0.5
        }
    }

    #[must_use]
    pub fn probability(&self, suspect: Suspect) -> f64 {
        self.beliefs[suspect].probability
    }

    #[must_use]
    pub fn belief(&self, suspect: Suspect) -> &SuspectBelief {
        &self.beliefs[suspect]
    }

    pub fn set_probability(&mut self, suspect: Suspect, probability: f64) {
        self.beliefs[suspect].probability = probability.clamp(0.0, 1.0);
    }

    /// Overwrites both the reinforcement value and the probability.
    pub fn set_reinforced(&mut self, suspect: Suspect, value: f64) {
        let value = value.clamp(0.0, 1.0);
        let belief = &mut self.beliefs[suspect];
        belief.reinforcement_value = Some(value);
        belief.probability = value;
    }

    /// Sum of `probability × likelihood` over the whole roster.
    fn weighted_total(&self) -> f64 {
        self.beliefs
            .iter()
            .map(|(suspect, belief)| {
                belief.probability * Self::likelihood(suspect.profile().lie_probability)
            })
            .sum()
    }

    /// Computes the updated score for `suspect` without storing it.
    ///
    /// `murder_weapon` decides whether `evidence.weapon_clue` is genuine;
    /// `known_liar` adds the caught-lying boost.
    #[must_use]
    pub fn posterior(
        &self,
        suspect: Suspect,
        evidence: &Evidence<'_>,
        murder_weapon: Weapon,
        known_liar: bool,
    ) -> f64 {
        let profile = suspect.profile();
        let prior = self.probability(suspect);
        let likelihood = Self::likelihood(profile.lie_probability);
        let own_clues = profile.clues();

        let matched = evidence
            .clues
            .iter()
            .filter(|clue| own_clues.contains(clue))
            .count();
        #[expect(clippy::cast_precision_loss)]
        let mut boost = MATCHED_CLUE_BOOST * matched as f64;
        if evidence
            .killer_clue
            .is_some_and(|clue| own_clues.contains(&clue))
        {
            boost += KILLER_CLUE_BOOST;
        }
        if evidence.weapon_clue == Some(murder_weapon.clue()) {
            boost += WEAPON_CLUE_BOOST;
        }
        if known_liar {
            boost += KNOWN_LIAR_BOOST;
        }

        let total = self.weighted_total();
        if total <= POSTERIOR_EPSILON {
            return prior;
        }
        ((prior * likelihood + boost) / total).clamp(0.0, 1.0)
    }

    /// Computes and stores the updated score for `suspect`, returning it.
    pub fn update_posterior(
        &mut self,
        suspect: Suspect,
        evidence: &Evidence<'_>,
        murder_weapon: Weapon,
        known_liar: bool,
    ) -> f64 {
        let posterior = self.posterior(suspect, evidence, murder_weapon, known_liar);
        self.beliefs[suspect].probability = posterior;
        posterior
    }

    /// Rescales all probabilities to sum to one. No-op when the sum is not
    /// positive.
    pub fn normalize(&mut self) {
        let total = self.total();
        if total <= 0.0 {
            return;
        }
        for belief in self.beliefs.values_mut() {
            belief.probability /= total;
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.beliefs.values().map(|b| b.probability).sum()
    }

    /// Current probabilities keyed by suspect.
    #[must_use]
    pub fn snapshot(&self) -> SuspectMap<f64> {
        self.beliefs.map(|_, belief| belief.probability)
    }
}

impl Default for BeliefModel {
    fn default() -> Self {
        Self::from_priors()
    }
}
