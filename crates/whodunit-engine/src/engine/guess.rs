use rand::{Rng, seq::IndexedRandom as _};
use serde::Serialize;

use crate::{BeliefModel, Clue, Evidence, StatedAlibis, Suspect, SuspectMap, Weapon};

/// The hidden truth of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[display("{killer} with the {weapon}")]
pub struct Solution {
    pub killer: Suspect,
    pub weapon: Weapon,
}

/// Result of a single killer+weapon guess.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuessOutcome {
    /// Both killer and weapon matched. The case is closed.
    Solved {
        solution: Solution,
        tries_remaining: u8,
        incorrect_guesses: u8,
        elapsed_secs: u64,
    },
    /// Wrong, with tries left. Carries fresh evidence about the truth.
    Incorrect {
        tries_remaining: u8,
        killer_clue: Option<Clue>,
        weapon_clue: Clue,
        beliefs: SuspectMap<f64>,
    },
    /// Wrong, and that was the last try.
    Exhausted { solution: Solution },
}

/// What a miss revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissEvidence {
    pub killer_clue: Option<Clue>,
    pub weapon_clue: Clue,
}

/// Judges guesses and folds the evidence revealed by a miss into the beliefs.
#[derive(Debug, Clone, Copy)]
pub struct GuessEvaluator {
    pub update_beliefs: bool,
}

impl GuessEvaluator {
    #[must_use]
    pub fn is_correct(guess: Solution, truth: Solution) -> bool {
        guess == truth
    }

    /// Reveals one random clue of the real killer plus the weapon clue.
    ///
    /// When belief updates are enabled the wrongly accused suspect is cleared
    /// and everyone else is rescored, in roster order and in place, with
    /// their own clues plus the revealed ones. Beliefs are normalized after.
    pub fn apply_miss<R>(
        &self,
        guessed: Suspect,
        truth: Solution,
        beliefs: &mut BeliefModel,
        stated: &StatedAlibis,
        rng: &mut R,
    ) -> MissEvidence
    where
        R: Rng + ?Sized,
    {
        let killer_clue = truth.killer.profile().clues().choose(rng).copied();
        let weapon_clue = truth.weapon.clue();

        if self.update_beliefs {
            beliefs.set_probability(guessed, 0.0);
            for suspect in guessed.others() {
                let own_clues = suspect.profile().clues();
                let evidence = Evidence {
                    clues: &own_clues,
                    killer_clue,
                    weapon_clue: Some(weapon_clue),
                };
                beliefs.update_posterior(suspect, &evidence, truth.weapon, stated.is_liar(suspect));
            }
            beliefs.normalize();
        }

        MissEvidence {
            killer_clue,
            weapon_clue,
        }
    }
}
