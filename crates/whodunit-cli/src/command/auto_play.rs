use std::{collections::BTreeSet, path::PathBuf};

use anyhow::Context as _;
use serde::Serialize;
use whodunit_engine::{
    CaseSeed, EngineError, GameConfig, GameSession, GuessOutcome, Suspect, SuspectMap, Weapon,
};

use super::GameConfigArg;
use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    #[clap(flatten)]
    game: GameConfigArg,
    /// Number of cases to play
    #[arg(long, default_value_t = 100)]
    games: u64,
    /// Seed of the first case; case `i` uses `seed + i`
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Maximum number of alibis to verify per case
    #[arg(long)]
    verify_limit: Option<usize>,
    /// Output file path for the JSON summary
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        game,
        games,
        seed,
        verify_limit,
        output,
    } = arg;

    let config = game.resolve()?;
    let detective = Detective {
        verify_limit: verify_limit.unwrap_or(Suspect::LEN),
    };

    let mut summary = Summary::default();
    for i in 0..*games {
        let seed = CaseSeed::from(seed.wrapping_add(i));
        let record = detective
            .investigate(&config, seed)
            .with_context(|| format!("Case {seed} failed"))?;
        tracing::debug!(%seed, ?record, "case closed");
        summary.record(&record);
    }
    summary.finish();

    eprintln!(
        "Solved {}/{} cases ({:.1}%)",
        summary.solved,
        summary.games,
        summary.solve_rate * 100.0
    );
    util::save_json(&summary, output.as_deref())?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CaseRecord {
    solved: bool,
    guesses: u8,
    verified: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
struct Summary {
    games: u64,
    solved: u64,
    exhausted: u64,
    first_guess_hits: u64,
    solve_rate: f64,
    mean_guesses_to_solve: f64,
    mean_alibis_verified: f64,
    #[serde(skip)]
    total_guesses: u64,
    #[serde(skip)]
    total_verified: u64,
}

impl Summary {
    fn record(&mut self, record: &CaseRecord) {
        self.games += 1;
        self.total_verified += record.verified as u64;
        if record.solved {
            self.solved += 1;
            self.total_guesses += u64::from(record.guesses);
            if record.guesses == 1 {
                self.first_guess_hits += 1;
            }
        } else {
            self.exhausted += 1;
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn finish(&mut self) {
        if self.games > 0 {
            self.solve_rate = self.solved as f64 / self.games as f64;
            self.mean_alibis_verified = self.total_verified as f64 / self.games as f64;
        }
        if self.solved > 0 {
            self.mean_guesses_to_solve = self.total_guesses as f64 / self.solved as f64;
        }
    }
}

/// Plays a case by following the engine's own hints.
///
/// Verification follows the most-mentioned suggestion, the weapon is read
/// off the forensic clue, and accusations go to the most probable suspect
/// not yet accused.
#[derive(Debug, Clone, Copy)]
struct Detective {
    verify_limit: usize,
}

impl Detective {
    fn investigate(self, config: &GameConfig, seed: CaseSeed) -> Result<CaseRecord, EngineError> {
        let mut session = GameSession::with_seed(config.clone(), seed)?;
        session.interview()?;
        session.publish_alibis()?;

        let mut next = most_likely(&session.beliefs().snapshot(), &BTreeSet::new());
        while let Some(suspect) = next
            && session.checked_suspects().len() < self.verify_limit
        {
            next = session.verify_alibi(suspect)?.suggestion;
        }
        let verified = session.checked_suspects().len();

        let deduction = session.final_deduction()?;
        let weapon = Weapon::ALL
            .into_iter()
            .find(|weapon| weapon.clue() == deduction.weapon_clue)
            .unwrap_or(Weapon::ALL[0]);

        let mut accused = BTreeSet::new();
        let mut suspect = deduction
            .top_suspects
            .first()
            .map_or(Suspect::ALL[0], |ranked| ranked.suspect);
        loop {
            accused.insert(suspect);
            let guesses = u8::try_from(accused.len()).unwrap_or(u8::MAX);
            match session.guess(suspect, weapon)? {
                GuessOutcome::Solved { .. } => {
                    return Ok(CaseRecord {
                        solved: true,
                        guesses,
                        verified,
                    });
                }
                GuessOutcome::Exhausted { .. } => {
                    return Ok(CaseRecord {
                        solved: false,
                        guesses,
                        verified,
                    });
                }
                GuessOutcome::Incorrect { beliefs, .. } => {
                    let Some(next) = most_likely(&beliefs, &accused) else {
                        return Ok(CaseRecord {
                            solved: false,
                            guesses,
                            verified,
                        });
                    };
                    suspect = next;
                }
            }
        }
    }
}

/// Highest-probability suspect outside `excluded`; roster order breaks ties.
fn most_likely(beliefs: &SuspectMap<f64>, excluded: &BTreeSet<Suspect>) -> Option<Suspect> {
    beliefs
        .iter()
        .filter(|(suspect, _)| !excluded.contains(suspect))
        .fold(None, |best: Option<(Suspect, f64)>, (suspect, &p)| match best {
            Some((_, best_p)) if best_p >= p => best,
            _ => Some((suspect, p)),
        })
        .map(|(suspect, _)| suspect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_likely_skips_excluded_and_prefers_roster_order() {
        let beliefs = SuspectMap::from_fn(|suspect| if suspect.index() < 2 { 0.4 } else { 0.05 });
        let first = Suspect::ALL[0];
        assert_eq!(most_likely(&beliefs, &BTreeSet::new()), Some(first));
        assert_eq!(
            most_likely(&beliefs, &BTreeSet::from([first])),
            Some(Suspect::ALL[1])
        );
        let everyone = Suspect::ALL.into_iter().collect();
        assert_eq!(most_likely(&beliefs, &everyone), None);
    }

    #[test]
    fn detective_closes_every_case() {
        let detective = Detective {
            verify_limit: Suspect::LEN,
        };
        let config = GameConfig::default();
        let mut summary = Summary::default();
        for seed in 0..50 {
            let record = detective
                .investigate(&config, CaseSeed::from(seed))
                .unwrap();
            assert!((1..=config.tries).contains(&record.guesses));
            assert!(record.verified <= Suspect::LEN);
            summary.record(&record);
        }
        summary.finish();
        assert_eq!(summary.games, 50);
        assert_eq!(summary.solved + summary.exhausted, 50);
        assert!((0.0..=1.0).contains(&summary.solve_rate));
    }

    #[test]
    fn verify_limit_caps_verification() {
        let detective = Detective { verify_limit: 1 };
        let record = detective
            .investigate(&GameConfig::default(), CaseSeed::from(9))
            .unwrap();
        assert!(record.verified <= 1);
    }

    #[test]
    fn summary_reports_rates() {
        let mut summary = Summary::default();
        for (solved, guesses) in [(true, 1), (true, 3), (false, 3), (true, 2)] {
            summary.record(&CaseRecord {
                solved,
                guesses,
                verified: 2,
            });
        }
        summary.finish();
        assert_eq!(summary.first_guess_hits, 1);
        assert!((summary.solve_rate - 0.75).abs() < 1e-9);
        assert!((summary.mean_guesses_to_solve - 2.0).abs() < 1e-9);
        assert!((summary.mean_alibis_verified - 2.0).abs() < 1e-9);
    }
}
