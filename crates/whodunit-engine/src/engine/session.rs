use std::{
    collections::BTreeSet,
    str::FromStr,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use rand::Rng as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    AlibiClaims, AlibiVerification, BeliefModel, CaseRng, CaseSeed, Clue, ConsistencyChecker,
    EngineError, Evidence, GameConfig, GuessEvaluator, GuessOutcome, Location, ReinforcementAdjuster,
    Solution, StatedAlibis, Suspect, SuspectMap, Weapon, verify_alibi,
};

const STRONG_MOTIVE_BOOST: f64 = 0.10;
const WEAK_MOTIVE_BOOST: f64 = 0.05;
const OPPORTUNITY_BOOST: f64 = 0.10;
const CONSISTENCY_BONUS: f64 = 0.3;
const TOP_SUSPECTS: usize = 2;

/// Opaque handle issued when a session starts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for SessionId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| EngineError::SessionMismatch {
                session_id: s.to_owned(),
            })
    }
}

/// Round cursor of a session. Only ever moves forward.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[display("interviews")]
    Interview,
    #[display("alibi review")]
    AlibisPublished,
    #[display("alibi verification")]
    VerifyingAlibis,
    #[display("final deduction")]
    FinalDeduction,
    #[display("guessing")]
    Guessing,
    #[display("solved")]
    Solved,
    #[display("exhausted")]
    Exhausted,
    #[display("expired")]
    Expired,
}

impl SessionState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Solved | Self::Exhausted | Self::Expired)
    }
}

/// A request that can be rejected as out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    #[display("publish alibis")]
    PublishAlibis,
    #[display("verify an alibi")]
    VerifyAlibi,
    #[display("make the final deduction")]
    FinalDeduction,
    #[display("guess")]
    Guess,
}

/// What the player learns about a suspect in the interview round.
///
/// Never includes the true location or the lie propensity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuspectDossier {
    pub name: Suspect,
    pub age: u8,
    pub height: String,
    pub hair_color: String,
    pub eye_color: String,
    pub occupation: String,
    pub motive: &'static str,
    pub knows_victim: bool,
    pub claimed_location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub verification: AlibiVerification,
    /// The unchecked suspect other suspects talk about most.
    pub suggestion: Option<Suspect>,
    pub beliefs: SuspectMap<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedSuspect {
    pub suspect: Suspect,
    pub probability: f64,
    pub csp_valid: bool,
}

impl RankedSuspect {
    fn score(&self) -> f64 {
        if self.csp_valid {
            self.probability + CONSISTENCY_BONUS
        } else {
            self.probability
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalDeduction {
    pub top_suspects: Vec<RankedSuspect>,
    pub beliefs: SuspectMap<f64>,
    pub weapon_clue: Clue,
    pub csp_valid: Vec<Suspect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStatus {
    pub session_id: SessionId,
    pub state: SessionState,
    pub checked_suspects: Vec<Suspect>,
    pub beliefs: SuspectMap<f64>,
    pub tries_remaining: u8,
    pub incorrect_guesses: u8,
    pub started_at: DateTime<Utc>,
}

/// One playthrough.
///
/// Every random draw comes from a single generator seeded at start, so a
/// session replays exactly from its [`CaseSeed`] and the same sequence of
/// calls.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    seed: CaseSeed,
    config: GameConfig,
    rng: CaseRng,
    solution: Solution,
    stated: StatedAlibis,
    claims: Option<AlibiClaims>,
    beliefs: BeliefModel,
    adjuster: ReinforcementAdjuster,
    lie_counter: SuspectMap<u32>,
    checked: BTreeSet<Suspect>,
    csp_valid: Vec<Suspect>,
    deduction: Option<FinalDeduction>,
    state: SessionState,
    tries_remaining: u8,
    incorrect_guesses: u8,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl GameSession {
    /// Starts a session from a fresh random seed.
    pub fn start(config: GameConfig) -> Result<Self, EngineError> {
        Self::with_seed(config, rand::rng().random())
    }

    pub fn with_seed(config: GameConfig, seed: CaseSeed) -> Result<Self, EngineError> {
        config.validate()?;

        let mut rng = seed.rng();
        let killer: Suspect = rng.random();
        let weapon: Weapon = rng.random();
        let stated = StatedAlibis::generate(killer, &mut rng);
        let beliefs = BeliefModel::from_fn(|suspect| match config.killer_prior_hint {
            Some(hint) if suspect == killer => hint,
            _ => suspect.profile().prior,
        });

        let session = Self {
            id: SessionId::new(),
            seed,
            rng,
            solution: Solution { killer, weapon },
            stated,
            claims: None,
            beliefs,
            adjuster: ReinforcementAdjuster::default(),
            lie_counter: SuspectMap::default(),
            checked: BTreeSet::new(),
            csp_valid: Vec::new(),
            deduction: None,
            state: SessionState::Interview,
            tries_remaining: config.tries,
            incorrect_guesses: 0,
            started_at: Utc::now(),
            started: Instant::now(),
            config,
        };
        info!(session_id = %session.id, %seed, "case opened");
        debug!(session_id = %session.id, liars = ?session.stated.liars(), "alibis fabricated");
        Ok(session)
    }

    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub const fn seed(&self) -> CaseSeed {
        self.seed
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// The hidden truth. Intended for reveals and tests, not for players.
    #[must_use]
    pub const fn solution(&self) -> Solution {
        self.solution
    }

    #[must_use]
    pub const fn stated_alibis(&self) -> &StatedAlibis {
        &self.stated
    }

    #[must_use]
    pub fn liars(&self) -> &BTreeSet<Suspect> {
        self.stated.liars()
    }

    #[must_use]
    pub const fn claims(&self) -> Option<&AlibiClaims> {
        self.claims.as_ref()
    }

    #[must_use]
    pub const fn beliefs(&self) -> &BeliefModel {
        &self.beliefs
    }

    #[must_use]
    pub const fn lie_counter(&self) -> &SuspectMap<u32> {
        &self.lie_counter
    }

    #[must_use]
    pub const fn checked_suspects(&self) -> &BTreeSet<Suspect> {
        &self.checked
    }

    /// Output of the last consistency check (empty before the final deduction).
    #[must_use]
    pub fn csp_valid(&self) -> &[Suspect] {
        &self.csp_valid
    }

    #[must_use]
    pub const fn tries_remaining(&self) -> u8 {
        self.tries_remaining
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Moves the session to `Expired` once its time limit has passed.
    fn check_expiry(&mut self) -> Result<(), EngineError> {
        let elapsed = self.elapsed();
        if self.state.is_expired() {
            return Err(EngineError::SessionExpired {
                elapsed,
                solution: self.solution,
            });
        }
        if self.state.is_terminal() {
            return Ok(());
        }
        if let Some(limit) = self.config.time_limit()
            && elapsed >= limit
        {
            info!(session_id = %self.id, elapsed_secs = elapsed.as_secs(), "session expired");
            self.state = SessionState::Expired;
            return Err(EngineError::SessionExpired {
                elapsed,
                solution: self.solution,
            });
        }
        Ok(())
    }

    /// Expiry, then closed-case, then round-order checks for a mutating call.
    fn enter(&mut self, operation: Operation, allowed: &[SessionState]) -> Result<(), EngineError> {
        self.check_expiry()?;
        if self.state.is_terminal() {
            return Err(EngineError::CaseClosed {
                state: self.state,
                solution: self.solution,
            });
        }
        if !allowed.contains(&self.state) {
            return Err(EngineError::RoundOutOfOrder {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Round 1: every suspect's dossier and stated whereabouts.
    pub fn interview(&mut self) -> Result<SuspectMap<SuspectDossier>, EngineError> {
        self.check_expiry()?;
        Ok(SuspectMap::from_fn(|suspect| {
            let profile = suspect.profile();
            SuspectDossier {
                name: suspect,
                age: profile.age,
                height: profile.height.to_string(),
                hair_color: profile.hair_color.to_string(),
                eye_color: profile.eye_color.to_string(),
                occupation: profile.occupation.to_string(),
                motive: profile.motive.label,
                knows_victim: profile.knows_victim,
                claimed_location: self.stated.claimed(suspect),
            }
        }))
    }

    /// Round 2: (re)draws the claims graph. Frozen once verification starts.
    pub fn publish_alibis(&mut self) -> Result<&AlibiClaims, EngineError> {
        self.enter(
            Operation::PublishAlibis,
            &[SessionState::Interview, SessionState::AlibisPublished],
        )?;
        let claims = AlibiClaims::generate(self.solution.killer, &mut self.rng);
        self.state = SessionState::AlibisPublished;
        debug!(session_id = %self.id, "alibi claims published");
        Ok(self.claims.insert(claims))
    }

    /// Round 3: checks one suspect against the truth and rescores everyone
    /// who made a claim about them.
    pub fn verify_alibi(&mut self, suspect: Suspect) -> Result<VerificationReport, EngineError> {
        self.enter(
            Operation::VerifyAlibi,
            &[SessionState::AlibisPublished, SessionState::VerifyingAlibis],
        )?;
        if self.checked.contains(&suspect) {
            return Err(EngineError::AlreadyVerified { suspect });
        }
        let Some(claims) = &self.claims else {
            return Err(EngineError::RoundOutOfOrder {
                operation: Operation::VerifyAlibi,
                state: self.state,
            });
        };

        let verification = verify_alibi(suspect, &self.stated, claims);
        self.checked.insert(suspect);
        self.state = SessionState::VerifyingAlibis;

        for statement in &verification.statements {
            let accuser = statement.accuser;
            if !statement.is_correct {
                self.lie_counter[accuser] += 1;
            }
            self.adjuster.apply_reward(
                &mut self.beliefs,
                accuser,
                statement.is_correct,
                &self.lie_counter,
            );
            let own_clues = accuser.profile().clues();
            self.beliefs.update_posterior(
                accuser,
                &Evidence::clues(&own_clues),
                self.solution.weapon,
                self.stated.is_liar(accuser),
            );
        }
        self.beliefs.normalize();

        let suggestion = self.suggest_next(claims);
        info!(
            session_id = %self.id,
            %suspect,
            valid = verification.is_alibi_valid,
            statements = verification.statements.len(),
            "alibi verified"
        );
        Ok(VerificationReport {
            verification,
            suggestion,
            beliefs: self.beliefs.snapshot(),
        })
    }

    /// Most-mentioned unchecked suspect; ties go to the higher belief, then
    /// to roster order.
    fn suggest_next(&self, claims: &AlibiClaims) -> Option<Suspect> {
        let mut best: Option<(Suspect, usize, f64)> = None;
        for suspect in Suspect::ALL {
            if self.checked.contains(&suspect) {
                continue;
            }
            let mentions = claims.mentions(suspect);
            let probability = self.beliefs.probability(suspect);
            if best.is_none_or(|(_, m, p)| mentions > m || (mentions == m && probability > p)) {
                best = Some((suspect, mentions, probability));
            }
        }
        best.map(|(suspect, _, _)| suspect)
    }

    /// Round 4: one-time motive/opportunity boost, consistency filter, and
    /// the two leading suspects. Later calls return the same result.
    pub fn final_deduction(&mut self) -> Result<FinalDeduction, EngineError> {
        self.enter(
            Operation::FinalDeduction,
            &[
                SessionState::AlibisPublished,
                SessionState::VerifyingAlibis,
                SessionState::FinalDeduction,
                SessionState::Guessing,
            ],
        )?;
        if let Some(deduction) = &self.deduction {
            return Ok(deduction.clone());
        }

        let crime_scene = self.solution.killer.profile().home;
        for suspect in Suspect::ALL {
            let mut boost = if suspect.profile().motive.is_strong() {
                STRONG_MOTIVE_BOOST
            } else {
                WEAK_MOTIVE_BOOST
            };
            if self.stated.claimed(suspect) == crime_scene {
                boost += OPPORTUNITY_BOOST;
            }
            let boosted = (self.beliefs.probability(suspect) + boost).min(1.0);
            self.beliefs.set_probability(suspect, boosted);
        }
        self.beliefs.normalize();

        self.csp_valid = ConsistencyChecker::new(&self.stated, crime_scene).solve();
        let mut ranked = Suspect::ALL
            .into_iter()
            .map(|suspect| RankedSuspect {
                suspect,
                probability: self.beliefs.probability(suspect),
                csp_valid: self.csp_valid.contains(&suspect),
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));
        ranked.truncate(TOP_SUSPECTS);

        let deduction = FinalDeduction {
            top_suspects: ranked,
            beliefs: self.beliefs.snapshot(),
            weapon_clue: self.solution.weapon.clue(),
            csp_valid: self.csp_valid.clone(),
        };
        self.state = SessionState::FinalDeduction;
        info!(
            session_id = %self.id,
            top = ?deduction.top_suspects.iter().map(|r| r.suspect).collect::<Vec<_>>(),
            "final deduction"
        );
        Ok(self.deduction.insert(deduction).clone())
    }

    /// Accuses `suspect` of the murder with `weapon`.
    pub fn guess(&mut self, suspect: Suspect, weapon: Weapon) -> Result<GuessOutcome, EngineError> {
        self.enter(
            Operation::Guess,
            &[SessionState::FinalDeduction, SessionState::Guessing],
        )?;
        self.state = SessionState::Guessing;

        let guess = Solution {
            killer: suspect,
            weapon,
        };
        if GuessEvaluator::is_correct(guess, self.solution) {
            self.state = SessionState::Solved;
            info!(session_id = %self.id, %guess, "case solved");
            return Ok(GuessOutcome::Solved {
                solution: self.solution,
                tries_remaining: self.tries_remaining,
                incorrect_guesses: self.incorrect_guesses,
                elapsed_secs: self.elapsed().as_secs(),
            });
        }

        self.tries_remaining = self.tries_remaining.saturating_sub(1);
        self.incorrect_guesses += 1;
        let evaluator = GuessEvaluator {
            update_beliefs: self.config.update_beliefs_on_guess,
        };
        let revealed = evaluator.apply_miss(
            suspect,
            self.solution,
            &mut self.beliefs,
            &self.stated,
            &mut self.rng,
        );
        info!(
            session_id = %self.id,
            %guess,
            tries_remaining = self.tries_remaining,
            "incorrect guess"
        );

        if self.tries_remaining == 0 {
            self.state = SessionState::Exhausted;
            return Ok(GuessOutcome::Exhausted {
                solution: self.solution,
            });
        }
        Ok(GuessOutcome::Incorrect {
            tries_remaining: self.tries_remaining,
            killer_clue: revealed.killer_clue,
            weapon_clue: revealed.weapon_clue,
            beliefs: self.beliefs.snapshot(),
        })
    }

    /// Read-only snapshot. Never changes state, even past the time limit.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        GameStatus {
            session_id: self.id,
            state: self.state,
            checked_suspects: self.checked.iter().copied().collect(),
            beliefs: self.beliefs.snapshot(),
            tries_remaining: self.tries_remaining,
            incorrect_guesses: self.incorrect_guesses,
            started_at: self.started_at,
        }
    }
}
