use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Upper bound (inclusive) on the guess budget.
pub const MAX_TRIES: u8 = 3;

/// Per-session tunables.
///
/// Missing fields in a config file fall back to [`GameConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Guess budget, within `1..=MAX_TRIES`.
    pub tries: u8,
    /// Wall-clock limit measured from session start. `None` disables expiry.
    pub time_limit_secs: Option<u64>,
    /// Whether an incorrect guess feeds revealed clues back into the beliefs.
    pub update_beliefs_on_guess: bool,
    /// Overrides the killer's initial belief. Leaks information; off by default.
    pub killer_prior_hint: Option<f64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tries: MAX_TRIES,
            time_limit_secs: None,
            update_beliefs_on_guess: true,
            killer_prior_hint: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        validate_tries(i64::from(self.tries))?;
        if let Some(hint) = self.killer_prior_hint
            && !(0.0..=1.0).contains(&hint)
        {
            return Err(EngineError::InvalidConfig {
                field: "killer_prior_hint",
                reason: format!("{hint} is outside [0, 1]"),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs)
    }
}

/// Checks an externally supplied guess budget.
pub fn validate_tries(tries: i64) -> Result<u8, EngineError> {
    u8::try_from(tries)
        .ok()
        .filter(|t| (1..=MAX_TRIES).contains(t))
        .ok_or(EngineError::InvalidTriesBudget {
            tries,
            max: MAX_TRIES,
        })
}
