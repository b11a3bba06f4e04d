use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Random source driving every draw of a session.
pub type CaseRng = Pcg32;

/// Seed for deterministic case generation.
///
/// A 128-bit (16-byte) seed for the session's random source. The same seed
/// yields the same killer, weapon, fabricated alibis and claims graph,
/// which enables:
///
/// - Reproducible games for debugging
/// - Deterministic testing
/// - Replaying a reported session
///
/// Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use whodunit_engine::{CaseSeed, GameConfig, GameSession};
///
/// let seed = CaseSeed::from(7);
/// let first = GameSession::with_seed(GameConfig::default(), seed).unwrap();
/// let second = GameSession::with_seed(GameConfig::default(), seed).unwrap();
/// assert_eq!(first.solution(), second.solution());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaseSeed([u8; 16]);

impl CaseSeed {
    #[must_use]
    pub fn rng(self) -> CaseRng {
        Pcg32::from_seed(self.0)
    }
}

impl From<u64> for CaseSeed {
    fn from(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }
}

impl fmt::Display for CaseSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed '{input}': {reason}")]
pub struct ParseSeedError {
    input: String,
    reason: String,
}

impl FromStr for CaseSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError {
                input: s.to_owned(),
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParseSeedError {
            input: s.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for CaseSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CaseSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `CaseSeed` values with `rng.random()`.
impl Distribution<CaseSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> CaseSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        CaseSeed(seed)
    }
}
