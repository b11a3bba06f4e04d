//! Session mechanics.
//!
//! - [`GameSession`] - one playthrough and its round state machine
//! - [`SessionRegistry`] - live sessions keyed by [`SessionId`]
//! - [`BeliefModel`] / [`ReinforcementAdjuster`] - per-suspect guilt scores
//! - [`StatedAlibis`] / [`AlibiClaims`] - fabricated whereabouts and the claims graph
//! - [`ConsistencyChecker`] - opportunity + motive filter for the final round
//! - [`GuessEvaluator`] - accusations and what a miss reveals
//! - [`CaseSeed`] - deterministic replay

pub use self::{
    alibi::*, belief::*, config::*, consistency::*, guess::*, registry::*, reinforcement::*,
    seed::*, session::*,
};

mod alibi;
mod belief;
mod config;
mod consistency;
mod guess;
mod registry;
mod reinforcement;
mod seed;
mod session;
