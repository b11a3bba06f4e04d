//! Deduction engine for a six-suspect murder mystery.
//!
//! A session hides a killer and a weapon, fabricates alibis, and lets the
//! player work through four rounds:
//!
//! 1. Interview - read every suspect's dossier and claimed whereabouts
//! 2. Alibis - publish who claims to have seen whom, and where
//! 3. Verification - check suspects against the truth, one at a time
//! 4. Final deduction - motive/opportunity boost and consistency filtering
//!
//! followed by at most three killer+weapon guesses.
//!
//! # Example
//!
//! ```
//! use whodunit_engine::{CaseSeed, GameConfig, GameSession};
//!
//! let mut session = GameSession::with_seed(GameConfig::default(), CaseSeed::from(42)).unwrap();
//! session.interview().unwrap();
//! session.publish_alibis().unwrap();
//! let deduction = session.final_deduction().unwrap();
//! assert_eq!(deduction.top_suspects.len(), 2);
//! ```

pub use self::{core::*, engine::*, error::*};

pub mod core;
pub mod engine;
mod error;
