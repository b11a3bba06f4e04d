use std::time::Duration;

use crate::{
    Suspect,
    engine::{Operation, SessionState, Solution},
};

/// Every way a request to the engine can be rejected.
///
/// All variants are recoverable: a rejected call never leaves the session in
/// a partially updated state. The one transition that happens on an error
/// path is expiry, which is itself terminal and reported as
/// [`EngineError::SessionExpired`].
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum EngineError {
    #[display("no active game; start a game first")]
    NoActiveSession,
    #[display("session id '{session_id}' does not match an active game")]
    SessionMismatch { session_id: String },
    #[display("unknown suspect '{name}'")]
    UnknownSuspect { name: String },
    #[display("unknown weapon '{name}'")]
    UnknownWeapon { name: String },
    #[display("{suspect} has already been verified")]
    AlreadyVerified { suspect: Suspect },
    #[display("tries budget {tries} is out of range 1..={max}")]
    InvalidTriesBudget { tries: i64, max: u8 },
    #[display("session expired after {}s; it was {solution}", elapsed.as_secs())]
    SessionExpired {
        elapsed: Duration,
        solution: Solution,
    },
    #[display("cannot {operation} during {state}")]
    RoundOutOfOrder {
        operation: Operation,
        state: SessionState,
    },
    #[display("the case is closed ({state}); it was {solution}")]
    CaseClosed {
        state: SessionState,
        solution: Solution,
    },
    #[display("invalid config field '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl EngineError {
    /// Stable machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NoActiveSession => "no_active_session",
            Self::SessionMismatch { .. } => "session_mismatch",
            Self::UnknownSuspect { .. } => "unknown_suspect",
            Self::UnknownWeapon { .. } => "unknown_weapon",
            Self::AlreadyVerified { .. } => "already_verified",
            Self::InvalidTriesBudget { .. } => "invalid_tries_budget",
            Self::SessionExpired { .. } => "session_expired",
            Self::RoundOutOfOrder { .. } => "round_out_of_order",
            Self::CaseClosed { .. } => "case_closed",
            Self::InvalidConfig { .. } => "invalid_config",
        }
    }

    /// The request field the caller should correct, if any.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::SessionMismatch { .. } => Some("session_id"),
            Self::UnknownSuspect { .. } | Self::AlreadyVerified { .. } => Some("suspect"),
            Self::UnknownWeapon { .. } => Some("weapon"),
            Self::InvalidTriesBudget { .. } => Some("tries"),
            Self::InvalidConfig { field, .. } => Some(*field),
            Self::NoActiveSession
            | Self::SessionExpired { .. }
            | Self::RoundOutOfOrder { .. }
            | Self::CaseClosed { .. } => None,
        }
    }

    /// The truth revealed by a terminal rejection.
    #[must_use]
    pub const fn solution(&self) -> Option<Solution> {
        match self {
            Self::SessionExpired { solution, .. } | Self::CaseClosed { solution, .. } => {
                Some(*solution)
            }
            _ => None,
        }
    }
}
