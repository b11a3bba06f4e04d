use std::{
    collections::{HashMap, VecDeque},
    num::NonZeroUsize,
    sync::Arc,
};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::{
    AlibiClaims, EngineError, FinalDeduction, GameConfig, GameSession, GameStatus, GuessOutcome,
    SessionId, Suspect, SuspectDossier, SuspectMap, VerificationReport, Weapon,
};

/// Shared handle to one session. Lock it for the whole operation.
pub type SessionHandle = Arc<Mutex<GameSession>>;

#[derive(Debug, Default)]
struct Slots {
    sessions: HashMap<SessionId, SessionHandle>,
    order: VecDeque<SessionId>,
}

/// Owns live sessions and resolves names at the boundary.
///
/// The registry lock is held only for lookup and insertion; each operation
/// then runs under its own session's lock, so distinct sessions never
/// contend. With the default capacity of one, starting a game replaces the
/// previous one.
#[derive(Debug)]
pub struct SessionRegistry {
    config: GameConfig,
    capacity: NonZeroUsize,
    slots: Mutex<Slots>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(GameConfig::default(), NonZeroUsize::MIN)
    }
}

impl SessionRegistry {
    #[must_use]
    pub fn new(config: GameConfig, capacity: NonZeroUsize) -> Self {
        Self {
            config,
            capacity,
            slots: Mutex::new(Slots::default()),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.lock().sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts a game with the registry's config.
    pub fn start_game(&self) -> Result<SessionId, EngineError> {
        Ok(self.insert(GameSession::start(self.config.clone())?))
    }

    /// Registers an already built session, evicting the oldest when full.
    pub fn insert(&self, session: GameSession) -> SessionId {
        let id = session.id();
        let mut slots = self.slots.lock();
        while slots.order.len() >= self.capacity.get() {
            let Some(evicted) = slots.order.pop_front() else {
                break;
            };
            slots.sessions.remove(&evicted);
            debug!(session_id = %evicted, "session evicted");
        }
        slots.sessions.insert(id, Arc::new(Mutex::new(session)));
        slots.order.push_back(id);
        info!(session_id = %id, live = slots.order.len(), "session registered");
        id
    }

    /// Looks up a live session.
    pub fn get(&self, id: &str) -> Result<SessionHandle, EngineError> {
        let slots = self.slots.lock();
        if slots.sessions.is_empty() {
            return Err(EngineError::NoActiveSession);
        }
        let mismatch = || EngineError::SessionMismatch {
            session_id: id.to_owned(),
        };
        let id = id.parse::<SessionId>().map_err(|_| mismatch())?;
        slots.sessions.get(&id).cloned().ok_or_else(mismatch)
    }

    fn with_session<T, F>(&self, id: &str, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut GameSession) -> Result<T, EngineError>,
    {
        let handle = self.get(id)?;
        let mut session = handle.lock();
        f(&mut *session)
    }

    pub fn interview(&self, id: &str) -> Result<SuspectMap<SuspectDossier>, EngineError> {
        self.with_session(id, GameSession::interview)
    }

    pub fn publish_alibis(&self, id: &str) -> Result<AlibiClaims, EngineError> {
        self.with_session(id, |session| session.publish_alibis().cloned())
    }

    pub fn verify_alibi(&self, id: &str, suspect: &str) -> Result<VerificationReport, EngineError> {
        self.with_session(id, |session| session.verify_alibi(suspect.parse()?))
    }

    pub fn final_deduction(&self, id: &str) -> Result<FinalDeduction, EngineError> {
        self.with_session(id, GameSession::final_deduction)
    }

    pub fn guess(&self, id: &str, suspect: &str, weapon: &str) -> Result<GuessOutcome, EngineError> {
        self.with_session(id, |session| {
            let suspect = suspect.parse::<Suspect>()?;
            let weapon = weapon.parse::<Weapon>()?;
            session.guess(suspect, weapon)
        })
    }

    pub fn status(&self, id: &str) -> Result<GameStatus, EngineError> {
        self.with_session(id, |session| Ok(session.status()))
    }
}
