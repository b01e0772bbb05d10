//! Game session store.
//!
//! Sessions are keyed by a fresh uuid and advance through a small lifecycle:
//! `Created -> AwaitingBet -> Resolved`, with `InPlay` between bet and
//! resolution for multi-step games (blackjack rounds, the generic game's
//! start/finish). All state changes are compare-and-swap under the per-key
//! entry lock; once a session is `Resolved` no further transition succeeds.
//!
//! Ownership (token owner == acting user) is the dispatcher's check, not the
//! store's - the store stays reusable for any caller.

use crate::errors::{BotError, BotResult};
use crate::games::{GameData, GameKind};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Created,
    AwaitingBet,
    InPlay,
    Resolved,
}

/// One game session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: Uuid,
    pub owner_id: String,
    pub kind: GameKind,
    pub state: SessionState,
    pub data: GameData,
    pub created_at: DateTime<Utc>,
}

/// Process-wide session store.
pub struct SessionStore {
    sessions: DashMap<Uuid, GameSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Allocate a fresh session in state `Created`.
    pub fn create(&self, owner_id: &str, kind: GameKind) -> GameSession {
        let session = GameSession {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            kind,
            state: SessionState::Created,
            data: GameData::Idle,
            created_at: Utc::now(),
        };
        self.sessions.insert(session.id, session.clone());
        tracing::debug!(session = %session.id, owner = owner_id, kind = %kind, "session created");
        session
    }

    /// Snapshot of a session record.
    pub fn get(&self, id: Uuid) -> BotResult<GameSession> {
        self.sessions
            .get(&id)
            .map(|s| s.clone())
            .ok_or(BotError::NotFound)
    }

    /// Compare-and-swap the session state. Fails with `StateConflict` when
    /// the current state is not `expected` - the guard against double
    /// submits and replayed stale buttons.
    pub fn transition(
        &self,
        id: Uuid,
        expected: SessionState,
        next: SessionState,
    ) -> BotResult<()> {
        let mut session = self.sessions.get_mut(&id).ok_or(BotError::NotFound)?;
        if session.state != expected {
            return Err(BotError::StateConflict);
        }
        session.state = next;
        tracing::debug!(session = %id, from = ?expected, to = ?next, "session transition");
        Ok(())
    }

    /// Mark a session `Resolved` and drop its in-play data. Subsequent
    /// transitions fail with `StateConflict`.
    pub fn retire(&self, id: Uuid) -> BotResult<()> {
        let mut session = self.sessions.get_mut(&id).ok_or(BotError::NotFound)?;
        session.state = SessionState::Resolved;
        session.data = GameData::Idle;
        tracing::debug!(session = %id, "session retired");
        Ok(())
    }

    /// Run `f` on the live record under the entry lock. Everything the
    /// closure reads and writes (state check, data mutation, transition) is
    /// one atomic step with respect to other interactions on this session.
    pub fn with_session_mut<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut GameSession) -> BotResult<T>,
    ) -> BotResult<T> {
        let mut session = self.sessions.get_mut(&id).ok_or(BotError::NotFound)?;
        f(&mut session)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
