//! Error types for the wagerbot interaction core.
//!
//! Every failure an interaction can produce is a `BotError`; the surfacing
//! policy (silent drop, user-facing rejection, "no longer active") lives here
//! so the dispatcher and tests agree on it.

use thiserror::Error;

/// Root error type for all interaction handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BotError {
    /// Token did not have the expected delimiter-separated arity.
    #[error("malformed token: {0:?}")]
    MalformedToken(String),

    /// Token had the right shape but a field failed its vocabulary check.
    #[error("invalid {field} field: {value:?}")]
    InvalidField { field: &'static str, value: String },

    /// Compare-and-swap on a session state failed (double submit, stale
    /// button, or an already-retired session).
    #[error("session state conflict")]
    StateConflict,

    /// Debit larger than the current balance.
    #[error("insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// Bet of zero or outside the configured table limits.
    #[error("invalid bet amount: {0}")]
    InvalidAmount(u64),

    /// Modal input that is not a whole number of chips.
    #[error("could not parse bet amount: {0:?}")]
    ParseError(String),

    /// Session id that no store entry answers to.
    #[error("game session not found")]
    NotFound,

    /// Acting user does not match the token's owner.
    #[error("acting user does not own this interaction")]
    OwnershipMismatch,
}

/// How an error is presented to the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surfacing {
    /// Dropped without a user-visible reply; logged as an anomaly. These
    /// indicate a spoofed or corrupted UI element, not a user mistake.
    Silent,
    /// Reported to the acting user as a rejection, no state was mutated.
    Rejection,
    /// Reported as "this game is no longer active".
    Inactive,
}

impl BotError {
    /// Surfacing policy for this error.
    pub fn surfacing(&self) -> Surfacing {
        match self {
            BotError::MalformedToken(_)
            | BotError::InvalidField { .. }
            | BotError::OwnershipMismatch => Surfacing::Silent,
            BotError::InsufficientFunds { .. }
            | BotError::InvalidAmount(_)
            | BotError::ParseError(_) => Surfacing::Rejection,
            BotError::StateConflict | BotError::NotFound => Surfacing::Inactive,
        }
    }
}

/// Convenience type alias for results.
pub type BotResult<T> = Result<T, BotError>;
