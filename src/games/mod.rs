//! Game engines and the shared vocabulary they expose to the dispatcher.
//!
//! Engines are pure given their random source: they turn a validated bet into
//! an [`Outcome`] and never touch the ledger or the session store themselves.

pub mod blackjack;
pub mod generic;
pub mod slot_machine;

use crate::errors::{BotError, BotResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported game kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    SlotMachine,
    Blackjack,
    Generic,
}

impl GameKind {
    /// Wire/command name, also the value carried inside tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::SlotMachine => "slotmachine",
            GameKind::Blackjack => "blackjack",
            GameKind::Generic => "game",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "slotmachine" => Some(GameKind::SlotMachine),
            "blackjack" => Some(GameKind::Blackjack),
            "game" => Some(GameKind::Generic),
            _ => None,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions a UI element can carry. Tokens only ever hold one of these, so the
/// field is delimiter-free by construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameAction {
    Start,
    Bet,
    Hit,
    Stand,
    Finish,
}

impl GameAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Start => "start",
            GameAction::Bet => "bet",
            GameAction::Hit => "hit",
            GameAction::Stand => "stand",
            GameAction::Finish => "finish",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "start" => Some(GameAction::Start),
            "bet" => Some(GameAction::Bet),
            "hit" => Some(GameAction::Hit),
            "stand" => Some(GameAction::Stand),
            "finish" => Some(GameAction::Finish),
            _ => None,
        }
    }
}

impl fmt::Display for GameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated stake. Constructed only through [`Bet::new`] or [`Bet::parse`],
/// so an amount of zero never reaches an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    amount: u64,
}

impl Bet {
    pub fn new(amount: u64) -> BotResult<Self> {
        if amount == 0 {
            return Err(BotError::InvalidAmount(0));
        }
        Ok(Self { amount })
    }

    /// Parse a modal input string into a bet. Non-numeric input is a
    /// `ParseError`; zero is an `InvalidAmount`.
    pub fn parse(input: &str) -> BotResult<Self> {
        let amount: u64 = input
            .trim()
            .parse()
            .map_err(|_| BotError::ParseError(input.to_string()))?;
        Self::new(amount)
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }
}

/// Result of resolving a bet: the net ledger delta and a line for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Net change to the player's balance; never below `-(bet)`.
    pub payout_delta: i64,
    pub description: String,
}

impl Outcome {
    /// Gross amount credited back after the stake was debited up front.
    /// `payout_delta >= -(bet)` holds for every engine, so this never wraps.
    pub fn total_return(&self, bet: u64) -> u64 {
        (bet as i64 + self.payout_delta).max(0) as u64
    }
}

/// Per-kind state a session carries between interactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum GameData {
    /// No in-play state (pre-bet, or a single-step game).
    Idle,
    Blackjack(blackjack::BlackjackHand),
    Generic(generic::GenericState),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [GameKind::SlotMachine, GameKind::Blackjack, GameKind::Generic] {
            assert_eq!(GameKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(GameKind::parse("roulette"), None);
    }

    #[test]
    fn test_action_round_trip() {
        for action in [
            GameAction::Start,
            GameAction::Bet,
            GameAction::Hit,
            GameAction::Stand,
            GameAction::Finish,
        ] {
            assert_eq!(GameAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(GameAction::parse("fold"), None);
    }

    #[test]
    fn test_bet_parsing() {
        assert_eq!(Bet::parse("20").unwrap().amount(), 20);
        assert_eq!(Bet::parse(" 20 ").unwrap().amount(), 20);
        assert_eq!(Bet::parse("abc"), Err(BotError::ParseError("abc".into())));
        assert_eq!(Bet::parse("-5"), Err(BotError::ParseError("-5".into())));
        assert_eq!(Bet::parse("1.5"), Err(BotError::ParseError("1.5".into())));
        assert_eq!(Bet::parse("0"), Err(BotError::InvalidAmount(0)));
    }

    #[test]
    fn test_total_return() {
        let win = Outcome {
            payout_delta: 40,
            description: String::new(),
        };
        assert_eq!(win.total_return(20), 60);

        let loss = Outcome {
            payout_delta: -20,
            description: String::new(),
        };
        assert_eq!(loss.total_return(20), 0);

        let push = Outcome {
            payout_delta: 0,
            description: String::new(),
        };
        assert_eq!(push.total_return(20), 20);
    }
}
