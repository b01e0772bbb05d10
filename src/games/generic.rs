//! Placeholder game with a single start/finish transition.
//!
//! Exists to exercise the shared token/session/dispatcher plumbing without
//! game-specific payout rules: the stake is held while the game is in play
//! and returned unchanged on finish.

use crate::games::{Bet, Outcome};
use serde::{Deserialize, Serialize};

/// In-play state for a generic game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericState {
    pub bet: u64,
}

/// Start the game: the stake is staked, nothing is resolved yet.
pub fn start(bet: Bet) -> GenericState {
    GenericState { bet: bet.amount() }
}

/// Finish the game, returning the stake (net delta zero).
pub fn finish(state: &GenericState) -> Outcome {
    Outcome {
        payout_delta: 0,
        description: format!("game finished - stake of {} returned", state.bet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_finish_is_net_zero() {
        let state = start(Bet::new(30).unwrap());
        assert_eq!(state.bet, 30);

        let outcome = finish(&state);
        assert_eq!(outcome.payout_delta, 0);
        assert_eq!(outcome.total_return(30), 30);
    }
}
