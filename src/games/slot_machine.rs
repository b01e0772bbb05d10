//! Slot machine engine: three independent draws from a weighted symbol set,
//! paid out by matching-symbol count.

use crate::games::{Bet, Outcome};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Reel symbols, rarest last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Cherry,
    Lemon,
    Orange,
    Bell,
    Seven,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Symbol::Cherry => "cherry",
            Symbol::Lemon => "lemon",
            Symbol::Orange => "orange",
            Symbol::Bell => "bell",
            Symbol::Seven => "seven",
        };
        f.write_str(s)
    }
}

const SYMBOLS: [Symbol; 5] = [
    Symbol::Cherry,
    Symbol::Lemon,
    Symbol::Orange,
    Symbol::Bell,
    Symbol::Seven,
];

/// Draw weights per symbol, same order as `SYMBOLS`.
const WEIGHTS: [u32; 5] = [5, 4, 4, 2, 1];

/// Total-return multipliers: triple sevens, any other triple, any pair.
const TRIPLE_SEVEN_MULT: u64 = 10;
const TRIPLE_MULT: u64 = 6;
const PAIR_MULT: u64 = 2;

/// Symbol distribution, built once. `WEIGHTS` is a fixed table of non-zero
/// entries, so construction cannot fail at runtime (covered by a test).
fn symbol_dist() -> &'static WeightedIndex<u32> {
    static DIST: OnceLock<WeightedIndex<u32>> = OnceLock::new();
    DIST.get_or_init(|| WeightedIndex::new(WEIGHTS).expect("static weights are non-zero"))
}

/// Spin three independent reels from the weighted symbol table.
pub fn spin(rng: &mut impl Rng) -> [Symbol; 3] {
    let dist = symbol_dist();
    [
        SYMBOLS[dist.sample(rng)],
        SYMBOLS[dist.sample(rng)],
        SYMBOLS[dist.sample(rng)],
    ]
}

/// Gross return for a spin, in multiples of the bet.
pub fn payout_multiplier(reels: &[Symbol; 3]) -> u64 {
    let [a, b, c] = *reels;
    if a == b && b == c {
        if a == Symbol::Seven {
            TRIPLE_SEVEN_MULT
        } else {
            TRIPLE_MULT
        }
    } else if a == b || b == c || a == c {
        PAIR_MULT
    } else {
        0
    }
}

/// Resolve a spin into an outcome for the given bet.
pub fn play(bet: Bet, rng: &mut impl Rng) -> Outcome {
    let reels = spin(rng);
    let multiplier = payout_multiplier(&reels);
    let total_return = bet.amount().saturating_mul(multiplier);
    let payout_delta = total_return as i64 - bet.amount() as i64;

    let line = format!("[ {} | {} | {} ]", reels[0], reels[1], reels[2]);
    let description = if multiplier == 0 {
        format!("{} - no match, stake lost", line)
    } else {
        format!("{} - pays {}x, you win {}", line, multiplier, total_return)
    };

    Outcome {
        payout_delta,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_symbol_weights_form_a_valid_distribution() {
        assert!(WEIGHTS.iter().all(|&w| w > 0));
        assert!(WeightedIndex::new(WEIGHTS).is_ok());
    }

    #[test]
    fn test_payout_table() {
        let triple_seven = [Symbol::Seven, Symbol::Seven, Symbol::Seven];
        assert_eq!(payout_multiplier(&triple_seven), 10);

        let triple_bell = [Symbol::Bell, Symbol::Bell, Symbol::Bell];
        assert_eq!(payout_multiplier(&triple_bell), 6);

        let pair = [Symbol::Cherry, Symbol::Lemon, Symbol::Cherry];
        assert_eq!(payout_multiplier(&pair), 2);

        let miss = [Symbol::Cherry, Symbol::Lemon, Symbol::Bell];
        assert_eq!(payout_multiplier(&miss), 0);
    }

    #[test]
    fn test_seeded_spin_is_reproducible() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(spin(&mut a), spin(&mut b));
    }

    #[test]
    fn test_play_delta_never_exceeds_stake_loss() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let bet = Bet::new(20).unwrap();
            let outcome = play(bet, &mut rng);
            assert!(outcome.payout_delta >= -20);
        }
    }

    #[test]
    fn test_play_matches_independent_replay() {
        let bet = Bet::new(20).unwrap();
        let outcome = play(bet, &mut StdRng::seed_from_u64(3));

        let reels = spin(&mut StdRng::seed_from_u64(3));
        let expected = payout_multiplier(&reels) as i64 * 20 - 20;
        assert_eq!(outcome.payout_delta, expected);
    }
}
