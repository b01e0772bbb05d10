//! Blackjack engine.
//!
//! Cards are coded 0..52 (`card % 13` gives the rank, ace first). The
//! shuffled remainder of the deck is kept inside the hand state, so every
//! draw in one session comes from the same deck without replacement. The
//! dispatcher drives `Hit`/`Stand` through later button interactions.

use crate::games::{Bet, Outcome};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const DECK_SIZE: u8 = 52;
const DEALER_STAND: u8 = 17;

/// Player moves accepted mid-hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Hit,
    Stand,
}

/// Terminal results and their total-return multipliers on the staked bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandResult {
    PlayerBust,
    DealerBust,
    PlayerWin,
    DealerWin,
    Push,
}

/// In-play state for one blackjack session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackjackHand {
    pub player: Vec<u8>,
    pub dealer: Vec<u8>,
    /// Remaining shuffled deck; draws pop from the back.
    pub deck: Vec<u8>,
    pub bet: u64,
}

/// Value of a hand and whether it is soft (an ace still counts as 11).
pub fn hand_value(cards: &[u8]) -> (u8, bool) {
    let mut value: u16 = 0;
    let mut aces: u8 = 0;

    for &card in cards {
        let rank = (card % 13) + 1; // 1 = ace, 11..13 = face cards
        if rank == 1 {
            aces += 1;
            value += 11;
        } else if rank >= 10 {
            value += 10;
        } else {
            value += u16::from(rank);
        }
    }

    while value > 21 && aces > 0 {
        value -= 10;
        aces -= 1;
    }

    let soft = aces > 0 && value <= 21;
    (value.min(u16::from(u8::MAX)) as u8, soft)
}

/// A natural: 21 from the first two cards.
pub fn is_natural(cards: &[u8]) -> bool {
    cards.len() == 2 && hand_value(cards).0 == 21
}

fn card_label(card: u8) -> String {
    match (card % 13) + 1 {
        1 => "A".to_string(),
        11 => "J".to_string(),
        12 => "Q".to_string(),
        13 => "K".to_string(),
        n => n.to_string(),
    }
}

fn hand_label(cards: &[u8]) -> String {
    let labels: Vec<String> = cards.iter().map(|&c| card_label(c)).collect();
    format!("{} ({})", labels.join(" "), hand_value(cards).0)
}

/// Text shown to the player between moves; the dealer's hole card stays hidden.
pub fn describe(hand: &BlackjackHand) -> String {
    let up_card = hand
        .dealer
        .first()
        .map(|&c| card_label(c))
        .unwrap_or_else(|| "?".to_string());
    format!(
        "your hand: {} - dealer shows {}",
        hand_label(&hand.player),
        up_card
    )
}

/// Deal the opening hands. Returns the in-play state, plus an immediate
/// outcome when either side holds a natural.
pub fn deal(bet: Bet, rng: &mut impl Rng) -> (BlackjackHand, Option<Outcome>) {
    let mut deck: Vec<u8> = (0..DECK_SIZE).collect();
    deck.shuffle(rng);

    // Pop draws: player, dealer, player, dealer.
    let mut hand = BlackjackHand {
        player: Vec::with_capacity(6),
        dealer: Vec::with_capacity(6),
        deck,
        bet: bet.amount(),
    };
    for i in 0..4 {
        if let Some(card) = hand.deck.pop() {
            if i % 2 == 0 {
                hand.player.push(card);
            } else {
                hand.dealer.push(card);
            }
        }
    }

    let player_natural = is_natural(&hand.player);
    let dealer_natural = is_natural(&hand.dealer);
    if !player_natural && !dealer_natural {
        return (hand, None);
    }

    let bet_amount = hand.bet;
    let outcome = if player_natural && dealer_natural {
        settle(&hand, HandResult::Push)
    } else if player_natural {
        // Natural pays 3:2.
        let delta = (bet_amount * 3 / 2) as i64;
        Outcome {
            payout_delta: delta,
            description: format!(
                "blackjack! {} beats dealer {}",
                hand_label(&hand.player),
                hand_label(&hand.dealer)
            ),
        }
    } else {
        Outcome {
            payout_delta: -(bet_amount as i64),
            description: format!(
                "dealer blackjack: {} - your {} loses",
                hand_label(&hand.dealer),
                hand_label(&hand.player)
            ),
        }
    };
    (hand, Some(outcome))
}

/// Apply one player move. `None` means the hand continues and awaits another
/// button interaction; `Some` is the terminal outcome.
pub fn advance(hand: &mut BlackjackHand, mv: Move) -> Option<Outcome> {
    match mv {
        Move::Hit => {
            // 48 cards remain after the deal; one hand cannot exhaust them.
            let Some(card) = hand.deck.pop() else {
                return Some(dealer_play(hand));
            };
            hand.player.push(card);

            let (value, _) = hand_value(&hand.player);
            if value > 21 {
                Some(settle(hand, HandResult::PlayerBust))
            } else if value == 21 {
                Some(dealer_play(hand))
            } else {
                None
            }
        }
        Move::Stand => Some(dealer_play(hand)),
    }
}

/// Dealer draws to 17 (stands on hard 17, hits soft 17), then the hands are
/// compared.
fn dealer_play(hand: &mut BlackjackHand) -> Outcome {
    loop {
        let (value, soft) = hand_value(&hand.dealer);
        if value > DEALER_STAND || (value == DEALER_STAND && !soft) {
            break;
        }
        match hand.deck.pop() {
            Some(card) => hand.dealer.push(card),
            None => break,
        }
    }

    let (player, _) = hand_value(&hand.player);
    let (dealer, _) = hand_value(&hand.dealer);
    let result = if dealer > 21 {
        HandResult::DealerBust
    } else if player > dealer {
        HandResult::PlayerWin
    } else if player < dealer {
        HandResult::DealerWin
    } else {
        HandResult::Push
    };
    settle(hand, result)
}

fn settle(hand: &BlackjackHand, result: HandResult) -> Outcome {
    let bet = hand.bet as i64;
    let payout_delta = match result {
        HandResult::PlayerBust | HandResult::DealerWin => -bet,
        HandResult::DealerBust | HandResult::PlayerWin => bet,
        HandResult::Push => 0,
    };

    let player = hand_label(&hand.player);
    let dealer = hand_label(&hand.dealer);
    let description = match result {
        HandResult::PlayerBust => format!("bust with {} - stake lost", player),
        HandResult::DealerBust => format!("dealer busts with {} - you win", dealer),
        HandResult::PlayerWin => format!("{} beats dealer {} - you win", player, dealer),
        HandResult::DealerWin => format!("dealer {} beats {} - stake lost", dealer, player),
        HandResult::Push => format!("push: {} against dealer {}", player, dealer),
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
    use std::collections::HashSet;

    // Build a hand with a rigged deck; draws pop from the back.
    fn rigged(player: Vec<u8>, dealer: Vec<u8>, deck: Vec<u8>, bet: u64) -> BlackjackHand {
        BlackjackHand {
            player,
            dealer,
            deck,
            bet,
        }
    }

    #[test]
    fn test_hand_values() {
        // A + K = soft 21
        assert_eq!(hand_value(&[0, 12]), (21, true));
        // A + A = soft 12 (11 + 1)
        assert_eq!(hand_value(&[0, 13]), (12, true));
        // 9 + 5 = hard 14 (ranks 9 and 5 are codes 8 and 4)
        assert_eq!(hand_value(&[8, 4]), (14, false));
        // A + 5 + 9 = hard 15
        assert_eq!(hand_value(&[0, 4, 8]), (15, false));
        // K + Q + J = 30, bust
        assert_eq!(hand_value(&[12, 11, 10]).0, 30);
    }

    #[test]
    fn test_natural_detection() {
        assert!(is_natural(&[0, 12]));
        assert!(!is_natural(&[0, 4, 4]));
        assert!(!is_natural(&[8, 4]));
    }

    #[test]
    fn test_deal_draws_without_replacement() {
        let mut rng = StdRng::seed_from_u64(11);
        let bet = Bet::new(10).unwrap();
        let (hand, _) = deal(bet, &mut rng);

        let mut seen: HashSet<u8> = HashSet::new();
        for &card in hand.player.iter().chain(&hand.dealer).chain(&hand.deck) {
            assert!(card < DECK_SIZE);
            assert!(seen.insert(card), "card {} dealt twice", card);
        }
        assert_eq!(seen.len(), DECK_SIZE as usize);
        assert_eq!(hand.player.len(), 2);
        assert_eq!(hand.dealer.len(), 2);
    }

    #[test]
    fn test_player_bust_loses_stake() {
        // Player at 20, next draw is a king.
        let mut hand = rigged(vec![9, 22], vec![8, 21], vec![12], 25);
        let outcome = advance(&mut hand, Move::Hit).expect("bust is terminal");
        assert_eq!(outcome.payout_delta, -25);
        assert_eq!(outcome.total_return(25), 0);
    }

    #[test]
    fn test_stand_player_win() {
        // Player 20 vs dealer 18 (9 + 9); dealer stands, player wins 1:1.
        let mut hand = rigged(vec![9, 22], vec![8, 21], vec![], 25);
        let outcome = advance(&mut hand, Move::Stand).expect("stand is terminal");
        assert_eq!(outcome.payout_delta, 25);
        assert_eq!(outcome.total_return(25), 50);
    }

    #[test]
    fn test_dealer_draws_to_seventeen() {
        // Dealer starts at 9 + 5 = 14 and must draw; deck back is a 3 (code 2),
        // reaching hard 17, then stands against the player's 20.
        let mut hand = rigged(vec![9, 22], vec![8, 4], vec![2], 10);
        let outcome = advance(&mut hand, Move::Stand).expect("terminal");
        assert_eq!(hand_value(&hand.dealer).0, 17);
        assert_eq!(outcome.payout_delta, 10);
    }

    #[test]
    fn test_dealer_bust_pays_even() {
        // Dealer 9 + 5 draws a king: 24, bust.
        let mut hand = rigged(vec![9, 22], vec![8, 4], vec![12], 10);
        let outcome = advance(&mut hand, Move::Stand).expect("terminal");
        assert!(hand_value(&hand.dealer).0 > 21);
        assert_eq!(outcome.payout_delta, 10);
    }

    #[test]
    fn test_push_returns_stake() {
        // Both sides hold 20.
        let mut hand = rigged(vec![9, 22], vec![35, 48], vec![], 40);
        let outcome = advance(&mut hand, Move::Stand).expect("terminal");
        assert_eq!(outcome.payout_delta, 0);
        assert_eq!(outcome.total_return(40), 40);
    }

    #[test]
    fn test_hit_below_21_continues() {
        // Player 5 + 9 = 14 draws a 2: 16, hand stays open.
        let mut hand = rigged(vec![4, 8], vec![9, 22], vec![1], 10);
        assert_eq!(advance(&mut hand, Move::Hit), None);
        assert_eq!(hand.player.len(), 3);
    }

    #[test]
    fn test_natural_pays_three_to_two() {
        // Force a natural by searching seeds; the deal itself stays the unit
        // under test.
        for seed in 0..2000 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (hand, outcome) = deal(Bet::new(20).unwrap(), &mut rng);
            if is_natural(&hand.player) && !is_natural(&hand.dealer) {
                let outcome = outcome.expect("natural is terminal");
                assert_eq!(outcome.payout_delta, 30);
                assert_eq!(outcome.total_return(20), 50);
                return;
            }
        }
        panic!("no player natural found in seed range");
    }
}
