//! Deterministic deck construction and dealing.
//!
//! Shuffles are seeded so the host can replay a deal from a persisted
//! snapshot and tests stay reproducible.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::cards::{Card, Rank, Suit};
use super::rules::{DECK_SIZE, HAND_SIZE, PLAYERS};

/// The 24-card Euchre deck in standard order.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card { suit, rank });
        }
    }
    deck
}

/// Fisher-Yates shuffle with a seeded RNG.
pub fn shuffled_deck(seed: u64) -> Vec<Card> {
    let mut deck = full_deck();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    deck.shuffle(&mut rng);
    deck
}

/// A completed deal: five cards per seat, the turned-up kitty card, and
/// the three buried cards (farmer's-hand swap stock).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: [Vec<Card>; PLAYERS],
    pub upcard: Card,
    pub buried: Vec<Card>,
}

/// Deal a hand from a seeded shuffle. Hands are sorted for stable display
/// and comparison; play order does not depend on hand order.
pub fn deal_hand(seed: u64) -> Deal {
    let deck = shuffled_deck(seed);

    let mut hands: [Vec<Card>; PLAYERS] = Default::default();
    for (seat, hand) in hands.iter_mut().enumerate() {
        let start = seat * HAND_SIZE;
        let mut cards = deck[start..start + HAND_SIZE].to_vec();
        cards.sort();
        *hand = cards;
    }

    let upcard = deck[PLAYERS * HAND_SIZE];
    let buried = deck[PLAYERS * HAND_SIZE + 1..].to_vec();

    Deal {
        hands,
        upcard,
        buried,
    }
}
