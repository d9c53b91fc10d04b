//! Trump-aware card ranking: bowers, effective suit, trick comparison.
//!
//! Every "may I play this card" and "who wins this trick" decision must go
//! through [`effective_suit`] and [`card_beats`]. The printed suit of the
//! left bower lies.

use super::cards::{Card, Rank, Suit};

/// The trump-suit Jack, highest card in the hand.
pub fn is_right_bower(card: Card, trump: Suit) -> bool {
    card.rank == Rank::Jack && card.suit == trump
}

/// The same-color off-suit Jack, second-highest; reclassified as trump.
pub fn is_left_bower(card: Card, trump: Suit) -> bool {
    card.rank == Rank::Jack && card.suit == trump.same_color_partner()
}

/// Suit of a card for follow and trick-resolution purposes: trump for both
/// bowers, printed suit otherwise.
pub fn effective_suit(card: Card, trump: Suit) -> Suit {
    if is_left_bower(card, trump) {
        trump
    } else {
        card.suit
    }
}

pub fn hand_has_effective_suit(hand: &[Card], suit: Suit, trump: Suit) -> bool {
    hand.iter().any(|&c| effective_suit(c, trump) == suit)
}

/// In-suit strength below the bowers. A non-trump Jack that is not the
/// left bower has no rank of its own and counts with the Ten; the trump
/// tier never sees a Jack because both bowers are handled first.
fn in_suit_value(rank: Rank) -> u8 {
    match rank {
        Rank::Nine => 1,
        Rank::Ten | Rank::Jack => 2,
        Rank::Queen => 3,
        Rank::King => 4,
        Rank::Ace => 5,
    }
}

/// Comparable strength of a card within a trick.
///
/// Tiers: right bower > left bower > plain trump (A K Q 10 9) > lead suit
/// (A K Q, then J with 10, then 9) > everything else (value 0, cannot
/// win). `lead` must be the effective suit of the led card.
fn trick_value(card: Card, trump: Suit, lead: Suit) -> u8 {
    if is_right_bower(card, trump) {
        return 53;
    }
    if is_left_bower(card, trump) {
        return 52;
    }
    if card.suit == trump {
        return 40 + in_suit_value(card.rank);
    }
    if card.suit == lead {
        return 20 + in_suit_value(card.rank);
    }
    0
}

/// Whether `candidate` beats the current `incumbent` of a trick.
///
/// Strictly-greater comparison, so the incumbent keeps every tie: an
/// off-suit card never unseats another (both value 0), and a lead-suit
/// Jack never unseats the lead-suit Ten it ranks with.
pub fn card_beats(candidate: Card, incumbent: Card, lead: Suit, trump: Suit) -> bool {
    trick_value(candidate, trump, lead) > trick_value(incumbent, trump, lead)
}

/// Rank value for the dealer-selection draw: Nine low through Ace high,
/// lowest card deals. Ties on rank are broken by the stable `Card`
/// ordering, never by redraw.
pub fn draw_value(card: Card) -> u8 {
    card.rank as u8
}
