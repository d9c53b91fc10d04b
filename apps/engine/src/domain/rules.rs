//! Fixed rule constants and pure scoring/special-hand helpers.

use super::cards::{Card, Rank};

pub const PLAYERS: usize = 4;
pub const TEAMS: usize = 2;
pub const HAND_SIZE: usize = 5;
pub const TRICKS_PER_HAND: usize = 5;
pub const DECK_SIZE: usize = 24;
pub const WINNING_SCORE: u8 = 10;

/// Team index for a seat. Teams are fixed across the table: 0/2 vs 1/3.
#[inline]
pub fn team_for_seat(seat: u8) -> u8 {
    seat % 2
}

/// Points awarded for a completed hand, attributed entirely to one team.
///
/// Returns `(team, points)` where `team` is the making team unless the
/// defenders euchred the maker.
pub fn hand_points(maker_team: u8, maker_tricks: u8, alone: bool) -> (u8, u8) {
    debug_assert!(maker_tricks as usize <= TRICKS_PER_HAND);
    if maker_tricks == TRICKS_PER_HAND as u8 {
        (maker_team, if alone { 4 } else { 2 })
    } else if maker_tricks >= 3 {
        (maker_team, 1)
    } else {
        // Euchred: defenders take 2.
        (1 - maker_team, 2)
    }
}

/// Farmer's hand: a dealt hand consisting entirely of 9s and 10s.
pub fn is_farmers_hand(hand: &[Card]) -> bool {
    hand.len() == HAND_SIZE
        && hand
            .iter()
            .all(|c| matches!(c.rank, Rank::Nine | Rank::Ten))
}
