//! Dealer selection: card draw, first black Jack, host-assigned — and the
//! mandatory reseating that follows.
//!
//! After the dealer is determined, seats are renumbered so the dealer
//! occupies seat 0 and teams are recomputed from the new seats. All
//! subsequent turn order depends on seat-0-is-dealer.

use super::cards::{Card, Color, Rank, Suit};
use super::ranking::draw_value;
use super::state::{Player, Seat, TeamAssignment};

/// Whether this card ends a first-black-jack deal.
pub fn is_black_jack(card: Card) -> bool {
    card.rank == Rank::Jack && card.suit.color() == Color::Black
}

/// The seat holding the strictly lowest draw. Rank ties are broken by the
/// stable `Card` identity ordering, never by redraw.
pub fn lowest_draw(reveals: &[(Seat, Card)]) -> Seat {
    debug_assert!(!reveals.is_empty());
    reveals
        .iter()
        .min_by_key(|(_, card)| (draw_value(*card), *card))
        .map(|(seat, _)| *seat)
        .expect("reveals is non-empty")
}

/// Seat order for card-draw team assignment: ascending by draw. The two
/// lowest draws are partners; the lowest deals.
fn draw_order(reveals: &[(Seat, Card)]) -> Vec<Seat> {
    let mut ordered: Vec<(Seat, Card)> = reveals.to_vec();
    ordered.sort_by_key(|(_, card)| (draw_value(*card), *card));
    ordered.into_iter().map(|(seat, _)| seat).collect()
}

/// Renumber seats so `dealer` lands on seat 0.
///
/// - `SeatingOrder`: the ring rotates intact, preserving existing
///   partnerships.
/// - `CardDraw`: the two lowest draws are seated 0 and 2 (partners), the
///   two highest 1 and 3.
///
/// Players are left sorted by their new seat.
pub fn reseat_for_dealer(
    players: &mut [Player],
    dealer: Seat,
    team_assignment: TeamAssignment,
    reveals: &[(Seat, Card)],
) {
    match team_assignment {
        TeamAssignment::SeatingOrder => {
            for player in players.iter_mut() {
                player.seat = (player.seat as i16 - dealer as i16).rem_euclid(4) as Seat;
            }
        }
        TeamAssignment::CardDraw => {
            debug_assert_eq!(reveals.len(), players.len());
            let ordered = draw_order(reveals);
            // ordered[0] is the dealer.
            let new_seats: [Seat; 4] = [0, 2, 1, 3];
            for (idx, old_seat) in ordered.iter().enumerate() {
                if let Some(player) = players.iter_mut().find(|p| p.seat == *old_seat) {
                    player.seat = new_seats[idx];
                }
            }
        }
    }
    players.sort_by_key(|p| p.seat);
}
