//! Farmer's hand: an all-9s-and-10s deal may swap three cards into the
//! buried stock. The kitty upcard itself is never touched.

use super::cards::Card;
use super::rules::is_farmers_hand;
use super::state::{GameState, Phase, Seat};
use crate::errors::domain::{DomainError, ValidationKind};

/// Seats holding a farmer's hand, in decision order from left of the
/// dealer.
pub fn eligible_seats(state: &GameState) -> Vec<Seat> {
    let mut seats = Vec::new();
    let mut seat = state.next_active_seat(state.dealer);
    for _ in 0..4 {
        if is_farmers_hand(&state.hand.hands[seat as usize]) {
            seats.push(seat);
        }
        if seat == state.dealer {
            break;
        }
        seat = state.next_active_seat(seat);
    }
    seats
}

fn expect_deciding_seat(state: &GameState, seat: Seat) -> Result<(), DomainError> {
    match state.phase {
        Phase::FarmersHandSwap { seat: deciding } if deciding == seat => Ok(()),
        Phase::FarmersHandSwap { .. } => Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            "Another seat is deciding on a swap",
        )),
        _ => Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "No farmer's-hand decision pending",
        )),
    }
}

/// Swap exactly three held cards for the three buried cards.
pub fn swap(state: &mut GameState, seat: Seat, cards: [Card; 3]) -> Result<(), DomainError> {
    expect_deciding_seat(state, seat)?;

    // All three must be distinct and held.
    if cards[0] == cards[1] || cards[0] == cards[2] || cards[1] == cards[2] {
        return Err(DomainError::validation(
            ValidationKind::InvalidSwap,
            "Swap cards must be distinct",
        ));
    }
    let hand = &state.hand.hands[seat as usize];
    if !cards.iter().all(|c| hand.contains(c)) {
        return Err(DomainError::validation(
            ValidationKind::InvalidSwap,
            "Swap must name three held cards",
        ));
    }
    if state.hand.buried.len() != 3 {
        return Err(DomainError::validation_other(
            "Invariant violated: buried stock is not three cards",
        ));
    }

    let hand = &mut state.hand.hands[seat as usize];
    let mut returned = Vec::with_capacity(3);
    for card in cards {
        let pos = hand.iter().position(|&c| c == card).expect("held checked above");
        returned.push(hand.remove(pos));
    }
    hand.append(&mut state.hand.buried);
    hand.sort();
    state.hand.buried = returned;

    advance_after_decision(state);
    Ok(())
}

/// Decline the swap and move on.
pub fn decline(state: &mut GameState, seat: Seat) -> Result<(), DomainError> {
    expect_deciding_seat(state, seat)?;
    advance_after_decision(state);
    Ok(())
}

/// Pop the decided seat off the pending queue and either hand the
/// decision to the next farmer or open bidding.
fn advance_after_decision(state: &mut GameState) {
    if !state.hand.farmers_pending.is_empty() {
        state.hand.farmers_pending.remove(0);
    }
    match state.hand.farmers_pending.first() {
        Some(&next) => {
            state.phase = Phase::FarmersHandSwap { seat: next };
        }
        None => {
            state.phase = Phase::BiddingRound1;
            state.turn = Some(state.next_active_seat(state.dealer));
        }
    }
}
