//! Bidding rounds: ordering up the kitty, naming trump, dealer discard.

use super::state::{Bid, BidCall, GameState, Maker, Phase, Seat};
use super::tricks::begin_play;
use crate::domain::rules::team_for_seat;
use crate::errors::domain::{DomainError, ValidationKind};

/// What a successful bid changed, so callers know which follow-up
/// messages to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidOutcome {
    /// Bid recorded, next seat to act.
    Continue,
    /// Round 1 passed out; round 2 open with the kitty suit barred.
    RoundTwoStarted,
    /// Trump named via order-up; dealer must discard down to five.
    AwaitingDealerDiscard,
    /// Trump named; first trick underway.
    PlayStarted,
    /// Round 2 passed out with no forced call; hand must be redealt.
    ThrownIn,
}

/// Record a bid for `seat`, enforcing phase, turn, and call legality.
pub fn place_bid(state: &mut GameState, seat: Seat, call: BidCall) -> Result<BidOutcome, DomainError> {
    let round_one = match state.phase {
        Phase::BiddingRound1 => true,
        Phase::BiddingRound2 => false,
        _ => {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "Not in a bidding phase",
            ))
        }
    };

    if state.turn != Some(seat) {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            "Not this seat's turn to bid",
        ));
    }

    match (round_one, call) {
        (true, BidCall::Pass) => {
            state.hand.bids.push(Bid { seat, call });
            if state.hand.bids.len() == 4 {
                let upcard = state.hand.upcard.ok_or_else(|| {
                    DomainError::validation_other("Invariant violated: no upcard in round 1")
                })?;
                state.hand.turned_down = Some(upcard.suit);
                state.phase = Phase::BiddingRound2;
                state.turn = Some(state.next_active_seat(state.dealer));
                Ok(BidOutcome::RoundTwoStarted)
            } else {
                state.turn = Some(state.next_active_seat(seat));
                Ok(BidOutcome::Continue)
            }
        }
        (true, BidCall::OrderUp { alone }) => {
            let upcard = state.hand.upcard.take().ok_or_else(|| {
                DomainError::validation_other("Invariant violated: no upcard in round 1")
            })?;
            state.hand.bids.push(Bid { seat, call });
            state.hand.trump = Some(upcard.suit);
            state.hand.maker = Some(Maker {
                seat,
                team: team_for_seat(seat),
                alone,
            });

            // Dealer takes the kitty card regardless; the discard is
            // skipped only when the dealer sits out on an alone call.
            let dealer = state.dealer;
            state.hand.hands[dealer as usize].push(upcard);
            state.hand.hands[dealer as usize].sort();

            if state.hand.sitting_out() == Some(dealer) {
                begin_play(state);
                Ok(BidOutcome::PlayStarted)
            } else {
                state.phase = Phase::DealerDiscard;
                state.turn = Some(dealer);
                Ok(BidOutcome::AwaitingDealerDiscard)
            }
        }
        (true, BidCall::Call { .. }) => Err(DomainError::validation(
            ValidationKind::InvalidBid,
            "Round 1 only allows ordering up the kitty suit",
        )),
        (false, BidCall::Pass) => {
            if seat == state.dealer && state.options.dealer_must_call {
                return Err(DomainError::validation(
                    ValidationKind::DealerMustCall,
                    "Dealer must name trump",
                ));
            }
            state.hand.bids.push(Bid { seat, call });
            if state.hand.bids.len() == 8 {
                Ok(BidOutcome::ThrownIn)
            } else {
                state.turn = Some(state.next_active_seat(seat));
                Ok(BidOutcome::Continue)
            }
        }
        (false, BidCall::Call { suit, alone }) => {
            if state.hand.turned_down == Some(suit) {
                return Err(DomainError::validation(
                    ValidationKind::InvalidBid,
                    "Cannot call the turned-down suit",
                ));
            }
            state.hand.bids.push(Bid { seat, call });
            state.hand.trump = Some(suit);
            state.hand.maker = Some(Maker {
                seat,
                team: team_for_seat(seat),
                alone,
            });
            begin_play(state);
            Ok(BidOutcome::PlayStarted)
        }
        (false, BidCall::OrderUp { .. }) => Err(DomainError::validation(
            ValidationKind::InvalidBid,
            "The kitty suit was turned down",
        )),
    }
}

/// Dealer sheds one card back to five after picking up the kitty card.
pub fn dealer_discard(state: &mut GameState, seat: Seat, card: super::cards::Card) -> Result<(), DomainError> {
    if state.phase != Phase::DealerDiscard {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "No discard expected",
        ));
    }
    if seat != state.dealer {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            "Only the dealer discards",
        ));
    }

    let hand = &mut state.hand.hands[seat as usize];
    let Some(pos) = hand.iter().position(|&c| c == card) else {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            "Card not in hand",
        ));
    };
    let removed = hand.remove(pos);
    state.hand.buried.push(removed);

    begin_play(state);
    Ok(())
}
