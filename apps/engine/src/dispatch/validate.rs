//! Ordered, pure message validators.
//!
//! Each client message runs through a fixed list of checks against the
//! current state before any engine operation fires. Checks are pure:
//! first failure wins and nothing has been mutated, so a rejected
//! message leaves no trace. The engine re-enforces every rule; the
//! validators exist to answer bad requests cheaply and with precise
//! codes.

use crate::domain::ranking::effective_suit;
use crate::domain::state::{DealerSelectionMethod, GameState, Phase, Seat};
use crate::domain::tricks::legal_moves;
use crate::errors::{DomainError, ErrorCode};
use crate::protocol::messages::ClientMessage;

/// A validation failure, ready to answer the sender with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub code: ErrorCode,
    pub reason: String,
}

impl Rejection {
    pub fn new(code: ErrorCode, reason: impl Into<String>) -> Self {
        Self { code, reason: reason.into() }
    }
}

impl From<&DomainError> for Rejection {
    fn from(err: &DomainError) -> Self {
        Self::new(err.error_code(), err.reason())
    }
}

pub type Validator = fn(&GameState, Seat, &ClientMessage) -> Result<(), Rejection>;

/// The ordered validator list for one message. Permission-class checks
/// run before turn checks, turn checks before payload checks.
pub fn validators_for(message: &ClientMessage) -> &'static [Validator] {
    match message {
        ClientMessage::JoinRequest { .. } | ClientMessage::Reconnect { .. } => &[],
        ClientMessage::Leave => &[],
        ClientMessage::Rename { .. } => &[name_is_valid],
        ClientMessage::RenameTeam { .. } => &[name_is_valid, team_is_own],
        ClientMessage::SetPredeterminedDealer { .. } => {
            &[sender_is_host, phase_allows, dealer_method_matches, target_seat_occupied]
        }
        ClientMessage::DrawDealerCard => &[phase_allows, dealer_method_matches, seat_has_not_drawn],
        ClientMessage::SwapFarmersHand { .. } => &[seat_is_deciding_farmer, swap_cards_are_held],
        ClientMessage::DeclineFarmersHand => &[seat_is_deciding_farmer],
        ClientMessage::PlaceBid { .. } => &[phase_allows, seat_has_turn],
        ClientMessage::DealerDiscard { .. } => &[phase_allows, seat_is_dealer, card_is_held],
        ClientMessage::PlayCard { .. } => &[phase_allows, seat_has_turn, card_is_held, play_follows_suit],
    }
}

/// Run the message's validators in order, stopping at the first failure.
pub fn run(state: &GameState, seat: Seat, message: &ClientMessage) -> Result<(), Rejection> {
    validators_for(message)
        .iter()
        .try_for_each(|check| check(state, seat, message))
}

fn phase_allows(state: &GameState, _seat: Seat, message: &ClientMessage) -> Result<(), Rejection> {
    let ok = match message {
        ClientMessage::SetPredeterminedDealer { .. } => state.phase == Phase::Lobby,
        ClientMessage::DrawDealerCard => state.phase == Phase::DealerSelection,
        ClientMessage::PlaceBid { .. } => {
            matches!(state.phase, Phase::BiddingRound1 | Phase::BiddingRound2)
        }
        ClientMessage::DealerDiscard { .. } => state.phase == Phase::DealerDiscard,
        ClientMessage::PlayCard { .. } => state.phase == Phase::Playing,
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(Rejection::new(
            ErrorCode::PhaseMismatch,
            format!("Message not valid in {:?}", state.phase),
        ))
    }
}

/// Dealer designation is lobby configuration, which only the host owns.
fn sender_is_host(state: &GameState, seat: Seat, _message: &ClientMessage) -> Result<(), Rejection> {
    if state.player_at(seat).is_some_and(|p| p.is_host) {
        Ok(())
    } else {
        Err(Rejection::new(
            ErrorCode::NotHost,
            "Only the host may assign the dealer",
        ))
    }
}

fn seat_has_turn(state: &GameState, seat: Seat, _message: &ClientMessage) -> Result<(), Rejection> {
    if state.turn == Some(seat) {
        Ok(())
    } else {
        Err(Rejection::new(ErrorCode::OutOfTurn, "Not this seat's turn"))
    }
}

fn seat_is_dealer(state: &GameState, seat: Seat, _message: &ClientMessage) -> Result<(), Rejection> {
    if state.dealer == seat {
        Ok(())
    } else {
        Err(Rejection::new(ErrorCode::OutOfTurn, "Only the dealer may do that"))
    }
}

fn card_is_held(state: &GameState, seat: Seat, message: &ClientMessage) -> Result<(), Rejection> {
    let card = match message {
        ClientMessage::PlayCard { card } | ClientMessage::DealerDiscard { card } => *card,
        _ => return Ok(()),
    };
    if state.hand.hands[seat as usize].contains(&card) {
        Ok(())
    } else {
        Err(Rejection::new(ErrorCode::CardNotInHand, "Card not in hand"))
    }
}

fn play_follows_suit(state: &GameState, seat: Seat, message: &ClientMessage) -> Result<(), Rejection> {
    let ClientMessage::PlayCard { card } = message else {
        return Ok(());
    };
    if legal_moves(state, seat).contains(card) {
        Ok(())
    } else {
        let detail = match (state.hand.current_trick.as_ref().and_then(|t| t.plays.first()), state.hand.trump) {
            (Some(&(_, led)), Some(trump)) => {
                format!("Must follow {:?}", effective_suit(led, trump))
            }
            _ => "Card is not a legal play".to_string(),
        };
        Err(Rejection::new(ErrorCode::MustFollowSuit, detail))
    }
}

fn name_is_valid(_state: &GameState, _seat: Seat, message: &ClientMessage) -> Result<(), Rejection> {
    let name = match message {
        ClientMessage::Rename { name } | ClientMessage::RenameTeam { name, .. } => name,
        _ => return Ok(()),
    };
    if name.trim().is_empty() || name.len() > 24 {
        Err(Rejection::new(
            ErrorCode::InvalidName,
            "Display name must be 1-24 characters",
        ))
    } else {
        Ok(())
    }
}

/// Players may only rename the team they sit on.
fn team_is_own(_state: &GameState, seat: Seat, message: &ClientMessage) -> Result<(), Rejection> {
    let ClientMessage::RenameTeam { team, .. } = message else {
        return Ok(());
    };
    if *team == seat % 2 {
        Ok(())
    } else {
        Err(Rejection::new(
            ErrorCode::ValidationError,
            "Cannot rename the opposing team",
        ))
    }
}

fn dealer_method_matches(state: &GameState, _seat: Seat, message: &ClientMessage) -> Result<(), Rejection> {
    let required = match message {
        ClientMessage::DrawDealerCard => DealerSelectionMethod::CardDraw,
        ClientMessage::SetPredeterminedDealer { .. } => DealerSelectionMethod::HostAssigned,
        _ => return Ok(()),
    };
    if state.options.dealer_selection == required {
        Ok(())
    } else {
        Err(Rejection::new(
            ErrorCode::WrongDealerMethod,
            "Dealer-selection method does not allow that",
        ))
    }
}

fn seat_has_not_drawn(state: &GameState, seat: Seat, _message: &ClientMessage) -> Result<(), Rejection> {
    let drawn = state
        .dealer_selection
        .as_ref()
        .is_some_and(|sel| sel.reveals.iter().any(|&(s, _)| s == seat));
    if drawn {
        Err(Rejection::new(ErrorCode::OutOfTurn, "Seat has already drawn"))
    } else {
        Ok(())
    }
}

fn target_seat_occupied(state: &GameState, _seat: Seat, message: &ClientMessage) -> Result<(), Rejection> {
    let ClientMessage::SetPredeterminedDealer { seat: target } = message else {
        return Ok(());
    };
    if state.player_at(*target).is_some() {
        Ok(())
    } else {
        Err(Rejection::new(ErrorCode::PlayerNotFound, "Seat is empty"))
    }
}

fn seat_is_deciding_farmer(state: &GameState, seat: Seat, _message: &ClientMessage) -> Result<(), Rejection> {
    match state.phase {
        Phase::FarmersHandSwap { seat: deciding } if deciding == seat => Ok(()),
        Phase::FarmersHandSwap { .. } => Err(Rejection::new(
            ErrorCode::OutOfTurn,
            "Another seat is deciding on a swap",
        )),
        _ => Err(Rejection::new(
            ErrorCode::PhaseMismatch,
            "No farmer's-hand decision pending",
        )),
    }
}

fn swap_cards_are_held(state: &GameState, seat: Seat, message: &ClientMessage) -> Result<(), Rejection> {
    let ClientMessage::SwapFarmersHand { cards } = message else {
        return Ok(());
    };
    let hand = &state.hand.hands[seat as usize];
    if cards[0] != cards[1]
        && cards[0] != cards[2]
        && cards[1] != cards[2]
        && cards.iter().all(|c| hand.contains(c))
    {
        Ok(())
    } else {
        Err(Rejection::new(
            ErrorCode::InvalidSwap,
            "Swap must name three distinct held cards",
        ))
    }
}
