//! Trick play: legality, play resolution, and the phase steps that hang
//! off a completed trick.

use super::cards::{Card, Suit};
use super::ranking::{card_beats, effective_suit, hand_has_effective_suit};
use super::rules::TRICKS_PER_HAND;
use super::scoring::apply_hand_score;
use super::state::{GameState, Phase, Seat, TrickState};
use crate::errors::domain::{DomainError, ValidationKind};

/// Result of playing a card, describing what state changes occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayCardResult {
    pub trick_completed: bool,
    pub trick_winner: Option<Seat>,
    /// The fifth trick scored the hand.
    pub hand_completed: bool,
    /// Scoring pushed a team to the winning score.
    pub game_completed: bool,
}

/// Open the first trick of a hand: left of the dealer leads, skipping a
/// seat sitting out on an alone call.
pub fn begin_play(state: &mut GameState) {
    let leader = state.next_active_seat(state.dealer);
    state.hand.current_trick = Some(TrickState::led_by(leader));
    state.turn = Some(leader);
    state.phase = Phase::Playing;
}

/// Open the next trick, led by the previous winner.
pub fn begin_next_trick(state: &mut GameState, leader: Seat) {
    state.hand.current_trick = Some(TrickState::led_by(leader));
    state.turn = Some(leader);
    state.phase = Phase::Playing;
}

/// Compute the cards `seat` may legally play, independent of turn
/// enforcement. Legality is judged on effective suit, never printed suit.
pub fn legal_moves(state: &GameState, seat: Seat) -> Vec<Card> {
    if state.phase != Phase::Playing {
        return Vec::new();
    }
    let hand = &state.hand.hands[seat as usize];
    let Some(trump) = state.hand.trump else {
        return Vec::new();
    };
    let Some(trick) = &state.hand.current_trick else {
        return Vec::new();
    };

    // First card of a trick is always legal; so is anything when the
    // reneging rule is switched off the enforcement.
    let Some(&(_, led)) = trick.plays.first() else {
        return hand.clone();
    };
    if state.options.allow_reneging {
        return hand.clone();
    }

    let lead = effective_suit(led, trump);
    if hand_has_effective_suit(hand, lead, trump) {
        hand.iter()
            .copied()
            .filter(|&c| effective_suit(c, trump) == lead)
            .collect()
    } else {
        hand.clone()
    }
}

/// Play a card into the current trick, enforcing phase, turn, possession,
/// and suit-following.
pub fn play_card(state: &mut GameState, seat: Seat, card: Card) -> Result<PlayCardResult, DomainError> {
    if state.phase != Phase::Playing {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Not in trick play",
        ));
    }
    if state.turn != Some(seat) {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            "Out of turn",
        ));
    }

    let pos = state.hand.hands[seat as usize]
        .iter()
        .position(|&c| c == card)
        .ok_or_else(|| {
            DomainError::validation(ValidationKind::CardNotInHand, "Card not in hand")
        })?;

    let legal = legal_moves(state, seat);
    if !legal.contains(&card) {
        return Err(DomainError::validation(
            ValidationKind::MustFollowSuit,
            "Must follow the led suit",
        ));
    }

    let removed = state.hand.hands[seat as usize].remove(pos);
    let trick_size = state.hand.trick_size();
    let trick = state
        .hand
        .current_trick
        .as_mut()
        .ok_or_else(|| DomainError::validation_other("Invariant violated: no open trick"))?;
    trick.plays.push((seat, removed));

    if trick.plays.len() < trick_size {
        state.turn = Some(state.next_active_seat(seat));
        return Ok(PlayCardResult {
            trick_completed: false,
            trick_winner: None,
            hand_completed: false,
            game_completed: false,
        });
    }

    // Trick complete: resolve and either pause for pacing or score the
    // hand when this was the fifth.
    let trump = state
        .hand
        .trump
        .ok_or_else(|| DomainError::validation_other("Invariant violated: no trump in play"))?;
    let mut trick = state
        .hand
        .current_trick
        .take()
        .expect("trick presence checked above");
    let winner = resolve_trick(&trick.plays, trump)
        .ok_or_else(|| DomainError::validation_other("Invariant violated: empty trick"))?;
    trick.winner = Some(winner);
    state.hand.completed_tricks.push(trick);
    state.turn = None;

    if state.hand.completed_tricks.len() < TRICKS_PER_HAND {
        state.phase = Phase::TrickComplete;
        return Ok(PlayCardResult {
            trick_completed: true,
            trick_winner: Some(winner),
            hand_completed: false,
            game_completed: false,
        });
    }

    let game_completed = apply_hand_score(state)?;
    Ok(PlayCardResult {
        trick_completed: true,
        trick_winner: Some(winner),
        hand_completed: true,
        game_completed,
    })
}

/// Winner of a completed set of plays: highest trump, else highest card
/// following the lead's effective suit.
pub fn resolve_trick(plays: &[(Seat, Card)], trump: Suit) -> Option<Seat> {
    let &(_, led) = plays.first()?;
    let lead = effective_suit(led, trump);

    let mut best = 0usize;
    for i in 1..plays.len() {
        if card_beats(plays[i].1, plays[best].1, lead, trump) {
            best = i;
        }
    }
    Some(plays[best].0)
}
