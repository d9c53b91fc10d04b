//! Per-recipient projection of [`GameState`].
//!
//! The host never ships the aggregate itself: each recipient gets a
//! `PublicGameState` computed for their seat, with every other hand
//! reduced to a count and the buried stock reduced to its size. Clients
//! render from this and nothing else.

use serde::{Deserialize, Serialize};

use super::cards::{Card, Suit};
use super::state::{
    Bid, GameOptions, GameState, HandScore, Maker, Phase, Player, Seat, TrickState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayer {
    pub name: String,
    pub is_host: bool,
    pub connected: bool,
    pub seat: Seat,
    pub team: u8,
}

impl From<&Player> for PublicPlayer {
    fn from(p: &Player) -> Self {
        Self {
            name: p.name.clone(),
            is_host: p.is_host,
            connected: p.connected,
            seat: p.seat,
            team: p.team(),
        }
    }
}

/// Hand-in-progress detail, redacted for one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHandState {
    /// The viewer's own cards, sorted.
    pub your_hand: Vec<Card>,
    /// Card counts for every seat, the viewer's included.
    pub hand_counts: [u8; 4],
    pub upcard: Option<Card>,
    pub turned_down: Option<Suit>,
    pub trump: Option<Suit>,
    pub bids: Vec<Bid>,
    pub maker: Option<Maker>,
    pub current_trick: Option<TrickState>,
    pub completed_tricks: Vec<TrickState>,
    pub buried_count: u8,
    pub farmers_pending: Vec<Seat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicGameState {
    pub phase: Phase,
    pub players: Vec<PublicPlayer>,
    pub options: GameOptions,
    pub your_seat: Seat,
    pub dealer: Seat,
    pub turn: Option<Seat>,
    pub scores: [u8; 2],
    pub team_names: [String; 2],
    pub hand_scores: Vec<HandScore>,
    pub hand: PublicHandState,
    /// Cards revealed so far during dealer selection.
    pub dealer_reveals: Vec<(Seat, Card)>,
    pub predetermined_dealer: Option<Seat>,
}

/// Project the aggregate for `viewer`. Only the viewer's hand crosses
/// the wire in full.
pub fn public_for(state: &GameState, viewer: Seat) -> PublicGameState {
    let hand = PublicHandState {
        your_hand: state.hand.hands[viewer as usize].clone(),
        hand_counts: core::array::from_fn(|s| state.hand.hands[s].len() as u8),
        upcard: state.hand.upcard,
        turned_down: state.hand.turned_down,
        trump: state.hand.trump,
        bids: state.hand.bids.clone(),
        maker: state.hand.maker,
        current_trick: state.hand.current_trick.clone(),
        completed_tricks: state.hand.completed_tricks.clone(),
        buried_count: state.hand.buried.len() as u8,
        farmers_pending: state.hand.farmers_pending.clone(),
    };

    PublicGameState {
        phase: state.phase,
        players: state.players.iter().map(PublicPlayer::from).collect(),
        options: state.options,
        your_seat: viewer,
        dealer: state.dealer,
        turn: state.turn,
        scores: state.scores,
        team_names: state.team_names.clone(),
        hand_scores: state.hand_scores.clone(),
        hand,
        dealer_reveals: state
            .dealer_selection
            .as_ref()
            .map(|sel| sel.reveals.clone())
            .unwrap_or_default(),
        predetermined_dealer: state.predetermined_dealer,
    }
}
