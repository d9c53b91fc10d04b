//! The authoritative game aggregate and seat math.
//!
//! `GameState` is owned exclusively by the host's engine instance; every
//! mutation goes through a named operation in this module's siblings.
//! Clients never hold a `GameState`, only the redacted projection in
//! [`crate::domain::snapshot`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cards::{Card, Suit};
use super::rules::{team_for_seat, PLAYERS};

pub type Seat = u8; // 0..=3, fixed ring; dealer always reseated to 0

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl GameId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Overall game progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// Players joining, options editable, seats movable.
    Lobby,
    /// Dealer being determined (card draw or first black jack).
    DealerSelection,
    /// Teams settled after reseating; paced before the first deal.
    TeamSummary,
    /// Cards going out; paced so clients can animate.
    Dealing,
    /// Host checking dealt hands for farmer's hands.
    FarmersHandCheck,
    /// Named seat deciding whether to swap into the buried cards.
    FarmersHandSwap { seat: Seat },
    /// Order-up round against the turned-up kitty card.
    BiddingRound1,
    /// Name-any-suit round after the kitty was turned down.
    BiddingRound2,
    /// Dealer picked up the kitty card and must shed back to five.
    DealerDiscard,
    /// Trick-by-trick play.
    Playing,
    /// A trick resolved; paced before the next lead.
    TrickComplete,
    /// Hand scored; paced before the next deal.
    HandComplete,
    /// A team reached the winning score. Terminal.
    GameComplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    pub connected: bool,
    pub seat: Seat,
}

impl Player {
    pub fn team(&self) -> u8 {
        team_for_seat(self.seat)
    }
}

/// How teams are formed when the game starts.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum TeamAssignment {
    /// Keep the lobby ring: seat parity after the dealer rotation.
    SeatingOrder,
    /// Partner the two lowest dealer-selection draws.
    CardDraw,
}

/// How the first dealer is determined.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum DealerSelectionMethod {
    /// Everyone draws one card; lowest deals.
    CardDraw,
    /// Deal around until a black Jack appears.
    FirstBlackJack,
    /// Host designates the dealer in the lobby.
    HostAssigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    pub team_assignment: TeamAssignment,
    pub dealer_selection: DealerSelectionMethod,
    /// When true, follow-suit is not enforced.
    pub allow_reneging: bool,
    /// When true, the dealer may not pass in round 2.
    pub dealer_must_call: bool,
    /// When true, an all-9s-and-10s hand may swap into the buried cards.
    pub farmers_hand: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            team_assignment: TeamAssignment::SeatingOrder,
            dealer_selection: DealerSelectionMethod::CardDraw,
            allow_reneging: false,
            dealer_must_call: false,
            farmers_hand: false,
        }
    }
}

/// A single bidding action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidCall {
    Pass,
    /// Round 1: take the kitty suit as trump (dealer picks up the card).
    OrderUp { alone: bool },
    /// Round 2: name any suit except the turned-down one.
    Call { suit: Suit, alone: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub seat: Seat,
    pub call: BidCall,
}

/// The player/team that named trump this hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maker {
    pub seat: Seat,
    pub team: u8,
    pub alone: bool,
}

/// One trick: ordered plays, the leader, and the winner once complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickState {
    pub leader: Seat,
    pub plays: Vec<(Seat, Card)>,
    pub winner: Option<Seat>,
}

impl TrickState {
    pub fn led_by(leader: Seat) -> Self {
        Self {
            leader,
            plays: Vec::with_capacity(PLAYERS),
            winner: None,
        }
    }
}

/// Per-hand container, cleared at every new-hand boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandState {
    pub hands: [Vec<Card>; PLAYERS],
    /// Kitty card turned up for round-1 bidding; None once picked up.
    pub upcard: Option<Card>,
    /// Bottom three cards, untouched except by a farmer's-hand swap.
    pub buried: Vec<Card>,
    pub trump: Option<Suit>,
    /// Suit turned down when round 1 passed out; barred in round 2.
    pub turned_down: Option<Suit>,
    /// Append-only across both bidding rounds.
    pub bids: Vec<Bid>,
    pub maker: Option<Maker>,
    pub current_trick: Option<TrickState>,
    pub completed_tricks: Vec<TrickState>,
    /// Seats still owed a farmer's-hand decision, in order from left of
    /// the dealer.
    pub farmers_pending: Vec<Seat>,
}

impl HandState {
    pub fn empty() -> Self {
        Self {
            hands: Default::default(),
            upcard: None,
            buried: Vec::new(),
            trump: None,
            turned_down: None,
            bids: Vec::new(),
            maker: None,
            current_trick: None,
            completed_tricks: Vec::new(),
            farmers_pending: Vec::new(),
        }
    }

    /// The seat sitting out because their partner went alone.
    pub fn sitting_out(&self) -> Option<Seat> {
        self.maker
            .filter(|m| m.alone)
            .map(|m| partner_of(m.seat))
    }

    /// Plays required to complete a trick this hand.
    pub fn trick_size(&self) -> usize {
        if self.sitting_out().is_some() {
            PLAYERS - 1
        } else {
            PLAYERS
        }
    }

    pub fn tricks_won_by_team(&self) -> [u8; 2] {
        let mut won = [0u8; 2];
        for trick in &self.completed_tricks {
            if let Some(winner) = trick.winner {
                won[team_for_seat(winner) as usize] += 1;
            }
        }
        won
    }
}

/// Dealer-selection scratch state, dropped once the dealer is settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealerSelectionState {
    /// Remaining shuffled selection deck (dealt from the front).
    pub deck: Vec<Card>,
    /// Cards revealed so far, in reveal order.
    pub reveals: Vec<(Seat, Card)>,
    /// Seat owed the next draw (card draw) or next dealt card (black jack).
    pub next_seat: Seat,
}

/// Points awarded for one completed hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandScore {
    pub team: u8,
    pub points: u8,
    pub maker: Maker,
    pub tricks: [u8; 2],
}

/// The single authoritative aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub id: GameId,
    /// Seated players, kept sorted by seat.
    pub players: Vec<Player>,
    pub options: GameOptions,
    pub phase: Phase,
    pub dealer: Seat,
    /// Seat expected to act, when anyone is.
    pub turn: Option<Seat>,
    /// Team scores; first to `WINNING_SCORE` wins.
    pub scores: [u8; 2],
    pub hand_scores: Vec<HandScore>,
    pub team_names: [String; 2],
    pub hand: HandState,
    pub dealer_selection: Option<DealerSelectionState>,
    /// Dealer chosen ahead of time under the host-assigned method.
    pub predetermined_dealer: Option<Seat>,
    /// Seed for the next shuffle; advanced after every deal.
    pub next_seed: u64,
}

/// Seat / turn math helpers (4 fixed seats: 0..=3).
#[inline]
pub fn seat_offset(seat: Seat, delta: i8) -> Seat {
    let seat_i = seat as i16;
    let delta_i = delta as i16;
    ((seat_i + delta_i).rem_euclid(PLAYERS as i16)) as Seat
}

/// Next seat clockwise (0 → 1 → 2 → 3 → 0).
#[inline]
pub fn next_seat(seat: Seat) -> Seat {
    seat_offset(seat, 1)
}

/// The seat across the table, always a teammate.
#[inline]
pub fn partner_of(seat: Seat) -> Seat {
    seat_offset(seat, 2)
}

/// First seat to act in a hand: left of the dealer.
#[inline]
pub fn left_of_dealer(dealer: Seat) -> Seat {
    next_seat(dealer)
}

impl GameState {
    pub fn new(id: GameId, host: Player, seed: u64) -> Self {
        debug_assert_eq!(host.seat, 0);
        Self {
            id,
            players: vec![host],
            options: GameOptions::default(),
            phase: Phase::Lobby,
            dealer: 0,
            turn: None,
            scores: [0; 2],
            hand_scores: Vec::new(),
            team_names: ["Team 1".to_string(), "Team 2".to_string()],
            hand: HandState::empty(),
            dealer_selection: None,
            predetermined_dealer: None,
            next_seed: seed,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn player_at(&self, seat: Seat) -> Option<&Player> {
        self.players.iter().find(|p| p.seat == seat)
    }

    pub fn seat_of(&self, id: PlayerId) -> Option<Seat> {
        self.player(id).map(|p| p.seat)
    }

    /// Next seat clockwise that is actually playing this hand.
    pub fn next_active_seat(&self, seat: Seat) -> Seat {
        let mut next = next_seat(seat);
        if self.hand.sitting_out() == Some(next) {
            next = next_seat(next);
        }
        next
    }

    pub fn sort_players_by_seat(&mut self) {
        self.players.sort_by_key(|p| p.seat);
    }
}
