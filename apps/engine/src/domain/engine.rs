//! `GameEngine`: the single mutation surface over [`GameState`].
//!
//! One instance per hosted session, owned by the host's dispatch layer.
//! Every operation names the transition it performs; callers never poke
//! fields. Clients do not construct an engine at all — they mirror the
//! host's broadcast snapshots.

use tracing::{debug, info};

use super::bidding::{self, BidOutcome};
use super::cards::Card;
use super::dealer::{is_black_jack, lowest_draw, reseat_for_dealer};
use super::dealing::{deal_hand, shuffled_deck};
use super::farmers;
use super::snapshot::{public_for, PublicGameState};
use super::state::{
    next_seat, BidCall, DealerSelectionMethod, DealerSelectionState, GameId, GameOptions,
    GameState, HandState, Phase, Player, PlayerId, Seat, TeamAssignment,
};
use super::tricks::{self, PlayCardResult};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};

const MAX_NAME_LEN: usize = 24;

// Golden-ratio increment keeps successive deals decorrelated while the
// whole session stays replayable from the initial seed.
const SEED_INCREMENT: u64 = 0x9E3779B97F4A7C15;

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() || name.len() > MAX_NAME_LEN {
        return Err(DomainError::validation(
            ValidationKind::InvalidName,
            "Display name must be 1-24 characters",
        ));
    }
    Ok(())
}

/// Result of revealing one dealer-selection card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealResult {
    pub seat: Seat,
    pub card: Card,
    /// Dealer settled and seats renumbered.
    pub selection_complete: bool,
}

pub struct GameEngine {
    state: GameState,
}

impl GameEngine {
    /// Host a new session. The host is seated at 0 with phase `Lobby`.
    pub fn new_game(id: GameId, host_id: PlayerId, host_name: &str, seed: u64) -> Result<Self, DomainError> {
        validate_name(host_name)?;
        let host = Player {
            id: host_id,
            name: host_name.to_string(),
            is_host: true,
            connected: true,
            seat: 0,
        };
        info!(game_id = %id, "hosting new game");
        Ok(Self {
            state: GameState::new(id, host, seed),
        })
    }

    /// Rebuild an engine from a persisted host snapshot.
    pub fn resume(state: GameState) -> Self {
        info!(game_id = %state.id, phase = ?state.phase, "resuming game from snapshot");
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Redacted projection for one recipient. Recomputed per message,
    /// never cached — hands change every play.
    pub fn snapshot_for(&self, viewer: Seat) -> PublicGameState {
        public_for(&self.state, viewer)
    }

    fn require_phase(&self, phase: Phase, what: &str) -> Result<(), DomainError> {
        if self.state.phase != phase {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!("{what} is only valid in {phase:?}"),
            ));
        }
        Ok(())
    }

    // ---- lobby operations ----

    pub fn add_player(&mut self, id: PlayerId, name: &str) -> Result<Seat, DomainError> {
        self.require_phase(Phase::Lobby, "Joining")?;
        validate_name(name)?;
        if self.state.player(id).is_some() {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyJoined,
                "Player already seated",
            ));
        }
        let seat = (0..4)
            .map(|s| s as Seat)
            .find(|&s| self.state.player_at(s).is_none())
            .ok_or_else(|| DomainError::conflict(ConflictKind::GameFull, "Game already has four players"))?;

        self.state.players.push(Player {
            id,
            name: name.to_string(),
            is_host: false,
            connected: true,
            seat,
        });
        self.state.sort_players_by_seat();
        info!(game_id = %self.state.id, player = %id, seat, "player joined");
        Ok(seat)
    }

    /// Leave the game. In the lobby the seat is vacated; mid-game the
    /// player is only marked disconnected so they can rejoin.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), DomainError> {
        if self.state.player(id).is_none() {
            return Err(DomainError::not_found(NotFoundKind::Player, "No such player"));
        }
        if self.state.phase == Phase::Lobby {
            self.state.players.retain(|p| p.id != id);
            info!(game_id = %self.state.id, player = %id, "player left lobby");
        } else {
            self.update_player_connection(id, false)?;
        }
        Ok(())
    }

    /// Kick is a lobby-only host action; the seat is freed.
    pub fn kick_player(&mut self, id: PlayerId) -> Result<(), DomainError> {
        self.require_phase(Phase::Lobby, "Kicking")?;
        if self.state.player(id).is_none() {
            return Err(DomainError::not_found(NotFoundKind::Player, "No such player"));
        }
        self.state.players.retain(|p| p.id != id);
        info!(game_id = %self.state.id, player = %id, "player kicked");
        Ok(())
    }

    pub fn rename_player(&mut self, id: PlayerId, name: &str) -> Result<(), DomainError> {
        validate_name(name)?;
        let player = self
            .state
            .player_mut(id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "No such player"))?;
        player.name = name.to_string();
        Ok(())
    }

    pub fn rename_team(&mut self, team: u8, name: &str) -> Result<(), DomainError> {
        validate_name(name)?;
        if team > 1 {
            return Err(DomainError::not_found(NotFoundKind::Seat, "No such team"));
        }
        self.state.team_names[team as usize] = name.to_string();
        Ok(())
    }

    /// Move a player to another seat while in the lobby; an occupied
    /// target swaps.
    pub fn move_player(&mut self, id: PlayerId, to: Seat) -> Result<(), DomainError> {
        self.require_phase(Phase::Lobby, "Moving seats")?;
        if to > 3 {
            return Err(DomainError::not_found(NotFoundKind::Seat, "No such seat"));
        }
        let from = self
            .state
            .seat_of(id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "No such player"))?;
        if from == to {
            return Ok(());
        }
        if let Some(occupant) = self.state.players.iter_mut().find(|p| p.seat == to) {
            occupant.seat = from;
        }
        if let Some(player) = self.state.player_mut(id) {
            player.seat = to;
        }
        self.state.sort_players_by_seat();
        Ok(())
    }

    /// Options are mutable only while the phase is `Lobby`.
    pub fn set_options(&mut self, options: GameOptions) -> Result<(), DomainError> {
        if self.state.phase != Phase::Lobby {
            return Err(DomainError::validation(
                ValidationKind::GameStarted,
                "Options are frozen once the game starts",
            ));
        }
        if options.team_assignment == TeamAssignment::CardDraw
            && options.dealer_selection != DealerSelectionMethod::CardDraw
        {
            return Err(DomainError::validation(
                ValidationKind::WrongDealerMethod,
                "Card-draw teams require card-draw dealer selection",
            ));
        }
        self.state.options = options;
        Ok(())
    }

    pub fn set_predetermined_dealer(&mut self, seat: Seat) -> Result<(), DomainError> {
        self.require_phase(Phase::Lobby, "Assigning the dealer")?;
        if self.state.options.dealer_selection != DealerSelectionMethod::HostAssigned {
            return Err(DomainError::validation(
                ValidationKind::WrongDealerMethod,
                "Dealer selection is not host-assigned",
            ));
        }
        if self.state.player_at(seat).is_none() {
            return Err(DomainError::not_found(NotFoundKind::Seat, "Seat is empty"));
        }
        self.state.predetermined_dealer = Some(seat);
        Ok(())
    }

    // ---- game start and dealer selection ----

    /// Leave the lobby. Requires exactly four connected players.
    pub fn start_game(&mut self) -> Result<(), DomainError> {
        self.require_phase(Phase::Lobby, "Starting")?;
        if self.state.players.len() != 4 || !self.state.players.iter().all(|p| p.connected) {
            return Err(DomainError::validation_other(
                "Starting requires exactly 4 connected players",
            ));
        }

        match self.state.options.dealer_selection {
            DealerSelectionMethod::HostAssigned => {
                let dealer = self.state.predetermined_dealer.ok_or_else(|| {
                    DomainError::validation(
                        ValidationKind::WrongDealerMethod,
                        "No predetermined dealer set",
                    )
                })?;
                self.settle_dealer(dealer, &[]);
            }
            DealerSelectionMethod::CardDraw | DealerSelectionMethod::FirstBlackJack => {
                let deck = shuffled_deck(self.advance_seed());
                self.state.dealer_selection = Some(DealerSelectionState {
                    deck,
                    reveals: Vec::new(),
                    next_seat: 0,
                });
                self.state.phase = Phase::DealerSelection;
            }
        }
        info!(game_id = %self.state.id, phase = ?self.state.phase, "game started");
        Ok(())
    }

    /// One player draws their dealer-selection card. Order is free; each
    /// seat draws exactly once.
    pub fn draw_dealer_card(&mut self, seat: Seat) -> Result<RevealResult, DomainError> {
        self.require_phase(Phase::DealerSelection, "Drawing")?;
        if self.state.options.dealer_selection != DealerSelectionMethod::CardDraw {
            return Err(DomainError::validation(
                ValidationKind::WrongDealerMethod,
                "Dealer selection is not by card draw",
            ));
        }
        let selection = self
            .state
            .dealer_selection
            .as_mut()
            .ok_or_else(|| DomainError::validation_other("Invariant violated: no selection state"))?;
        if selection.reveals.iter().any(|&(s, _)| s == seat) {
            return Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                "Seat has already drawn",
            ));
        }
        let card = selection.deck.remove(0);
        selection.reveals.push((seat, card));
        debug!(game_id = %self.state.id, seat, ?card, "dealer draw");

        let complete = selection.reveals.len() == 4;
        if complete {
            let reveals = selection.reveals.clone();
            let dealer = lowest_draw(&reveals);
            self.settle_dealer(dealer, &reveals);
        }
        Ok(RevealResult {
            seat,
            card,
            selection_complete: complete,
        })
    }

    /// Deal the next first-black-jack card. Driven by the host's
    /// scheduler, one card per tick, so clients can animate the deal.
    pub fn deal_black_jack_card(&mut self) -> Result<RevealResult, DomainError> {
        self.require_phase(Phase::DealerSelection, "Dealing selection cards")?;
        if self.state.options.dealer_selection != DealerSelectionMethod::FirstBlackJack {
            return Err(DomainError::validation(
                ValidationKind::WrongDealerMethod,
                "Dealer selection is not first-black-jack",
            ));
        }
        let selection = self
            .state
            .dealer_selection
            .as_mut()
            .ok_or_else(|| DomainError::validation_other("Invariant violated: no selection state"))?;
        let seat = selection.next_seat;
        let card = selection.deck.remove(0);
        selection.reveals.push((seat, card));
        selection.next_seat = next_seat(seat);
        debug!(game_id = %self.state.id, seat, ?card, "black-jack deal");

        let complete = is_black_jack(card);
        if complete {
            self.settle_dealer(seat, &[]);
        }
        Ok(RevealResult {
            seat,
            card,
            selection_complete: complete,
        })
    }

    /// Renumber seats around the settled dealer and move to the team
    /// summary.
    fn settle_dealer(&mut self, dealer: Seat, reveals: &[(Seat, Card)]) {
        reseat_for_dealer(
            &mut self.state.players,
            dealer,
            self.state.options.team_assignment,
            reveals,
        );
        self.state.dealer = 0;
        self.state.dealer_selection = None;
        self.state.phase = Phase::TeamSummary;
        info!(game_id = %self.state.id, "dealer settled, seats renumbered");
    }

    // ---- paced advances (driven by the scheduler) ----

    pub fn finish_team_summary(&mut self) -> Result<(), DomainError> {
        self.require_phase(Phase::TeamSummary, "Advancing")?;
        self.begin_hand();
        Ok(())
    }

    pub fn finish_dealing(&mut self) -> Result<(), DomainError> {
        self.require_phase(Phase::Dealing, "Advancing")?;
        self.state.phase = Phase::FarmersHandCheck;

        if self.state.options.farmers_hand {
            let pending = farmers::eligible_seats(&self.state);
            if let Some(&first) = pending.first() {
                self.state.hand.farmers_pending = pending;
                self.state.phase = Phase::FarmersHandSwap { seat: first };
                return Ok(());
            }
        }
        self.open_bidding();
        Ok(())
    }

    pub fn continue_after_trick(&mut self) -> Result<(), DomainError> {
        self.require_phase(Phase::TrickComplete, "Advancing")?;
        let leader = self
            .state
            .hand
            .completed_tricks
            .last()
            .and_then(|t| t.winner)
            .ok_or_else(|| DomainError::validation_other("Invariant violated: no resolved trick"))?;
        tricks::begin_next_trick(&mut self.state, leader);
        Ok(())
    }

    /// Rotate the dealer one seat and deal the next hand.
    pub fn continue_after_hand(&mut self) -> Result<(), DomainError> {
        self.require_phase(Phase::HandComplete, "Advancing")?;
        self.state.dealer = next_seat(self.state.dealer);
        self.begin_hand();
        Ok(())
    }

    fn begin_hand(&mut self) {
        let deal = deal_hand(self.advance_seed());
        let mut hand = HandState::empty();
        hand.hands = deal.hands;
        hand.upcard = Some(deal.upcard);
        hand.buried = deal.buried;
        self.state.hand = hand;
        self.state.turn = None;
        self.state.phase = Phase::Dealing;
        debug!(game_id = %self.state.id, dealer = self.state.dealer, "hand dealt");
    }

    fn open_bidding(&mut self) {
        self.state.phase = Phase::BiddingRound1;
        self.state.turn = Some(next_seat(self.state.dealer));
    }

    // ---- farmer's hand ----

    pub fn swap_farmers_hand(&mut self, seat: Seat, cards: [Card; 3]) -> Result<(), DomainError> {
        farmers::swap(&mut self.state, seat, cards)
    }

    pub fn decline_farmers_hand(&mut self, seat: Seat) -> Result<(), DomainError> {
        farmers::decline(&mut self.state, seat)
    }

    // ---- bidding and play ----

    pub fn place_bid(&mut self, seat: Seat, call: BidCall) -> Result<BidOutcome, DomainError> {
        let outcome = bidding::place_bid(&mut self.state, seat, call)?;
        if outcome == BidOutcome::ThrownIn {
            // Hand thrown in: rotate the dealer and redeal.
            self.state.dealer = next_seat(self.state.dealer);
            self.begin_hand();
        }
        Ok(outcome)
    }

    pub fn dealer_discard(&mut self, seat: Seat, card: Card) -> Result<(), DomainError> {
        bidding::dealer_discard(&mut self.state, seat, card)
    }

    pub fn play_card(&mut self, seat: Seat, card: Card) -> Result<PlayCardResult, DomainError> {
        tricks::play_card(&mut self.state, seat, card)
    }

    pub fn legal_moves(&self, seat: Seat) -> Vec<Card> {
        tricks::legal_moves(&self.state, seat)
    }

    // ---- connectivity ----

    pub fn update_player_connection(&mut self, id: PlayerId, connected: bool) -> Result<(), DomainError> {
        let game_id = self.state.id;
        let player = self
            .state
            .player_mut(id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "No such player"))?;
        player.connected = connected;
        info!(game_id = %game_id, player = %id, connected, "connection state changed");
        Ok(())
    }

    /// Re-bind a reconnecting player to their existing seat. Fails if the
    /// seat was removed (kicked) in the interim.
    pub fn rebind_player(&mut self, id: PlayerId) -> Result<Seat, DomainError> {
        let seat = self
            .state
            .seat_of(id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "Seat no longer exists"))?;
        self.update_player_connection(id, true)?;
        Ok(seat)
    }

    fn advance_seed(&mut self) -> u64 {
        let seed = self.state.next_seed;
        self.state.next_seed = seed.wrapping_add(SEED_INCREMENT);
        seed
    }
}
