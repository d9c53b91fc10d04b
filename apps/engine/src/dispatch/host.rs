//! Host-side dispatch: the authoritative end of every exchange.
//!
//! One instance per hosted session. Inbound envelopes run through
//! permission checks, the pure validator list, then exactly one engine
//! operation; a successful mutation answers with personalized snapshots
//! for every bound link. Validation failures answer the sender alone —
//! join and reconnect with a structured rejection, everything else with
//! a peer error.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};
use uuid::Uuid;

use super::validate::{self, Rejection};
use crate::domain::engine::{GameEngine, RevealResult};
use crate::domain::state::{PlayerId, Seat};
use crate::errors::ErrorCode;
use crate::net::transport::PeerId;
use crate::protocol::messages::{
    ClientMessage, Envelope, GameMessage, HostMessage, JoinResponse, PeerMessage,
};

/// Envelope ids remembered for replay suppression.
const REPLAY_WINDOW: usize = 1024;

/// One message addressed to one link. Snapshots are personalized, so
/// there is no broadcast primitive: a "broadcast" is one outbound per
/// bound link.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub to: PeerId,
    pub envelope: Envelope,
}

pub struct HostDispatcher {
    engine: GameEngine,
    /// Open links bound to a seated player.
    links: HashMap<PeerId, PlayerId>,
    seen_ids: HashSet<Uuid>,
    seen_order: VecDeque<Uuid>,
}

impl HostDispatcher {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine,
            links: HashMap::new(),
            seen_ids: HashSet::new(),
            seen_order: VecDeque::new(),
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    pub fn player_for_link(&self, peer: PeerId) -> Option<PlayerId> {
        self.links.get(&peer).copied()
    }

    /// Dispatch one inbound envelope. Replayed envelope ids are dropped:
    /// the first delivery already answered, and handlers must not apply
    /// twice.
    pub fn handle(&mut self, from: PeerId, envelope: Envelope) -> Vec<Outbound> {
        if !self.remember(envelope.id) {
            debug!(peer = %from, id = %envelope.id, "duplicate envelope dropped");
            return Vec::new();
        }

        match envelope.payload {
            GameMessage::Client(message) => self.handle_client(from, message),
            GameMessage::Host(_) => {
                warn!(peer = %from, "host-class message arrived at the host");
                vec![self.peer_error(from, ErrorCode::NotHost, "This peer is not a client of yours")]
            }
            GameMessage::Peer(PeerMessage::Heartbeat) => Vec::new(),
            GameMessage::Peer(PeerMessage::Error { code, message }) => {
                warn!(peer = %from, code = %code, message, "peer reported an error");
                Vec::new()
            }
        }
    }

    /// A transport link died. Mark the seat disconnected and tell the
    /// survivors.
    pub fn handle_link_closed(&mut self, peer: PeerId) -> Vec<Outbound> {
        let Some(player_id) = self.links.remove(&peer) else {
            return Vec::new();
        };
        if self.engine.update_player_connection(player_id, false).is_err() {
            return Vec::new();
        }
        self.broadcast_snapshots()
    }

    /// One personalized snapshot per bound link.
    pub fn broadcast_snapshots(&self) -> Vec<Outbound> {
        self.links
            .iter()
            .filter_map(|(&peer, &player_id)| {
                let seat = self.engine.state().seat_of(player_id)?;
                Some(Outbound {
                    to: peer,
                    envelope: Envelope::new(GameMessage::Host(HostMessage::StateSnapshot(
                        self.engine.snapshot_for(seat),
                    ))),
                })
            })
            .collect()
    }

    /// Announce a dealer-selection reveal, then the snapshots that carry
    /// the resulting state.
    pub fn broadcast_reveal(&self, reveal: RevealResult) -> Vec<Outbound> {
        let mut out: Vec<Outbound> = self
            .links
            .keys()
            .map(|&peer| Outbound {
                to: peer,
                envelope: Envelope::new(GameMessage::Host(HostMessage::DealerCardDealt {
                    seat: reveal.seat,
                    card: reveal.card,
                    selection_complete: reveal.selection_complete,
                })),
            })
            .collect();
        out.extend(self.broadcast_snapshots());
        out
    }

    /// Host-initiated kick: remove the seat, notify the target, refresh
    /// the rest.
    pub fn kick(&mut self, player_id: PlayerId, reason: &str) -> Vec<Outbound> {
        if let Err(err) = self.engine.kick_player(player_id) {
            warn!(player = %player_id, error = %err, "kick refused");
            return Vec::new();
        }
        let target = self
            .links
            .iter()
            .find(|(_, &bound)| bound == player_id)
            .map(|(&peer, _)| peer);

        let mut out = Vec::new();
        if let Some(peer) = target {
            self.links.remove(&peer);
            out.push(Outbound {
                to: peer,
                envelope: Envelope::new(GameMessage::Host(HostMessage::Kicked {
                    reason: reason.to_string(),
                })),
            });
        }
        out.extend(self.broadcast_snapshots());
        out
    }

    fn handle_client(&mut self, from: PeerId, message: ClientMessage) -> Vec<Outbound> {
        match message {
            ClientMessage::JoinRequest { player_id, name } => {
                match self.engine.add_player(player_id, &name) {
                    Ok(seat) => self.accept(from, player_id, seat),
                    Err(err) => vec![self.reject(from, Rejection::from(&err))],
                }
            }
            ClientMessage::Reconnect { player_id } => match self.engine.rebind_player(player_id) {
                Ok(seat) => self.accept(from, player_id, seat),
                Err(err) => vec![self.reject(from, Rejection::from(&err))],
            },
            other => self.handle_seated(from, other),
        }
    }

    /// Everything past the join handshake requires a bound link.
    fn handle_seated(&mut self, from: PeerId, message: ClientMessage) -> Vec<Outbound> {
        let Some(player_id) = self.player_for_link(from) else {
            return vec![self.peer_error(from, ErrorCode::UnknownPlayer, "Join before sending requests")];
        };
        let Some(seat) = self.engine.state().seat_of(player_id) else {
            return vec![self.peer_error(from, ErrorCode::UnknownPlayer, "Seat no longer exists")];
        };

        if let Err(rejection) = validate::run(self.engine.state(), seat, &message) {
            debug!(peer = %from, seat, code = %rejection.code, kind = GameMessage::Client(message.clone()).kind(), "validator rejected message");
            return vec![self.peer_error(from, rejection.code, &rejection.reason)];
        }

        let result = self.apply(from, player_id, seat, message);
        match result {
            Ok(out) => out,
            Err(err) => vec![self.peer_error(from, err.error_code(), err.reason())],
        }
    }

    /// Exactly one engine operation per message.
    fn apply(
        &mut self,
        from: PeerId,
        player_id: PlayerId,
        seat: Seat,
        message: ClientMessage,
    ) -> Result<Vec<Outbound>, crate::errors::DomainError> {
        let out = match message {
            ClientMessage::Leave => {
                self.engine.remove_player(player_id)?;
                self.links.remove(&from);
                self.broadcast_snapshots()
            }
            ClientMessage::Rename { name } => {
                self.engine.rename_player(player_id, &name)?;
                self.broadcast_snapshots()
            }
            ClientMessage::RenameTeam { team, name } => {
                self.engine.rename_team(team, &name)?;
                self.broadcast_snapshots()
            }
            ClientMessage::SetPredeterminedDealer { seat: target } => {
                self.engine.set_predetermined_dealer(target)?;
                self.broadcast_snapshots()
            }
            ClientMessage::DrawDealerCard => {
                let reveal = self.engine.draw_dealer_card(seat)?;
                self.broadcast_reveal(reveal)
            }
            ClientMessage::SwapFarmersHand { cards } => {
                self.engine.swap_farmers_hand(seat, cards)?;
                self.broadcast_snapshots()
            }
            ClientMessage::DeclineFarmersHand => {
                self.engine.decline_farmers_hand(seat)?;
                self.broadcast_snapshots()
            }
            ClientMessage::PlaceBid { call } => {
                self.engine.place_bid(seat, call)?;
                self.broadcast_snapshots()
            }
            ClientMessage::DealerDiscard { card } => {
                self.engine.dealer_discard(seat, card)?;
                self.broadcast_snapshots()
            }
            ClientMessage::PlayCard { card } => {
                self.engine.play_card(seat, card)?;
                self.broadcast_snapshots()
            }
            ClientMessage::JoinRequest { .. } | ClientMessage::Reconnect { .. } => {
                unreachable!("join handshake handled before seat resolution")
            }
        };
        Ok(out)
    }

    /// Bind the link and answer the joiner plus everyone else.
    fn accept(&mut self, from: PeerId, player_id: PlayerId, seat: Seat) -> Vec<Outbound> {
        // A reconnecting player may arrive on a fresh link while the old
        // one is still registered; the new link wins.
        self.links.retain(|_, bound| *bound != player_id);
        self.links.insert(from, player_id);

        let mut out = vec![Outbound {
            to: from,
            envelope: Envelope::new(GameMessage::Host(HostMessage::JoinResponse(
                JoinResponse::Accepted {
                    seat,
                    state: self.engine.snapshot_for(seat),
                },
            ))),
        }];
        out.extend(
            self.broadcast_snapshots()
                .into_iter()
                .filter(|o| o.to != from),
        );
        out
    }

    fn reject(&self, to: PeerId, rejection: Rejection) -> Outbound {
        Outbound {
            to,
            envelope: Envelope::new(GameMessage::Host(HostMessage::JoinResponse(
                JoinResponse::Rejected {
                    code: rejection.code,
                    reason: rejection.reason,
                },
            ))),
        }
    }

    fn peer_error(&self, to: PeerId, code: ErrorCode, message: &str) -> Outbound {
        Outbound {
            to,
            envelope: Envelope::new(GameMessage::Peer(PeerMessage::Error {
                code,
                message: message.to_string(),
            })),
        }
    }

    /// Record an envelope id; false when already seen. The window is
    /// bounded so a long session cannot grow it without limit.
    fn remember(&mut self, id: Uuid) -> bool {
        if !self.seen_ids.insert(id) {
            return false;
        }
        self.seen_order.push_back(id);
        if self.seen_order.len() > REPLAY_WINDOW {
            if let Some(old) = self.seen_order.pop_front() {
                self.seen_ids.remove(&old);
            }
        }
        true
    }
}
