//! Client-side dispatch: a mirror of the host's snapshots.
//!
//! A client never mutates game state. It trusts exactly one peer — the
//! host it connected to — replaces its mirror wholesale from each
//! snapshot, and surfaces everything else as events for the caller to
//! render.

use tracing::warn;

use crate::domain::snapshot::PublicGameState;
use crate::domain::state::{PlayerId, Seat};
use crate::domain::Card;
use crate::errors::ErrorCode;
use crate::net::transport::PeerId;
use crate::protocol::messages::{
    ClientMessage, Envelope, GameMessage, HostMessage, JoinResponse, PeerMessage,
};

/// What the client layer reports upward after dispatching a message.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Joined { seat: Seat },
    JoinRejected { code: ErrorCode, reason: String },
    /// The mirror was replaced; re-render.
    StateUpdated,
    DealerCardDealt { seat: Seat, card: Card, selection_complete: bool },
    Kicked { reason: String },
    PeerError { code: ErrorCode, message: String },
}

pub struct ClientDispatcher {
    player_id: PlayerId,
    /// The one peer whose host-class messages are trusted.
    host: Option<PeerId>,
    seat: Option<Seat>,
    mirror: Option<PublicGameState>,
}

impl ClientDispatcher {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            host: None,
            seat: None,
            mirror: None,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// Record which link is the host. Called after every successful
    /// connect, including reconnects onto a fresh link.
    pub fn bind_host(&mut self, peer: PeerId) {
        self.host = Some(peer);
    }

    pub fn host(&self) -> Option<PeerId> {
        self.host
    }

    pub fn seat(&self) -> Option<Seat> {
        self.seat
    }

    pub fn mirror(&self) -> Option<&PublicGameState> {
        self.mirror.as_ref()
    }

    /// The opening request for a fresh join.
    pub fn join_request(&self, name: &str) -> Envelope {
        Envelope::new(GameMessage::Client(ClientMessage::JoinRequest {
            player_id: self.player_id,
            name: name.to_string(),
        }))
    }

    /// The handshake for resuming an existing seat after a link loss.
    pub fn reconnect_request(&self) -> Envelope {
        Envelope::new(GameMessage::Client(ClientMessage::Reconnect {
            player_id: self.player_id,
        }))
    }

    pub fn handle(&mut self, from: PeerId, envelope: Envelope) -> Vec<ClientEvent> {
        if self.host != Some(from) {
            warn!(peer = %from, kind = envelope.payload.kind(), "message from unrecognized peer dropped");
            return Vec::new();
        }

        match envelope.payload {
            GameMessage::Host(message) => self.handle_host(message),
            GameMessage::Client(_) => {
                // Client-class traffic only ever flows toward the host.
                warn!(peer = %from, "client-class message arrived at a client");
                Vec::new()
            }
            GameMessage::Peer(PeerMessage::Heartbeat) => Vec::new(),
            GameMessage::Peer(PeerMessage::Error { code, message }) => {
                vec![ClientEvent::PeerError { code, message }]
            }
        }
    }

    fn handle_host(&mut self, message: HostMessage) -> Vec<ClientEvent> {
        match message {
            HostMessage::JoinResponse(JoinResponse::Accepted { seat, state }) => {
                self.seat = Some(seat);
                self.mirror = Some(state);
                vec![ClientEvent::Joined { seat }]
            }
            HostMessage::JoinResponse(JoinResponse::Rejected { code, reason }) => {
                vec![ClientEvent::JoinRejected { code, reason }]
            }
            HostMessage::StateSnapshot(state) => {
                // Wholesale replacement: snapshots are idempotent, so a
                // duplicate or re-ordered snapshot cannot corrupt the
                // mirror.
                self.seat = Some(state.your_seat);
                self.mirror = Some(state);
                vec![ClientEvent::StateUpdated]
            }
            HostMessage::DealerCardDealt { seat, card, selection_complete } => {
                vec![ClientEvent::DealerCardDealt { seat, card, selection_complete }]
            }
            HostMessage::Kicked { reason } => {
                self.seat = None;
                self.mirror = None;
                self.host = None;
                vec![ClientEvent::Kicked { reason }]
            }
        }
    }
}
