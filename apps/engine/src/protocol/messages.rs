//! Message taxonomy: a closed union of everything that crosses the wire.
//!
//! Three classes with distinct permission rules. `Client` messages flow
//! player-to-host only; `Host` messages flow host-to-player only; `Peer`
//! messages flow either way. The dispatcher enforces the direction, the
//! types only name it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cards::Card;
use crate::domain::snapshot::PublicGameState;
use crate::domain::state::{BidCall, PlayerId, Seat};
use crate::errors::ErrorCode;

/// Wrapper around every wire message: unique id for replay suppression,
/// wall-clock stamp for the staleness filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: Uuid,
    /// Sender's wall clock, unix milliseconds.
    pub sent_at_ms: i64,
    pub payload: GameMessage,
}

impl Envelope {
    pub fn new(payload: GameMessage) -> Self {
        Self {
            id: Uuid::new_v4(),
            sent_at_ms: super::codec::now_ms(),
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameMessage {
    Client(ClientMessage),
    Host(HostMessage),
    Peer(PeerMessage),
}

/// Player-to-host requests. Apart from the join handshake, the sender is
/// identified by the link the message arrived on, not by the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientMessage {
    JoinRequest { player_id: PlayerId, name: String },
    /// Rejoin after a link loss, carrying the original identity.
    Reconnect { player_id: PlayerId },
    Leave,
    Rename { name: String },
    RenameTeam { team: u8, name: String },
    SetPredeterminedDealer { seat: Seat },
    DrawDealerCard,
    SwapFarmersHand { cards: [Card; 3] },
    DeclineFarmersHand,
    PlaceBid { call: BidCall },
    DealerDiscard { card: Card },
    PlayCard { card: Card },
}

/// Host-to-player broadcasts and responses.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostMessage {
    JoinResponse(JoinResponse),
    /// A dealer-selection card was revealed (either selection method).
    DealerCardDealt {
        seat: Seat,
        card: Card,
        selection_complete: bool,
    },
    /// Personalized full-state replacement; the client renders from this
    /// and nothing else.
    StateSnapshot(PublicGameState),
    Kicked { reason: String },
}

/// Join and reconnect answer with structure, not a bare error.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinResponse {
    Accepted {
        seat: Seat,
        state: PublicGameState,
    },
    Rejected {
        code: ErrorCode,
        reason: String,
    },
}

/// Direction-free link chatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PeerMessage {
    Heartbeat,
    Error { code: ErrorCode, message: String },
}

impl GameMessage {
    /// Short name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            GameMessage::Client(m) => match m {
                ClientMessage::JoinRequest { .. } => "join_request",
                ClientMessage::Reconnect { .. } => "reconnect",
                ClientMessage::Leave => "leave",
                ClientMessage::Rename { .. } => "rename",
                ClientMessage::RenameTeam { .. } => "rename_team",
                ClientMessage::SetPredeterminedDealer { .. } => "set_predetermined_dealer",
                ClientMessage::DrawDealerCard => "draw_dealer_card",
                ClientMessage::SwapFarmersHand { .. } => "swap_farmers_hand",
                ClientMessage::DeclineFarmersHand => "decline_farmers_hand",
                ClientMessage::PlaceBid { .. } => "place_bid",
                ClientMessage::DealerDiscard { .. } => "dealer_discard",
                ClientMessage::PlayCard { .. } => "play_card",
            },
            GameMessage::Host(m) => match m {
                HostMessage::JoinResponse(_) => "join_response",
                HostMessage::DealerCardDealt { .. } => "dealer_card_dealt",
                HostMessage::StateSnapshot(_) => "state_snapshot",
                HostMessage::Kicked { .. } => "kicked",
            },
            GameMessage::Peer(m) => match m {
                PeerMessage::Heartbeat => "heartbeat",
                PeerMessage::Error { .. } => "error",
            },
        }
    }
}
