//! Error codes carried on the wire.
//!
//! This module defines all machine-readable error codes the engine emits
//! in `Error` and `JoinResponse::Rejected` messages. Add new codes here;
//! never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in peer-to-peer error payloads.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Centralized error codes for the engine's wire protocol.
///
/// This enum ensures type safety and prevents the use of ad-hoc error
/// codes. Each variant maps to a canonical SCREAMING_SNAKE_CASE string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Permission
    /// Host-only operation attempted by or at a non-host
    NotHost,

    // Request validation
    /// Not this player's turn
    OutOfTurn,
    /// Card not in the sender's hand
    CardNotInHand,
    /// Card is not legal under the current lead/trump
    MustFollowSuit,
    /// Operation not valid in the current phase
    PhaseMismatch,
    /// Bid names the turned-down suit, or is otherwise malformed
    InvalidBid,
    /// Dealer may not pass under the dealer-must-call rule
    DealerMustCall,
    /// Farmers-hand swap is not exactly 3 held cards
    InvalidSwap,
    /// Target seat or player does not exist
    PlayerNotFound,
    /// Requested display name is empty or too long
    InvalidName,
    /// Options are frozen once the game has started
    GameStarted,
    /// Dealer-selection method does not permit this operation
    WrongDealerMethod,
    /// General validation error
    ValidationError,

    // Join
    /// Game already has four seated players
    GameFull,
    /// Sender's identity does not match any seat
    UnknownPlayer,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotHost => "NOT_HOST",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::MustFollowSuit => "MUST_FOLLOW_SUIT",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::InvalidBid => "INVALID_BID",
            Self::DealerMustCall => "DEALER_MUST_CALL",
            Self::InvalidSwap => "INVALID_SWAP",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::InvalidName => "INVALID_NAME",
            Self::GameStarted => "GAME_STARTED",
            Self::WrongDealerMethod => "WRONG_DEALER_METHOD",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::GameFull => "GAME_FULL",
            Self::UnknownPlayer => "UNKNOWN_PLAYER",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
