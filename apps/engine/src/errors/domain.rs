//! Domain-level error type used across the engine and dispatch layers.
//!
//! This error type is transport-agnostic. Dispatch converts it to a wire
//! `ErrorCode` plus a human-readable reason before answering the sender.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::errors::error_code::ErrorCode;

/// Validation detail kinds, one per business rule the engine enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    OutOfTurn,
    CardNotInHand,
    MustFollowSuit,
    PhaseMismatch,
    InvalidBid,
    DealerMustCall,
    InvalidSwap,
    InvalidName,
    GameStarted,
    WrongDealerMethod,
    Other(String),
}

/// Domain-level not-found entities.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Player,
    Seat,
}

/// Domain-level conflict kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    GameFull,
    AlreadyJoined,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input or business rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }

    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }

    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    /// Human-readable reason carried in wire error payloads.
    pub fn reason(&self) -> &str {
        match self {
            DomainError::Validation(_, d)
            | DomainError::Conflict(_, d)
            | DomainError::NotFound(_, d) => d,
        }
    }

    /// Map to the wire error code. Unmatched validation kinds fail closed
    /// to the generic `VALIDATION_ERROR` code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::OutOfTurn => ErrorCode::OutOfTurn,
                ValidationKind::CardNotInHand => ErrorCode::CardNotInHand,
                ValidationKind::MustFollowSuit => ErrorCode::MustFollowSuit,
                ValidationKind::PhaseMismatch => ErrorCode::PhaseMismatch,
                ValidationKind::InvalidBid => ErrorCode::InvalidBid,
                ValidationKind::DealerMustCall => ErrorCode::DealerMustCall,
                ValidationKind::InvalidSwap => ErrorCode::InvalidSwap,
                ValidationKind::InvalidName => ErrorCode::InvalidName,
                ValidationKind::GameStarted => ErrorCode::GameStarted,
                ValidationKind::WrongDealerMethod => ErrorCode::WrongDealerMethod,
                ValidationKind::Other(_) => ErrorCode::ValidationError,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::GameFull => ErrorCode::GameFull,
                ConflictKind::AlreadyJoined => ErrorCode::ValidationError,
            },
            DomainError::NotFound(_, _) => ErrorCode::PlayerNotFound,
        }
    }
}
