//! Error handling for the engine.

pub mod domain;
pub mod error_code;

pub use domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
pub use error_code::ErrorCode;
