//! Session codes for joining a hosted game.
//!
//! A session code is the game's UUID in URL-safe base64 without padding:
//! always 22 characters, paste-friendly, and reversible so the joining
//! side can address the host without a directory lookup.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::state::GameId;

/// Encoded length of a 16-byte UUID in unpadded base64.
pub const SESSION_CODE_LEN: usize = 22;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionCodeError {
    #[error("session code must be {SESSION_CODE_LEN} characters, got {0}")]
    BadLength(usize),
    #[error("session code is not valid base64")]
    BadEncoding,
}

pub fn encode(game_id: GameId) -> String {
    URL_SAFE_NO_PAD.encode(game_id.0.as_bytes())
}

pub fn decode(code: &str) -> Result<GameId, SessionCodeError> {
    if code.len() != SESSION_CODE_LEN {
        return Err(SessionCodeError::BadLength(code.len()));
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(code)
        .map_err(|_| SessionCodeError::BadEncoding)?;
    let raw: [u8; 16] = bytes
        .try_into()
        .map_err(|_| SessionCodeError::BadEncoding)?;
    Ok(GameId(Uuid::from_bytes(raw)))
}
