//! Binary envelope codec and the staleness filter.
//!
//! Frames are bincode; framing (length prefixes etc.) belongs to the
//! transport. Decode failures are codec errors, never transport errors,
//! so the session layer can tell a garbled peer from a dead link.

use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use time::OffsetDateTime;

use super::messages::Envelope;

/// Messages older than this are dropped without dispatch.
pub const DEFAULT_STALE_WINDOW: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("envelope encode failed: {0}")]
    Encode(#[source] bincode::Error),
    #[error("envelope decode failed: {0}")]
    Decode(#[source] bincode::Error),
}

pub fn encode(envelope: &Envelope) -> Result<Bytes, CodecError> {
    bincode::serialize(envelope)
        .map(Bytes::from)
        .map_err(CodecError::Encode)
}

pub fn decode(bytes: &[u8]) -> Result<Envelope, CodecError> {
    bincode::deserialize(bytes).map_err(CodecError::Decode)
}

/// Current wall clock in unix milliseconds.
pub fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Whether an envelope falls outside the staleness window at `now`.
/// Future-dated stamps are tolerated: clocks across peers are not
/// synchronized and the window only guards against replays.
pub fn is_stale(envelope: &Envelope, now_ms: i64, window: Duration) -> bool {
    let age_ms = now_ms.saturating_sub(envelope.sent_at_ms);
    age_ms > window.as_millis() as i64
}
