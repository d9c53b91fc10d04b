//! Wire protocol: message taxonomy, envelope, binary codec, session codes.

pub mod codec;
pub mod messages;
pub mod session_code;

pub use codec::{decode, encode, is_stale, now_ms, CodecError, DEFAULT_STALE_WINDOW};
pub use messages::{
    ClientMessage, Envelope, GameMessage, HostMessage, JoinResponse, PeerMessage,
};
