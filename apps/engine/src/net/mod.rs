//! Network session layer: transport contract, message loop, reconnect.

pub mod reconnect;
pub mod session;
pub mod transport;


pub use reconnect::{phase_is_resumable, ReconnectConfig, Reconnector};
pub use session::{
    AdvanceKind, NetConfig, NetworkSession, SessionCommand, SessionEvent, SessionHandle,
};
pub use transport::{PeerId, PeerTransport, TransportError, TransportEvent};
