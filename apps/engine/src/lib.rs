#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod net;
pub mod protocol;
pub mod storage;
pub mod telemetry;

// Re-exports for public API
pub use dispatch::{ClientDispatcher, ClientEvent, Dispatcher, HostDispatcher};
pub use domain::engine::GameEngine;
pub use domain::snapshot::PublicGameState;
pub use domain::state::{GameId, GameOptions, GameState, Phase, PlayerId, Seat};
pub use errors::{DomainError, ErrorCode};
pub use net::{
    NetConfig, NetworkSession, PeerTransport, Reconnector, SessionCommand, SessionEvent,
    SessionHandle,
};
pub use protocol::codec;
pub use protocol::messages::{ClientMessage, Envelope, GameMessage, HostMessage, PeerMessage};
pub use protocol::session_code;
pub use storage::{ClientSessionRecord, HostSnapshotRecord, MemoryStore, SessionStore};
pub use telemetry::init_tracing;
