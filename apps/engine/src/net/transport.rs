//! Transport contract: the one seam between the engine and whatever
//! actually moves bytes.
//!
//! The core never names a concrete transport. Implementations push
//! [`TransportEvent`]s into the mpsc channel handed to the session at
//! construction; the session calls back through [`PeerTransport`].

use std::fmt::{Display, Formatter, Result as FmtResult};

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Opaque identity of one remote peer link.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PeerId(pub Uuid);

impl PeerId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for PeerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connect to {code} failed: {detail}")]
    ConnectFailed { code: String, detail: String },
    #[error("send to {0} failed: {1}")]
    SendFailed(PeerId, String),
    #[error("no open link to {0}")]
    NotConnected(PeerId),
    #[error("transport is shut down")]
    Closed,
}

/// Everything a transport can report, in arrival order.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// One complete inbound frame.
    Data { from: PeerId, bytes: Bytes },
    /// A link opened (inbound accept or outbound connect).
    Opened { peer: PeerId },
    /// A link closed cleanly.
    Closed { peer: PeerId },
    /// A link died with an error.
    Failed { peer: PeerId, detail: String },
}

/// Peer-to-peer byte transport. `send` preserves per-link ordering.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Bring the transport up. Hosts listen under `session_code`; clients
    /// prepare to dial. Returns the local peer id.
    async fn initialize(&self, as_host: bool, session_code: &str) -> Result<PeerId, TransportError>;

    /// Dial the host of `session_code`. Resolves once the link is open.
    async fn connect(&self, session_code: &str) -> Result<PeerId, TransportError>;

    /// Ship one frame to an open link.
    async fn send(&self, to: PeerId, bytes: Bytes) -> Result<(), TransportError>;

    /// Tear down one link. Idempotent.
    async fn disconnect(&self, peer: PeerId) -> Result<(), TransportError>;
}
