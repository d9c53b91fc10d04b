//! Persistence contract for resumable sessions.
//!
//! Two record shapes: the client's slim session record (enough to knock
//! on the host's door again) and the host's full game state. Both are
//! keyed by session id and expire on a TTL. A corrupt stored entry is
//! deleted on read and reported as absent; callers never see a parse
//! failure for data they did not write.

pub mod memory;

#[cfg(test)]
mod tests_storage;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::state::{GameState, PlayerId};

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What a client needs to find its way back to a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSessionRecord {
    pub player_id: PlayerId,
    pub session_id: String,
    pub is_host: bool,
    pub display_name: String,
    /// Unix milliseconds of the last activity on this session.
    pub last_active_ms: i64,
}

/// The host's authoritative state, frozen for resumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSnapshotRecord {
    pub session_id: String,
    pub state: GameState,
    pub saved_at_ms: i64,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save_client_session(
        &self,
        record: &ClientSessionRecord,
    ) -> Result<(), StorageError>;

    /// Expired and unparseable records read as `None`.
    async fn load_client_session(
        &self,
        session_id: &str,
    ) -> Result<Option<ClientSessionRecord>, StorageError>;

    async fn clear_client_session(&self, session_id: &str) -> Result<(), StorageError>;

    async fn save_host_snapshot(&self, record: &HostSnapshotRecord) -> Result<(), StorageError>;

    async fn load_host_snapshot(
        &self,
        session_id: &str,
    ) -> Result<Option<HostSnapshotRecord>, StorageError>;

    async fn clear_host_snapshot(&self, session_id: &str) -> Result<(), StorageError>;
}
