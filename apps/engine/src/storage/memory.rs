//! In-memory `SessionStore`.
//!
//! Records are held as JSON strings so the corrupt-entry path behaves
//! exactly like a real backend: a damaged value is deleted on read and
//! the caller sees `None`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::{ClientSessionRecord, HostSnapshotRecord, SessionStore, StorageError};
use crate::protocol::codec;

pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60 * 24);

struct Entry {
    json: String,
    stored_at_ms: i64,
}

#[derive(Default)]
struct Shelves {
    client_sessions: HashMap<String, Entry>,
    host_snapshots: HashMap<String, Entry>,
}

pub struct MemoryStore {
    ttl: Duration,
    shelves: Mutex<Shelves>,
}

impl MemoryStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            shelves: Mutex::new(Shelves::default()),
        }
    }

    fn expired(&self, entry: &Entry) -> bool {
        let age_ms = codec::now_ms().saturating_sub(entry.stored_at_ms);
        age_ms > self.ttl.as_millis() as i64
    }

    /// Shared read path: expired or unparseable entries are removed and
    /// read as absent.
    fn take_fresh<R: serde::de::DeserializeOwned>(
        &self,
        shelf: fn(&mut Shelves) -> &mut HashMap<String, Entry>,
        key: &str,
    ) -> Option<R> {
        let mut shelves = self.shelves.lock();
        let entries = shelf(&mut shelves);
        let entry = entries.get(key)?;
        if self.expired(entry) {
            debug!(key, "expired record removed");
            entries.remove(key);
            return None;
        }
        match serde_json::from_str(&entry.json) {
            Ok(record) => Some(record),
            Err(err) => {
                debug!(key, error = %err, "corrupt record removed");
                entries.remove(key);
                None
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn corrupt_client_session(&self, session_id: &str) {
        if let Some(entry) = self.shelves.lock().client_sessions.get_mut(session_id) {
            entry.json = "{not json".to_string();
        }
    }

    #[cfg(test)]
    pub(crate) fn backdate_client_session(&self, session_id: &str, by: Duration) {
        if let Some(entry) = self.shelves.lock().client_sessions.get_mut(session_id) {
            entry.stored_at_ms -= by.as_millis() as i64;
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn save_client_session(
        &self,
        record: &ClientSessionRecord,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(record)?;
        self.shelves.lock().client_sessions.insert(
            record.session_id.clone(),
            Entry { json, stored_at_ms: codec::now_ms() },
        );
        Ok(())
    }

    async fn load_client_session(
        &self,
        session_id: &str,
    ) -> Result<Option<ClientSessionRecord>, StorageError> {
        Ok(self.take_fresh(|s| &mut s.client_sessions, session_id))
    }

    async fn clear_client_session(&self, session_id: &str) -> Result<(), StorageError> {
        self.shelves.lock().client_sessions.remove(session_id);
        Ok(())
    }

    async fn save_host_snapshot(&self, record: &HostSnapshotRecord) -> Result<(), StorageError> {
        let json = serde_json::to_string(record)?;
        self.shelves.lock().host_snapshots.insert(
            record.session_id.clone(),
            Entry { json, stored_at_ms: codec::now_ms() },
        );
        Ok(())
    }

    async fn load_host_snapshot(
        &self,
        session_id: &str,
    ) -> Result<Option<HostSnapshotRecord>, StorageError> {
        Ok(self.take_fresh(|s| &mut s.host_snapshots, session_id))
    }

    async fn clear_host_snapshot(&self, session_id: &str) -> Result<(), StorageError> {
        self.shelves.lock().host_snapshots.remove(session_id);
        Ok(())
    }
}
