use std::time::Duration;

use test_support::unique_player_name;

use super::memory::MemoryStore;
use super::{ClientSessionRecord, HostSnapshotRecord, SessionStore};
use crate::domain::engine::GameEngine;
use crate::domain::state::{GameId, PlayerId};
use crate::protocol::codec;

fn client_record(session_id: &str) -> ClientSessionRecord {
    ClientSessionRecord {
        player_id: PlayerId::random(),
        session_id: session_id.to_string(),
        is_host: false,
        display_name: unique_player_name(),
        last_active_ms: codec::now_ms(),
    }
}

#[tokio::test]
async fn client_sessions_round_trip() {
    let store = MemoryStore::default();
    let record = client_record("s1");
    store.save_client_session(&record).await.unwrap();

    let loaded = store.load_client_session("s1").await.unwrap();
    assert_eq!(loaded, Some(record));
    assert_eq!(store.load_client_session("other").await.unwrap(), None);
}

#[tokio::test]
async fn clearing_a_session_removes_it() {
    let store = MemoryStore::default();
    store.save_client_session(&client_record("s1")).await.unwrap();
    store.clear_client_session("s1").await.unwrap();
    assert_eq!(store.load_client_session("s1").await.unwrap(), None);
}

#[tokio::test]
async fn expired_records_read_as_absent() {
    let store = MemoryStore::new(Duration::from_secs(60));
    store.save_client_session(&client_record("s1")).await.unwrap();
    store.backdate_client_session("s1", Duration::from_secs(120));

    assert_eq!(store.load_client_session("s1").await.unwrap(), None);
    // Deleted, not just hidden.
    assert_eq!(store.load_client_session("s1").await.unwrap(), None);
}

#[tokio::test]
async fn corrupt_records_are_deleted_not_surfaced() {
    let store = MemoryStore::default();
    store.save_client_session(&client_record("s1")).await.unwrap();
    store.corrupt_client_session("s1");

    // The damage reads as a miss, and a fresh save works again.
    assert_eq!(store.load_client_session("s1").await.unwrap(), None);
    let record = client_record("s1");
    store.save_client_session(&record).await.unwrap();
    assert_eq!(store.load_client_session("s1").await.unwrap(), Some(record));
}

#[tokio::test]
async fn host_snapshots_resume_into_an_engine() {
    let store = MemoryStore::default();
    let mut engine =
        GameEngine::new_game(GameId::random(), PlayerId::random(), "host", 5).unwrap();
    for i in 1..4 {
        engine.add_player(PlayerId::random(), &format!("p{i}")).unwrap();
    }
    engine.start_game().unwrap();

    let record = HostSnapshotRecord {
        session_id: "s1".to_string(),
        state: engine.state().clone(),
        saved_at_ms: codec::now_ms(),
    };
    store.save_host_snapshot(&record).await.unwrap();

    let loaded = store.load_host_snapshot("s1").await.unwrap().unwrap();
    let resumed = GameEngine::resume(loaded.state);
    assert_eq!(resumed.state(), engine.state());

    store.clear_host_snapshot("s1").await.unwrap();
    assert_eq!(store.load_host_snapshot("s1").await.unwrap(), None);
}
