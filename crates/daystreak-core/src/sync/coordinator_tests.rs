//! Coordinator behavior against an in-memory remote store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::mpsc;

use super::coordinator::SyncCoordinator;
use super::remote::{RemoteStore, Subscription};
use super::types::{RemoteError, SyncEnvelope};
use crate::storage::Cache;
use crate::streak::StreakState;

/// Test double for the remote store: a shared map, a failure switch, and
/// direct delivery into registered subscriber channels.
#[derive(Default)]
struct MemoryRemoteStore {
    documents: Mutex<HashMap<String, SyncEnvelope>>,
    failing: AtomicBool,
    writes: AtomicUsize,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<SyncEnvelope>>>,
}

impl MemoryRemoteStore {
    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn stored(&self, key: &str) -> Option<SyncEnvelope> {
        self.documents.lock().unwrap().get(key).cloned()
    }

    /// Simulate another device writing, notifying live subscribers.
    fn push(&self, key: &str, envelope: SyncEnvelope) {
        self.documents
            .lock()
            .unwrap()
            .insert(key.to_string(), envelope.clone());
        for tx in self.subscribers.lock().unwrap().iter() {
            let _ = tx.send(envelope.clone());
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn read(&self, key: &str) -> Result<Option<SyncEnvelope>, RemoteError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("forced failure".into()));
        }
        Ok(self.documents.lock().unwrap().get(key).cloned())
    }

    async fn write(&self, key: &str, envelope: &SyncEnvelope) -> Result<(), RemoteError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("forced failure".into()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.documents
            .lock()
            .unwrap()
            .insert(key.to_string(), envelope.clone());
        Ok(())
    }

    fn subscribe(&self, _key: &str, tx: mpsc::UnboundedSender<SyncEnvelope>) -> Subscription {
        self.subscribers.lock().unwrap().push(tx);
        Subscription::new(tokio::spawn(std::future::pending::<()>()))
    }
}

fn coordinator_with(store: &Arc<MemoryRemoteStore>) -> SyncCoordinator {
    SyncCoordinator::new(
        "streak-test".to_string(),
        Cache::open_memory().unwrap(),
        store.clone() as Arc<dyn RemoteStore>,
    )
}

fn sample_state(count: u32) -> StreakState {
    StreakState {
        count,
        last_completed_at: Some(Utc::now() - Duration::hours(1)),
    }
}

#[tokio::test]
async fn initialize_fresh_start_is_zero() {
    let store = Arc::new(MemoryRemoteStore::default());
    let mut coordinator = coordinator_with(&store);

    let state = coordinator.initialize().await;
    assert_eq!(state, StreakState::zero());
    assert!(coordinator.online());
    coordinator.shutdown();
}

#[tokio::test]
async fn persist_then_initialize_round_trips() {
    let store = Arc::new(MemoryRemoteStore::default());

    let mut coordinator = coordinator_with(&store);
    coordinator.initialize().await;
    let state = sample_state(3);
    coordinator.persist(&state);
    coordinator.flush().await;
    coordinator.shutdown();

    // Simulated restart: same store, empty cache.
    let mut restarted = coordinator_with(&store);
    assert_eq!(restarted.initialize().await, state);
    restarted.shutdown();
}

#[tokio::test]
async fn offline_fallback_returns_cached_state() {
    let store = Arc::new(MemoryRemoteStore::default());
    let cache = Cache::open_memory().unwrap();

    let mut coordinator = SyncCoordinator::new(
        "streak-test".to_string(),
        cache,
        store.clone() as Arc<dyn RemoteStore>,
    );
    coordinator.initialize().await;
    let state = sample_state(7);
    coordinator.persist(&state);
    coordinator.flush().await;

    // Drop connectivity and re-initialize the same coordinator's cache
    // contents. The remote must not be consulted successfully.
    store.set_failing(true);
    let reloaded = coordinator.initialize().await;
    assert_eq!(reloaded, state);
    assert!(!coordinator.online());
    coordinator.shutdown();
}

#[tokio::test]
async fn offline_with_empty_cache_is_fresh_start() {
    let store = Arc::new(MemoryRemoteStore::default());
    store.set_failing(true);
    let mut coordinator = coordinator_with(&store);

    assert_eq!(coordinator.initialize().await, StreakState::zero());
    assert!(!coordinator.online());
    coordinator.shutdown();
}

#[tokio::test]
async fn persist_while_offline_touches_only_the_cache() {
    let store = Arc::new(MemoryRemoteStore::default());
    store.set_failing(true);
    let mut coordinator = coordinator_with(&store);
    coordinator.initialize().await;

    coordinator.persist(&sample_state(2));
    coordinator.flush().await;
    assert_eq!(store.write_count(), 0);
    coordinator.shutdown();
}

#[tokio::test]
async fn reconnect_persists_current_state_exactly_once() {
    let store = Arc::new(MemoryRemoteStore::default());
    store.set_failing(true);
    let mut coordinator = coordinator_with(&store);
    coordinator.initialize().await;

    let state = sample_state(4);
    coordinator.persist(&state);

    store.set_failing(false);
    coordinator.set_online(true);
    coordinator.flush().await;

    assert_eq!(store.write_count(), 1);
    assert_eq!(store.stored("streak-test").map(|e| e.streak), Some(4));
    coordinator.shutdown();
}

#[tokio::test]
async fn inbound_changes_are_queued_until_drained() {
    let store = Arc::new(MemoryRemoteStore::default());
    let mut coordinator = coordinator_with(&store);
    coordinator.initialize().await;

    let now = Utc::now();
    store.push(
        "streak-test",
        SyncEnvelope {
            streak: 5,
            last_completed: Some(now),
            last_updated: now,
        },
    );

    let changes = coordinator.drain_remote_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].count, 5);

    // Drained once; the queue is now empty.
    assert!(coordinator.drain_remote_changes().is_empty());
    coordinator.shutdown();
}

#[tokio::test]
async fn malformed_inbound_change_is_dropped() {
    let store = Arc::new(MemoryRemoteStore::default());
    let mut coordinator = coordinator_with(&store);
    coordinator.initialize().await;

    // Count and timestamp disagree about being zero.
    store.push(
        "streak-test",
        SyncEnvelope {
            streak: 9,
            last_completed: None,
            last_updated: Utc::now(),
        },
    );

    assert!(coordinator.drain_remote_changes().is_empty());
    coordinator.shutdown();
}

#[tokio::test]
async fn malformed_remote_record_reads_as_fresh_start() {
    let store = Arc::new(MemoryRemoteStore::default());
    store.documents.lock().unwrap().insert(
        "streak-test".to_string(),
        SyncEnvelope {
            streak: 6,
            last_completed: None,
            last_updated: Utc::now(),
        },
    );

    let mut coordinator = coordinator_with(&store);
    assert_eq!(coordinator.initialize().await, StreakState::zero());
    coordinator.shutdown();
}

#[tokio::test]
async fn remote_disabled_never_touches_the_store() {
    let store = Arc::new(MemoryRemoteStore::default());
    let mut coordinator = coordinator_with(&store);
    coordinator.set_remote_enabled(false);

    coordinator.initialize().await;
    coordinator.persist(&sample_state(1));
    coordinator.flush().await;
    coordinator.set_online(true);

    assert!(!coordinator.online());
    assert_eq!(store.write_count(), 0);
    coordinator.shutdown();
}
