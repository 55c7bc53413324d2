//! Coordination between the streak engine, the local cache, and the
//! remote store.
//!
//! The coordinator owns the user key, the connectivity flag, and the last
//! observed state. The remote path never blocks a state transition: cache
//! writes are synchronous, remote writes run in a spawned task, and
//! inbound remote changes are queued until the owner's next tick.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::remote::{RemoteStore, Subscription};
use super::types::{SyncEnvelope, SyncStatus};
use crate::events::Event;
use crate::storage::Cache;
use crate::streak::StreakState;

/// Cache key the streak record is stored under.
const CACHE_KEY: &str = "streak_state";

pub struct SyncCoordinator {
    user_key: String,
    cache: Cache,
    remote: Arc<dyn RemoteStore>,
    remote_enabled: bool,
    online: bool,
    /// Last state observed through initialize/persist/inbound sync.
    current: StreakState,
    last_sync_at: Option<DateTime<Utc>>,
    inbound_tx: mpsc::UnboundedSender<SyncEnvelope>,
    inbound_rx: mpsc::UnboundedReceiver<SyncEnvelope>,
    subscription: Option<Subscription>,
    pending_write: Option<JoinHandle<bool>>,
}

impl SyncCoordinator {
    pub fn new(user_key: String, cache: Cache, remote: Arc<dyn RemoteStore>) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        Self {
            user_key,
            cache,
            remote,
            remote_enabled: true,
            online: false,
            current: StreakState::zero(),
            last_sync_at: None,
            inbound_tx,
            inbound_rx,
            subscription: None,
            pending_write: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    pub fn online(&self) -> bool {
        self.online
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            online: self.online,
            last_sync_at: self.last_sync_at,
            pending_write: self
                .pending_write
                .as_ref()
                .is_some_and(|task| !task.is_finished()),
        }
    }

    /// Disable the remote path entirely (local-only operation).
    pub fn set_remote_enabled(&mut self, enabled: bool) {
        self.remote_enabled = enabled;
        if !enabled {
            self.set_online(false);
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Load the starting state: remote first, local cache on remote
    /// failure, the zero state when neither has a record.
    ///
    /// Never fails and never hangs; the remote read is bounded by the
    /// store's timeout/retry policy. The outcome also seeds the
    /// connectivity flag and, when online, starts the change
    /// subscription.
    pub async fn initialize(&mut self) -> StreakState {
        if !self.remote_enabled {
            let state = self.read_cache().unwrap_or_else(StreakState::zero);
            self.current = state.clone();
            return state;
        }

        match self.remote.read(&self.user_key).await {
            Ok(found) => {
                let state = found
                    .and_then(|envelope| match envelope.into_state() {
                        Ok(state) => Some(state),
                        Err(e) => {
                            warn!(error = %e, "discarding malformed remote record");
                            None
                        }
                    })
                    .unwrap_or_else(StreakState::zero);
                self.write_cache(&state);
                self.current = state.clone();
                self.last_sync_at = Some(Utc::now());
                self.online = true;
                self.start_subscription();
                state
            }
            Err(e) => {
                debug!(error = %e, "remote load failed, falling back to local cache");
                let state = self.read_cache().unwrap_or_else(StreakState::zero);
                self.current = state.clone();
                self.online = false;
                self.stop_subscription();
                state
            }
        }
    }

    /// Record a state change. The local cache is written synchronously;
    /// the remote write is best-effort in a spawned task, and a newer
    /// persist supersedes an in-flight one so an older value cannot land
    /// after a newer one.
    pub fn persist(&mut self, state: &StreakState) {
        self.current = state.clone();
        self.write_cache(state);

        if !self.online {
            debug!("offline, remote write deferred until reconnect");
            return;
        }

        let envelope = SyncEnvelope::from_state(state, Utc::now());
        if let Some(task) = self.pending_write.take() {
            task.abort();
        }
        let remote = Arc::clone(&self.remote);
        let key = self.user_key.clone();
        self.pending_write = Some(tokio::spawn(async move {
            match remote.write(&key, &envelope).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "remote write failed, cache remains authoritative");
                    false
                }
            }
        }));
    }

    /// Await the in-flight remote write, if any. One-shot callers use
    /// this before exiting so the spawned write is not dropped mid-air.
    pub async fn flush(&mut self) {
        if let Some(task) = self.pending_write.take() {
            if task.await.unwrap_or(false) {
                self.last_sync_at = Some(Utc::now());
            }
        }
    }

    /// Flip the connectivity flag. Edge-triggered: coming online starts
    /// the change subscription and writes the current state through to
    /// the remote; going offline tears the subscription down.
    pub fn set_online(&mut self, online: bool) {
        if online == self.online {
            return;
        }
        if online && !self.remote_enabled {
            return;
        }
        self.online = online;
        if online {
            debug!("connectivity restored");
            self.start_subscription();
            let current = self.current.clone();
            self.persist(&current);
        } else {
            debug!("connectivity lost");
            self.stop_subscription();
        }
    }

    /// Re-probe the remote store and update the connectivity flag.
    /// Returns the edge event when the flag flipped.
    pub async fn probe_connectivity(&mut self) -> Option<Event> {
        if !self.remote_enabled {
            return None;
        }
        let reachable = self.remote.read(&self.user_key).await.is_ok();
        if reachable == self.online {
            return None;
        }
        self.set_online(reachable);
        Some(Event::ConnectivityChanged {
            online: reachable,
            at: Utc::now(),
        })
    }

    /// Inbound remote changes observed since the last call, oldest first.
    ///
    /// Changes are queued here and applied by the owner on its next tick,
    /// so delivery never mutates state mid-callback. The remote value
    /// wins; each one is mirrored into the local cache.
    pub fn drain_remote_changes(&mut self) -> Vec<StreakState> {
        let mut changes = Vec::new();
        while let Ok(envelope) = self.inbound_rx.try_recv() {
            match envelope.into_state() {
                Ok(state) => {
                    self.write_cache(&state);
                    self.last_sync_at = Some(Utc::now());
                    changes.push(state);
                }
                Err(e) => warn!(error = %e, "ignoring malformed remote change"),
            }
        }
        if let Some(newest) = changes.last() {
            self.current = newest.clone();
        }
        changes
    }

    /// Tear down the subscription and abandon any in-flight write.
    pub fn shutdown(&mut self) {
        self.stop_subscription();
        if let Some(task) = self.pending_write.take() {
            task.abort();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn start_subscription(&mut self) {
        if self.subscription.is_some() {
            return;
        }
        self.subscription = Some(
            self.remote
                .subscribe(&self.user_key, self.inbound_tx.clone()),
        );
    }

    fn stop_subscription(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    fn write_cache(&self, state: &StreakState) {
        let envelope = SyncEnvelope::from_state(state, Utc::now());
        match serde_json::to_string(&envelope) {
            Ok(json) => {
                if let Err(e) = self.cache.set(CACHE_KEY, &json) {
                    warn!(error = %e, "local cache write failed");
                }
            }
            Err(e) => warn!(error = %e, "could not serialize streak record"),
        }
    }

    /// A missing or unreadable cache record reads as a fresh start.
    fn read_cache(&self) -> Option<StreakState> {
        let json = self.cache.get(CACHE_KEY).ok().flatten()?;
        let envelope: SyncEnvelope = serde_json::from_str(&json).ok()?;
        envelope.into_state().ok()
    }
}
