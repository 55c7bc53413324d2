//! Remote synchronization layer.
//!
//! Reconciles the in-memory streak with a SQLite local cache and a remote
//! key-value document store addressed by an anonymous per-installation
//! user key. The system stays fully usable with no connectivity at all;
//! the remote path is best-effort and eventually consistent.

pub mod coordinator;
pub mod remote;
pub mod types;
pub mod user_key;

#[cfg(test)]
mod coordinator_tests;
#[cfg(test)]
mod remote_tests;

pub use coordinator::SyncCoordinator;
pub use remote::{RemoteStore, RestRemoteStore, Subscription};
pub use types::{RemoteError, SyncEnvelope, SyncStatus};
pub use user_key::{get_or_create_user_key, get_or_create_user_key_at, UserKeyError};
