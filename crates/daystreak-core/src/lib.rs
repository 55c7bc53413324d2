//! # Daystreak Core Library
//!
//! This library provides the core business logic for the Daystreak habit
//! tracker: one completion per calendar day, a running consecutive-day
//! count, and offline-first persistence. It implements a CLI-first
//! philosophy where all operations are available via a standalone CLI
//! binary; any GUI would be a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Streak Engine**: a wall-clock-based state machine that requires the
//!   caller to periodically invoke `check_auto_reset()` for time-based
//!   transitions
//! - **Sync**: reconciliation between the in-memory streak, a SQLite local
//!   cache, and a remote key-value document store keyed by an anonymous
//!   user key
//! - **Storage**: SQLite-based cache and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`StreakEngine`]: core streak state machine
//! - [`SyncCoordinator`]: cache/remote reconciliation and connectivity
//! - [`Cache`]: local durable fallback storage
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod storage;
pub mod streak;
pub mod sync;

pub use error::{CacheError, ConfigError, CoreError};
pub use events::Event;
pub use storage::{Cache, Config};
pub use streak::{Milestone, StreakEngine, StreakState};
pub use sync::{RemoteError, RemoteStore, RestRemoteStore, SyncCoordinator, SyncEnvelope, SyncStatus};
