pub mod config;
pub mod streak;
pub mod sync;
pub mod watch;

use std::sync::Arc;

use daystreak_core::storage::{Cache, Config};
use daystreak_core::sync::{get_or_create_user_key, RestRemoteStore, SyncCoordinator};

/// Build a coordinator from config, the local cache, and the persistent
/// user key. DAYSTREAK_OFFLINE=1 (or remote.enabled = false) keeps the
/// remote path entirely out of the picture.
pub(crate) fn open_coordinator() -> Result<(SyncCoordinator, Config), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let cache = Cache::open()?;
    let user_key = get_or_create_user_key()?;
    let remote = Arc::new(RestRemoteStore::new(&config.remote)?);

    let mut coordinator = SyncCoordinator::new(user_key, cache, remote);
    if forced_offline() || !config.remote.enabled {
        coordinator.set_remote_enabled(false);
    }
    Ok((coordinator, config))
}

fn forced_offline() -> bool {
    std::env::var("DAYSTREAK_OFFLINE").is_ok_and(|v| v != "0")
}
