//! Periodic tick loop: inbound remote changes, auto-reset evaluation,
//! connectivity re-probe. Runs until ctrl-c.

use std::time::Duration;

use chrono::Utc;
use daystreak_core::streak::StreakEngine;
use tokio::time::MissedTickBehavior;

use super::open_coordinator;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (mut coordinator, config) = open_coordinator()?;
    let mut engine = StreakEngine::from_state(coordinator.initialize().await);
    println!("{}", serde_json::to_string_pretty(&engine.snapshot(Utc::now()))?);

    let mut ticker = tokio::time::interval(Duration::from_secs(
        config.tick.auto_reset_interval_secs.max(1),
    ));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Inbound remote changes first; the remote value wins.
                for state in coordinator.drain_remote_changes() {
                    let event = engine.apply_remote(state);
                    println!("{}", serde_json::to_string(&event)?);
                }

                if let Some(event) = engine.check_auto_reset(Utc::now()) {
                    coordinator.persist(engine.state());
                    println!("{}", serde_json::to_string(&event)?);
                }

                if let Some(event) = coordinator.probe_connectivity().await {
                    println!("{}", serde_json::to_string(&event)?);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                coordinator.flush().await;
                coordinator.shutdown();
                return Ok(());
            }
        }
    }
}
