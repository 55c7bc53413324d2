use std::io::Write;

use chrono::Utc;
use daystreak_core::streak::StreakEngine;
use daystreak_core::sync::get_or_create_user_key;

use super::open_coordinator;

pub async fn status() -> Result<(), Box<dyn std::error::Error>> {
    let (mut coordinator, _config) = open_coordinator()?;
    let engine = StreakEngine::from_state(coordinator.initialize().await);
    println!("{}", serde_json::to_string_pretty(&engine.snapshot(Utc::now()))?);
    coordinator.shutdown();
    Ok(())
}

pub async fn complete() -> Result<(), Box<dyn std::error::Error>> {
    let (mut coordinator, _config) = open_coordinator()?;
    let mut engine = StreakEngine::from_state(coordinator.initialize().await);

    match engine.complete(Utc::now()) {
        Some(event) => {
            coordinator.persist(engine.state());
            coordinator.flush().await;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        None => {
            // Already recorded today; show the snapshot instead.
            println!("{}", serde_json::to_string_pretty(&engine.snapshot(Utc::now()))?);
        }
    }
    coordinator.shutdown();
    Ok(())
}

pub async fn reset(yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes && !confirm("Reset your streak to zero? This cannot be undone.")? {
        println!("aborted");
        return Ok(());
    }

    let (mut coordinator, _config) = open_coordinator()?;
    let mut engine = StreakEngine::from_state(coordinator.initialize().await);
    let event = engine.reset();
    coordinator.persist(engine.state());
    coordinator.flush().await;
    println!("{}", serde_json::to_string_pretty(&event)?);
    coordinator.shutdown();
    Ok(())
}

pub fn id() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", get_or_create_user_key()?);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, Box<dyn std::error::Error>> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
