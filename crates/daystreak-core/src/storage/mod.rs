mod cache;
mod config;

pub use cache::Cache;
pub use config::{Config, RemoteConfig, TickConfig};

use std::path::PathBuf;

/// Returns `~/.config/daystreak[-dev]/` based on DAYSTREAK_ENV.
///
/// Set DAYSTREAK_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYSTREAK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("daystreak-dev")
    } else {
        base_dir.join("daystreak")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
