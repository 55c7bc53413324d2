//! TOML-based application configuration.
//!
//! Stores:
//! - Remote store endpoint and timeout/retry policy
//! - Periodic tick interval for auto-reset evaluation
//!
//! Configuration is stored at `~/.config/daystreak/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;

/// Remote store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the remote document store. Should end with a slash when
    /// it carries a path of its own.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Top-level collection the per-user records live under.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempts per read/write before the remote counts as unavailable.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Change-subscription poll interval.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Set to false to run local-only.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Periodic tick configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickConfig {
    /// How often the watch loop evaluates the auto-reset rule.
    #[serde(default = "default_auto_reset_interval_secs")]
    pub auto_reset_interval_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/daystreak/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub tick: TickConfig,
}

// Default functions
fn default_base_url() -> String {
    "https://daystreak-default.firebaseio.com/".into()
}
fn default_namespace() -> String {
    "streaks".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_retry_attempts() -> u32 {
    2
}
fn default_poll_interval_secs() -> u64 {
    30
}
fn default_auto_reset_interval_secs() -> u64 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            namespace: default_namespace(),
            timeout_secs: default_timeout_secs(),
            retry_attempts: default_retry_attempts(),
            poll_interval_secs: default_poll_interval_secs(),
            enabled: true,
        }
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            auto_reset_interval_secs: default_auto_reset_interval_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            tick: TickConfig::default(),
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. The new value is parsed
    /// against the type of the existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (parents.split('.').collect::<Vec<_>>(), leaf),
            None => (Vec::new(), key),
        };

        let mut current = &mut json;
        for part in parents {
            current = current
                .get_mut(part)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
        }
        let obj = current
            .as_object_mut()
            .ok_or_else(|| format!("unknown config key: {key}"))?;
        let existing = obj
            .get(leaf)
            .ok_or_else(|| format!("unknown config key: {key}"))?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<u64>()
                    .map_err(|_| format!("cannot parse '{value}' as number"))?;
                serde_json::Value::Number(n.into())
            }
            _ => serde_json::Value::String(value.into()),
        };
        obj.insert(leaf.to_string(), new_value);

        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }
}
