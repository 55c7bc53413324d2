//! Core types for streak synchronization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::streak::StreakState;

/// Wire representation of a streak record.
///
/// Field names match the hosted document format; timestamps are RFC 3339
/// UTC strings on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncEnvelope {
    pub streak: u32,
    #[serde(default)]
    pub last_completed: Option<DateTime<Utc>>,
    /// Write stamp. An ordering hint for observability and change
    /// detection only; inbound conflicts are settled by arrival order.
    pub last_updated: DateTime<Utc>,
}

impl SyncEnvelope {
    pub fn from_state(state: &StreakState, now: DateTime<Utc>) -> Self {
        Self {
            streak: state.count,
            last_completed: state.last_completed_at,
            last_updated: now,
        }
    }

    /// Convert back into machine state.
    ///
    /// A record where the count and the timestamp disagree about being
    /// zero is malformed; callers treat that as a missing record (fresh
    /// start) rather than poisoning the machine.
    pub fn into_state(self) -> Result<StreakState, RemoteError> {
        if (self.streak == 0) != self.last_completed.is_none() {
            return Err(RemoteError::InvalidRecord(format!(
                "streak {} with lastCompleted {:?}",
                self.streak, self.last_completed
            )));
        }
        Ok(StreakState {
            count: self.streak,
            last_completed_at: self.last_completed,
        })
    }
}

/// Current sync status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStatus {
    pub online: bool,
    /// Last time a remote value was successfully read or written.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Whether a remote write is still in flight.
    pub pending_write: bool,
}

/// Remote store error types.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed remote record: {0}")]
    InvalidRecord(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn envelope_round_trips_state() {
        let now = Utc::now();
        let state = StreakState {
            count: 12,
            last_completed_at: Some(now - Duration::hours(3)),
        };
        let envelope = SyncEnvelope::from_state(&state, now);
        assert_eq!(envelope.last_updated, now);
        assert_eq!(envelope.into_state().unwrap(), state);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let now = "2026-08-01T09:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let envelope = SyncEnvelope {
            streak: 5,
            last_completed: Some(now),
            last_updated: now,
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["streak"], 5);
        assert!(json.get("lastCompleted").is_some());
        assert!(json.get("lastUpdated").is_some());
    }

    #[test]
    fn zero_mismatch_is_invalid() {
        let now = Utc::now();
        let orphan_count = SyncEnvelope {
            streak: 4,
            last_completed: None,
            last_updated: now,
        };
        assert!(matches!(
            orphan_count.into_state(),
            Err(RemoteError::InvalidRecord(_))
        ));

        let orphan_stamp = SyncEnvelope {
            streak: 0,
            last_completed: Some(now),
            last_updated: now,
        };
        assert!(orphan_stamp.into_state().is_err());
    }
}
