use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the system produces an Event.
/// The CLI prints them; the watch loop emits them as they happen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A completion was recorded for today.
    Completed {
        streak: u32,
        /// Celebration label when the new count hits a milestone.
        milestone: Option<String>,
        at: DateTime<Utc>,
    },
    /// The user reset the streak to zero.
    Reset {
        previous_streak: u32,
        at: DateTime<Utc>,
    },
    /// More than 24 hours passed without a completion.
    AutoReset {
        previous_streak: u32,
        last_completed_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// A remote change replaced the in-memory state.
    RemoteApplied {
        streak: u32,
        at: DateTime<Utc>,
    },
    /// The connectivity flag flipped.
    ConnectivityChanged {
        online: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        streak: u32,
        last_completed_at: Option<DateTime<Utc>>,
        can_complete_today: bool,
        goal_progress_pct: f64,
        at: DateTime<Utc>,
    },
}
