//! Streak engine implementation.
//!
//! The streak engine is a wall-clock-based state machine. It does not use
//! internal threads or timers - the caller invokes `complete()`/`reset()`
//! on user action and `check_auto_reset()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Zero --complete--> Active(1)
//! Active(n) --complete--> Active(n+1)    (blocked twice on one calendar day)
//! Active(n) --reset/auto_reset--> Zero
//! ```
//!
//! Completion eligibility is a local calendar-date comparison; the
//! auto-reset is a rolling 24-hour window. The two rules do not line up
//! (23:59 then 00:01 counts as a new day at a two-minute gap) and that is
//! long-standing product behavior, kept as-is.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::milestone::Milestone;
use crate::events::Event;

/// Streak goal used for progress reporting.
pub const GOAL_DAYS: u32 = 1000;

/// Hours without a completion before the streak resets itself.
const AUTO_RESET_HOURS: i64 = 24;

/// The sole persisted entity: the running count and when it last advanced.
///
/// `count == 0` holds exactly when `last_completed_at` is absent; every
/// transition maintains that pairing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub count: u32,
    pub last_completed_at: Option<DateTime<Utc>>,
}

impl StreakState {
    /// The never-completed / just-reset state.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.count == 0
    }
}

/// Core streak state machine.
///
/// Pure logic, no I/O. The caller serializes all calls through a single
/// execution context; persistence is the [`crate::sync::SyncCoordinator`]'s
/// concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakEngine {
    state: StreakState,
}

impl StreakEngine {
    pub fn new() -> Self {
        Self {
            state: StreakState::zero(),
        }
    }

    pub fn from_state(state: StreakState) -> Self {
        Self { state }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &StreakState {
        &self.state
    }

    pub fn count(&self) -> u32 {
        self.state.count
    }

    /// True when no completion has been recorded on `now`'s local calendar
    /// date. Two completions minutes apart across local midnight are both
    /// allowed; two on the same date are not, however far apart.
    pub fn can_complete_today(&self, now: DateTime<Utc>) -> bool {
        match self.state.last_completed_at {
            None => true,
            Some(last) => local_date(last) != local_date(now),
        }
    }

    /// 0.0 .. 100.0 progress toward the [`GOAL_DAYS`] goal.
    pub fn goal_progress_pct(&self) -> f64 {
        (self.state.count as f64 / GOAL_DAYS as f64 * 100.0).min(100.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            streak: self.state.count,
            last_completed_at: self.state.last_completed_at,
            can_complete_today: self.can_complete_today(now),
            goal_progress_pct: self.goal_progress_pct(),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Record today's completion. Returns `None` when today's date already
    /// has one; the state is left untouched in that case.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.can_complete_today(now) {
            return None;
        }
        self.state.count += 1;
        self.state.last_completed_at = Some(now);
        Some(Event::Completed {
            streak: self.state.count,
            milestone: Milestone::for_count(self.state.count).map(|m| m.label().to_string()),
            at: now,
        })
    }

    /// Unconditionally back to zero. Confirmation gating is the caller's
    /// concern.
    pub fn reset(&mut self) -> Event {
        let previous = self.state.count;
        self.state = StreakState::zero();
        Event::Reset {
            previous_streak: previous,
            at: Utc::now(),
        }
    }

    /// Call periodically. Resets the streak when more than 24 hours have
    /// elapsed since the last completion.
    ///
    /// Rolling elapsed-time window, not a calendar boundary; the only
    /// time-based rule in the machine.
    pub fn check_auto_reset(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let last = self.state.last_completed_at?;
        if self.state.count == 0 {
            return None;
        }
        if now - last <= Duration::hours(AUTO_RESET_HOURS) {
            return None;
        }
        let previous = self.state.count;
        self.state = StreakState::zero();
        Some(Event::AutoReset {
            previous_streak: previous,
            last_completed_at: last,
            at: now,
        })
    }

    /// Replace the in-memory state with a remote value. Inbound sync is
    /// last-writer-wins; the remote value is taken wholesale.
    pub fn apply_remote(&mut self, state: StreakState) -> Event {
        self.state = state;
        Event::RemoteApplied {
            streak: self.state.count,
            at: Utc::now(),
        }
    }
}

impl Default for StreakEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn local_date(t: DateTime<Utc>) -> NaiveDate {
    t.with_timezone(&Local).date_naive()
}
