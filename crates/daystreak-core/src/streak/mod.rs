pub mod engine;
pub mod milestone;

pub use engine::{StreakEngine, StreakState, GOAL_DAYS};
pub use milestone::Milestone;
