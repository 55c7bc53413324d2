//! Milestone thresholds for the streak counter.

use serde::{Deserialize, Serialize};

/// Streak counts that trigger a celebratory signal.
///
/// The set is fixed; persistence logic never depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    DayOne,
    OneWeek,
    ThirtyDays,
    FiftyDays,
    OneHundred,
    TwoHundred,
    OneYear,
    FiveHundred,
    SevenFifty,
    OneThousand,
}

impl Milestone {
    /// The milestone reached at exactly this streak count, if any.
    pub fn for_count(count: u32) -> Option<Milestone> {
        match count {
            1 => Some(Milestone::DayOne),
            7 => Some(Milestone::OneWeek),
            30 => Some(Milestone::ThirtyDays),
            50 => Some(Milestone::FiftyDays),
            100 => Some(Milestone::OneHundred),
            200 => Some(Milestone::TwoHundred),
            365 => Some(Milestone::OneYear),
            500 => Some(Milestone::FiveHundred),
            750 => Some(Milestone::SevenFifty),
            1000 => Some(Milestone::OneThousand),
            _ => None,
        }
    }

    /// Celebration label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Milestone::DayOne => "day one",
            Milestone::OneWeek => "one week",
            Milestone::ThirtyDays => "thirty days",
            Milestone::FiftyDays => "fifty days",
            Milestone::OneHundred => "one hundred",
            Milestone::TwoHundred => "two hundred",
            Milestone::OneYear => "one year",
            Milestone::FiveHundred => "five hundred",
            Milestone::SevenFifty => "seven fifty",
            Milestone::OneThousand => "one thousand",
        }
    }

    /// The streak count this milestone corresponds to.
    pub fn count(&self) -> u32 {
        match self {
            Milestone::DayOne => 1,
            Milestone::OneWeek => 7,
            Milestone::ThirtyDays => 30,
            Milestone::FiftyDays => 50,
            Milestone::OneHundred => 100,
            Milestone::TwoHundred => 200,
            Milestone::OneYear => 365,
            Milestone::FiveHundred => 500,
            Milestone::SevenFifty => 750,
            Milestone::OneThousand => 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milestone_at_seven() {
        assert_eq!(Milestone::for_count(7), Some(Milestone::OneWeek));
        assert_eq!(Milestone::OneWeek.label(), "one week");
    }

    #[test]
    fn test_no_milestone_between_thresholds() {
        assert_eq!(Milestone::for_count(4), None);
        assert_eq!(Milestone::for_count(8), None);
        assert_eq!(Milestone::for_count(999), None);
    }

    #[test]
    fn test_first_and_last() {
        assert_eq!(Milestone::for_count(1), Some(Milestone::DayOne));
        assert_eq!(Milestone::for_count(1000), Some(Milestone::OneThousand));
        assert_eq!(Milestone::for_count(0), None);
        assert_eq!(Milestone::for_count(1001), None);
    }

    #[test]
    fn test_count_round_trips() {
        for count in [1, 7, 30, 50, 100, 200, 365, 500, 750, 1000] {
            let milestone = Milestone::for_count(count).unwrap();
            assert_eq!(milestone.count(), count);
        }
    }
}
