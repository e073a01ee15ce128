///! Season and time-of-day availability of a record.
///!
///! Hour windows are evaluated directly on the 12-hour values found in the
///! dataset. Boundaries in the game data are encoded so that the folding
///! below (`+ 11` for AM starts, `+ 12` for PM starts) lands on the right
///! 24-hour values; converting to 24-hour form first gives different
///! answers at the edges.

use std::sync::LazyLock;

use chrono::{Datelike, Local, Timelike};
use critterdex_common::{Record, ALL_DAY, MONTH_COUNT};
use regex::Regex;

static WINDOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d{1,2})\s*(AM|PM)\s*[-–]\s*(\d{1,2})\s*(AM|PM)\s*$")
        .expect("time window pattern is valid")
});

/// Months the southern hemisphere is offset from the northern baseline
pub const HEMISPHERE_SHIFT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// Parsed form of a record's `time` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    AllDay,
    Window {
        from_hour: u32,
        from_meridiem: Meridiem,
        to_hour: u32,
        to_meridiem: Meridiem,
    },
    /// Anything else, including the wiki's `?`. Never available.
    Unparseable,
}

impl TimeRange {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case(ALL_DAY) {
            return TimeRange::AllDay;
        }

        let Some(caps) = WINDOW_RE.captures(raw) else {
            return TimeRange::Unparseable;
        };

        let hour = |i: usize| caps[i].parse::<u32>().ok().filter(|h| (1..=12).contains(h));
        let meridiem = |i: usize| {
            if caps[i].eq_ignore_ascii_case("AM") {
                Meridiem::Am
            } else {
                Meridiem::Pm
            }
        };

        match (hour(1), hour(3)) {
            (Some(from_hour), Some(to_hour)) => TimeRange::Window {
                from_hour,
                from_meridiem: meridiem(2),
                to_hour,
                to_meridiem: meridiem(4),
            },
            _ => TimeRange::Unparseable,
        }
    }

    /// Whether `hour` (0..=23) falls inside the range
    pub fn contains_hour(&self, hour: u32) -> bool {
        match *self {
            TimeRange::AllDay => true,
            TimeRange::Unparseable => false,
            TimeRange::Window { from_hour, from_meridiem, to_hour, .. } => {
                let closed = match from_meridiem {
                    Meridiem::Am => hour < from_hour || hour > to_hour + 11,
                    Meridiem::Pm => hour > to_hour && hour < from_hour + 12,
                };
                !closed
            }
        }
    }
}

/// Point in time the availability check is evaluated at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameTime {
    /// 0..=23
    pub hour: u32,
    /// 0..=11
    pub month: usize,
}

impl GameTime {
    pub fn new(hour: u32, month: usize) -> Self {
        Self { hour, month }
    }

    /// Local wall clock. The game runs on the console's local time.
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            hour: now.hour(),
            month: now.month0() as usize,
        }
    }
}

/// Month index to look up in `months_available`.
///
/// Wraps modulo 12; `% 11` would send June to January and never reach December.
pub fn effective_month(month: usize, southern_hemisphere: bool) -> usize {
    if southern_hemisphere {
        (month + HEMISPHERE_SHIFT) % MONTH_COUNT
    } else {
        month % MONTH_COUNT
    }
}

pub fn is_available_now(record: &Record, hour: u32, month: usize, southern_hemisphere: bool) -> bool {
    if !record.is_in_month(effective_month(month, southern_hemisphere)) {
        return false;
    }
    TimeRange::parse(&record.time_range).contains_hour(hour)
}

pub fn is_available_at(record: &Record, time: GameTime, southern_hemisphere: bool) -> bool {
    is_available_now(record, time.hour, time.month, southern_hemisphere)
}

#[cfg(test)]
mod tests {
    use super::*;
    use critterdex_common::Species;

    fn record(time: &str, months: [bool; MONTH_COUNT]) -> Record {
        let mut r = Record::new("Test", Species::Fish);
        r.time_range = time.to_string();
        r.months_available = months;
        r
    }

    fn only_month(m: usize) -> [bool; MONTH_COUNT] {
        let mut months = [false; MONTH_COUNT];
        months[m] = true;
        months
    }

    #[test]
    fn test_parse_time_range() {
        assert_eq!(TimeRange::parse("All day"), TimeRange::AllDay);
        assert_eq!(TimeRange::parse("  all DAY "), TimeRange::AllDay);
        assert_eq!(
            TimeRange::parse("9 AM - 4 PM"),
            TimeRange::Window {
                from_hour: 9,
                from_meridiem: Meridiem::Am,
                to_hour: 4,
                to_meridiem: Meridiem::Pm,
            }
        );
        assert_eq!(
            TimeRange::parse("4pm–9am"),
            TimeRange::Window {
                from_hour: 4,
                from_meridiem: Meridiem::Pm,
                to_hour: 9,
                to_meridiem: Meridiem::Am,
            }
        );
        assert_eq!(TimeRange::parse("?"), TimeRange::Unparseable);
        assert_eq!(TimeRange::parse(""), TimeRange::Unparseable);
        assert_eq!(TimeRange::parse("9 AM - 4 PM & 9 PM - 4 AM"), TimeRange::Unparseable);
        assert_eq!(TimeRange::parse("13 PM - 4 AM"), TimeRange::Unparseable);
        assert_eq!(TimeRange::parse("0 AM - 4 AM"), TimeRange::Unparseable);
    }

    #[test]
    fn test_daytime_window() {
        let range = TimeRange::parse("9 AM - 4 PM");
        assert!(range.contains_hour(9));
        assert!(range.contains_hour(15));
        assert!(!range.contains_hour(4));
        assert!(!range.contains_hour(8));
        assert!(!range.contains_hour(16));
        assert!(!range.contains_hour(20));
    }

    #[test]
    fn test_overnight_window() {
        let range = TimeRange::parse("4 PM - 9 AM");
        assert!(range.contains_hour(23));
        assert!(range.contains_hour(2));
        assert!(range.contains_hour(16));
        assert!(range.contains_hour(9));
        assert!(!range.contains_hour(12));
        assert!(!range.contains_hour(10));
        assert!(!range.contains_hour(15));
    }

    #[test]
    fn test_other_dataset_windows() {
        let long_day = TimeRange::parse("4 AM - 9 PM");
        assert!(long_day.contains_hour(4));
        assert!(long_day.contains_hour(20));
        assert!(!long_day.contains_hour(3));
        assert!(!long_day.contains_hour(21));

        let night = TimeRange::parse("9 PM - 4 AM");
        assert!(night.contains_hour(21));
        assert!(night.contains_hour(0));
        assert!(night.contains_hour(4));
        assert!(!night.contains_hour(5));
        assert!(!night.contains_hour(20));
    }

    #[test]
    fn test_unparseable_is_never_available() {
        let r = record("?", [true; MONTH_COUNT]);
        for hour in 0..24 {
            assert!(!is_available_now(&r, hour, 0, false));
        }
    }

    #[test]
    fn test_month_gate_wins_over_time() {
        let r = record("All day", only_month(3));
        for month in 0..MONTH_COUNT {
            for hour in 0..24 {
                assert_eq!(is_available_now(&r, hour, month, false), month == 3);
            }
        }
    }

    #[test]
    fn test_southern_hemisphere_shift() {
        // Available in northern January only: southern players see it in July
        let r = record("All day", only_month(0));
        assert!(is_available_now(&r, 12, 0, false));
        assert!(!is_available_now(&r, 12, 0, true));
        assert!(is_available_now(&r, 12, 6, true));
    }

    #[test]
    fn test_shift_wraps_modulo_twelve() {
        for month in 0..MONTH_COUNT {
            let shifted = effective_month(month, true);
            assert!(shifted < MONTH_COUNT);
            assert_eq!(effective_month(shifted, true), month);
        }
        assert_eq!(effective_month(5, true), 11);
        assert_eq!(effective_month(6, true), 0);
        assert_eq!(effective_month(7, false), 7);
    }

    #[test]
    fn test_game_time_now_in_range() {
        let now = GameTime::now();
        assert!(now.hour < 24);
        assert!(now.month < MONTH_COUNT);
    }
}
