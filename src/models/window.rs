//! Clock times and time windows.
//!
//! Defines the within-day time model shared by shifts, breaks, and
//! meeting slots.
//!
//! # Time Model
//! All times are minutes from midnight on the roster date. Windows are
//! half-open `[start, end)`, so back-to-back slots never overlap.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A time of day, stored as minutes from midnight.
///
/// Displays and parses as `"HH:MM"`. Arithmetic never wraps: adding
/// minutes past midnight yields a value `>= 24:00`, which correctly
/// compares greater than any shift end on the same date.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(i64);

impl ClockTime {
    /// Creates a clock time from minutes since midnight.
    pub fn from_minutes(minutes: i64) -> Self {
        Self(minutes)
    }

    /// Creates a clock time from an hour and minute.
    pub fn hm(hour: i64, minute: i64) -> Self {
        Self(hour * 60 + minute)
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(&self) -> i64 {
        self.0
    }

    /// This time shifted forward by `minutes`.
    #[inline]
    pub fn add_minutes(&self, minutes: i64) -> Self {
        Self(self.0 + minutes)
    }

    /// Rounds up to the next multiple of `step` minutes (identity if
    /// already aligned).
    pub fn ceil_to(&self, step: i64) -> Self {
        Self(self.0.div_euclid(step) * step + if self.0.rem_euclid(step) == 0 { 0 } else { step })
    }

    /// Rounds down to the previous multiple of `step` minutes.
    pub fn floor_to(&self, step: i64) -> Self {
        Self(self.0.div_euclid(step) * step)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Error parsing a `"HH:MM"` clock time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseClockTimeError {
    input: String,
}

impl fmt::Display for ParseClockTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid clock time '{}', expected HH:MM", self.input)
    }
}

impl std::error::Error for ParseClockTimeError {}

impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseClockTimeError {
            input: s.to_string(),
        };
        let (h, m) = s.trim().split_once(':').ok_or_else(err)?;
        let hour: i64 = h.parse().map_err(|_| err())?;
        let minute: i64 = m.parse().map_err(|_| err())?;
        if !(0..24).contains(&hour) || !(0..60).contains(&minute) {
            return Err(err());
        }
        Ok(Self::hm(hour, minute))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ParseClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: ClockTime,
    /// Interval end (exclusive).
    pub end: ClockTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Creates a window of `minutes` length beginning at `start`.
    pub fn span(start: ClockTime, minutes: i64) -> Self {
        Self {
            start,
            end: start.add_minutes(minutes),
        }
    }

    /// Length of this window in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        self.end.minutes() - self.start.minutes()
    }

    /// Whether a time falls within this window.
    #[inline]
    pub fn contains(&self, time: ClockTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies entirely within this window.
    pub fn encloses(&self, other: &Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_time_parse_display() {
        let t: ClockTime = "09:30".parse().unwrap();
        assert_eq!(t, ClockTime::hm(9, 30));
        assert_eq!(t.minutes(), 570);
        assert_eq!(t.to_string(), "09:30");

        let early: ClockTime = "7:05".parse().unwrap();
        assert_eq!(early.to_string(), "07:05");
    }

    #[test]
    fn test_clock_time_parse_rejects_garbage() {
        assert!("".parse::<ClockTime>().is_err());
        assert!("930".parse::<ClockTime>().is_err());
        assert!("25:00".parse::<ClockTime>().is_err());
        assert!("09:75".parse::<ClockTime>().is_err());
        assert!("nine:thirty".parse::<ClockTime>().is_err());
    }

    #[test]
    fn test_clock_time_arithmetic() {
        let t = ClockTime::hm(11, 45);
        assert_eq!(t.add_minutes(30), ClockTime::hm(12, 15));
        // No wrap past midnight: stays comparable within the day
        assert!(ClockTime::hm(23, 45).add_minutes(30) > ClockTime::hm(23, 45));
    }

    #[test]
    fn test_clock_time_grid_alignment() {
        assert_eq!(ClockTime::hm(9, 0).ceil_to(30), ClockTime::hm(9, 0));
        assert_eq!(ClockTime::hm(9, 10).ceil_to(30), ClockTime::hm(9, 30));
        assert_eq!(ClockTime::hm(9, 40).floor_to(30), ClockTime::hm(9, 30));
    }

    #[test]
    fn test_time_window() {
        let w = TimeWindow::new(ClockTime::hm(12, 0), ClockTime::hm(12, 30));
        assert_eq!(w.duration_minutes(), 30);
        assert!(w.contains(ClockTime::hm(12, 0)));
        assert!(w.contains(ClockTime::hm(12, 29)));
        assert!(!w.contains(ClockTime::hm(12, 30))); // exclusive end
        assert!(!w.contains(ClockTime::hm(11, 59)));
    }

    #[test]
    fn test_time_window_overlap() {
        let a = TimeWindow::new(ClockTime::hm(9, 0), ClockTime::hm(10, 0));
        let b = TimeWindow::new(ClockTime::hm(9, 30), ClockTime::hm(10, 30));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        // Touching but not overlapping
        let c = TimeWindow::new(ClockTime::hm(10, 0), ClockTime::hm(11, 0));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_time_window_encloses() {
        let shift = TimeWindow::new(ClockTime::hm(9, 0), ClockTime::hm(17, 0));
        let inside = TimeWindow::span(ClockTime::hm(10, 0), 30);
        let spilling = TimeWindow::span(ClockTime::hm(16, 45), 30);
        assert!(shift.encloses(&inside));
        assert!(!shift.encloses(&spilling));
    }

    #[test]
    fn test_clock_time_serde_as_string() {
        let t = ClockTime::hm(14, 30);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"14:30\"");
        let back: ClockTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
