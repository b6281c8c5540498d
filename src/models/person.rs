//! Roster person model.
//!
//! A `Person` is one roster row: an associate or manager on one date,
//! with shift bounds, break windows, and a working flag. Shift and
//! break fields are immutable for the run; committed meetings are
//! tracked separately in the assignment store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ClockTime, TimeWindow};

/// A person on the roster for one date.
///
/// Identity is the explicit `(id, date)` pair; the same person appears
/// once per scheduled date. Associates may carry a reference to their
/// direct manager's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Person identifier (unique per date).
    pub id: String,
    /// Roster date this row applies to.
    pub date: NaiveDate,
    /// Site tag, used for manager preference and huddle grouping.
    pub site: String,
    /// Skill/group tag, used as the capacity ledger key segment.
    pub skill: String,
    /// Shift bounds [start, end).
    pub shift: TimeWindow,
    /// Break and lunch windows (at most three).
    pub breaks: Vec<TimeWindow>,
    /// Whether the person is working on this date.
    pub working: bool,
    /// Direct manager's person id, if any.
    pub manager_id: Option<String>,
}

impl Person {
    /// Creates a working person with an empty shift.
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
            site: String::new(),
            skill: String::new(),
            shift: TimeWindow::new(ClockTime::from_minutes(0), ClockTime::from_minutes(0)),
            breaks: Vec::new(),
            working: true,
            manager_id: None,
        }
    }

    /// Sets the site tag.
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    /// Sets the skill/group tag.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = skill.into();
        self
    }

    /// Sets the shift bounds.
    pub fn with_shift(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.shift = TimeWindow::new(start, end);
        self
    }

    /// Adds a break or lunch window.
    pub fn with_break(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.breaks.push(TimeWindow::new(start, end));
        self
    }

    /// Sets the working flag.
    pub fn with_working(mut self, working: bool) -> Self {
        self.working = working;
        self
    }

    /// Sets the direct manager reference.
    pub fn with_manager(mut self, manager_id: impl Into<String>) -> Self {
        self.manager_id = Some(manager_id.into());
        self
    }

    /// Whether `window` overlaps any break on this row.
    pub fn on_break_during(&self, window: &TimeWindow) -> bool {
        self.breaks.iter().any(|b| b.overlaps(window))
    }

    /// Whether `window` lies entirely within the shift.
    pub fn shift_covers(&self, window: &TimeWindow) -> bool {
        self.shift.encloses(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_person_builder() {
        let p = Person::new("AA17", date())
            .with_site("BLR")
            .with_skill("Chat")
            .with_shift(ClockTime::hm(9, 0), ClockTime::hm(17, 0))
            .with_break(ClockTime::hm(12, 0), ClockTime::hm(12, 30))
            .with_manager("MGR3");

        assert_eq!(p.id, "AA17");
        assert_eq!(p.site, "BLR");
        assert_eq!(p.skill, "Chat");
        assert!(p.working);
        assert_eq!(p.breaks.len(), 1);
        assert_eq!(p.manager_id.as_deref(), Some("MGR3"));
    }

    #[test]
    fn test_on_break_during() {
        let p = Person::new("AA1", date())
            .with_shift(ClockTime::hm(9, 0), ClockTime::hm(17, 0))
            .with_break(ClockTime::hm(12, 0), ClockTime::hm(12, 30))
            .with_break(ClockTime::hm(15, 0), ClockTime::hm(15, 15));

        assert!(p.on_break_during(&TimeWindow::span(ClockTime::hm(12, 0), 30)));
        assert!(p.on_break_during(&TimeWindow::span(ClockTime::hm(11, 45), 30)));
        assert!(p.on_break_during(&TimeWindow::span(ClockTime::hm(14, 30), 60)));
        assert!(!p.on_break_during(&TimeWindow::span(ClockTime::hm(10, 0), 30)));
    }

    #[test]
    fn test_shift_covers() {
        let p = Person::new("AA1", date()).with_shift(ClockTime::hm(9, 0), ClockTime::hm(17, 0));
        assert!(p.shift_covers(&TimeWindow::span(ClockTime::hm(9, 0), 30)));
        assert!(p.shift_covers(&TimeWindow::span(ClockTime::hm(16, 30), 30)));
        assert!(!p.shift_covers(&TimeWindow::span(ClockTime::hm(16, 45), 30)));
        assert!(!p.shift_covers(&TimeWindow::span(ClockTime::hm(8, 30), 30)));
    }

    #[test]
    fn test_person_serde_round_trip() {
        let p = Person::new("AA1", date())
            .with_shift(ClockTime::hm(9, 0), ClockTime::hm(17, 0))
            .with_break(ClockTime::hm(12, 0), ClockTime::hm(13, 0));
        let json = serde_json::to_string(&p).unwrap();
        let back: Person = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "AA1");
        assert_eq!(back.shift, p.shift);
        assert_eq!(back.breaks, p.breaks);
    }
}
