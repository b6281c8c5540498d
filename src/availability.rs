//! Availability checks for people and managers.
//!
//! Side-effect-free predicates over a person's shift, breaks, and the
//! commitments already in the assignment store. Safe to call
//! repeatedly during slot search.

use chrono::NaiveDate;

use crate::models::{AssignmentStore, ClockTime, Person, TimeWindow};

/// Whether a person is free for `[start, start + duration)`.
///
/// True iff the person is working, the span lies within their shift,
/// does not touch a break window, and does not overlap any committed
/// assignment for them on this date (attended or paired).
pub fn is_free(
    person: &Person,
    store: &AssignmentStore,
    start: ClockTime,
    duration_minutes: i64,
) -> bool {
    if !person.working {
        return false;
    }
    let span = TimeWindow::span(start, duration_minutes);
    person.shift_covers(&span)
        && !person.on_break_during(&span)
        && !store.overlaps(&person.id, person.date, &span)
}

/// Resolves a manager for an individual meeting.
///
/// With `require_direct`, only the associate's assigned manager
/// qualifies — and only if that manager's roster row for the date is
/// working and free. There is no fallback substitution for
/// direct-manager meetings. Otherwise managers are searched same-site
/// first, then any site, in roster order, returning the first free one.
pub fn find_manager<'a>(
    associate: &Person,
    managers: &'a [Person],
    store: &AssignmentStore,
    start: ClockTime,
    duration_minutes: i64,
    require_direct: bool,
) -> Option<&'a Person> {
    if require_direct {
        let direct = associate.manager_id.as_deref()?;
        return managers
            .iter()
            .find(|m| m.id == direct && m.date == associate.date)
            .filter(|m| is_free(m, store, start, duration_minutes));
    }

    let same_site = managers
        .iter()
        .filter(|m| m.date == associate.date && m.site == associate.site);
    let other_site = managers
        .iter()
        .filter(|m| m.date == associate.date && m.site != associate.site);
    same_site
        .chain(other_site)
        .find(|m| is_free(m, store, start, duration_minutes))
}

/// Best-effort manager attach for huddles: the first manager in roster
/// order free at the slot, or `None` if nobody is.
pub fn first_free_manager<'a>(
    managers: &'a [Person],
    date: NaiveDate,
    store: &AssignmentStore,
    start: ClockTime,
    duration_minutes: i64,
) -> Option<&'a Person> {
    managers
        .iter()
        .filter(|m| m.date == date)
        .find(|m| is_free(m, store, start, duration_minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Assignment;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn associate() -> Person {
        Person::new("AA1", date())
            .with_site("BLR")
            .with_shift(ClockTime::hm(9, 0), ClockTime::hm(17, 0))
            .with_break(ClockTime::hm(12, 0), ClockTime::hm(12, 30))
            .with_manager("MGR1")
    }

    fn manager(id: &str, site: &str) -> Person {
        Person::new(id, date())
            .with_site(site)
            .with_shift(ClockTime::hm(8, 0), ClockTime::hm(18, 0))
    }

    #[test]
    fn test_is_free_within_shift() {
        let p = associate();
        let store = AssignmentStore::new();
        assert!(is_free(&p, &store, ClockTime::hm(10, 0), 30));
        // Spills past shift end
        assert!(!is_free(&p, &store, ClockTime::hm(16, 45), 30));
        // Before shift start
        assert!(!is_free(&p, &store, ClockTime::hm(8, 30), 30));
    }

    #[test]
    fn test_is_free_rejects_breaks_over_full_span() {
        let p = associate();
        let store = AssignmentStore::new();
        assert!(!is_free(&p, &store, ClockTime::hm(12, 0), 30));
        // 60-min meeting starting 11:30 runs into the 12:00 lunch
        assert!(!is_free(&p, &store, ClockTime::hm(11, 30), 60));
        assert!(is_free(&p, &store, ClockTime::hm(11, 30), 30));
    }

    #[test]
    fn test_is_free_rejects_committed_overlap() {
        let p = associate();
        let mut store = AssignmentStore::new();
        store.commit(Assignment::new(
            "AA1",
            "One-2-One",
            date(),
            TimeWindow::span(ClockTime::hm(10, 0), 30),
        ));

        assert!(!is_free(&p, &store, ClockTime::hm(10, 0), 30));
        assert!(!is_free(&p, &store, ClockTime::hm(9, 45), 30));
        assert!(is_free(&p, &store, ClockTime::hm(10, 30), 30));
    }

    #[test]
    fn test_is_free_requires_working() {
        let p = associate().with_working(false);
        let store = AssignmentStore::new();
        assert!(!is_free(&p, &store, ClockTime::hm(10, 0), 30));
    }

    #[test]
    fn test_direct_manager_only_no_substitution() {
        let a = associate();
        let managers = vec![manager("MGR1", "BLR").with_working(false), manager("MGR2", "BLR")];
        let store = AssignmentStore::new();

        // Direct manager off duty: nobody substitutes
        let found = find_manager(&a, &managers, &store, ClockTime::hm(10, 0), 30, true);
        assert!(found.is_none());
    }

    #[test]
    fn test_direct_manager_found_when_free() {
        let a = associate();
        let managers = vec![manager("MGR2", "BLR"), manager("MGR1", "BLR")];
        let store = AssignmentStore::new();

        let found = find_manager(&a, &managers, &store, ClockTime::hm(10, 0), 30, true).unwrap();
        assert_eq!(found.id, "MGR1");
    }

    #[test]
    fn test_any_manager_prefers_same_site() {
        let a = associate();
        let managers = vec![manager("MGR9", "HYD"), manager("MGR2", "BLR")];
        let store = AssignmentStore::new();

        let found = find_manager(&a, &managers, &store, ClockTime::hm(10, 0), 30, false).unwrap();
        assert_eq!(found.id, "MGR2");
    }

    #[test]
    fn test_any_manager_falls_through_to_other_sites() {
        let a = associate();
        let managers = vec![manager("MGR9", "HYD")];
        let store = AssignmentStore::new();

        let found = find_manager(&a, &managers, &store, ClockTime::hm(10, 0), 30, false).unwrap();
        assert_eq!(found.id, "MGR9");
    }

    #[test]
    fn test_busy_manager_is_skipped() {
        let a = associate();
        let managers = vec![manager("MGR2", "BLR"), manager("MGR3", "BLR")];
        let mut store = AssignmentStore::new();
        store.commit(
            Assignment::new("AA7", "Coaching", date(), TimeWindow::span(ClockTime::hm(10, 0), 30))
                .with_manager("MGR2"),
        );

        let found = find_manager(&a, &managers, &store, ClockTime::hm(10, 0), 30, false).unwrap();
        assert_eq!(found.id, "MGR3");
    }

    #[test]
    fn test_first_free_manager_roster_order() {
        let managers = vec![manager("MGR5", "HYD"), manager("MGR2", "BLR")];
        let store = AssignmentStore::new();

        let found =
            first_free_manager(&managers, date(), &store, ClockTime::hm(9, 0), 15).unwrap();
        assert_eq!(found.id, "MGR5");
    }

    #[test]
    fn test_first_free_manager_none_available() {
        let managers = vec![manager("MGR5", "HYD").with_working(false)];
        let store = AssignmentStore::new();

        assert!(first_free_manager(&managers, date(), &store, ClockTime::hm(9, 0), 15).is_none());
    }
}
