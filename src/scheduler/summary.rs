//! Run statistics.
//!
//! Aggregates a completed run into the figures the reporting layer
//! consumes.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total assignments | Committed placements across all meetings |
//! | Per-meeting counts | Assignments per meeting definition |
//! | Huddle split | First/second-slot counts per (shift-start, site) group |
//! | People covered | Distinct people with ≥1 assignment |
//! | Managers involved | Distinct managers paired into ≥1 assignment |

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::grid::GRID_MINUTES;
use crate::models::{Assignment, ClockTime, MeetingDefinition, MeetingKind, Person};

/// Huddle distribution for one (shift-start, site) group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuddleGroupStats {
    /// Roster date.
    pub date: NaiveDate,
    /// The group's shared shift start.
    pub shift_start: ClockTime,
    /// Site tag.
    pub site: String,
    /// Working group members.
    pub total: usize,
    /// Members placed in the first shift quantum.
    pub first_slot: usize,
    /// Members placed in the second shift quantum.
    pub second_slot: usize,
}

impl HuddleGroupStats {
    /// Share of the group placed in the first slot, as a percentage.
    pub fn first_slot_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.first_slot as f64 / self.total as f64 * 100.0
        }
    }
}

/// Aggregate figures for one scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Committed placements across all meetings.
    pub total_assignments: usize,
    /// Assignment counts per meeting definition.
    pub by_meeting: HashMap<String, usize>,
    /// Huddle distribution per (shift-start, site) group, in stable
    /// (date, shift-start, site) order.
    pub huddle_groups: Vec<HuddleGroupStats>,
    /// Distinct people with at least one assignment.
    pub people_with_assignments: usize,
    /// Distinct managers paired into at least one assignment.
    pub managers_involved: usize,
}

impl ScheduleSummary {
    /// Computes run statistics from the committed assignment set.
    ///
    /// # Arguments
    /// * `meetings` - The meeting definitions (to identify group huddles).
    /// * `associates` - The associate roster (for huddle group sizes).
    /// * `assignments` - The run's committed assignments.
    pub fn calculate(
        meetings: &[MeetingDefinition],
        associates: &[Person],
        assignments: &[Assignment],
    ) -> Self {
        let mut by_meeting: HashMap<String, usize> = HashMap::new();
        let mut people: HashSet<&str> = HashSet::new();
        let mut managers: HashSet<&str> = HashSet::new();

        for a in assignments {
            *by_meeting.entry(a.meeting.clone()).or_insert(0) += 1;
            people.insert(&a.person_id);
            if let Some(m) = &a.manager_id {
                managers.insert(m);
            }
        }

        let huddle_names: HashSet<&str> = meetings
            .iter()
            .filter(|m| m.kind == MeetingKind::Group)
            .map(|m| m.name.as_str())
            .collect();

        let mut groups: BTreeMap<(NaiveDate, ClockTime, String), Vec<&Person>> = BTreeMap::new();
        if !huddle_names.is_empty() {
            for p in associates.iter().filter(|p| p.working) {
                groups
                    .entry((p.date, p.shift.start, p.site.clone()))
                    .or_default()
                    .push(p);
            }
        }

        let huddle_groups = groups
            .into_iter()
            .map(|((date, shift_start, site), members)| {
                let ids: HashSet<&str> = members.iter().map(|p| p.id.as_str()).collect();
                let second_start = shift_start.add_minutes(GRID_MINUTES);
                let mut first_slot = 0;
                let mut second_slot = 0;
                for a in assignments {
                    if a.date != date
                        || !huddle_names.contains(a.meeting.as_str())
                        || !ids.contains(a.person_id.as_str())
                    {
                        continue;
                    }
                    if a.slot.start == shift_start {
                        first_slot += 1;
                    } else if a.slot.start == second_start {
                        second_slot += 1;
                    }
                }
                HuddleGroupStats {
                    date,
                    shift_start,
                    site,
                    total: members.len(),
                    first_slot,
                    second_slot,
                }
            })
            .collect();

        Self {
            total_assignments: assignments.len(),
            by_meeting,
            huddle_groups,
            people_with_assignments: people.len(),
            managers_involved: managers.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn huddle_and_one2one() -> Vec<MeetingDefinition> {
        vec![
            MeetingDefinition::new("Team_Huddle").group().with_duration(15),
            MeetingDefinition::new("One-2-One"),
        ]
    }

    fn associate(id: &str, site: &str) -> Person {
        Person::new(id, date())
            .with_site(site)
            .with_shift(ClockTime::hm(9, 0), ClockTime::hm(17, 0))
    }

    fn huddle_at(id: &str, h: i64, m: i64) -> Assignment {
        Assignment::new(
            id,
            "Team_Huddle",
            date(),
            TimeWindow::span(ClockTime::hm(h, m), 15),
        )
    }

    #[test]
    fn test_summary_counts() {
        let meetings = huddle_and_one2one();
        let associates = vec![associate("AA1", "BLR"), associate("AA2", "BLR")];
        let assignments = vec![
            huddle_at("AA1", 9, 0),
            huddle_at("AA2", 9, 30),
            Assignment::new(
                "AA1",
                "One-2-One",
                date(),
                TimeWindow::span(ClockTime::hm(10, 30), 30),
            )
            .with_manager("MGR1"),
        ];

        let summary = ScheduleSummary::calculate(&meetings, &associates, &assignments);
        assert_eq!(summary.total_assignments, 3);
        assert_eq!(summary.by_meeting["Team_Huddle"], 2);
        assert_eq!(summary.by_meeting["One-2-One"], 1);
        assert_eq!(summary.people_with_assignments, 2);
        assert_eq!(summary.managers_involved, 1);
    }

    #[test]
    fn test_huddle_split_per_group() {
        let meetings = huddle_and_one2one();
        let associates = vec![
            associate("AA1", "BLR"),
            associate("AA2", "BLR"),
            associate("AA3", "BLR"),
            associate("AA4", "HYD"),
        ];
        let assignments = vec![
            huddle_at("AA1", 9, 0),
            huddle_at("AA2", 9, 0),
            huddle_at("AA3", 9, 30),
            huddle_at("AA4", 9, 0),
        ];

        let summary = ScheduleSummary::calculate(&meetings, &associates, &assignments);
        assert_eq!(summary.huddle_groups.len(), 2);

        let blr = summary
            .huddle_groups
            .iter()
            .find(|g| g.site == "BLR")
            .unwrap();
        assert_eq!(blr.total, 3);
        assert_eq!(blr.first_slot, 2);
        assert_eq!(blr.second_slot, 1);
        assert!((blr.first_slot_percent() - 66.666).abs() < 0.01);

        let hyd = summary
            .huddle_groups
            .iter()
            .find(|g| g.site == "HYD")
            .unwrap();
        assert_eq!(hyd.total, 1);
        assert_eq!(hyd.first_slot, 1);
    }

    #[test]
    fn test_no_group_meetings_no_huddle_stats() {
        let meetings = vec![MeetingDefinition::new("One-2-One")];
        let associates = vec![associate("AA1", "BLR")];
        let summary = ScheduleSummary::calculate(&meetings, &associates, &[]);
        assert!(summary.huddle_groups.is_empty());
    }

    #[test]
    fn test_empty_run() {
        let summary = ScheduleSummary::calculate(&[], &[], &[]);
        assert_eq!(summary.total_assignments, 0);
        assert_eq!(summary.people_with_assignments, 0);
        assert_eq!(summary.managers_involved, 0);
        assert!(summary.by_meeting.is_empty());
    }
}
