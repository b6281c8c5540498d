//! Committed assignments and placement diagnostics.
//!
//! An `Assignment` records one committed (person, meeting, slot) with
//! an optional paired manager; the `AssignmentStore` is the write-once
//! record of all commits plus a per-(person, date) busy index covering
//! both the attendee and the paired manager. Meetings that could not
//! be placed land in the append-only `UnscheduledEntry` list.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// A committed meeting placement.
///
/// Created only by a successful commit; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Attending person's id.
    pub person_id: String,
    /// Meeting definition name.
    pub meeting: String,
    /// Roster date.
    pub date: NaiveDate,
    /// Occupied time span [start, start + duration).
    pub slot: TimeWindow,
    /// Paired manager's id, if one attends.
    pub manager_id: Option<String>,
}

impl Assignment {
    /// Creates an assignment with no paired manager.
    pub fn new(
        person_id: impl Into<String>,
        meeting: impl Into<String>,
        date: NaiveDate,
        slot: TimeWindow,
    ) -> Self {
        Self {
            person_id: person_id.into(),
            meeting: meeting.into(),
            date,
            slot,
            manager_id: None,
        }
    }

    /// Attaches a paired manager.
    pub fn with_manager(mut self, manager_id: impl Into<String>) -> Self {
        self.manager_id = Some(manager_id.into());
        self
    }

    /// Meeting length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        self.slot.duration_minutes()
    }
}

/// Why a (person, meeting, date) could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnscheduledReason {
    /// Huddle slot unavailable or over capacity (huddles never retry
    /// outside their two fixed slots).
    NoCapacityOrSlot,
    /// No candidate slot passed shift/break/conflict checks.
    NoFreeSlot,
    /// A free slot existed but no acceptable manager was available.
    NoEligibleManager,
    /// Slot and manager found, but every candidate failed the ledger
    /// threshold check.
    CapacityExceeded,
}

impl fmt::Display for UnscheduledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::NoCapacityOrSlot => "no_capacity_or_slot",
            Self::NoFreeSlot => "no_free_slot",
            Self::NoEligibleManager => "no_eligible_manager",
            Self::CapacityExceeded => "capacity_exceeded",
        };
        f.write_str(code)
    }
}

/// One meeting that could not be placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnscheduledEntry {
    /// Person the placement was attempted for.
    pub person_id: String,
    /// Meeting definition name.
    pub meeting: String,
    /// Roster date.
    pub date: NaiveDate,
    /// Diagnostic reason code.
    pub reason: UnscheduledReason,
}

impl UnscheduledEntry {
    /// Creates an unscheduled diagnostic entry.
    pub fn new(
        person_id: impl Into<String>,
        meeting: impl Into<String>,
        date: NaiveDate,
        reason: UnscheduledReason,
    ) -> Self {
        Self {
            person_id: person_id.into(),
            meeting: meeting.into(),
            date,
            reason,
        }
    }
}

/// Write-once store of committed assignments.
///
/// Owned and mutated exclusively by the engine during a run. The busy
/// index tracks occupied windows for attendees and paired managers so
/// availability checks stay O(assignments per person).
#[derive(Debug, Clone, Default)]
pub struct AssignmentStore {
    assignments: Vec<Assignment>,
    busy: HashMap<(String, NaiveDate), Vec<TimeWindow>>,
}

impl AssignmentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits an assignment, indexing the attendee and any paired
    /// manager as busy for the slot.
    ///
    /// Callers must have verified availability first; the store does
    /// not re-check overlaps.
    pub fn commit(&mut self, assignment: Assignment) {
        self.busy
            .entry((assignment.person_id.clone(), assignment.date))
            .or_default()
            .push(assignment.slot);
        if let Some(manager_id) = &assignment.manager_id {
            self.busy
                .entry((manager_id.clone(), assignment.date))
                .or_default()
                .push(assignment.slot);
        }
        self.assignments.push(assignment);
    }

    /// Occupied windows for a person on a date (attended or paired).
    pub fn windows_for(&self, person_id: &str, date: NaiveDate) -> &[TimeWindow] {
        self.busy
            .get(&(person_id.to_string(), date))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `window` overlaps any commitment for a person on a date.
    pub fn overlaps(&self, person_id: &str, date: NaiveDate, window: &TimeWindow) -> bool {
        self.windows_for(person_id, date)
            .iter()
            .any(|w| w.overlaps(window))
    }

    /// Whether a person already has this meeting on a date.
    pub fn has_meeting(&self, person_id: &str, date: NaiveDate, meeting: &str) -> bool {
        self.assignments
            .iter()
            .any(|a| a.person_id == person_id && a.date == date && a.meeting == meeting)
    }

    /// All committed assignments, in commit order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Committed assignments for a person on a date (attendee only).
    pub fn assignments_for(&self, person_id: &str, date: NaiveDate) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.person_id == person_id && a.date == date)
            .collect()
    }

    /// Number of committed assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no assignments have been committed.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Consumes the store, yielding the final assignment set.
    pub fn into_assignments(self) -> Vec<Assignment> {
        self.assignments
    }
}
