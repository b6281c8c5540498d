//! Huddle quota distribution.
//!
//! Splits each (shift-start, site) group of working associates across
//! the first two grid quanta of their shift at a sampled 50–60 % ratio,
//! then commits each member's huddle against availability and the
//! capacity ledger. Huddles are fixed to those two slots: a member who
//! cannot be placed in their slot is recorded as unscheduled, never
//! retried elsewhere.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use super::engine::MeetingScheduler;
use crate::availability::{first_free_manager, is_free};
use crate::grid::GRID_MINUTES;
use crate::ledger::{CapacityLedger, LedgerError};
use crate::models::{
    Assignment, AssignmentStore, ClockTime, MeetingDefinition, Person, TimeWindow,
    UnscheduledEntry, UnscheduledReason,
};

/// Distributes one group meeting across every shift group.
///
/// Groups are processed in (date, shift-start, site) order; members in
/// roster order unless the scheduler is configured to shuffle, so runs
/// with a pinned RNG are reproducible.
pub(crate) fn distribute<R: Rng>(
    scheduler: &MeetingScheduler,
    meeting: &MeetingDefinition,
    associates: &[Person],
    managers: &[Person],
    ledger: &mut CapacityLedger,
    store: &mut AssignmentStore,
    unscheduled: &mut Vec<UnscheduledEntry>,
    rng: &mut R,
) -> Result<(), LedgerError> {
    let mut groups: BTreeMap<(NaiveDate, ClockTime, String), Vec<&Person>> = BTreeMap::new();
    for p in associates.iter().filter(|p| p.working) {
        groups
            .entry((p.date, p.shift.start, p.site.clone()))
            .or_default()
            .push(p);
    }

    for ((_, shift_start, _), mut members) in groups {
        let n = members.len();
        let ratio = rng.random_range(scheduler.huddle_ratio_low..=scheduler.huddle_ratio_high);
        let min_first = (n as f64 * scheduler.huddle_ratio_low).floor() as usize;
        let max_first = ((n as f64 * scheduler.huddle_ratio_high).ceil() as usize).min(n);
        let first_count = (((n as f64) * ratio).round() as usize).clamp(min_first, max_first);

        if scheduler.shuffle_huddles {
            members.shuffle(rng);
        }

        let second_start = shift_start.add_minutes(GRID_MINUTES);
        for (pos, person) in members.into_iter().enumerate() {
            let slot_start = if pos < first_count {
                shift_start
            } else {
                second_start
            };
            place(meeting, person, managers, slot_start, ledger, store, unscheduled)?;
        }
    }
    Ok(())
}

/// Attempts to commit one member's huddle in their assigned slot.
fn place(
    meeting: &MeetingDefinition,
    person: &Person,
    managers: &[Person],
    slot_start: ClockTime,
    ledger: &mut CapacityLedger,
    store: &mut AssignmentStore,
    unscheduled: &mut Vec<UnscheduledEntry>,
) -> Result<(), LedgerError> {
    let placed = is_free(person, store, slot_start, meeting.duration_minutes)
        && match ledger.resolve(person.date, slot_start, &person.skill) {
            Some(key) => ledger.try_reserve(&key, meeting.duration_minutes, meeting.npt_threshold)?,
            None => false,
        };

    if !placed {
        unscheduled.push(UnscheduledEntry::new(
            &person.id,
            &meeting.name,
            person.date,
            UnscheduledReason::NoCapacityOrSlot,
        ));
        return Ok(());
    }

    let slot = TimeWindow::span(slot_start, meeting.duration_minutes);
    let mut assignment = Assignment::new(&person.id, &meeting.name, person.date, slot);
    // Representative attendance: best-effort, never blocks the huddle
    if let Some(manager) =
        first_free_manager(managers, person.date, store, slot_start, meeting.duration_minutes)
    {
        assignment = assignment.with_manager(&manager.id);
    }
    store.commit(assignment);
    Ok(())
}
