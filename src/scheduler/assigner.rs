//! Individual meeting assignment.
//!
//! For each (person, meeting) pair: decide eligibility from the
//! meeting's frequency class, then first-fit search the person's
//! candidate slots past the first shift hour, resolving a manager and
//! reserving ledger capacity before committing. The first slot that
//! clears every check wins; there is no backtracking across people.

use rand::Rng;

use super::engine::MeetingScheduler;
use crate::availability::{find_manager, is_free};
use crate::grid::{self, GRID_MINUTES};
use crate::ledger::{CapacityLedger, LedgerError};
use crate::models::{
    Assignment, AssignmentStore, Frequency, MeetingDefinition, Person, TimeWindow,
    UnscheduledEntry, UnscheduledReason,
};

/// Runs one individual meeting definition across the associate roster.
///
/// Associates are processed in roster order. Ineligible pairs (weekly
/// quota reached, monthly sample not drawn) are skipped silently;
/// eligible pairs that cannot be placed get an [`UnscheduledEntry`]
/// whose reason distinguishes slot, manager, and capacity failures.
pub(crate) fn assign_all<R: Rng>(
    scheduler: &MeetingScheduler,
    meeting: &MeetingDefinition,
    associates: &[Person],
    managers: &[Person],
    ledger: &mut CapacityLedger,
    store: &mut AssignmentStore,
    unscheduled: &mut Vec<UnscheduledEntry>,
    rng: &mut R,
) -> Result<(), LedgerError> {
    for person in associates {
        if !person.working {
            continue;
        }
        if !is_eligible(scheduler, meeting, person, associates, store, rng) {
            continue;
        }
        if let Some(reason) = assign_one(meeting, person, managers, ledger, store)? {
            unscheduled.push(UnscheduledEntry::new(
                &person.id,
                &meeting.name,
                person.date,
                reason,
            ));
        }
    }
    Ok(())
}

/// Frequency-class eligibility for one (person, meeting) pair.
///
/// Weekly meetings are capped at `floor(peers × quota)` recipients per
/// shift-start peer group per date; monthly meetings are sampled at the
/// configured probability. Unknown frequency labels are always
/// eligible.
fn is_eligible<R: Rng>(
    scheduler: &MeetingScheduler,
    meeting: &MeetingDefinition,
    person: &Person,
    associates: &[Person],
    store: &AssignmentStore,
    rng: &mut R,
) -> bool {
    match &meeting.frequency {
        Frequency::Daily | Frequency::Other(_) => true,
        Frequency::Weekly => {
            let peers: Vec<&Person> = associates
                .iter()
                .filter(|p| {
                    p.working && p.date == person.date && p.shift.start == person.shift.start
                })
                .collect();
            let quota = (peers.len() as f64 * scheduler.weekly_peer_quota).floor() as usize;
            let already = peers
                .iter()
                .filter(|p| store.has_meeting(&p.id, p.date, &meeting.name))
                .count();
            already < quota
        }
        Frequency::Monthly => rng.random_bool(scheduler.monthly_rate),
    }
}

/// First-fit slot search for one (person, meeting) pair.
///
/// Returns `None` on success, or the diagnostic reason for the deepest
/// stage any candidate reached: no free slot at all, a free slot but no
/// acceptable manager, or slot and manager found with every capacity
/// check failing.
fn assign_one(
    meeting: &MeetingDefinition,
    person: &Person,
    managers: &[Person],
    ledger: &mut CapacityLedger,
    store: &mut AssignmentStore,
) -> Result<Option<UnscheduledReason>, LedgerError> {
    // First shift hour is reserved for huddles
    let earliest = person.shift.start.add_minutes(2 * GRID_MINUTES);
    let mut saw_free_slot = false;
    let mut saw_manager = false;

    for slot in grid::candidates(person) {
        if slot.start < earliest {
            continue;
        }
        if !is_free(person, store, slot.start, meeting.duration_minutes) {
            continue;
        }
        saw_free_slot = true;

        let Some(manager) = find_manager(
            person,
            managers,
            store,
            slot.start,
            meeting.duration_minutes,
            meeting.requires_direct_manager,
        ) else {
            continue;
        };
        saw_manager = true;

        let Some(key) = ledger.resolve(person.date, slot.start, &person.skill) else {
            continue;
        };
        if !ledger.try_reserve(&key, meeting.duration_minutes, meeting.npt_threshold)? {
            continue;
        }

        let slot_span = TimeWindow::span(slot.start, meeting.duration_minutes);
        store.commit(
            Assignment::new(&person.id, &meeting.name, person.date, slot_span)
                .with_manager(&manager.id),
        );
        return Ok(None);
    }

    let reason = if !saw_free_slot {
        UnscheduledReason::NoFreeSlot
    } else if !saw_manager {
        UnscheduledReason::NoEligibleManager
    } else {
        UnscheduledReason::CapacityExceeded
    };
    Ok(Some(reason))
}
