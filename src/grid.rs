//! Candidate slot generation.
//!
//! Turns a person's shift and break windows into the ordered sequence
//! of grid-aligned slots a meeting could start in. Slots are one
//! quantum wide; a meeting longer than one quantum is validated over
//! its full span at assignment time, not here.

use crate::models::{Person, TimeWindow};

/// Width of one grid quantum in minutes. Shift intervals, candidate
/// slots, and ledger intervals all align to this step.
pub const GRID_MINUTES: i64 = 30;

/// Builds the ordered candidate slots for one person on their roster
/// date.
///
/// Each slot is one quantum wide, aligned to the grid, wholly within
/// `[shift.start, shift.end)`, and clear of every break window.
/// Non-working people and shifts shorter than one quantum yield an
/// empty sequence.
pub fn candidates(person: &Person) -> Vec<TimeWindow> {
    if !person.working {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut start = person.shift.start.ceil_to(GRID_MINUTES);
    while start.add_minutes(GRID_MINUTES) <= person.shift.end {
        let quantum = TimeWindow::span(start, GRID_MINUTES);
        if !person.on_break_during(&quantum) {
            slots.push(quantum);
        }
        start = start.add_minutes(GRID_MINUTES);
    }
    slots
}
