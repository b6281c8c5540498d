//! Roster scheduling domain models.
//!
//! Provides the data types the engine operates on: clock times and
//! windows, roster people, meeting definitions, and committed
//! assignments with their diagnostics. Person and meeting records are
//! read-only inputs owned by the run; assignments are written only by
//! the engine.

mod assignment;
mod meeting;
mod person;
mod window;

pub use assignment::{Assignment, AssignmentStore, UnscheduledEntry, UnscheduledReason};
pub use meeting::{Frequency, MeetingDefinition, MeetingKind};
pub use person::Person;
pub use window::{ClockTime, ParseClockTimeError, TimeWindow};
