//! Input validation for scheduling runs.
//!
//! Checks structural integrity of meeting definitions, rosters, and
//! the capacity ledger before scheduling. Detects:
//! - Duplicate meeting names
//! - Duplicate (person, date) roster rows
//! - Inverted shift or break windows
//! - Non-positive meeting durations
//! - An empty capacity ledger while schedulable work exists
//!
//! All of these are fatal for the run: guessing defaults for malformed
//! input would corrupt capacity accounting.

use std::collections::HashSet;
use std::fmt;

use crate::ledger::CapacityLedger;
use crate::models::{MeetingDefinition, Person};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two meeting definitions share the same name.
    DuplicateMeeting,
    /// Two roster rows share the same (person, date) identity.
    DuplicateRosterEntry,
    /// A shift or break window ends before it starts.
    InvalidTimeWindow,
    /// A meeting has a zero or negative duration.
    NonPositiveDuration,
    /// The capacity ledger has no baseline rows to validate against.
    EmptyLedger,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates the input data for a scheduling run.
///
/// Checks:
/// 1. No duplicate meeting names, all durations positive
/// 2. No duplicate (person, date) rows within either roster
/// 3. All shift and break windows well-ordered (end ≥ start)
/// 4. The ledger carries at least one baseline row whenever there is
///    work to place
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    meetings: &[MeetingDefinition],
    associates: &[Person],
    managers: &[Person],
    ledger: &CapacityLedger,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut meeting_names = HashSet::new();
    for m in meetings {
        if !meeting_names.insert(m.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateMeeting,
                format!("Duplicate meeting name: {}", m.name),
            ));
        }
        if m.duration_minutes <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveDuration,
                format!(
                    "Meeting '{}' has non-positive duration {} min",
                    m.name, m.duration_minutes
                ),
            ));
        }
    }

    check_roster("associate", associates, &mut errors);
    check_roster("manager", managers, &mut errors);

    let has_work = !meetings.is_empty() && associates.iter().any(|p| p.working);
    if has_work && ledger.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyLedger,
            "Capacity ledger has no baseline rows; cannot validate any placement",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_roster(label: &str, roster: &[Person], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for p in roster {
        if !seen.insert((p.id.as_str(), p.date)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateRosterEntry,
                format!("Duplicate {label} roster row: {} on {}", p.id, p.date),
            ));
        }
        if p.shift.end < p.shift.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeWindow,
                format!("{label} '{}' shift ends before it starts ({})", p.id, p.shift),
            ));
        }
        for b in &p.breaks {
            if b.end < b.start {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTimeWindow,
                    format!("{label} '{}' break ends before it starts ({b})", p.id),
                ));
            }
        }
    }
}
