//! First-fit greedy scheduling engine.
//!
//! # Algorithm
//!
//! 1. Validate inputs; malformed input aborts before any placement.
//! 2. Distribute group huddles across the first two shift quanta of
//!    each (shift-start, site) group.
//! 3. Run each individual meeting definition across the roster in
//!    first-fit order, pairing managers and reserving ledger capacity.
//! 4. Aggregate run statistics.
//!
//! Once a slot commits it is never revisited: the engine trades global
//! optimality for a single deterministic pass with quota and capacity
//! guards.
//!
//! # Complexity
//! O(m × p × s) where m=meetings, p=people, s=slots per shift.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::summary::ScheduleSummary;
use super::{assigner, huddle};
use crate::ledger::{CapacityLedger, LedgerError};
use crate::models::{
    Assignment, AssignmentStore, ClockTime, MeetingDefinition, MeetingKind, Person,
    UnscheduledEntry,
};
use crate::validation::{self, ValidationError};

/// Input container for one scheduling run.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Meeting definitions from the constraint input.
    pub meetings: Vec<MeetingDefinition>,
    /// Associate roster rows.
    pub associates: Vec<Person>,
    /// Manager roster rows.
    pub managers: Vec<Person>,
    /// Capacity baseline rows. Cloned per run; the request itself is
    /// never mutated.
    pub ledger: CapacityLedger,
}

impl ScheduleRequest {
    /// Creates a new schedule request.
    pub fn new(
        meetings: Vec<MeetingDefinition>,
        associates: Vec<Person>,
        managers: Vec<Person>,
        ledger: CapacityLedger,
    ) -> Self {
        Self {
            meetings,
            associates,
            managers,
            ledger,
        }
    }
}

/// Output of a completed run.
///
/// A run always completes with whatever it managed to place; only the
/// fatal error classes in [`ScheduleError`] abort before output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    /// Committed assignments, in commit order.
    pub assignments: Vec<Assignment>,
    /// Meetings that could not be placed, with reasons.
    pub unscheduled: Vec<UnscheduledEntry>,
    /// The ledger with final NPT loads and revised staffing.
    pub ledger: CapacityLedger,
    /// Aggregate run statistics.
    pub summary: ScheduleSummary,
}

impl ScheduleOutcome {
    /// Projects assignments into per-(person, date) "meeting → start
    /// time" maps, the shape roster writers consume.
    pub fn meetings_by_person(&self) -> HashMap<(String, NaiveDate), HashMap<String, ClockTime>> {
        let mut map: HashMap<(String, NaiveDate), HashMap<String, ClockTime>> = HashMap::new();
        for a in &self.assignments {
            map.entry((a.person_id.clone(), a.date))
                .or_default()
                .insert(a.meeting.clone(), a.slot.start);
        }
        map
    }
}

/// Fatal run failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// Malformed input; scheduling never started.
    InvalidInput(Vec<ValidationError>),
    /// Ledger invariant violation mid-run; a programming error, not a
    /// placement failure.
    Ledger(LedgerError),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(errors) => {
                write!(f, "input validation failed with {} error(s)", errors.len())
            }
            Self::Ledger(e) => write!(f, "capacity ledger inconsistency: {e}"),
        }
    }
}

impl std::error::Error for ScheduleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ledger(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<LedgerError> for ScheduleError {
    fn from(e: LedgerError) -> Self {
        Self::Ledger(e)
    }
}

/// Roster meeting scheduler.
///
/// Holds the run policy knobs: the huddle split ratio band, the weekly
/// peer quota, the monthly sampling rate, and whether huddle groups are
/// shuffled. All randomness flows through the `Rng` handed to
/// [`schedule`](Self::schedule), so a pinned seed reproduces a run
/// exactly.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use npt_scheduler::ledger::CapacityLedger;
/// use npt_scheduler::models::{ClockTime, MeetingDefinition, Person};
/// use npt_scheduler::scheduler::{MeetingScheduler, ScheduleRequest};
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
/// let meetings = vec![MeetingDefinition::new("Team_Huddle").group().with_duration(15)];
/// let associates = vec![Person::new("AA1", date)
///     .with_skill("Chat")
///     .with_shift(ClockTime::hm(9, 0), ClockTime::hm(17, 0))];
/// let ledger = CapacityLedger::new()
///     .with_cell(date, "09:00-09:30", "Chat", 10.0, 2.0)
///     .with_cell(date, "09:30-10:00", "Chat", 10.0, 2.0);
/// let request = ScheduleRequest::new(meetings, associates, vec![], ledger);
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let outcome = MeetingScheduler::new().schedule(&request, &mut rng).unwrap();
/// assert_eq!(outcome.assignments.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MeetingScheduler {
    pub(crate) huddle_ratio_low: f64,
    pub(crate) huddle_ratio_high: f64,
    pub(crate) weekly_peer_quota: f64,
    pub(crate) monthly_rate: f64,
    pub(crate) shuffle_huddles: bool,
}

impl MeetingScheduler {
    /// Creates a scheduler with the reference policy: huddle ratio
    /// sampled in [0.5, 0.6], weekly quota 25 %, monthly rate 10 %,
    /// stable huddle order.
    pub fn new() -> Self {
        Self {
            huddle_ratio_low: 0.5,
            huddle_ratio_high: 0.6,
            weekly_peer_quota: 0.25,
            monthly_rate: 0.10,
            shuffle_huddles: false,
        }
    }

    /// Sets the band the per-group huddle first-slot ratio is sampled
    /// from. Bounds are clamped to [0, 1] and reordered if inverted.
    pub fn with_huddle_ratio(mut self, low: f64, high: f64) -> Self {
        let low = low.clamp(0.0, 1.0);
        let high = high.clamp(0.0, 1.0);
        self.huddle_ratio_low = low.min(high);
        self.huddle_ratio_high = low.max(high);
        self
    }

    /// Sets the weekly per-day peer quota (fraction of a shift-start
    /// peer group, clamped to [0, 1]).
    pub fn with_weekly_peer_quota(mut self, quota: f64) -> Self {
        self.weekly_peer_quota = quota.clamp(0.0, 1.0);
        self
    }

    /// Sets the monthly sampling probability (clamped to [0, 1]).
    pub fn with_monthly_rate(mut self, rate: f64) -> Self {
        self.monthly_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Shuffles huddle group members before splitting them across the
    /// two slots, instead of keeping roster order.
    pub fn with_shuffled_huddles(mut self, shuffle: bool) -> Self {
        self.shuffle_huddles = shuffle;
        self
    }

    /// Runs the engine over a request.
    ///
    /// Group huddles are placed first — the first shift hour belongs
    /// to them — then each individual meeting definition runs across
    /// the roster. The request is not mutated; the outcome carries the
    /// updated ledger.
    pub fn schedule<R: Rng>(
        &self,
        request: &ScheduleRequest,
        rng: &mut R,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        validation::validate_input(
            &request.meetings,
            &request.associates,
            &request.managers,
            &request.ledger,
        )
        .map_err(ScheduleError::InvalidInput)?;

        let mut ledger = request.ledger.clone();
        let mut store = AssignmentStore::new();
        let mut unscheduled = Vec::new();

        for meeting in request
            .meetings
            .iter()
            .filter(|m| m.kind == MeetingKind::Group)
        {
            huddle::distribute(
                self,
                meeting,
                &request.associates,
                &request.managers,
                &mut ledger,
                &mut store,
                &mut unscheduled,
                rng,
            )?;
        }

        for meeting in request
            .meetings
            .iter()
            .filter(|m| m.kind == MeetingKind::Individual)
        {
            assigner::assign_all(
                self,
                meeting,
                &request.associates,
                &request.managers,
                &mut ledger,
                &mut store,
                &mut unscheduled,
                rng,
            )?;
        }

        let summary =
            ScheduleSummary::calculate(&request.meetings, &request.associates, store.assignments());
        Ok(ScheduleOutcome {
            assignments: store.into_assignments(),
            unscheduled,
            ledger,
            summary,
        })
    }
}

impl Default for MeetingScheduler {
    fn default() -> Self {
        Self::new()
    }
}
