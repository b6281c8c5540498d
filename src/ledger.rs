//! Staffing capacity ledger.
//!
//! Tracks, per (date, interval, skill) cell, a staffing baseline and
//! the non-productive-time load accumulated by committed meetings.
//! Placement is speculative: `try_reserve` applies the load, re-derives
//! revised staffing, and reverts immediately if the meeting's threshold
//! would be violated.
//!
//! # Revised staffing
//! `revised = (scheduled − npt_load) − requirement`. Every commit
//! re-validates independently against the load left by prior commits;
//! earlier commits are not re-checked when later load lands in the
//! same cell.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::grid::GRID_MINUTES;
use crate::models::ClockTime;

/// Accumulation tolerance for load comparisons.
const EPSILON: f64 = 1e-9;

/// Identifies one capacity cell: date, interval label, skill/group.
///
/// Interval labels come from the baseline input, either as a
/// `"HH:MM-HH:MM"` range or a bare `"HH:MM"` start time; [`CapacityLedger::resolve`]
/// widens lookups across both forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerKey {
    /// Roster date.
    pub date: NaiveDate,
    /// Interval label as supplied by the baseline input.
    pub interval: String,
    /// Skill/group tag.
    pub skill: String,
}

impl LedgerKey {
    /// Creates a ledger key.
    pub fn new(date: NaiveDate, interval: impl Into<String>, skill: impl Into<String>) -> Self {
        Self {
            date,
            interval: interval.into(),
            skill: skill.into(),
        }
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.date, self.interval, self.skill)
    }
}

/// One capacity cell: baseline numbers plus accumulated NPT load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerCell {
    /// Heads scheduled to work this interval (baseline input).
    pub scheduled: f64,
    /// Heads required to cover demand this interval (baseline input).
    pub requirement: f64,
    /// Accumulated meeting load, in units of meeting-minutes / 30.
    pub npt_load: f64,
}

impl LedgerCell {
    /// Creates a cell with no accumulated load.
    pub fn new(scheduled: f64, requirement: f64) -> Self {
        Self {
            scheduled,
            requirement,
            npt_load: 0.0,
        }
    }

    /// Staffing margin left after meeting load and demand.
    #[inline]
    pub fn revised_staffing(&self) -> f64 {
        (self.scheduled - self.npt_load) - self.requirement
    }
}

/// Ledger invariant violations.
///
/// Both variants are programming errors in the caller, not recoverable
/// placement failures, and abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Reserve/release against a key with no baseline row.
    UnknownKey(LedgerKey),
    /// Release of more load than the cell holds.
    ReleaseUnderflow {
        /// The cell the release targeted.
        key: LedgerKey,
        /// Load units the caller tried to release.
        released: f64,
        /// Load units the cell actually held.
        held: f64,
    },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(key) => write!(f, "no ledger cell for key {key}"),
            Self::ReleaseUnderflow {
                key,
                released,
                held,
            } => write!(
                f,
                "release of {released} load units exceeds {held} held at {key}"
            ),
        }
    }
}

impl std::error::Error for LedgerError {}

/// The shared capacity ledger for one scheduling run.
///
/// The only mutable state shared across assignment attempts; all
/// mutation flows through `reserve`/`release`, and `try_reserve` is the
/// speculative form every placement uses.
///
/// Serializes as a flat row list in stable (date, interval, skill)
/// order, matching the tabular baseline input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<LedgerRow>", into = "Vec<LedgerRow>")]
pub struct CapacityLedger {
    cells: HashMap<LedgerKey, LedgerCell>,
}

/// Flat serialization form of one ledger cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerRow {
    date: NaiveDate,
    interval: String,
    skill: String,
    scheduled: f64,
    requirement: f64,
    npt_load: f64,
}

impl From<Vec<LedgerRow>> for CapacityLedger {
    fn from(rows: Vec<LedgerRow>) -> Self {
        let cells = rows
            .into_iter()
            .map(|r| {
                (
                    LedgerKey::new(r.date, r.interval, r.skill),
                    LedgerCell {
                        scheduled: r.scheduled,
                        requirement: r.requirement,
                        npt_load: r.npt_load,
                    },
                )
            })
            .collect();
        Self { cells }
    }
}

impl From<CapacityLedger> for Vec<LedgerRow> {
    fn from(ledger: CapacityLedger) -> Self {
        let mut rows: Vec<LedgerRow> = ledger
            .cells
            .into_iter()
            .map(|(k, c)| LedgerRow {
                date: k.date,
                interval: k.interval,
                skill: k.skill,
                scheduled: c.scheduled,
                requirement: c.requirement,
                npt_load: c.npt_load,
            })
            .collect();
        rows.sort_by(|a, b| {
            (a.date, &a.interval, &a.skill).cmp(&(b.date, &b.interval, &b.skill))
        });
        rows
    }
}

impl CapacityLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a baseline row.
    pub fn with_cell(
        mut self,
        date: NaiveDate,
        interval: impl Into<String>,
        skill: impl Into<String>,
        scheduled: f64,
        requirement: f64,
    ) -> Self {
        self.cells.insert(
            LedgerKey::new(date, interval, skill),
            LedgerCell::new(scheduled, requirement),
        );
        self
    }

    /// Inserts a baseline row.
    pub fn insert(&mut self, key: LedgerKey, cell: LedgerCell) {
        self.cells.insert(key, cell);
    }

    /// Resolves the cell key covering a slot start.
    ///
    /// Tries the exact `"HH:MM-HH:MM"` quantum label first, then the
    /// bare `"HH:MM"` start label. `None` means no baseline row covers
    /// this interval — callers must treat that as "cannot schedule
    /// here", never as unconstrained capacity.
    pub fn resolve(&self, date: NaiveDate, slot_start: ClockTime, skill: &str) -> Option<LedgerKey> {
        let range_label = format!("{}-{}", slot_start, slot_start.add_minutes(GRID_MINUTES));
        let range_key = LedgerKey::new(date, range_label, skill);
        if self.cells.contains_key(&range_key) {
            return Some(range_key);
        }
        let start_key = LedgerKey::new(date, slot_start.to_string(), skill);
        self.cells.contains_key(&start_key).then_some(start_key)
    }

    /// Speculatively reserves `minutes` of meeting load against a cell.
    ///
    /// Applies the load delta, recomputes revised staffing, and keeps
    /// the reservation only if the result stays at or above
    /// `threshold`; otherwise the delta is reverted before returning
    /// `false`. Reserve-then-revert leaves the cell numerically
    /// identical to before.
    pub fn try_reserve(
        &mut self,
        key: &LedgerKey,
        minutes: i64,
        threshold: f64,
    ) -> Result<bool, LedgerError> {
        self.reserve(key, minutes)?;
        let cell = self
            .cells
            .get(key)
            .ok_or_else(|| LedgerError::UnknownKey(key.clone()))?;
        if cell.revised_staffing() - threshold >= -EPSILON {
            Ok(true)
        } else {
            self.release(key, minutes)?;
            Ok(false)
        }
    }

    /// Unconditionally applies `minutes` of load to a cell.
    pub fn reserve(&mut self, key: &LedgerKey, minutes: i64) -> Result<(), LedgerError> {
        let cell = self
            .cells
            .get_mut(key)
            .ok_or_else(|| LedgerError::UnknownKey(key.clone()))?;
        cell.npt_load += load_units(minutes);
        Ok(())
    }

    /// Reverts `minutes` of load from a cell.
    ///
    /// Releasing more than the cell holds is an invariant violation and
    /// fails rather than clamping.
    pub fn release(&mut self, key: &LedgerKey, minutes: i64) -> Result<(), LedgerError> {
        let delta = load_units(minutes);
        let cell = self
            .cells
            .get_mut(key)
            .ok_or_else(|| LedgerError::UnknownKey(key.clone()))?;
        if cell.npt_load - delta < -EPSILON {
            return Err(LedgerError::ReleaseUnderflow {
                key: key.clone(),
                released: delta,
                held: cell.npt_load,
            });
        }
        cell.npt_load -= delta;
        Ok(())
    }

    /// Looks up a cell by exact key.
    pub fn cell(&self, key: &LedgerKey) -> Option<&LedgerCell> {
        self.cells.get(key)
    }

    /// Iterates all cells.
    pub fn cells(&self) -> impl Iterator<Item = (&LedgerKey, &LedgerCell)> {
        self.cells.iter()
    }

    /// Number of baseline rows.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the ledger holds no baseline rows.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Converts meeting minutes into ledger load units (minutes / 30).
#[inline]
fn load_units(minutes: i64) -> f64 {
    minutes as f64 / GRID_MINUTES as f64
}
