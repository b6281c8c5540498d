//! Meeting definition model.
//!
//! A `MeetingDefinition` is one row of the constraint input: how often
//! the meeting recurs, how long it runs, whether the associate's direct
//! manager must attend, and the staffing threshold the capacity ledger
//! enforces when placing it.

use serde::{Deserialize, Serialize};

/// How often a meeting recurs per person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    /// Every working day.
    Daily,
    /// Spread across the week via a per-day peer quota.
    Weekly,
    /// Sampled at a configured probability per run.
    Monthly,
    /// Unrecognized label; treated as always eligible.
    Other(String),
}

impl Frequency {
    /// Parses a frequency label, case-insensitively.
    ///
    /// Labels outside the known set are preserved as [`Frequency::Other`].
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            _ => Self::Other(label.trim().to_string()),
        }
    }
}

/// Whether a meeting is the shift-group huddle or an individual meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeetingKind {
    /// Scheduled for a whole shift group in the first shift hour.
    Group,
    /// Scheduled per person by first-fit slot search.
    #[default]
    Individual,
}

/// A recurring meeting to be placed on the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingDefinition {
    /// Meeting name (unique across the constraint input).
    pub name: String,
    /// Recurrence class.
    pub frequency: Frequency,
    /// Meeting length in minutes; may span multiple grid quanta.
    pub duration_minutes: i64,
    /// Whether the associate's own manager must attend (no substitution).
    pub requires_direct_manager: bool,
    /// Minimum revised staffing the ledger must retain after placement.
    pub npt_threshold: f64,
    /// Group huddle or individual meeting.
    pub kind: MeetingKind,
}

impl MeetingDefinition {
    /// Creates a daily 30-minute individual meeting with no threshold.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frequency: Frequency::Daily,
            duration_minutes: 30,
            requires_direct_manager: false,
            npt_threshold: 0.0,
            kind: MeetingKind::Individual,
        }
    }

    /// Sets the recurrence class.
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the duration in minutes.
    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Requires the associate's direct manager to attend.
    pub fn with_direct_manager(mut self) -> Self {
        self.requires_direct_manager = true;
        self
    }

    /// Sets the capacity ledger threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.npt_threshold = threshold;
        self
    }

    /// Marks this as the shift-group huddle.
    pub fn group(mut self) -> Self {
        self.kind = MeetingKind::Group;
        self
    }
}
