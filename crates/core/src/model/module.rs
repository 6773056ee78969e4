use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{AssessmentModuleId, ModuleProgressId};
use crate::time::HmsDuration;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised while interpreting backend module status values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModuleStatusError {
    #[error("unknown module status value: {0:?}")]
    UnknownStatus(String),
}

//
// ─── MODULE STATUS ────────────────────────────────────────────────────────────
//

/// Server-asserted lifecycle status of a module within a group.
///
/// The backend is the source of truth for these values; the engine only
/// classifies and displays them, it never promotes a module between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleStatus {
    /// Blocked by sequencing policy until earlier modules are dealt with.
    Locked,
    /// The previous module finished early and its full duration must still elapse.
    WaitForModuleDurationToElapse,
    /// The assignment window has not opened for this module yet.
    Scheduled,
    /// Available to launch for the first time.
    NotStarted,
    /// Launched and not yet finished.
    InProgress,
    Completed,
    /// The module's allocated time ran out before completion.
    TimeElapsed,
}

impl ModuleStatus {
    /// Parses the backend wire value.
    ///
    /// The backend serializes this field either as the enum name
    /// (`"InProgress"`) or, on the historic wire format, as a numeric string
    /// (`"4"`). Both are accepted; anything else is an error rather than a
    /// silent default.
    ///
    /// # Errors
    ///
    /// Returns `ModuleStatusError::UnknownStatus` for unrecognized values.
    pub fn from_wire(value: &str) -> Result<Self, ModuleStatusError> {
        let value = value.trim();
        if let Ok(code) = value.parse::<u8>() {
            return Self::from_code(code)
                .ok_or_else(|| ModuleStatusError::UnknownStatus(value.to_string()));
        }
        match value {
            "Locked" => Ok(Self::Locked),
            "WaitForModuleDurationToElapse" => Ok(Self::WaitForModuleDurationToElapse),
            "Scheduled" => Ok(Self::Scheduled),
            "NotStarted" => Ok(Self::NotStarted),
            "InProgress" => Ok(Self::InProgress),
            "Completed" => Ok(Self::Completed),
            "TimeElapsed" => Ok(Self::TimeElapsed),
            _ => Err(ModuleStatusError::UnknownStatus(value.to_string())),
        }
    }

    /// Maps the historic numeric wire code to a status.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Locked),
            1 => Some(Self::WaitForModuleDurationToElapse),
            2 => Some(Self::Scheduled),
            3 => Some(Self::NotStarted),
            4 => Some(Self::InProgress),
            5 => Some(Self::Completed),
            6 => Some(Self::TimeElapsed),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "Locked",
            Self::WaitForModuleDurationToElapse => "WaitForModuleDurationToElapse",
            Self::Scheduled => "Scheduled",
            Self::NotStarted => "NotStarted",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::TimeElapsed => "TimeElapsed",
        }
    }

    /// True for statuses that count as done when aggregating an assignment.
    ///
    /// `WaitForModuleDurationToElapse` is done from the exam-taker's point of
    /// view; only the *next* module in the sequence is gated by it.
    #[must_use]
    pub fn counts_as_done(self) -> bool {
        matches!(self, Self::Completed | Self::WaitForModuleDurationToElapse)
    }
}

//
// ─── MODULE PROGRESS SNAPSHOT ─────────────────────────────────────────────────
//

/// One exam-taker's progress through one module, as last fetched.
///
/// Snapshots are produced fresh on every fetch from the session service and
/// carry the server-computed remaining time; the client never counts down a
/// clock of its own as authoritative state.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleProgressSnapshot {
    pub id: ModuleProgressId,
    pub order_number: u32,
    pub assessment_module_id: AssessmentModuleId,
    pub title: String,
    pub description: Option<String>,
    pub status: ModuleStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
    pub time_remaining: Option<HmsDuration>,
    pub passed: Option<bool>,
    pub score_percentage: Option<f64>,
    pub passing_score_percentage: Option<f64>,
}

impl ModuleProgressSnapshot {
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Started but not yet finished; such modules make local timers suspect
    /// and warrant a refetch when the tab regains visibility.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.started_at.is_some() && self.completed_at.is_none()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_parsing_accepts_names() {
        assert_eq!(
            ModuleStatus::from_wire("InProgress").unwrap(),
            ModuleStatus::InProgress
        );
        assert_eq!(
            ModuleStatus::from_wire(" Completed ").unwrap(),
            ModuleStatus::Completed
        );
    }

    #[test]
    fn wire_parsing_accepts_numeric_codes() {
        assert_eq!(ModuleStatus::from_wire("0").unwrap(), ModuleStatus::Locked);
        assert_eq!(
            ModuleStatus::from_wire("1").unwrap(),
            ModuleStatus::WaitForModuleDurationToElapse
        );
        assert_eq!(
            ModuleStatus::from_wire("4").unwrap(),
            ModuleStatus::InProgress
        );
        assert_eq!(
            ModuleStatus::from_wire("6").unwrap(),
            ModuleStatus::TimeElapsed
        );
    }

    #[test]
    fn wire_parsing_rejects_unknown_values() {
        let err = ModuleStatus::from_wire("7").unwrap_err();
        assert!(matches!(err, ModuleStatusError::UnknownStatus(_)));
        assert!(ModuleStatus::from_wire("Paused").is_err());
        assert!(ModuleStatus::from_wire("").is_err());
    }

    #[test]
    fn wire_round_trips_every_status() {
        for status in [
            ModuleStatus::Locked,
            ModuleStatus::WaitForModuleDurationToElapse,
            ModuleStatus::Scheduled,
            ModuleStatus::NotStarted,
            ModuleStatus::InProgress,
            ModuleStatus::Completed,
            ModuleStatus::TimeElapsed,
        ] {
            assert_eq!(ModuleStatus::from_wire(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn waiting_counts_as_done_for_aggregation() {
        assert!(ModuleStatus::Completed.counts_as_done());
        assert!(ModuleStatus::WaitForModuleDurationToElapse.counts_as_done());
        assert!(!ModuleStatus::InProgress.counts_as_done());
        assert!(!ModuleStatus::TimeElapsed.counts_as_done());
    }
}
