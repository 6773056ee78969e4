use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::module::ModuleProgressSnapshot;

/// Where `now` falls relative to an assignment's availability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    NotYetOpen,
    Open,
    Closed,
}

/// The scheduled availability window of an assignment.
///
/// Missing bounds mean the window is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssignmentWindow {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl AssignmentWindow {
    #[must_use]
    pub fn new(start_date: Option<DateTime<Utc>>, end_date: Option<DateTime<Utc>>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    #[must_use]
    pub fn window_state(&self, now: DateTime<Utc>) -> WindowState {
        if self.start_date.is_some_and(|start| now < start) {
            return WindowState::NotYetOpen;
        }
        if self.end_date.is_some_and(|end| now > end) {
            return WindowState::Closed;
        }
        WindowState::Open
    }
}

/// Assignment-level activity timestamps.
///
/// Used as the fallback source of a completion state when a report carries
/// no module-level rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignmentActivity {
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Everything the reporting screens need for one exam-taker and assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentReport {
    pub window: AssignmentWindow,
    pub activity: AssignmentActivity,
    pub modules: Vec<ModuleProgressSnapshot>,
}
