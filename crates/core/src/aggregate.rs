use chrono::{DateTime, Utc};
use std::fmt;

use crate::model::{
    AssignmentActivity, AssignmentWindow, ModuleProgressSnapshot, ModuleStatus, WindowState,
};

//
// ─── COMPLETION STATE ──────────────────────────────────────────────────────────
//

/// How far one exam-taker has gotten through an assignment's modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleCompletionState {
    Completed,
    InProgress,
    NotStarted,
}

/// Folds the module snapshots into a single completion state.
///
/// A module in `WaitForModuleDurationToElapse` counts as done here: the
/// exam-taker finished it, and only the next module in the sequence is gated
/// by the wait. When no module-level data exists, the assignment-level
/// activity timestamps decide alone.
#[must_use]
pub fn completion_state(
    modules: &[ModuleProgressSnapshot],
    fallback: AssignmentActivity,
) -> ModuleCompletionState {
    if modules.is_empty() {
        if fallback.completed_at.is_some() {
            return ModuleCompletionState::Completed;
        }
        if fallback.started_at.is_some() {
            return ModuleCompletionState::InProgress;
        }
        return ModuleCompletionState::NotStarted;
    }

    if modules.iter().all(|m| m.status.counts_as_done()) {
        return ModuleCompletionState::Completed;
    }
    let any_activity = modules
        .iter()
        .any(|m| m.status == ModuleStatus::InProgress || m.status.counts_as_done());
    if any_activity {
        return ModuleCompletionState::InProgress;
    }
    ModuleCompletionState::NotStarted
}

//
// ─── AGGREGATE STATUS ──────────────────────────────────────────────────────────
//

/// Assignment-level status shown on the reporting screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentStatus {
    Completed,
    CompletedLate,
    InProgress,
    IncompleteExpired,
    Scheduled,
    NotSubmitted,
    NotStarted,
}

impl AssignmentStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::CompletedLate => "Completed Late",
            Self::InProgress => "In Progress",
            Self::IncompleteExpired => "Incomplete (Expired)",
            Self::Scheduled => "Scheduled",
            Self::NotSubmitted => "Not Submitted",
            Self::NotStarted => "Not Started",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Latest completion instant across the modules, falling back to the
/// assignment-level timestamp.
fn latest_completion(
    modules: &[ModuleProgressSnapshot],
    fallback: AssignmentActivity,
) -> Option<DateTime<Utc>> {
    modules
        .iter()
        .filter_map(|m| m.completed_at)
        .max()
        .or(fallback.completed_at)
}

/// Classifies an assignment for one exam-taker.
///
/// A strict decision table over `(completion state, window state)`: every
/// combination maps to exactly one of the seven labels, with no fall-through
/// default. A completed assignment is late when the window closed before the
/// last module completion; without any completion timestamp lateness cannot
/// be established and the plain `Completed` label is used.
#[must_use]
pub fn classify_assignment(
    window: AssignmentWindow,
    modules: &[ModuleProgressSnapshot],
    fallback: AssignmentActivity,
    now: DateTime<Utc>,
) -> AssignmentStatus {
    let state = completion_state(modules, fallback);
    let window_state = window.window_state(now);

    let completed_label = || {
        let late = match (window.end_date, latest_completion(modules, fallback)) {
            (Some(end), Some(completed)) => completed > end,
            _ => false,
        };
        if late {
            AssignmentStatus::CompletedLate
        } else {
            AssignmentStatus::Completed
        }
    };

    match (state, window_state) {
        (ModuleCompletionState::Completed, WindowState::NotYetOpen) => completed_label(),
        (ModuleCompletionState::Completed, WindowState::Open) => completed_label(),
        (ModuleCompletionState::Completed, WindowState::Closed) => completed_label(),
        (ModuleCompletionState::InProgress, WindowState::NotYetOpen) => {
            AssignmentStatus::InProgress
        }
        (ModuleCompletionState::InProgress, WindowState::Open) => AssignmentStatus::InProgress,
        (ModuleCompletionState::InProgress, WindowState::Closed) => {
            AssignmentStatus::IncompleteExpired
        }
        (ModuleCompletionState::NotStarted, WindowState::NotYetOpen) => {
            AssignmentStatus::Scheduled
        }
        (ModuleCompletionState::NotStarted, WindowState::Open) => AssignmentStatus::NotStarted,
        (ModuleCompletionState::NotStarted, WindowState::Closed) => {
            AssignmentStatus::NotSubmitted
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::snapshot;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn open_window(now: DateTime<Utc>) -> AssignmentWindow {
        AssignmentWindow::new(Some(now - Duration::days(1)), Some(now + Duration::days(1)))
    }

    #[test]
    fn all_done_modules_classify_completed() {
        let now = fixed_now();
        let mut first = snapshot(1, ModuleStatus::Completed);
        first.completed_at = Some(now - Duration::hours(2));
        let second = snapshot(2, ModuleStatus::WaitForModuleDurationToElapse);

        let status = classify_assignment(
            open_window(now),
            &[first, second],
            AssignmentActivity::default(),
            now,
        );
        assert_eq!(status, AssignmentStatus::Completed);
    }

    #[test]
    fn completion_after_window_end_is_late() {
        let now = fixed_now();
        let window =
            AssignmentWindow::new(Some(now - Duration::days(2)), Some(now - Duration::days(1)));
        let mut module = snapshot(1, ModuleStatus::Completed);
        module.completed_at = Some(now - Duration::hours(1));

        let status =
            classify_assignment(window, &[module], AssignmentActivity::default(), now);
        assert_eq!(status, AssignmentStatus::CompletedLate);
        assert_eq!(status.label(), "Completed Late");
    }

    #[test]
    fn completed_without_timestamp_is_not_late() {
        let now = fixed_now();
        let window =
            AssignmentWindow::new(Some(now - Duration::days(2)), Some(now - Duration::days(1)));
        let module = snapshot(1, ModuleStatus::Completed);

        let status =
            classify_assignment(window, &[module], AssignmentActivity::default(), now);
        assert_eq!(status, AssignmentStatus::Completed);
    }

    #[test]
    fn any_in_progress_module_classifies_in_progress() {
        let now = fixed_now();
        let modules = vec![
            snapshot(1, ModuleStatus::InProgress),
            snapshot(2, ModuleStatus::Locked),
        ];
        let status = classify_assignment(
            open_window(now),
            &modules,
            AssignmentActivity::default(),
            now,
        );
        assert_eq!(status, AssignmentStatus::InProgress);
    }

    #[test]
    fn partial_completion_counts_as_in_progress() {
        let now = fixed_now();
        let modules = vec![
            snapshot(1, ModuleStatus::Completed),
            snapshot(2, ModuleStatus::NotStarted),
        ];
        let status = classify_assignment(
            open_window(now),
            &modules,
            AssignmentActivity::default(),
            now,
        );
        assert_eq!(status, AssignmentStatus::InProgress);
    }

    #[test]
    fn unfinished_work_after_window_close_is_expired() {
        let now = fixed_now();
        let window =
            AssignmentWindow::new(Some(now - Duration::days(2)), Some(now - Duration::days(1)));
        let modules = vec![
            snapshot(1, ModuleStatus::Completed),
            snapshot(2, ModuleStatus::InProgress),
        ];
        let status =
            classify_assignment(window, &modules, AssignmentActivity::default(), now);
        assert_eq!(status, AssignmentStatus::IncompleteExpired);
        assert_eq!(status.label(), "Incomplete (Expired)");
    }

    #[test]
    fn untouched_assignment_tracks_window() {
        let now = fixed_now();
        let modules = vec![
            snapshot(1, ModuleStatus::NotStarted),
            snapshot(2, ModuleStatus::Locked),
        ];

        let future =
            AssignmentWindow::new(Some(now + Duration::days(1)), Some(now + Duration::days(2)));
        assert_eq!(
            classify_assignment(future, &modules, AssignmentActivity::default(), now),
            AssignmentStatus::Scheduled
        );

        let past =
            AssignmentWindow::new(Some(now - Duration::days(2)), Some(now - Duration::days(1)));
        assert_eq!(
            classify_assignment(past, &modules, AssignmentActivity::default(), now),
            AssignmentStatus::NotSubmitted
        );

        assert_eq!(
            classify_assignment(open_window(now), &modules, AssignmentActivity::default(), now),
            AssignmentStatus::NotStarted
        );
    }

    #[test]
    fn empty_module_list_falls_back_to_activity_timestamps() {
        let now = fixed_now();

        let completed = AssignmentActivity {
            started_at: Some(now - Duration::hours(3)),
            completed_at: Some(now - Duration::hours(1)),
        };
        assert_eq!(
            completion_state(&[], completed),
            ModuleCompletionState::Completed
        );

        let started = AssignmentActivity {
            started_at: Some(now - Duration::hours(3)),
            completed_at: None,
        };
        assert_eq!(
            completion_state(&[], started),
            ModuleCompletionState::InProgress
        );

        assert_eq!(
            completion_state(&[], AssignmentActivity::default()),
            ModuleCompletionState::NotStarted
        );
    }

    #[test]
    fn fallback_completion_can_be_late_too() {
        let now = fixed_now();
        let window =
            AssignmentWindow::new(Some(now - Duration::days(3)), Some(now - Duration::days(2)));
        let activity = AssignmentActivity {
            started_at: Some(now - Duration::days(3)),
            completed_at: Some(now - Duration::days(1)),
        };
        let status = classify_assignment(window, &[], activity, now);
        assert_eq!(status, AssignmentStatus::CompletedLate);
    }

    #[test]
    fn classification_covers_the_full_cross_product() {
        let now = fixed_now();
        let windows = [
            AssignmentWindow::new(Some(now + Duration::days(1)), Some(now + Duration::days(2))),
            open_window(now),
            AssignmentWindow::new(Some(now - Duration::days(2)), Some(now - Duration::days(1))),
        ];
        let module_sets = [
            vec![snapshot(1, ModuleStatus::Completed)],
            vec![snapshot(1, ModuleStatus::InProgress)],
            vec![snapshot(1, ModuleStatus::NotStarted)],
        ];
        let expected = [
            AssignmentStatus::Completed,
            AssignmentStatus::InProgress,
            AssignmentStatus::Scheduled,
            AssignmentStatus::Completed,
            AssignmentStatus::InProgress,
            AssignmentStatus::NotStarted,
            AssignmentStatus::Completed,
            AssignmentStatus::IncompleteExpired,
            AssignmentStatus::NotSubmitted,
        ];

        let mut idx = 0;
        for window in windows {
            for modules in &module_sets {
                let status =
                    classify_assignment(window, modules, AssignmentActivity::default(), now);
                assert_eq!(status, expected[idx], "case {idx}");
                idx += 1;
            }
        }
    }
}
