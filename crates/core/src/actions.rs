use crate::model::{GroupSchedulingPolicy, ModuleStatus};

//
// ─── BADGES ────────────────────────────────────────────────────────────────────
//

/// Status badge shown next to a module row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Locked,
    Waiting,
    Scheduled,
    Ready,
    InProgress,
    Completed,
    TimeElapsed,
}

impl Badge {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Locked => "Locked",
            Self::Waiting => "Waiting",
            Self::Scheduled => "Scheduled",
            Self::Ready => "Not started",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::TimeElapsed => "Time elapsed",
        }
    }
}

//
// ─── LAUNCH DISPATCH ───────────────────────────────────────────────────────────
//

/// How an enabled module is entered.
///
/// A first launch creates a new progress record server-side; a continue
/// fetches the existing one. Either way the server's response replaces the
/// whole snapshot list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchKind {
    Create,
    Resume,
}

impl LaunchKind {
    #[must_use]
    pub fn for_status(status: ModuleStatus) -> Option<Self> {
        match status {
            ModuleStatus::NotStarted => Some(Self::Create),
            ModuleStatus::InProgress => Some(Self::Resume),
            ModuleStatus::Locked
            | ModuleStatus::WaitForModuleDurationToElapse
            | ModuleStatus::Scheduled
            | ModuleStatus::Completed
            | ModuleStatus::TimeElapsed => None,
        }
    }
}

//
// ─── DISPLAY CONTRACT ──────────────────────────────────────────────────────────
//

/// Everything the execution screen needs to render one module's action area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleAction {
    pub badge: Badge,
    pub button_text: Option<&'static str>,
    pub is_enabled: bool,
    pub show_button: bool,
    pub message: Option<&'static str>,
}

fn locked_message(policy: GroupSchedulingPolicy) -> &'static str {
    match (policy.is_member_order_locked, policy.wait_module_completion) {
        (true, true) => {
            "Modules unlock in order, once the previous module's full time has elapsed."
        }
        (true, false) => "Modules must be completed in order. Finish the previous module first.",
        (false, true) => "This module unlocks once the previous module's full time has elapsed.",
        (false, false) => "This module is locked.",
    }
}

/// Maps a server-asserted status to the display contract.
///
/// The mapping is total: all seven statuses yield a defined action. The
/// engine never computes `Locked`/`Scheduled`/`WaitForModuleDurationToElapse`
/// itself; they arrive pre-classified and are only rendered here.
#[must_use]
pub fn action_for(status: ModuleStatus, policy: GroupSchedulingPolicy) -> ModuleAction {
    match status {
        ModuleStatus::Locked => ModuleAction {
            badge: Badge::Locked,
            button_text: None,
            is_enabled: false,
            show_button: false,
            message: Some(locked_message(policy)),
        },
        ModuleStatus::WaitForModuleDurationToElapse => ModuleAction {
            badge: Badge::Waiting,
            button_text: None,
            is_enabled: false,
            show_button: false,
            message: Some("Finished early. The full module duration must elapse before the next module unlocks."),
        },
        ModuleStatus::Scheduled => ModuleAction {
            badge: Badge::Scheduled,
            button_text: None,
            is_enabled: false,
            show_button: false,
            message: Some("This module is scheduled for later."),
        },
        ModuleStatus::NotStarted => ModuleAction {
            badge: Badge::Ready,
            button_text: Some("Start module"),
            is_enabled: true,
            show_button: true,
            message: None,
        },
        ModuleStatus::InProgress => ModuleAction {
            badge: Badge::InProgress,
            button_text: Some("Continue module"),
            is_enabled: true,
            show_button: true,
            message: None,
        },
        ModuleStatus::Completed => ModuleAction {
            badge: Badge::Completed,
            button_text: None,
            is_enabled: false,
            show_button: false,
            message: None,
        },
        ModuleStatus::TimeElapsed => ModuleAction {
            badge: Badge::TimeElapsed,
            button_text: None,
            is_enabled: false,
            show_button: false,
            message: Some("The time allocated for this module has ended."),
        },
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [ModuleStatus; 7] = [
        ModuleStatus::Locked,
        ModuleStatus::WaitForModuleDurationToElapse,
        ModuleStatus::Scheduled,
        ModuleStatus::NotStarted,
        ModuleStatus::InProgress,
        ModuleStatus::Completed,
        ModuleStatus::TimeElapsed,
    ];

    #[test]
    fn mapping_is_total_over_all_statuses() {
        for status in ALL_STATUSES {
            let action = action_for(status, GroupSchedulingPolicy::default());
            assert_eq!(action.is_enabled, action.show_button);
            assert!(!action.badge.label().is_empty());
        }
    }

    #[test]
    fn only_not_started_and_in_progress_are_actionable() {
        for status in ALL_STATUSES {
            let action = action_for(status, GroupSchedulingPolicy::default());
            let expected =
                matches!(status, ModuleStatus::NotStarted | ModuleStatus::InProgress);
            assert_eq!(action.is_enabled, expected, "status {status:?}");
        }
    }

    #[test]
    fn launch_kind_follows_status() {
        assert_eq!(
            LaunchKind::for_status(ModuleStatus::NotStarted),
            Some(LaunchKind::Create)
        );
        assert_eq!(
            LaunchKind::for_status(ModuleStatus::InProgress),
            Some(LaunchKind::Resume)
        );
        assert_eq!(LaunchKind::for_status(ModuleStatus::Completed), None);
        assert_eq!(LaunchKind::for_status(ModuleStatus::Locked), None);
    }

    #[test]
    fn locked_messages_differ_per_policy_combination() {
        let combos = [
            (false, false),
            (false, true),
            (true, false),
            (true, true),
        ];
        let mut messages = std::collections::HashSet::new();
        for (order, wait) in combos {
            let policy = GroupSchedulingPolicy {
                is_member_order_locked: order,
                wait_module_completion: wait,
            };
            let action = action_for(ModuleStatus::Locked, policy);
            messages.insert(action.message.unwrap());
        }
        assert_eq!(messages.len(), 4);
    }

    #[test]
    fn button_text_matches_launch_kind() {
        let policy = GroupSchedulingPolicy::default();
        assert_eq!(
            action_for(ModuleStatus::NotStarted, policy).button_text,
            Some("Start module")
        );
        assert_eq!(
            action_for(ModuleStatus::InProgress, policy).button_text,
            Some("Continue module")
        );
        assert_eq!(action_for(ModuleStatus::Completed, policy).button_text, None);
    }
}
