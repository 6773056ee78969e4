use assess_core::actions::{ModuleAction, action_for};
use assess_core::model::{GroupProgress, ModuleProgressId, ModuleStatus};
use assess_core::timing::{ModuleTiming, Urgency, classify_timing};

/// Presentation-agnostic row for the execution screen's module list.
///
/// Carries the engine's display contract verbatim; the UI decides colors,
/// layout, and localization of anything beyond the specified display fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleListItem {
    pub id: ModuleProgressId,
    pub order_number: u32,
    pub title: String,
    pub description: Option<String>,
    pub status: ModuleStatus,
    pub action: ModuleAction,
    pub timing: Option<ModuleTiming>,
    pub urgency: Option<Urgency>,
}

/// Derives the full module list in group order.
#[must_use]
pub fn module_items(group: &GroupProgress) -> Vec<ModuleListItem> {
    let policy = group.policy();
    group
        .modules()
        .iter()
        .map(|m| {
            let timing = classify_timing(m);
            let urgency = timing.as_ref().and_then(ModuleTiming::urgency);
            ModuleListItem {
                id: m.id,
                order_number: m.order_number,
                title: m.title.clone(),
                description: m.description.clone(),
                status: m.status,
                action: action_for(m.status, policy),
                timing,
                urgency,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::{
        AssessmentModuleId, GroupSchedulingPolicy, ModuleProgressSnapshot,
    };
    use assess_core::time::{HmsDuration, fixed_now};
    use uuid::Uuid;

    fn module(order_number: u32, status: ModuleStatus) -> ModuleProgressSnapshot {
        ModuleProgressSnapshot {
            id: ModuleProgressId::new(Uuid::new_v4()),
            order_number,
            assessment_module_id: AssessmentModuleId::new(Uuid::new_v4()),
            title: format!("Module {order_number}"),
            description: None,
            status,
            started_at: None,
            completed_at: None,
            duration_minutes: None,
            time_remaining: None,
            passed: None,
            score_percentage: None,
            passing_score_percentage: None,
        }
    }

    #[test]
    fn items_follow_group_order_and_carry_actions() {
        let group = GroupProgress::new(
            vec![
                module(2, ModuleStatus::Locked),
                module(1, ModuleStatus::NotStarted),
            ],
            GroupSchedulingPolicy {
                is_member_order_locked: true,
                wait_module_completion: false,
            },
        )
        .unwrap();

        let items = module_items(&group);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].order_number, 1);
        assert!(items[0].action.is_enabled);
        assert!(!items[1].action.is_enabled);
        assert!(items[1].action.message.is_some());
    }

    #[test]
    fn urgency_rides_along_with_timing() {
        let mut started = module(1, ModuleStatus::InProgress);
        started.duration_minutes = Some(60);
        started.started_at = Some(fixed_now());
        started.time_remaining = Some(HmsDuration::parse("00:08:00"));

        let group =
            GroupProgress::new(vec![started], GroupSchedulingPolicy::default()).unwrap();
        let items = module_items(&group);

        assert_eq!(items[0].urgency, Some(Urgency::Urgent));
        assert_eq!(
            items[0].timing.as_ref().unwrap().remaining_minutes,
            Some(8)
        );
    }

    #[test]
    fn untimed_modules_have_no_timing() {
        let group = GroupProgress::new(
            vec![module(1, ModuleStatus::NotStarted)],
            GroupSchedulingPolicy::default(),
        )
        .unwrap();
        let items = module_items(&group);
        assert_eq!(items[0].timing, None);
        assert_eq!(items[0].urgency, None);
    }
}
